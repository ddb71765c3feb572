use crate::{
    cli::actions::dashboard::{Backend, print_todos},
    config::AppConfig,
    pages::TodosPage,
    view,
};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
}

/// Load the todo page with the public key only.
/// # Errors
/// Returns an error if the todos cannot be loaded.
pub async fn execute(args: Args) -> Result<()> {
    let backend = Backend::new(args.config)?;
    let (_handle, scope) = view::mount();
    let page = TodosPage::new(backend.gateway.clone(), backend.coordinator.clone(), scope);
    let state = page.load().await;
    backend.close().await;

    println!("{}", backend.config.redirects.todos);
    print_todos(state)
}

//! Wiring shared by the CLI flows: the HTTP-backed components, a console
//! navigator, and the dashboard printout shown after sign-in.

use crate::{
    api::ApiClient,
    auth::{HttpIdentityProvider, SessionGateway},
    config::AppConfig,
    navigation::{NavigationCommand, NavigationController, Navigator},
    pages::{PageState, SubscriptionPage, TodosPage},
    revalidate::ConfiguredRevalidator,
    todos::{HttpDataApi, TodoItem, TodosCoordinator},
    view::ViewScope,
};
use anyhow::{Result, bail};
use tracing::warn;

/// Prints navigation commands instead of switching routes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, command: NavigationCommand) {
        match command {
            NavigationCommand::Replace(route) => println!("-> {route}"),
            NavigationCommand::External(url) => {
                println!("Open this URL in a browser to continue:\n\n  {url}\n");
            }
            NavigationCommand::Stay { error } => eprintln!("{error}"),
        }
    }
}

pub struct Backend {
    pub config: AppConfig,
    pub gateway: SessionGateway<HttpIdentityProvider>,
    pub coordinator: TodosCoordinator<HttpDataApi, ConfiguredRevalidator>,
}

impl Backend {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self> {
        let api = ApiClient::new(&config)?;
        let gateway = SessionGateway::new(
            HttpIdentityProvider::new(api.clone()),
            config.callback_url.clone(),
        );
        let revalidator = ConfiguredRevalidator::new(api.clone(), config.revalidate_url.clone());
        let coordinator = TodosCoordinator::new(
            HttpDataApi::new(api),
            revalidator,
            config.redirects.revalidate_path.clone(),
        );

        Ok(Self {
            config,
            gateway,
            coordinator,
        })
    }

    #[must_use]
    pub fn navigation(&self) -> NavigationController {
        NavigationController::new(self.config.redirects.clone())
    }

    /// Delivers pending revalidation signals. Must run before the runtime exits.
    pub async fn close(&self) {
        self.coordinator.flush().await;
    }

    /// Loads and prints the subscription and todo pages, then signs out and
    /// sends the navigator back to the login route.
    ///
    /// # Errors
    /// Returns an error if either page fails to load.
    pub async fn show_dashboard<N: Navigator>(&self, view: &ViewScope, navigator: &N) -> Result<()> {
        let subscription = SubscriptionPage::new(self.gateway.clone(), view.clone())
            .load()
            .await;
        let todos = TodosPage::new(self.gateway.clone(), self.coordinator.clone(), view.clone())
            .load()
            .await;

        let navigation = self.navigation();
        if let Err(err) = self.gateway.sign_out().await {
            warn!("failed to sign out: {err}");
        }
        // The local session is gone either way.
        navigator.navigate(navigation.on_sign_out());

        let routes = navigation.redirects();
        println!("{}", routes.subscription);
        match subscription {
            PageState::Ready(view) => match view.user {
                Some(user) => println!(
                    "  Account: {} ({})",
                    user.email.as_deref().unwrap_or("no email"),
                    user.id
                ),
                None => println!("  Account: signed out"),
            },
            PageState::Failed(message) => bail!(message),
            PageState::Discarded => bail!("view closed before the account loaded"),
        }

        println!("{}", routes.todos);
        print_todos(todos)
    }
}

/// Prints a loaded todo page; a failed load is an error, never an empty list.
///
/// # Errors
/// Returns an error if the page failed or was discarded.
pub fn print_todos(state: PageState<Vec<TodoItem>>) -> Result<()> {
    match state {
        PageState::Ready(items) if items.is_empty() => println!("No todos."),
        PageState::Ready(items) => {
            for item in items {
                println!("{:>6}  {}", item.id, item.title);
            }
        }
        PageState::Failed(message) => bail!(message),
        PageState::Discarded => bail!("view closed before the todos loaded"),
    }
    Ok(())
}

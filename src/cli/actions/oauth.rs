use crate::{
    auth::{CredentialValidator, FederatedProvider},
    cli::actions::dashboard::{Backend, ConsoleNavigator},
    config::AppConfig,
    pages::{CallbackPage, LoginForm, SubmitOutcome},
    view,
};
use anyhow::{Context, Result, anyhow, bail};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub provider: FederatedProvider,
}

/// Run both halves of the federated flow: print the consent URL, then read the
/// callback URL the browser lands on and complete the sign-in.
/// # Errors
/// Returns an error if either half of the flow fails.
pub async fn execute(args: Args) -> Result<()> {
    let backend = Backend::new(args.config)?;
    let navigator = Arc::new(ConsoleNavigator);

    let (login_view, login_scope) = view::mount();
    let form = LoginForm::new(
        backend.gateway.clone(),
        CredentialValidator::new(backend.config.password_policy),
        backend.navigation(),
        Arc::clone(&navigator),
        login_scope,
    );
    match form.sign_in_with_provider(args.provider).await {
        SubmitOutcome::Navigated(_) => {}
        SubmitOutcome::Failed(err) => return Err(anyhow!(err)),
        other => bail!("federated sign-in did not start: {other:?}"),
    }
    // The browser has left the login page.
    login_view.unmount();

    println!("Paste the URL the browser was redirected to:");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read the callback URL")?;
    let callback = Url::parse(line.trim()).context("invalid callback URL")?;

    let (_callback_view, scope) = view::mount();
    let page = CallbackPage::new(
        backend.gateway.clone(),
        backend.navigation(),
        navigator,
        scope.clone(),
    );
    let result = match page.complete(&callback).await {
        SubmitOutcome::Navigated(_) => backend.show_dashboard(&scope, &ConsoleNavigator).await,
        SubmitOutcome::Failed(err) => Err(anyhow!(err)),
        other => Err(anyhow!("federated sign-in did not complete: {other:?}")),
    };
    backend.close().await;

    result
}

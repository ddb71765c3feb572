use crate::{
    auth::{CredentialValidator, RawFormInput},
    cli::actions::dashboard::{Backend, ConsoleNavigator},
    config::AppConfig,
    pages::{LoginForm, SubmitOutcome},
    view,
};
use anyhow::{Result, anyhow};
use secrecy::SecretString;
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub config: AppConfig,
    pub email: String,
    pub password: SecretString,
}

/// Submit the login form, then show the dashboard.
/// # Errors
/// Returns an error if the input is invalid or sign-in fails.
pub async fn execute(args: Args) -> Result<()> {
    let backend = Backend::new(args.config)?;
    let (_handle, scope) = view::mount();

    let form = LoginForm::new(
        backend.gateway.clone(),
        CredentialValidator::new(backend.config.password_policy),
        backend.navigation(),
        Arc::new(ConsoleNavigator),
        scope.clone(),
    );

    let input = RawFormInput {
        email: args.email,
        password: args.password,
    };
    let result = match form.submit(input).await {
        SubmitOutcome::Navigated(_) => backend.show_dashboard(&scope, &ConsoleNavigator).await,
        SubmitOutcome::Invalid(errors) => Err(anyhow!(errors)),
        SubmitOutcome::Failed(err) => Err(anyhow!(err)),
        SubmitOutcome::Busy => Err(anyhow!("a sign-in is already in progress")),
        SubmitOutcome::Discarded => Err(anyhow!("sign-in was cancelled")),
    };
    backend.close().await;

    result
}

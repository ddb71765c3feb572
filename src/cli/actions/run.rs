use crate::cli::actions::{Action, login, oauth, todos};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => login::execute(args).await,
        Action::OAuth(args) => oauth::execute(args).await,
        Action::Todos(args) => todos::execute(args).await,
    }
}

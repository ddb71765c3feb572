pub mod dashboard;
pub mod login;
pub mod oauth;
pub mod todos;

// Internal "interpreter" for `Action`.
mod run;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    OAuth(oauth::Args),
    Todos(todos::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

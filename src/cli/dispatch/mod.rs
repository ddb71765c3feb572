//! Maps parsed CLI matches to an [`Action`] carrying a ready `AppConfig`.

use crate::{
    auth::FederatedProvider,
    cli::actions::{Action, login, oauth, todos},
    cli::commands::{backend, flows},
};
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let config = backend::Options::parse(matches)?.into_config();

    match matches.subcommand() {
        Some((flows::CMD_LOGIN, sub)) => {
            let email = sub
                .get_one::<String>(flows::ARG_EMAIL)
                .cloned()
                .context("missing required argument: --email")?;
            let password = sub
                .get_one::<String>(flows::ARG_PASSWORD)
                .cloned()
                .map(SecretString::from)
                .context("missing required argument: --password")?;
            Ok(Action::Login(login::Args {
                config,
                email,
                password,
            }))
        }
        Some((flows::CMD_OAUTH, sub)) => Ok(Action::OAuth(oauth::Args {
            config,
            provider: sub
                .get_one::<FederatedProvider>(flows::ARG_PROVIDER)
                .copied()
                .unwrap_or(FederatedProvider::Google),
        })),
        Some((flows::CMD_TODOS, _)) => Ok(Action::Todos(todos::Args { config })),
        Some((other, _)) => Err(anyhow!("unknown command: {other}")),
        None => Err(anyhow!("missing command")),
    }
}

use crate::auth::FederatedProvider;
use clap::{Arg, Command};

pub const CMD_LOGIN: &str = "login";
pub const CMD_OAUTH: &str = "oauth";
pub const CMD_TODOS: &str = "todos";

pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_PROVIDER: &str = "provider";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand_required(true)
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Sign in with email and password, then show the dashboard")
                .arg(
                    Arg::new(ARG_EMAIL)
                        .short('e')
                        .long(ARG_EMAIL)
                        .help("Account email")
                        .env("PORTICO_EMAIL")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .long(ARG_PASSWORD)
                        .help("Account password")
                        .env("PORTICO_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_OAUTH)
                .about("Sign in through a federated provider using the PKCE redirect flow")
                .arg(
                    Arg::new(ARG_PROVIDER)
                        .long(ARG_PROVIDER)
                        .help("Identity provider: google, github or azure")
                        .env("PORTICO_OAUTH_PROVIDER")
                        .default_value("google")
                        .value_parser(clap::value_parser!(FederatedProvider)),
                ),
        )
        .subcommand(Command::new(CMD_TODOS).about("List todos without signing in"))
}

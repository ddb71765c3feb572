//! Backend and routing options shared by every subcommand.

use crate::{
    auth::PasswordPolicy,
    config::{AppConfig, DEFAULT_TIMEOUT, Redirects, normalize_value},
};
use anyhow::{Context, Result, anyhow};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_API_KEY: &str = "api-key";
pub const ARG_CALLBACK_URL: &str = "callback-url";
pub const ARG_SUCCESS_ROUTE: &str = "success-route";
pub const ARG_REVALIDATE_URL: &str = "revalidate-url";
pub const ARG_PASSWORD_MIN_LENGTH: &str = "password-min-length";
pub const ARG_REQUEST_TIMEOUT_SECONDS: &str = "request-timeout-seconds";

#[derive(Debug)]
pub struct Options {
    pub api_url: Url,
    pub api_key: SecretString,
    pub callback_url: Url,
    pub success_route: String,
    pub revalidate_url: Option<Url>,
    pub password_min_length: usize,
    pub request_timeout: Duration,
}

impl Options {
    /// Parse backend arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing or a URL is invalid.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let read_optional = |id: &str| -> Option<String> {
            matches
                .get_one::<String>(id)
                .and_then(|value| normalize_value(value))
        };
        let read_required = |id: &str| -> Result<String> {
            read_optional(id).ok_or_else(|| anyhow!("missing required argument: --{id}"))
        };
        let read_url = |id: &str, value: &str| -> Result<Url> {
            Url::parse(value).with_context(|| format!("invalid URL for --{id}"))
        };

        let revalidate_url = read_optional(ARG_REVALIDATE_URL)
            .map(|value| read_url(ARG_REVALIDATE_URL, &value))
            .transpose()?;

        Ok(Self {
            api_url: read_url(ARG_API_URL, &read_required(ARG_API_URL)?)?,
            api_key: SecretString::from(read_required(ARG_API_KEY)?),
            callback_url: read_url(ARG_CALLBACK_URL, &read_required(ARG_CALLBACK_URL)?)?,
            success_route: read_required(ARG_SUCCESS_ROUTE)?,
            revalidate_url,
            password_min_length: matches
                .get_one::<usize>(ARG_PASSWORD_MIN_LENGTH)
                .copied()
                .unwrap_or(PasswordPolicy::default().min_length),
            request_timeout: matches
                .get_one::<u64>(ARG_REQUEST_TIMEOUT_SECONDS)
                .copied()
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
        })
    }

    #[must_use]
    pub fn into_config(self) -> AppConfig {
        AppConfig::new(self.api_url, self.api_key, self.callback_url)
            .with_redirects(Redirects::default().with_success_auth(self.success_route))
            .with_password_policy(
                PasswordPolicy::default().with_min_length(self.password_min_length),
            )
            .with_revalidate_url(self.revalidate_url)
            .with_request_timeout(self.request_timeout)
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Backend base URL, example: https://<project>.supabase.co")
                .env("PORTICO_API_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_API_KEY)
                .long(ARG_API_KEY)
                .help("Public (anon) API key sent with every request")
                .env("PORTICO_API_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_CALLBACK_URL)
                .long(ARG_CALLBACK_URL)
                .help("Where the identity provider sends the browser after federated sign-in")
                .env("PORTICO_CALLBACK_URL")
                .default_value("http://localhost:3000/auth/callback"),
        )
        .arg(
            Arg::new(ARG_SUCCESS_ROUTE)
                .long(ARG_SUCCESS_ROUTE)
                .help("Route to replace the login page with after sign-in")
                .env("PORTICO_SUCCESS_ROUTE")
                .default_value("/dashboard/main"),
        )
        .arg(
            Arg::new(ARG_REVALIDATE_URL)
                .long(ARG_REVALIDATE_URL)
                .help("Revalidation hook; when unset revalidation is only logged")
                .env("PORTICO_REVALIDATE_URL"),
        )
        .arg(
            Arg::new(ARG_PASSWORD_MIN_LENGTH)
                .long(ARG_PASSWORD_MIN_LENGTH)
                .help("Minimum password length accepted by the login form")
                .env("PORTICO_PASSWORD_MIN_LENGTH")
                .default_value("8")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new(ARG_REQUEST_TIMEOUT_SECONDS)
                .long(ARG_REQUEST_TIMEOUT_SECONDS)
                .help("Timeout for each HTTP request in seconds")
                .env("PORTICO_REQUEST_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64)),
        )
}

//! Client configuration: API endpoints, the public API key, route targets and the
//! password policy. Values come from CLI flags or `PORTICO_*` environment variables
//! (see `cli::commands`). The API key is the public anon key of the backend; it is
//! still kept in a `SecretString` so it never shows up in logs.

use crate::auth::PasswordPolicy;
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// Default request timeout applied to every HTTP call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Route targets used by the navigation controller and the coordinator.
/// Immutable once the config is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirects {
    pub success_auth: String,
    pub login: String,
    pub todos: String,
    pub subscription: String,
    pub revalidate_path: String,
}

impl Default for Redirects {
    fn default() -> Self {
        Self {
            success_auth: "/dashboard/main".to_string(),
            login: "/auth/login".to_string(),
            todos: "/dashboard/todos/list-todos".to_string(),
            subscription: "/dashboard/settings/subscription".to_string(),
            revalidate_path: "/".to_string(),
        }
    }
}

impl Redirects {
    #[must_use]
    pub fn with_success_auth(mut self, route: impl Into<String>) -> Self {
        self.success_auth = route.into();
        self
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub api_key: SecretString,
    pub redirects: Redirects,
    pub callback_url: Url,
    pub password_policy: PasswordPolicy,
    pub revalidate_url: Option<Url>,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Builds a config with default routes, policy and timeout.
    #[must_use]
    pub fn new(api_base_url: Url, api_key: SecretString, callback_url: Url) -> Self {
        Self {
            api_base_url,
            api_key,
            redirects: Redirects::default(),
            callback_url,
            password_policy: PasswordPolicy::default(),
            revalidate_url: None,
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_redirects(mut self, redirects: Redirects) -> Self {
        self.redirects = redirects;
        self
    }

    #[must_use]
    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.password_policy = policy;
        self
    }

    #[must_use]
    pub fn with_revalidate_url(mut self, url: Option<Url>) -> Self {
        self.revalidate_url = url;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = if timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };
        self
    }
}

/// Trims a user-supplied value and treats blank input as absent.
#[must_use]
pub fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

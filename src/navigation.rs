//! Maps auth outcomes to navigation commands.
//!
//! The controller is pure: it only builds [`NavigationCommand`] values. Pages hand
//! those to a [`Navigator`], which is the presentation layer's router.

use crate::{config::Redirects, errors::AuthError};
use std::fmt;
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationCommand {
    /// Replace the current route (no history entry for the login page).
    Replace(String),
    /// Leave the app, e.g. for a federated consent screen.
    External(Url),
    /// Remain on the current route and show the error.
    Stay { error: String },
}

impl fmt::Display for NavigationCommand {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationCommand::Replace(route) => write!(formatter, "replace {route}"),
            NavigationCommand::External(url) => write!(formatter, "external {url}"),
            NavigationCommand::Stay { error } => write!(formatter, "stay ({error})"),
        }
    }
}

/// Router owned by the presentation layer.
pub trait Navigator: Send + Sync {
    fn navigate(&self, command: NavigationCommand);
}

/// Per-attempt submit state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Clone, Debug)]
pub struct NavigationController {
    redirects: Redirects,
}

impl NavigationController {
    #[must_use]
    pub fn new(redirects: Redirects) -> Self {
        Self { redirects }
    }

    #[must_use]
    pub fn redirects(&self) -> &Redirects {
        &self.redirects
    }

    /// Success replaces the route with the configured success target; failure stays.
    #[must_use]
    pub fn on_auth_outcome<T>(&self, result: &Result<T, AuthError>) -> NavigationCommand {
        match result {
            Ok(_) => NavigationCommand::Replace(self.redirects.success_auth.clone()),
            Err(err) => NavigationCommand::Stay {
                error: err.to_string(),
            },
        }
    }

    /// After sign-out the user goes back to the login route.
    #[must_use]
    pub fn on_sign_out(&self) -> NavigationCommand {
        NavigationCommand::Replace(self.redirects.login.clone())
    }

    /// Federated phase one: success leaves for the consent screen.
    #[must_use]
    pub fn on_federated_outcome(&self, result: &Result<Url, AuthError>) -> NavigationCommand {
        match result {
            Ok(consent) => NavigationCommand::External(consent.clone()),
            Err(err) => NavigationCommand::Stay {
                error: err.to_string(),
            },
        }
    }
}

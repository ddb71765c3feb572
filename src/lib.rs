//! # Portico (session and data revalidation client)
//!
//! `portico` is the client side of an authenticated dashboard: a login form, a
//! subscription page and a todo list, composed against an external identity
//! provider and an external data API.
//!
//! ## Sign-in
//!
//! 1. **Validate:** raw form input is checked by [`auth::CredentialValidator`]. Only
//!    validated [`auth::Credentials`] can reach the network.
//! 2. **Authenticate:** [`auth::SessionGateway`] performs exactly one round-trip to the
//!    identity provider and owns the resulting session. Nothing is retried.
//! 3. **Navigate:** [`navigation::NavigationController`] maps the outcome to a
//!    [`navigation::NavigationCommand`]. Failures keep the user on the page.
//!
//! Federated sign-in is split in two: the login form starts a PKCE flow and hands
//! the consent URL to the navigator, and [`pages::CallbackPage`] completes it when
//! the provider redirects back. The two halves only share the verifier kept by the
//! gateway.
//!
//! ## Data and revalidation
//!
//! [`todos::TodosCoordinator`] fetches the server-owned collection fresh on every
//! call, then signals a [`revalidate::Revalidator`] so cached data is stale for the
//! next navigation. The current render keeps the snapshot it fetched.
//!
//! Page controllers in [`pages`] turn every failure into user-visible state and drop
//! results for views that were unmounted while a request was in flight.

pub mod api;
pub mod auth;
pub mod busy;
pub mod cli;
pub mod config;
pub mod errors;
pub mod navigation;
pub mod pages;
pub mod revalidate;
pub mod todos;
pub mod view;

#[cfg(test)]
mod testing;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}

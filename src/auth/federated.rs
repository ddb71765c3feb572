//! Federated (OAuth) sign-in pieces shared by both halves of the redirect flow:
//! the provider identifiers, the authorize request, and parsing of the callback
//! URL the provider sends the browser back to.

use crate::errors::AuthError;
use std::{fmt, str::FromStr};
use url::{Url, form_urlencoded};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FederatedProvider {
    Google,
    Github,
    Azure,
}

impl FederatedProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FederatedProvider::Google => "google",
            FederatedProvider::Github => "github",
            FederatedProvider::Azure => "azure",
        }
    }
}

impl fmt::Display for FederatedProvider {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for FederatedProvider {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "google" => Ok(FederatedProvider::Google),
            "github" => Ok(FederatedProvider::Github),
            "azure" => Ok(FederatedProvider::Azure),
            other => Err(format!("unsupported provider: {other}")),
        }
    }
}

/// Phase-one request sent to the identity provider's authorize endpoint.
#[derive(Clone, Debug)]
pub struct AuthorizeRequest {
    pub provider: FederatedProvider,
    pub redirect_to: Url,
    pub code_challenge: String,
}

/// Reads the authorization code from a callback URL.
///
/// Providers report errors either in the query or in the fragment
/// (`#error=access_denied&error_description=...`), so both are checked.
///
/// # Errors
/// Returns `AuthError::Provider` when the callback carries an error or no code.
pub fn authorization_code(callback: &Url) -> Result<String, AuthError> {
    let fragment = callback.fragment().unwrap_or_default();
    let params = callback
        .query_pairs()
        .chain(form_urlencoded::parse(fragment.as_bytes()))
        .collect::<Vec<_>>();

    let lookup = |key: &str| {
        params
            .iter()
            .find(|(name, value)| name == key && !value.trim().is_empty())
            .map(|(_, value)| value.to_string())
    };

    if let Some(error) = lookup("error") {
        let message = lookup("error_description").unwrap_or(error);
        return Err(AuthError::provider(message));
    }

    lookup("code").ok_or_else(|| AuthError::provider("Callback is missing an authorization code."))
}

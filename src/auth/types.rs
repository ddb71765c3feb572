//! Auth data model. Passwords and tokens are `SecretString`s so they are redacted
//! from `Debug` output and zeroized on drop.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::SystemTime;
use uuid::Uuid;

/// Unvalidated form input as emitted by the presentation layer.
#[derive(Debug)]
pub struct RawFormInput {
    pub email: String,
    pub password: SecretString,
}

impl RawFormInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Validated credentials. Only [`super::CredentialValidator`] builds them, and the
/// gateway takes them by value, so they cannot outlive one submit.
#[derive(Debug)]
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    pub(crate) fn new(email: String, password: SecretString) -> Self {
        Self { email, password }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

/// User snapshot as returned by the identity provider. Unknown fields are kept in
/// `attributes`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl User {
    #[must_use]
    pub fn new(id: Uuid, email: Option<String>) -> Self {
        Self {
            id,
            email,
            attributes: Map::new(),
        }
    }
}

/// Opaque proof of authentication issued by the identity provider.
#[derive(Clone, Debug)]
pub struct Session {
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    token_type: String,
    expires_at: Option<i64>,
    user: User,
}

impl Session {
    #[must_use]
    pub fn new(access_token: SecretString, user: User) -> Self {
        Self {
            access_token,
            refresh_token: None,
            token_type: "bearer".to_string(),
            expires_at: None,
            user,
        }
    }

    #[must_use]
    pub fn with_refresh_token(mut self, token: SecretString) -> Self {
        self.refresh_token = Some(token);
        self
    }

    #[must_use]
    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = token_type.into();
        self
    }

    /// Sets the expiry as unix seconds.
    #[must_use]
    pub fn with_expires_at(mut self, expires_at: i64) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    #[must_use]
    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh_token.as_ref()
    }

    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// A session without a known expiry is treated as valid.
    #[must_use]
    pub fn is_expired_at(&self, now_unix_seconds: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= now_unix_seconds)
    }
}

pub(crate) fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

//! Error taxonomy for the client layer.
//!
//! - [`ValidationError`] is local and field-scoped; it never leaves the process.
//! - [`AuthError`] covers every identity provider call and is surfaced to the user.
//! - [`DataFetchError`] wraps failed collection reads so they are never confused
//!   with an empty result.
//!
//! Transport failures are first classified as [`ApiError`] by the HTTP helpers and
//! then converted into the component error that owns the call.

use std::fmt;
use thiserror::Error;

/// Transport-level failure of one HTTP call.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("Response error: {0}")]
    Parse(String),
}

/// Form field a validation error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
}

impl fmt::Display for Field {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Email => formatter.write_str("email"),
            Field::Password => formatter.write_str("password"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email is required.")]
    EmailMissing,
    #[error("Please enter a valid email address.")]
    EmailInvalid,
    #[error("Password is required.")]
    PasswordMissing,
    #[error("Password must be at least {min} characters.")]
    PasswordTooShort { min: usize },
    #[error("Password must be at most {max} characters.")]
    PasswordTooLong { max: usize },
}

impl ValidationError {
    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            ValidationError::EmailMissing | ValidationError::EmailInvalid => Field::Email,
            ValidationError::PasswordMissing
            | ValidationError::PasswordTooShort { .. }
            | ValidationError::PasswordTooLong { .. } => Field::Password,
        }
    }
}

/// All field errors found in one submission, in field order.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Returns the errors for one field, for rendering next to the input.
    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &ValidationError> {
        self.0.iter().filter(move |error| error.field() == field)
    }

    #[must_use]
    pub fn has_field(&self, field: Field) -> bool {
        self.for_field(field).next().is_some()
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Error codes the identity provider uses for a rejected email/password pair.
const INVALID_CREDENTIAL_CODES: [&str; 2] = ["invalid_grant", "invalid_credentials"];

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid login credentials.")]
    InvalidCredentials,
    #[error("Unable to reach the identity provider: {0}")]
    Network(String),
    #[error("Identity provider error: {message}")]
    Provider {
        status: Option<u16>,
        message: String,
    },
}

impl AuthError {
    pub(crate) fn provider(message: impl Into<String>) -> Self {
        AuthError::Provider {
            status: None,
            message: message.into(),
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(message) | ApiError::Timeout(message) => AuthError::Network(message),
            ApiError::Http {
                status: 400,
                code: Some(code),
                ..
            } if INVALID_CREDENTIAL_CODES.contains(&code.as_str()) => AuthError::InvalidCredentials,
            ApiError::Http {
                status, message, ..
            } => AuthError::Provider {
                status: Some(status),
                message,
            },
            ApiError::Config(message) | ApiError::Parse(message) => AuthError::provider(message),
        }
    }
}

/// A collection read failed. Never rendered as an empty list.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Failed to load {resource}: {source}")]
pub struct DataFetchError {
    pub resource: &'static str,
    #[source]
    pub source: ApiError,
}

impl DataFetchError {
    #[must_use]
    pub fn new(resource: &'static str, source: ApiError) -> Self {
        Self { resource, source }
    }
}

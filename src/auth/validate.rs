//! Credential validation. Runs synchronously before any network call; the gateway
//! only accepts the [`Credentials`] produced here.

use super::types::{Credentials, RawFormInput};
use crate::errors::{ValidationError, ValidationErrors};
use regex::Regex;
use secrecy::ExposeSecret;

/// Longest address accepted, per the SMTP path limit.
const MAX_EMAIL_LENGTH: usize = 254;

#[must_use]
pub fn valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LENGTH
        && Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Length limits counted in characters. The upper bound matches what the identity
/// provider hashes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 72,
        }
    }
}

impl PasswordPolicy {
    /// The minimum is kept within `1..=max_length` so some password always fits.
    #[must_use]
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length.min(self.max_length).max(1);
        self
    }

    fn check(&self, password: &str) -> Option<ValidationError> {
        let length = password.chars().count();
        if length == 0 {
            Some(ValidationError::PasswordMissing)
        } else if length < self.min_length {
            Some(ValidationError::PasswordTooShort {
                min: self.min_length,
            })
        } else if length > self.max_length {
            Some(ValidationError::PasswordTooLong {
                max: self.max_length,
            })
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct CredentialValidator {
    policy: PasswordPolicy,
}

impl CredentialValidator {
    #[must_use]
    pub fn new(policy: PasswordPolicy) -> Self {
        Self { policy }
    }

    /// Checks every field and returns all errors at once. The email is trimmed;
    /// the password is taken as typed.
    ///
    /// # Errors
    /// Returns the collected field errors when any field is invalid.
    pub fn validate(&self, input: RawFormInput) -> Result<Credentials, ValidationErrors> {
        let RawFormInput { email, password } = input;
        let email = email.trim();
        let mut errors = Vec::new();

        if email.is_empty() {
            errors.push(ValidationError::EmailMissing);
        } else if !valid_email(email) {
            errors.push(ValidationError::EmailInvalid);
        }

        if let Some(error) = self.policy.check(password.expose_secret()) {
            errors.push(error);
        }

        if errors.is_empty() {
            Ok(Credentials::new(email.to_string(), password))
        } else {
            Err(ValidationErrors::new(errors))
        }
    }
}

//! Auth feature module covering credential validation, the identity provider
//! boundary and the session gateway. It keeps authentication logic out of the
//! pages and touches security boundaries, so it must never log passwords, tokens
//! or PKCE verifiers.
//!
//! Flow Overview: the login form validates input into [`Credentials`], the
//! [`SessionGateway`] performs one provider round-trip and keeps the resulting
//! [`Session`]. Federated sign-in starts with a PKCE authorize call and finishes on
//! the callback route by exchanging the returned code.

pub mod federated;
pub mod gateway;
pub mod pkce;
pub mod provider;
pub mod types;
pub mod validate;

pub use federated::{AuthorizeRequest, FederatedProvider};
pub use gateway::SessionGateway;
pub use provider::{HttpIdentityProvider, IdentityProvider};
pub use types::{Credentials, RawFormInput, Session, User};
pub use validate::{CredentialValidator, PasswordPolicy, valid_email};

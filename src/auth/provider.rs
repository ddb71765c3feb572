//! Identity provider boundary. [`IdentityProvider`] is the seam the gateway talks
//! to; [`HttpIdentityProvider`] speaks the GoTrue-style REST API
//! (`/auth/v1/token`, `/auth/v1/authorize`, `/auth/v1/user`, `/auth/v1/logout`).
//! Every method performs at most one round-trip and never retries.

use super::{
    federated::AuthorizeRequest,
    pkce::CHALLENGE_METHOD,
    types::{Credentials, Session, User, now_unix_seconds},
};
use crate::{api::ApiClient, errors::AuthError};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{Instrument, info_span};
use url::Url;

pub trait IdentityProvider: Send + Sync {
    /// Exchanges an email/password pair for a session.
    fn sign_in_with_password(
        &self,
        credentials: Credentials,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send;

    /// Starts a federated sign-in and returns the consent screen URL.
    fn authorize(
        &self,
        request: &AuthorizeRequest,
    ) -> impl Future<Output = Result<Url, AuthError>> + Send;

    /// Exchanges the code from a federated callback for a session.
    fn exchange_code(
        &self,
        auth_code: &str,
        code_verifier: &SecretString,
    ) -> impl Future<Output = Result<Session, AuthError>> + Send;

    /// Returns the user for a token, or `None` when the token is not accepted.
    fn current_user(
        &self,
        access_token: &SecretString,
    ) -> impl Future<Output = Result<Option<User>, AuthError>> + Send;

    /// Revokes the session behind a token.
    fn sign_out(
        &self,
        access_token: &SecretString,
    ) -> impl Future<Output = Result<(), AuthError>> + Send;
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct PkceGrant<'a> {
    auth_code: &'a str,
    code_verifier: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    user: User,
}

impl TokenResponse {
    fn into_session(self, now: i64) -> Session {
        let mut session = Session::new(SecretString::from(self.access_token), self.user);
        if let Some(token_type) = self.token_type {
            session = session.with_token_type(token_type);
        }
        if let Some(expires_at) = self
            .expires_at
            .or_else(|| self.expires_in.map(|seconds| now.saturating_add(seconds)))
        {
            session = session.with_expires_at(expires_at);
        }
        if let Some(refresh_token) = self.refresh_token {
            session = session.with_refresh_token(SecretString::from(refresh_token));
        }
        session
    }
}

#[derive(Clone, Debug)]
pub struct HttpIdentityProvider {
    api: ApiClient,
}

impl HttpIdentityProvider {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in_with_password(&self, credentials: Credentials) -> Result<Session, AuthError> {
        let url = self.api.endpoint("/auth/v1/token?grant_type=password")?;
        let grant = PasswordGrant {
            email: credentials.email(),
            password: credentials.password().expose_secret(),
        };

        let span = info_span!("auth.token", grant_type = "password", http.method = "POST");
        let response: TokenResponse = self
            .api
            .post_json(url, &grant, None)
            .instrument(span)
            .await?;

        Ok(response.into_session(now_unix_seconds()))
    }

    async fn authorize(&self, request: &AuthorizeRequest) -> Result<Url, AuthError> {
        let mut url = self.api.endpoint("/auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", request.provider.as_str())
            .append_pair("redirect_to", request.redirect_to.as_str())
            .append_pair("code_challenge", &request.code_challenge)
            .append_pair("code_challenge_method", CHALLENGE_METHOD);

        let span = info_span!(
            "auth.authorize",
            provider = %request.provider,
            http.method = "GET"
        );
        Ok(self.api.get_redirect(url).instrument(span).await?)
    }

    async fn exchange_code(
        &self,
        auth_code: &str,
        code_verifier: &SecretString,
    ) -> Result<Session, AuthError> {
        let url = self.api.endpoint("/auth/v1/token?grant_type=pkce")?;
        let grant = PkceGrant {
            auth_code,
            code_verifier: code_verifier.expose_secret(),
        };

        let span = info_span!("auth.token", grant_type = "pkce", http.method = "POST");
        let response: TokenResponse = self
            .api
            .post_json(url, &grant, None)
            .instrument(span)
            .await?;

        Ok(response.into_session(now_unix_seconds()))
    }

    async fn current_user(&self, access_token: &SecretString) -> Result<Option<User>, AuthError> {
        let url = self.api.endpoint("/auth/v1/user")?;
        let span = info_span!("auth.user", http.method = "GET");
        Ok(self
            .api
            .get_optional_json(url, Some(access_token))
            .instrument(span)
            .await?)
    }

    async fn sign_out(&self, access_token: &SecretString) -> Result<(), AuthError> {
        let url = self.api.endpoint("/auth/v1/logout")?;
        let span = info_span!("auth.logout", http.method = "POST");
        Ok(self
            .api
            .post_empty(url, Some(access_token))
            .instrument(span)
            .await?)
    }
}

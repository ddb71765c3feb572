//! Session gateway: the only owner of the session slot.
//!
//! The gateway wraps an [`IdentityProvider`] and keeps two pieces of shared state:
//! the current [`Session`] and, between the two halves of a federated sign-in, the
//! pending PKCE verifier. Pages hold clones of the gateway; they can read the
//! session but only the gateway writes it.

use super::{
    federated::{AuthorizeRequest, FederatedProvider, authorization_code},
    pkce,
    provider::IdentityProvider,
    types::{Credentials, Session, User, now_unix_seconds},
};
use crate::errors::AuthError;
use secrecy::SecretString;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Verifier kept between the authorize redirect and the callback.
#[derive(Debug)]
struct PendingFlow {
    provider: FederatedProvider,
    verifier: SecretString,
}

#[derive(Debug)]
pub struct SessionGateway<P> {
    provider: Arc<P>,
    callback_url: Url,
    session: Arc<RwLock<Option<Session>>>,
    pending: Arc<Mutex<Option<PendingFlow>>>,
}

impl<P> Clone for SessionGateway<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            callback_url: self.callback_url.clone(),
            session: Arc::clone(&self.session),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<P: IdentityProvider> SessionGateway<P> {
    /// `callback_url` is where the identity provider sends the browser after a
    /// federated consent screen.
    pub fn new(provider: P, callback_url: Url) -> Self {
        Self {
            provider: Arc::new(provider),
            callback_url,
            session: Arc::new(RwLock::new(None)),
            pending: Arc::new(Mutex::new(None)),
        }
    }

    /// Signs in with validated credentials. One provider round-trip, never retried.
    ///
    /// # Errors
    /// Returns the provider's `AuthError`; the session slot is left untouched.
    #[instrument(skip_all)]
    pub async fn sign_in_with_password(&self, credentials: Credentials) -> Result<Session, AuthError> {
        let session = self.provider.sign_in_with_password(credentials).await?;
        info!(user_id = %session.user().id, "password sign-in succeeded");
        self.store(session.clone()).await;
        Ok(session)
    }

    /// Starts a federated sign-in and returns the consent screen URL to send the
    /// browser to. A new call replaces any earlier pending flow.
    ///
    /// # Errors
    /// Returns an `AuthError` when the authorize endpoint is unreachable or does not
    /// answer with a redirect.
    #[instrument(skip(self))]
    pub async fn sign_in_with_federated_provider(
        &self,
        provider: FederatedProvider,
    ) -> Result<Url, AuthError> {
        let pair = pkce::generate();
        let request = AuthorizeRequest {
            provider,
            redirect_to: self.callback_url.clone(),
            code_challenge: pair.challenge,
        };

        let consent = self.provider.authorize(&request).await?;
        *self.pending.lock().await = Some(PendingFlow {
            provider,
            verifier: pair.verifier,
        });
        debug!(host = consent.host_str().unwrap_or_default(), "consent redirect issued");
        Ok(consent)
    }

    /// Finishes a federated sign-in from the callback URL. The pending verifier is
    /// consumed whether or not the exchange succeeds.
    ///
    /// # Errors
    /// Returns `AuthError::Provider` when no flow is pending or the callback carries
    /// an error, otherwise the exchange error.
    #[instrument(skip_all)]
    pub async fn complete_federated_sign_in(&self, callback: &Url) -> Result<Session, AuthError> {
        let Some(pending) = self.pending.lock().await.take() else {
            return Err(AuthError::provider("No federated sign-in is in progress."));
        };
        let code = authorization_code(callback)?;

        let session = self
            .provider
            .exchange_code(&code, &pending.verifier)
            .await?;
        info!(
            user_id = %session.user().id,
            provider = %pending.provider,
            "federated sign-in succeeded"
        );
        self.store(session.clone()).await;
        Ok(session)
    }

    /// Fetches the user behind the current session. `Ok(None)` means nobody is
    /// signed in; without a session no request is made.
    ///
    /// # Errors
    /// Returns an `AuthError` when the provider cannot be reached or fails.
    pub async fn current_user(&self) -> Result<Option<User>, AuthError> {
        let Some(token) = self.access_token().await else {
            debug!("no session, skipping user lookup");
            return Ok(None);
        };
        self.provider.current_user(&token).await
    }

    /// Clears the session and revokes it upstream. The local session is dropped even
    /// when the logout call fails.
    ///
    /// # Errors
    /// Returns the provider's `AuthError` from the logout call.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };
        if let Err(err) = self.provider.sign_out(session.access_token()).await {
            warn!("logout failed: {err}");
            return Err(err);
        }
        info!(user_id = %session.user().id, "signed out");
        Ok(())
    }

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<SecretString> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token().clone())
    }

    /// Derived from the session slot; there is no separate flag.
    pub async fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .is_some_and(|session| !session.is_expired_at(now_unix_seconds()))
    }

    #[cfg(test)]
    pub(crate) fn provider(&self) -> &P {
        &self.provider
    }

    async fn store(&self, session: Session) {
        *self.session.write().await = Some(session);
    }
}

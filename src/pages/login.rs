//! Login form controller.
//!
//! One submit runs validate → sign in → navigate, strictly in that order. Both the
//! password and the federated button share one busy flag, so a second sign-in of
//! either kind is refused while one is in flight.

use super::SubmitOutcome;
use crate::{
    auth::{
        CredentialValidator, FederatedProvider, IdentityProvider, RawFormInput, SessionGateway,
    },
    busy::BusyFlag,
    errors::{AuthError, ValidationErrors},
    navigation::{NavigationCommand, NavigationController, Navigator, SubmitState},
    view::ViewScope,
};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Snapshot for rendering the form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub submit_state: SubmitState,
    pub field_errors: Option<ValidationErrors>,
    pub error: Option<String>,
}

pub struct LoginForm<P, N> {
    gateway: SessionGateway<P>,
    validator: CredentialValidator,
    controller: NavigationController,
    navigator: Arc<N>,
    view: ViewScope,
    busy: BusyFlag,
    state: Mutex<FormState>,
}

impl<P: IdentityProvider, N: Navigator> LoginForm<P, N> {
    pub fn new(
        gateway: SessionGateway<P>,
        validator: CredentialValidator,
        controller: NavigationController,
        navigator: Arc<N>,
        view: ViewScope,
    ) -> Self {
        Self {
            gateway,
            validator,
            controller,
            navigator,
            view,
            busy: BusyFlag::new(),
            state: Mutex::new(FormState::default()),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// `Submitting` while a sign-in is in flight, otherwise the last outcome.
    #[must_use]
    pub fn state(&self) -> FormState {
        let mut state = self.lock_state().clone();
        if self.busy.is_busy() {
            state.submit_state = SubmitState::Submitting;
        }
        state
    }

    /// Handles the email/password submit event.
    #[instrument(skip_all)]
    pub async fn submit(&self, input: RawFormInput) -> SubmitOutcome {
        let credentials = match self.validator.validate(input) {
            Ok(credentials) => credentials,
            Err(errors) => {
                debug!(count = errors.errors().len(), "form input rejected");
                let mut state = self.lock_state();
                state.field_errors = Some(errors.clone());
                state.error = None;
                return SubmitOutcome::Invalid(errors);
            }
        };

        let Some(_guard) = self.busy.try_acquire() else {
            debug!("sign-in already in flight");
            return SubmitOutcome::Busy;
        };
        self.lock_state().field_errors = None;

        let Some(result) = self
            .view
            .run(self.gateway.sign_in_with_password(credentials))
            .await
        else {
            debug!("login view unmounted, discarding sign-in result");
            return SubmitOutcome::Discarded;
        };

        let command = self.controller.on_auth_outcome(&result);
        match result {
            Ok(_) => self.navigate(command),
            Err(err) => self.fail(err),
        }
    }

    /// Handles a federated provider button. On success the navigator is sent to the
    /// provider's consent screen.
    #[instrument(skip(self))]
    pub async fn sign_in_with_provider(&self, provider: FederatedProvider) -> SubmitOutcome {
        let Some(_guard) = self.busy.try_acquire() else {
            debug!("sign-in already in flight");
            return SubmitOutcome::Busy;
        };

        let Some(result) = self
            .view
            .run(self.gateway.sign_in_with_federated_provider(provider))
            .await
        else {
            debug!("login view unmounted, discarding authorize result");
            return SubmitOutcome::Discarded;
        };

        let command = self.controller.on_federated_outcome(&result);
        match result {
            Ok(_) => self.navigate(command),
            Err(err) => self.fail(err),
        }
    }

    fn navigate(&self, command: NavigationCommand) -> SubmitOutcome {
        {
            let mut state = self.lock_state();
            state.submit_state = SubmitState::Succeeded;
            state.error = None;
        }
        info!(%command, "sign-in navigation");
        self.navigator.navigate(command.clone());
        SubmitOutcome::Navigated(command)
    }

    fn fail(&self, err: AuthError) -> SubmitOutcome {
        warn!("sign-in failed: {err}");
        {
            let mut state = self.lock_state();
            state.submit_state = SubmitState::Failed;
            state.error = Some(err.to_string());
        }
        SubmitOutcome::Failed(err)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Redirects,
        errors::{Field, ValidationError},
        testing::{EventLog, FakeIdentityProvider, Gate, RecordingNavigator, count},
        view::{ViewHandle, mount},
    };
    use anyhow::Result;
    use url::Url;

    struct Harness {
        form: LoginForm<FakeIdentityProvider, RecordingNavigator>,
        gateway: SessionGateway<FakeIdentityProvider>,
        navigator: Arc<RecordingNavigator>,
        handle: ViewHandle,
    }

    fn harness(provider: FakeIdentityProvider) -> Result<Harness> {
        let gateway = SessionGateway::new(
            provider,
            Url::parse("http://localhost:3000/auth/callback")?,
        );
        let navigator = Arc::new(RecordingNavigator::new(EventLog::default()));
        let (handle, view) = mount();
        let form = LoginForm::new(
            gateway.clone(),
            CredentialValidator::default(),
            NavigationController::new(Redirects::default()),
            Arc::clone(&navigator),
            view,
        );
        Ok(Harness {
            form,
            gateway,
            navigator,
            handle,
        })
    }

    fn valid_input() -> RawFormInput {
        RawFormInput::new("ada@example.com", "correct horse")
    }

    #[tokio::test]
    async fn malformed_email_never_reaches_gateway() -> Result<()> {
        let h = harness(FakeIdentityProvider::new())?;
        for email in ["", "ada", "ada@", "@example.com", "ada@example"] {
            let outcome = h
                .form
                .submit(RawFormInput::new(email, "correct horse"))
                .await;
            let SubmitOutcome::Invalid(errors) = outcome else {
                panic!("{email:?} should be rejected");
            };
            assert!(errors.has_field(Field::Email));
        }
        assert_eq!(count(&h.gateway.provider().password_calls), 0);
        assert!(h.navigator.commands().is_empty());

        let state = h.form.state();
        assert_eq!(state.submit_state, SubmitState::Idle);
        assert!(state.field_errors.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn success_navigates_once_to_success_route() -> Result<()> {
        let h = harness(FakeIdentityProvider::new())?;

        let outcome = h.form.submit(valid_input()).await;
        let expected = NavigationCommand::Replace("/dashboard/main".to_string());
        assert_eq!(outcome, SubmitOutcome::Navigated(expected.clone()));
        assert_eq!(h.navigator.commands(), vec![expected]);
        assert_eq!(count(&h.gateway.provider().password_calls), 1);
        assert!(h.gateway.is_authenticated().await);
        assert_eq!(h.form.state().submit_state, SubmitState::Succeeded);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_credentials_stay_on_page() -> Result<()> {
        let h = harness(
            FakeIdentityProvider::new().with_password_result(Err(AuthError::InvalidCredentials)),
        )?;

        let outcome = h.form.submit(valid_input()).await;
        assert_eq!(outcome, SubmitOutcome::Failed(AuthError::InvalidCredentials));
        assert!(h.navigator.commands().is_empty());
        assert!(!h.gateway.is_authenticated().await);

        let state = h.form.state();
        assert_eq!(state.submit_state, SubmitState::Failed);
        assert_eq!(state.error.as_deref(), Some("Invalid login credentials."));
        assert!(!h.form.is_busy());
        Ok(())
    }

    #[tokio::test]
    async fn double_submit_signs_in_once() -> Result<()> {
        let gate = Gate::new();
        let h = harness(FakeIdentityProvider::new().with_gate(Arc::clone(&gate)))?;

        let (first, second) = tokio::join!(h.form.submit(valid_input()), async {
            gate.entered().await;
            assert_eq!(h.form.state().submit_state, SubmitState::Submitting);
            let second = h.form.submit(valid_input()).await;
            gate.open();
            second
        });

        assert!(matches!(first, SubmitOutcome::Navigated(_)));
        assert_eq!(second, SubmitOutcome::Busy);
        assert_eq!(count(&h.gateway.provider().password_calls), 1);
        assert_eq!(h.navigator.commands().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn busy_flag_spans_federated_success() -> Result<()> {
        let gate = Gate::new();
        let h = harness(FakeIdentityProvider::new().with_gate(Arc::clone(&gate)))?;

        assert!(!h.form.is_busy());
        let (outcome, ()) = tokio::join!(
            h.form.sign_in_with_provider(FederatedProvider::Google),
            async {
                gate.entered().await;
                assert!(h.form.is_busy());
                gate.open();
            }
        );
        assert!(!h.form.is_busy());

        let SubmitOutcome::Navigated(NavigationCommand::External(consent)) = outcome else {
            panic!("expected an external navigation");
        };
        assert_eq!(consent.host_str(), Some("accounts.example.com"));
        assert_eq!(h.navigator.commands().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn busy_flag_spans_federated_failure() -> Result<()> {
        let gate = Gate::new();
        let h = harness(
            FakeIdentityProvider::new()
                .with_authorize_result(Err(AuthError::Network("unreachable".to_string())))
                .with_gate(Arc::clone(&gate)),
        )?;

        assert!(!h.form.is_busy());
        let (outcome, ()) = tokio::join!(
            h.form.sign_in_with_provider(FederatedProvider::Google),
            async {
                gate.entered().await;
                assert!(h.form.is_busy());
                gate.open();
            }
        );
        assert!(!h.form.is_busy());
        assert!(matches!(outcome, SubmitOutcome::Failed(AuthError::Network(_))));
        assert!(h.navigator.commands().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn federated_click_refused_during_password_sign_in() -> Result<()> {
        let gate = Gate::new();
        let h = harness(FakeIdentityProvider::new().with_gate(Arc::clone(&gate)))?;

        let (_, federated) = tokio::join!(h.form.submit(valid_input()), async {
            gate.entered().await;
            let outcome = h.form.sign_in_with_provider(FederatedProvider::Github).await;
            gate.open();
            outcome
        });
        assert_eq!(federated, SubmitOutcome::Busy);
        assert_eq!(count(&h.gateway.provider().authorize_calls), 0);
        Ok(())
    }

    #[tokio::test]
    async fn unmount_during_sign_in_discards_result() -> Result<()> {
        let gate = Gate::new();
        let h = harness(FakeIdentityProvider::new().with_gate(Arc::clone(&gate)))?;

        let (outcome, ()) = tokio::join!(h.form.submit(valid_input()), async {
            gate.entered().await;
            h.handle.unmount();
            gate.open();
        });

        assert_eq!(outcome, SubmitOutcome::Discarded);
        assert!(h.navigator.commands().is_empty());
        assert!(!h.form.is_busy());
        Ok(())
    }

    #[tokio::test]
    async fn field_errors_clear_on_next_valid_submit() -> Result<()> {
        let h = harness(FakeIdentityProvider::new())?;

        let outcome = h.form.submit(RawFormInput::new("ada@example.com", "")).await;
        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert_eq!(
            h.form
                .state()
                .field_errors
                .map(|errors| errors.errors().to_vec()),
            Some(vec![ValidationError::PasswordMissing])
        );

        h.form.submit(valid_input()).await;
        assert!(h.form.state().field_errors.is_none());
        Ok(())
    }
}

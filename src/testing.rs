//! In-memory fakes for the provider, data API, revalidator and navigator.

use crate::{
    auth::{AuthorizeRequest, Credentials, IdentityProvider, Session, User},
    errors::{ApiError, AuthError},
    navigation::{NavigationCommand, Navigator},
    revalidate::Revalidator,
    todos::{DataApi, TodoItem},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};
use tokio::sync::Notify;
use url::Url;
use uuid::Uuid;

pub(crate) const USER_ID: u128 = 0x5f7c_1d64_2a3c_4d3e_9f65_0d2c_8c1b_7a10;

pub(crate) fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

fn read<T: Clone>(slot: &Mutex<T>) -> T {
    slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
}

fn write<T>(slot: &Mutex<T>, value: T) {
    *slot.lock().unwrap_or_else(PoisonError::into_inner) = value;
}

pub(crate) fn sample_user() -> User {
    User::new(Uuid::from_u128(USER_ID), Some("ada@example.com".to_string()))
}

pub(crate) fn sample_session() -> Session {
    Session::new(SecretString::from("access-token".to_string()), sample_user())
        .with_refresh_token(SecretString::from("refresh-token".to_string()))
}

fn consent_url() -> Url {
    Url::parse("https://accounts.example.com/consent?client_id=portico")
        .unwrap_or_else(|err| panic!("static consent url: {err}"))
}

/// Ordered record of side effects across fakes.
#[derive(Clone, Debug, Default)]
pub(crate) struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub(crate) fn push(&self, event: impl Into<String>) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.into());
    }

    pub(crate) fn snapshot(&self) -> Vec<String> {
        read(&self.0)
    }
}

/// Parks a fake call until the test releases it.
#[derive(Debug, Default)]
pub(crate) struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }

    /// Resolves once a call is parked on the gate.
    pub(crate) async fn entered(&self) {
        self.entered.notified().await;
    }

    pub(crate) fn open(&self) {
        self.release.notify_one();
    }
}

async fn maybe_pass(gate: Option<&Arc<Gate>>) {
    if let Some(gate) = gate {
        gate.pass().await;
    }
}

#[derive(Debug)]
pub(crate) struct FakeIdentityProvider {
    password: Mutex<Result<Session, AuthError>>,
    authorize: Mutex<Result<Url, AuthError>>,
    exchange: Mutex<Result<Session, AuthError>>,
    user: Mutex<Result<Option<User>, AuthError>>,
    sign_out: Mutex<Result<(), AuthError>>,
    gate: Option<Arc<Gate>>,
    last_authorize: Mutex<Option<AuthorizeRequest>>,
    last_exchange: Mutex<Option<(String, String)>>,
    pub(crate) password_calls: AtomicUsize,
    pub(crate) authorize_calls: AtomicUsize,
    pub(crate) exchange_calls: AtomicUsize,
    pub(crate) user_calls: AtomicUsize,
    pub(crate) sign_out_calls: AtomicUsize,
}

impl FakeIdentityProvider {
    /// Every call succeeds with the sample session, user and consent URL.
    pub(crate) fn new() -> Self {
        Self {
            password: Mutex::new(Ok(sample_session())),
            authorize: Mutex::new(Ok(consent_url())),
            exchange: Mutex::new(Ok(sample_session())),
            user: Mutex::new(Ok(Some(sample_user()))),
            sign_out: Mutex::new(Ok(())),
            gate: None,
            last_authorize: Mutex::new(None),
            last_exchange: Mutex::new(None),
            password_calls: AtomicUsize::new(0),
            authorize_calls: AtomicUsize::new(0),
            exchange_calls: AtomicUsize::new(0),
            user_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_password_result(self, result: Result<Session, AuthError>) -> Self {
        write(&self.password, result);
        self
    }

    pub(crate) fn with_authorize_result(self, result: Result<Url, AuthError>) -> Self {
        write(&self.authorize, result);
        self
    }

    pub(crate) fn with_exchange_result(self, result: Result<Session, AuthError>) -> Self {
        write(&self.exchange, result);
        self
    }

    pub(crate) fn with_user_result(self, result: Result<Option<User>, AuthError>) -> Self {
        write(&self.user, result);
        self
    }

    pub(crate) fn with_sign_out_result(self, result: Result<(), AuthError>) -> Self {
        write(&self.sign_out, result);
        self
    }

    /// Password sign-in, authorize and code exchange park on `gate`.
    pub(crate) fn with_gate(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn last_authorize(&self) -> Option<AuthorizeRequest> {
        read(&self.last_authorize)
    }

    /// Code and verifier of the last exchange.
    pub(crate) fn last_exchange(&self) -> Option<(String, String)> {
        read(&self.last_exchange)
    }
}

impl IdentityProvider for FakeIdentityProvider {
    async fn sign_in_with_password(&self, _credentials: Credentials) -> Result<Session, AuthError> {
        self.password_calls.fetch_add(1, Ordering::SeqCst);
        maybe_pass(self.gate.as_ref()).await;
        read(&self.password)
    }

    async fn authorize(&self, request: &AuthorizeRequest) -> Result<Url, AuthError> {
        self.authorize_calls.fetch_add(1, Ordering::SeqCst);
        write(&self.last_authorize, Some(request.clone()));
        maybe_pass(self.gate.as_ref()).await;
        read(&self.authorize)
    }

    async fn exchange_code(
        &self,
        auth_code: &str,
        code_verifier: &SecretString,
    ) -> Result<Session, AuthError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        write(
            &self.last_exchange,
            Some((
                auth_code.to_string(),
                code_verifier.expose_secret().to_string(),
            )),
        );
        maybe_pass(self.gate.as_ref()).await;
        read(&self.exchange)
    }

    async fn current_user(&self, _access_token: &SecretString) -> Result<Option<User>, AuthError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        read(&self.user)
    }

    async fn sign_out(&self, _access_token: &SecretString) -> Result<(), AuthError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        read(&self.sign_out)
    }
}

#[derive(Debug)]
pub(crate) struct FakeDataApi {
    result: Mutex<Result<Vec<TodoItem>, ApiError>>,
    events: EventLog,
    gate: Option<Arc<Gate>>,
    last_token: Mutex<Option<String>>,
    pub(crate) calls: AtomicUsize,
}

impl FakeDataApi {
    /// Returns one "Buy milk" item by default.
    pub(crate) fn new(events: EventLog) -> Self {
        Self {
            result: Mutex::new(Ok(vec![TodoItem::new(1, "Buy milk")])),
            events,
            gate: None,
            last_token: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_result(self, result: Result<Vec<TodoItem>, ApiError>) -> Self {
        write(&self.result, result);
        self
    }

    pub(crate) fn with_gate(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn last_token(&self) -> Option<String> {
        read(&self.last_token)
    }
}

impl DataApi for FakeDataApi {
    async fn list_todos(&self, session: Option<&Session>) -> Result<Vec<TodoItem>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        write(
            &self.last_token,
            session.map(|session| session.access_token().expose_secret().to_string()),
        );
        maybe_pass(self.gate.as_ref()).await;
        self.events.push("fetch todos");
        read(&self.result)
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingRevalidator {
    events: EventLog,
    paths: Mutex<Vec<String>>,
}

impl RecordingRevalidator {
    pub(crate) fn new(events: EventLog) -> Self {
        Self {
            events,
            paths: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        read(&self.paths)
    }
}

impl Revalidator for RecordingRevalidator {
    fn revalidate_path(&self, path: &str) {
        self.events.push(format!("revalidate {path}"));
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingNavigator {
    events: EventLog,
    commands: Mutex<Vec<NavigationCommand>>,
}

impl RecordingNavigator {
    pub(crate) fn new(events: EventLog) -> Self {
        Self {
            events,
            commands: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn commands(&self) -> Vec<NavigationCommand> {
        read(&self.commands)
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, command: NavigationCommand) {
        self.events.push(format!("navigate {command}"));
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(command);
    }
}

//! Page controllers. Each one wires the components for one route and turns their
//! results into state the presentation layer can render. Errors stop here: a page
//! never returns an `Err`, it returns a failed state.

pub mod callback;
pub mod login;
pub mod subscription;
pub mod todos;

pub use callback::CallbackPage;
pub use login::{FormState, LoginForm};
pub use subscription::{SubscriptionPage, SubscriptionView};
pub use todos::TodosPage;

use crate::{errors::AuthError, errors::ValidationErrors, navigation::NavigationCommand};

/// Result of loading a page's data.
#[derive(Clone, Debug, PartialEq)]
pub enum PageState<T> {
    Ready(T),
    /// The load failed; the message is safe to show.
    Failed(String),
    /// The view went away before the load finished.
    Discarded,
}

impl<T> PageState<T> {
    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(value) => Some(value),
            PageState::Failed(_) | PageState::Discarded => None,
        }
    }
}

/// What happened to one sign-in attempt.
#[derive(Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Succeeded and the navigator received this command.
    Navigated(NavigationCommand),
    /// Rejected locally; nothing was sent.
    Invalid(ValidationErrors),
    /// The provider call failed; the page stays put.
    Failed(AuthError),
    /// Another sign-in is still in flight.
    Busy,
    /// The view was unmounted before the call finished.
    Discarded,
}

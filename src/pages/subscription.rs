//! Subscription settings route. Loads the current user per render for the pricing
//! display; a signed-out visitor is a normal state, not a failure.

use super::PageState;
use crate::{
    auth::{IdentityProvider, SessionGateway, User},
    view::ViewScope,
};
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq)]
pub struct SubscriptionView {
    /// `None` when nobody is signed in.
    pub user: Option<User>,
}

pub struct SubscriptionPage<P> {
    gateway: SessionGateway<P>,
    view: ViewScope,
}

impl<P: IdentityProvider> SubscriptionPage<P> {
    pub fn new(gateway: SessionGateway<P>, view: ViewScope) -> Self {
        Self { gateway, view }
    }

    pub async fn load(&self) -> PageState<SubscriptionView> {
        let Some(result) = self.view.run(self.gateway.current_user()).await else {
            debug!("subscription view unmounted, discarding result");
            return PageState::Discarded;
        };

        match result {
            Ok(user) => PageState::Ready(SubscriptionView { user }),
            Err(err) => {
                warn!("failed to load user: {err}");
                PageState::Failed(err.to_string())
            }
        }
    }
}

//! Federated sign-in callback route: the second, independent half of the redirect
//! flow. It only shares the gateway's pending verifier with the login form.

use super::SubmitOutcome;
use crate::{
    auth::{IdentityProvider, SessionGateway},
    navigation::{NavigationController, Navigator},
    view::ViewScope,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

pub struct CallbackPage<P, N> {
    gateway: SessionGateway<P>,
    controller: NavigationController,
    navigator: Arc<N>,
    view: ViewScope,
}

impl<P: IdentityProvider, N: Navigator> CallbackPage<P, N> {
    pub fn new(
        gateway: SessionGateway<P>,
        controller: NavigationController,
        navigator: Arc<N>,
        view: ViewScope,
    ) -> Self {
        Self {
            gateway,
            controller,
            navigator,
            view,
        }
    }

    /// Exchanges the code in `callback` and moves on to the success route.
    pub async fn complete(&self, callback: &Url) -> SubmitOutcome {
        let Some(result) = self
            .view
            .run(self.gateway.complete_federated_sign_in(callback))
            .await
        else {
            debug!("callback view unmounted, discarding exchange result");
            return SubmitOutcome::Discarded;
        };

        let command = self.controller.on_auth_outcome(&result);
        match result {
            Ok(_) => {
                info!(%command, "federated sign-in complete");
                self.navigator.navigate(command.clone());
                SubmitOutcome::Navigated(command)
            }
            Err(err) => {
                warn!("federated callback failed: {err}");
                SubmitOutcome::Failed(err)
            }
        }
    }
}

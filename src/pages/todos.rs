//! Todo list route. Every render is a fresh load through the coordinator.

use super::PageState;
use crate::{
    auth::{IdentityProvider, SessionGateway},
    revalidate::Revalidator,
    todos::{DataApi, TodoItem, TodosCoordinator},
    view::ViewScope,
};
use tracing::{debug, error};

pub struct TodosPage<P, D, R> {
    gateway: SessionGateway<P>,
    coordinator: TodosCoordinator<D, R>,
    view: ViewScope,
}

impl<P: IdentityProvider, D: DataApi, R: Revalidator> TodosPage<P, D, R> {
    pub fn new(
        gateway: SessionGateway<P>,
        coordinator: TodosCoordinator<D, R>,
        view: ViewScope,
    ) -> Self {
        Self {
            gateway,
            coordinator,
            view,
        }
    }

    pub async fn load(&self) -> PageState<Vec<TodoItem>> {
        let session = self.gateway.session().await;
        let Some(result) = self
            .view
            .run(self.coordinator.list_todos(session.as_ref()))
            .await
        else {
            debug!("todos view unmounted, discarding result");
            return PageState::Discarded;
        };

        match result {
            Ok(items) => PageState::Ready(items),
            Err(err) => {
                error!("{err}");
                PageState::Failed(err.to_string())
            }
        }
    }
}

//! Todo collection reads and the fetch-then-revalidate coordinator.
//!
//! [`TodosCoordinator::list_todos`] always performs a fresh fetch. Once the fetch
//! has succeeded it emits one revalidation signal for the configured path, so the
//! *next* navigation re-reads from source while the current render keeps the
//! snapshot it just fetched. A failed fetch is an error, never an empty list, and
//! does not revalidate.

use crate::{
    api::ApiClient,
    auth::Session,
    errors::{ApiError, DataFetchError},
    revalidate::Revalidator,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{future::Future, sync::Arc};
use tracing::{Instrument, debug, info_span, instrument};

const RESOURCE: &str = "todos";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl TodoItem {
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            attributes: Map::new(),
        }
    }
}

/// Read-only access to the data API.
pub trait DataApi: Send + Sync {
    /// Reads the whole todo collection, as the session's user when one is given.
    fn list_todos(
        &self,
        session: Option<&Session>,
    ) -> impl Future<Output = Result<Vec<TodoItem>, ApiError>> + Send;
}

#[derive(Clone, Debug)]
pub struct HttpDataApi {
    api: ApiClient,
}

impl HttpDataApi {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl DataApi for HttpDataApi {
    async fn list_todos(&self, session: Option<&Session>) -> Result<Vec<TodoItem>, ApiError> {
        let url = self.api.endpoint("/rest/v1/todos?select=*")?;
        let span = info_span!("rest.todos", http.method = "GET", url = %url.path());
        self.api
            .get_json(url, session.map(Session::access_token))
            .instrument(span)
            .await
    }
}

pub struct TodosCoordinator<D, R> {
    api: Arc<D>,
    revalidator: Arc<R>,
    path: String,
}

impl<D, R> Clone for TodosCoordinator<D, R> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            revalidator: Arc::clone(&self.revalidator),
            path: self.path.clone(),
        }
    }
}

impl<D: DataApi, R: Revalidator> TodosCoordinator<D, R> {
    /// `path` is the route whose cached data is invalidated after each read.
    pub fn new(api: D, revalidator: R, path: impl Into<String>) -> Self {
        Self {
            api: Arc::new(api),
            revalidator: Arc::new(revalidator),
            path: path.into(),
        }
    }

    /// # Errors
    /// Returns `DataFetchError` when the collection cannot be read.
    #[instrument(skip_all, fields(path = %self.path))]
    pub async fn list_todos(&self, session: Option<&Session>) -> Result<Vec<TodoItem>, DataFetchError> {
        let items = self
            .api
            .list_todos(session)
            .await
            .map_err(|err| DataFetchError::new(RESOURCE, err))?;
        debug!(count = items.len(), "todos fetched");

        self.revalidator.revalidate_path(&self.path);
        Ok(items)
    }

    /// Waits for revalidation signals still in flight. Call before the runtime
    /// shuts down.
    pub async fn flush(&self) {
        self.revalidator.flush().await;
    }
}

//! Revalidation signal: marks the cached data of a route as stale so the next
//! navigation reads from source again.
//!
//! The signal is fire-and-forget. [`HttpRevalidator`] posts to a revalidation hook
//! on a background task and only logs failures; [`LogRevalidator`] is used when no
//! hook is configured. Background posts are tracked so a host can [`flush`] them
//! before its runtime goes away.
//!
//! [`flush`]: Revalidator::flush

use crate::api::ApiClient;
use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::{runtime::Handle, task::JoinSet};
use tracing::{Instrument, debug, info, info_span, warn};
use url::Url;

/// Upper bound on how long [`Revalidator::flush`] waits for in-flight signals.
pub const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Cache invalidation abstraction used by the data coordinator.
pub trait Revalidator: Send + Sync {
    /// Marks `path` as stale. Must not block and reports nothing back.
    fn revalidate_path(&self, path: &str);

    /// Waits for signals still in flight, bounded by [`FLUSH_TIMEOUT`].
    fn flush(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

/// Logs the signal instead of sending it anywhere.
#[derive(Clone, Debug, Default)]
pub struct LogRevalidator;

impl Revalidator for LogRevalidator {
    fn revalidate_path(&self, path: &str) {
        info!(path, "revalidation requested");
    }
}

/// Posts `{url}?path=<path>` to a revalidation hook.
#[derive(Clone, Debug)]
pub struct HttpRevalidator {
    api: ApiClient,
    url: Url,
    pending: Arc<Mutex<JoinSet<()>>>,
}

impl HttpRevalidator {
    #[must_use]
    pub fn new(api: ApiClient, url: Url) -> Self {
        Self {
            api,
            url,
            pending: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    fn target(&self, path: &str) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("path", path);
        url
    }
}

impl Revalidator for HttpRevalidator {
    fn revalidate_path(&self, path: &str) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(path, "no async runtime, revalidation skipped");
            return;
        };

        let api = self.api.clone();
        let url = self.target(path);
        let span = info_span!("revalidate", path, http.method = "POST", url = %self.url);

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        while pending.try_join_next().is_some() {}
        pending.spawn_on(
            async move {
                match api.post_empty(url, None).await {
                    Ok(()) => debug!("revalidation sent"),
                    Err(err) => warn!("revalidation failed: {err}"),
                }
            }
            .instrument(span),
            &runtime,
        );
    }

    async fn flush(&self) {
        let mut pending =
            std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner));
        if pending.is_empty() {
            return;
        }

        let count = pending.len();
        let drained = tokio::time::timeout(FLUSH_TIMEOUT, async {
            while pending.join_next().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            warn!(count, "revalidation still in flight after {FLUSH_TIMEOUT:?}, dropping it");
        }
    }
}

/// Picks the hook when one is configured and falls back to logging.
#[derive(Clone, Debug)]
pub enum ConfiguredRevalidator {
    Http(HttpRevalidator),
    Log(LogRevalidator),
}

impl ConfiguredRevalidator {
    #[must_use]
    pub fn new(api: ApiClient, url: Option<Url>) -> Self {
        match url {
            Some(url) => ConfiguredRevalidator::Http(HttpRevalidator::new(api, url)),
            None => ConfiguredRevalidator::Log(LogRevalidator),
        }
    }
}

impl Revalidator for ConfiguredRevalidator {
    fn revalidate_path(&self, path: &str) {
        match self {
            ConfiguredRevalidator::Http(revalidator) => revalidator.revalidate_path(path),
            ConfiguredRevalidator::Log(revalidator) => revalidator.revalidate_path(path),
        }
    }

    async fn flush(&self) {
        if let ConfiguredRevalidator::Http(revalidator) = self {
            revalidator.flush().await;
        }
    }
}

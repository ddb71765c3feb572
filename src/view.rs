//! Mount state for a page controller.
//!
//! [`mount`] returns a handle owned by whatever renders the page and a scope held by
//! the controller. Once the handle is unmounted (or dropped), work started through
//! [`ViewScope::run`] is abandoned and its result discarded.

use std::future::Future;
use tokio::sync::watch;

#[derive(Debug)]
pub struct ViewHandle {
    mounted: watch::Sender<bool>,
}

impl ViewHandle {
    pub fn unmount(&self) {
        self.mounted.send_replace(false);
    }
}

impl Drop for ViewHandle {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[derive(Clone, Debug)]
pub struct ViewScope {
    mounted: watch::Receiver<bool>,
}

impl ViewScope {
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        *self.mounted.borrow()
    }

    /// Drives `work` while the view stays mounted. Returns `None` if the view was
    /// already gone or goes away before `work` completes; `work` is dropped then.
    pub async fn run<F: Future>(&self, work: F) -> Option<F::Output> {
        if !self.is_mounted() {
            return None;
        }

        let mut mounted = self.mounted.clone();
        tokio::select! {
            biased;
            // A closed channel also means the view is gone.
            () = async {
                let _ = mounted.wait_for(|mounted| !*mounted).await;
            } => None,
            output = work => self.is_mounted().then_some(output),
        }
    }
}

#[must_use]
pub fn mount() -> (ViewHandle, ViewScope) {
    let (sender, receiver) = watch::channel(true);
    (ViewHandle { mounted: sender }, ViewScope { mounted: receiver })
}

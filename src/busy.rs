//! Busy flag guarding a single in-flight operation.
//!
//! [`BusyFlag::try_acquire`] hands out a [`BusyGuard`]; the flag is cleared when the
//! guard is dropped, which covers success, error returns, panics and futures that
//! are dropped mid-flight.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

#[derive(Clone, Debug, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Returns `None` while another guard is alive.
    #[must_use]
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(Arc::clone(&self.0)))
    }
}

#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_refused_until_release() {
        let flag = BusyFlag::new();
        assert!(!flag.is_busy());

        let guard = flag.try_acquire();
        assert!(guard.is_some());
        assert!(flag.is_busy());
        assert!(flag.try_acquire().is_none());

        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire().is_some());
    }

    #[test]
    fn clones_share_state() {
        let flag = BusyFlag::new();
        let control = flag.clone();
        let _guard = flag.try_acquire();
        assert!(control.is_busy());
        assert!(control.try_acquire().is_none());
    }

    #[test]
    fn released_on_early_return() {
        fn fails(flag: &BusyFlag) -> Result<(), &'static str> {
            let _guard = flag.try_acquire().ok_or("busy")?;
            Err("provider unreachable")
        }

        let flag = BusyFlag::new();
        assert_eq!(fails(&flag), Err("provider unreachable"));
        assert!(!flag.is_busy());
    }

    #[tokio::test]
    async fn released_when_future_is_dropped() {
        let flag = BusyFlag::new();
        let task_flag = flag.clone();
        let handle = tokio::spawn(async move {
            let _guard = task_flag.try_acquire();
            std::future::pending::<()>().await;
        });
        tokio::task::yield_now().await;
        while !flag.is_busy() && !handle.is_finished() {
            tokio::task::yield_now().await;
        }
        handle.abort();
        let _ = handle.await;
        assert!(!flag.is_busy());
    }
}

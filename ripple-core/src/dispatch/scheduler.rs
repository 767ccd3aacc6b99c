//! Scheduler Implementations
//!
//! A [`Scheduler`] accepts a [`WorkItem`] and runs it later, possibly on
//! another thread. Cancellation goes through the item itself, so schedulers
//! never need to hand back a handle.

use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

use crate::error::DispatchError;

use super::WorkItem;

/// An execution context that work can be sent to.
pub trait Scheduler: Send + Sync {
    /// Enqueue `item`, to run after `delay` if one is given.
    ///
    /// The scheduler must call [`WorkItem::perform`] at most once. A
    /// cancelled item performs nothing, so schedulers need not check.
    fn schedule(&self, item: WorkItem, delay: Option<Duration>) -> Result<(), DispatchError>;
}

/// Runs work immediately on the calling thread.
///
/// Refuses delayed work.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineScheduler;

impl Scheduler for InlineScheduler {
    fn schedule(&self, item: WorkItem, delay: Option<Duration>) -> Result<(), DispatchError> {
        if let Some(delay) = delay {
            return Err(DispatchError::DelayUnsupported { delay });
        }
        item.perform();
        Ok(())
    }
}

/// Runs work as tasks on a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        debug!("tokio scheduler created");
        Self { handle }
    }

    /// Scheduler for the runtime the caller is running in.
    pub fn current() -> Result<Self, DispatchError> {
        Ok(Self::new(Handle::try_current()?))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, item: WorkItem, delay: Option<Duration>) -> Result<(), DispatchError> {
        match delay {
            None => {
                self.handle.spawn(async move { item.perform() });
            }
            Some(delay) => {
                self.handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    item.perform();
                });
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn flagging(flag: &Arc<AtomicBool>) -> WorkItem {
        let flag = Arc::clone(flag);
        WorkItem::new(move || flag.store(true, Ordering::SeqCst))
    }

    #[test]
    fn inline_runs_immediately() {
        let flag = Arc::new(AtomicBool::new(false));

        InlineScheduler.schedule(flagging(&flag), None).unwrap();

        assert!(flag.load(Ordering::SeqCst));
    }

    #[test]
    fn inline_refuses_delay() {
        let flag = Arc::new(AtomicBool::new(false));

        let result = InlineScheduler.schedule(flagging(&flag), Some(Duration::from_millis(5)));

        assert!(matches!(result, Err(DispatchError::DelayUnsupported { .. })));
        assert!(!flag.load(Ordering::SeqCst));
    }

    #[test]
    fn tokio_current_fails_outside_runtime() {
        assert!(matches!(
            TokioScheduler::current(),
            Err(DispatchError::NoRuntime(_))
        ));
    }

    #[tokio::test]
    async fn tokio_runs_spawned_work() {
        let scheduler = TokioScheduler::current().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();

        let item = WorkItem::new(move || {
            let _ = tx.send(7);
        });
        scheduler.schedule(item, None).unwrap();

        assert_eq!(rx.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn tokio_cancelled_work_does_not_run() {
        let scheduler = TokioScheduler::current().unwrap();
        let flag = Arc::new(AtomicBool::new(false));
        let item = flagging(&flag);

        scheduler
            .schedule(item.clone(), Some(Duration::from_millis(10)))
            .unwrap();
        item.cancel();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(!flag.load(Ordering::SeqCst));
    }
}

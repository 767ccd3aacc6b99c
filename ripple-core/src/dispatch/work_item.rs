//! Work Item
//!
//! A one-shot, cancelable unit of work. The job sits in an [`Atomic`] cell;
//! both [`WorkItem::perform`] and [`WorkItem::cancel`] take it out with a
//! single swap, so exactly one of them wins.

use std::fmt::Debug;
use std::sync::Arc;

use tracing::trace;

use crate::sync::Atomic;

type Job = Box<dyn FnOnce() + Send>;

/// A cancelable job handed to a [`Scheduler`](super::Scheduler).
///
/// Clones share the job: cancelling one clone cancels the item the
/// scheduler holds.
#[derive(Clone)]
pub struct WorkItem {
    job: Arc<Atomic<Option<Job>>>,
}

impl WorkItem {
    pub fn new<F>(job: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            job: Arc::new(Atomic::new(Some(Box::new(job)))),
        }
    }

    /// Run the job unless it already ran or was cancelled.
    pub fn perform(&self) {
        if let Some(job) = self.job.swap(None) {
            trace!("performing work item");
            job();
        }
    }

    /// Drop the job without running it. No-op once performed.
    pub fn cancel(&self) {
        drop(self.job.swap(None));
    }

    /// Whether the job is still waiting to run.
    pub fn is_pending(&self) -> bool {
        self.job.read(Option::is_some)
    }
}

impl Debug for WorkItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkItem")
            .field("pending", &self.is_pending())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

//! Error Types
//!
//! Errors never travel through a [`Signal`](crate::reactive::Signal). The
//! only fallible operation in the crate is handing work to a
//! [`Scheduler`](crate::dispatch::Scheduler).

use std::time::Duration;

use thiserror::Error;

/// Failure to enqueue a [`WorkItem`](crate::dispatch::WorkItem).
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Scheduler cannot delay work. delay: {delay:?}")]
    DelayUnsupported { delay: Duration },

    #[error("No tokio runtime available. cause: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    #[error("Scheduler rejected work. reason: {reason}")]
    Rejected { reason: String },
}

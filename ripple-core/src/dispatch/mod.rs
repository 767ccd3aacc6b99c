//! Dispatch
//!
//! The reactive core never owns threads or timers. When values must be
//! delivered on a particular execution context, or later, the host supplies
//! a [`Scheduler`] and the combinators in this module route each value
//! through it as a cancelable [`WorkItem`].
//!
//! Two schedulers ship with the crate:
//!
//! - [`InlineScheduler`]: runs work on the calling thread, no delays.
//! - [`TokioScheduler`]: spawns work onto a tokio runtime.

mod combinators;
mod scheduler;
mod work_item;

pub use scheduler::{InlineScheduler, Scheduler, TokioScheduler};
pub use work_item::WorkItem;

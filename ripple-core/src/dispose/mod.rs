//! Lifetime Management
//!
//! Every subscription in the crate is represented by a [`Disposable`]: a
//! cancellation token whose release action runs exactly once, no matter how
//! many callers dispose it or from which threads.
//!
//! A [`DisposePool`] batches tokens so that a component can cancel all of
//! its subscriptions together, either explicitly via [`DisposePool::drain`]
//! or implicitly when the pool is dropped.

mod disposable;
mod pool;

pub use disposable::Disposable;
pub use pool::DisposePool;

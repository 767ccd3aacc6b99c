//! Timing and Threading Combinators
//!
//! Signals that deliver through a [`Scheduler`] instead of synchronously.
//! Each delivery is its own [`WorkItem`]; disposing the subscription cancels
//! every item that has not run yet.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::dispose::Disposable;
use crate::reactive::{Observer, Signal};
use crate::sync::Atomic;

use super::{Scheduler, WorkItem};

impl<T: Clone + Send + Sync + 'static> Signal<T> {
    /// A signal that delivers `value` once per subscription, through
    /// `scheduler`, after `delay` if one is given.
    ///
    /// When the scheduler refuses the work the value is dropped and a
    /// warning is logged.
    pub fn dispatch_value(
        value: T,
        scheduler: Arc<dyn Scheduler>,
        delay: Option<Duration>,
    ) -> Signal<T> {
        Signal::new(move |observer: Observer<T>| {
            let value = value.clone();
            // The token disposes itself once the job has delivered.
            let slot: Arc<Atomic<Option<Disposable>>> = Arc::new(Atomic::new(None));
            let own = Arc::clone(&slot);
            let item = WorkItem::new(move || {
                observer.observe(value);
                if let Some(own) = own.swap(None) {
                    own.dispose();
                }
            });
            let handle = item.clone();
            let disposable = Disposable::new(move || handle.cancel());
            slot.set(Some(disposable.clone()));

            if let Err(error) = scheduler.schedule(item, delay) {
                warn!(%error, "dropping value, scheduler refused work item");
                disposable.dispose();
            }
            disposable
        })
    }

    /// Re-deliver every value through `scheduler`.
    pub fn dispatch_on(&self, scheduler: Arc<dyn Scheduler>) -> Signal<T> {
        self.merge_map(move |t: T| Signal::dispatch_value(t, Arc::clone(&scheduler), None))
    }

    /// Re-deliver every value through `scheduler` after `delay`.
    pub fn delay(&self, delay: Duration, scheduler: Arc<dyn Scheduler>) -> Signal<T> {
        self.merge_map(move |t: T| Signal::dispatch_value(t, Arc::clone(&scheduler), Some(delay)))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

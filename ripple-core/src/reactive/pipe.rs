//! Signal Pipe
//!
//! A manually driven, multicast source. The pipe owns a [`Bag`] of the
//! current observers behind an [`Atomic`] cell; its [`Signal`] only holds a
//! weak reference to that bag.
//!
//! # Delivery
//!
//! [`SignalPipe::send`] snapshots the observers under the lock and delivers
//! after releasing it. Observers may therefore subscribe or unsubscribe from
//! inside a callback without deadlocking. An observer disposed during a
//! `send` may still receive that one value; it never receives a value sent
//! after its disposal returned.

use std::fmt::Debug;
use std::sync::{Arc, Weak};

use smallvec::SmallVec;
use tracing::trace;

use crate::dispose::Disposable;
use crate::sync::{Atomic, Bag};

use super::{Observer, Signal};

type Observers<T> = Atomic<Bag<Observer<T>>>;

/// A mutable multicast signal.
///
/// Clones share the same observers.
///
/// # Example
///
/// ```rust
/// use ripple_core::reactive::SignalPipe;
///
/// let pipe = SignalPipe::new();
/// let disposable = pipe.signal().observe(|n: i32| println!("got {n}"));
/// pipe.send(1);
/// disposable.dispose();
/// ```
pub struct SignalPipe<T> {
    observers: Arc<Observers<T>>,
    signal: Signal<T>,
}

impl<T: Clone + Send + Sync + 'static> SignalPipe<T> {
    /// Create a pipe with no observers.
    pub fn new() -> Self {
        let observers: Arc<Observers<T>> = Arc::new(Atomic::new(Bag::new()));
        let weak = Arc::downgrade(&observers);
        let signal = Signal::new(move |observer: Observer<T>| subscribe(&weak, observer));
        Self { observers, signal }
    }

    /// The read-only side of the pipe.
    pub fn signal(&self) -> Signal<T> {
        self.signal.clone()
    }

    /// Deliver `value` to every current observer.
    pub fn send(&self, value: T) {
        let observers: SmallVec<[Observer<T>; 4]> =
            self.observers.read(|bag| bag.items().cloned().collect());
        trace!(observers = observers.len(), "signal pipe send");
        for observer in observers {
            observer.observe(value.clone());
        }
    }

    /// Number of current observers.
    pub fn observer_count(&self) -> usize {
        self.observers.read(Bag::len)
    }
}

fn subscribe<T: 'static>(observers: &Weak<Observers<T>>, observer: Observer<T>) -> Disposable {
    let Some(bag) = observers.upgrade() else {
        return Disposable::disposed();
    };
    let key = bag.access(|bag| bag.insert(observer));

    let observers = Weak::clone(observers);
    Disposable::new(move || {
        if let Some(bag) = observers.upgrade() {
            // Dropped outside the lock: the observer may own other tokens.
            let removed = bag.access(|bag| bag.remove(key));
            drop(removed);
        }
    })
}

impl<T: Clone + Send + Sync + 'static> Default for SignalPipe<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SignalPipe<T> {
    fn clone(&self) -> Self {
        Self {
            observers: Arc::clone(&self.observers),
            signal: self.signal.clone(),
        }
    }
}

impl<T> Debug for SignalPipe<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalPipe")
            .field("observer_count", &self.observers.read(|bag| bag.len()))
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::testing::Recorder;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::thread;

    #[test]
    fn send_reaches_every_observer() {
        let pipe = SignalPipe::new();
        let first = Recorder::new();
        let second = Recorder::new();
        let d1 = pipe.signal().subscribe(first.observer());
        let d2 = pipe.signal().subscribe(second.observer());

        pipe.send(1);
        pipe.send(2);

        assert_eq!(first.values(), vec![1, 2]);
        assert_eq!(second.values(), vec![1, 2]);
        d1.dispose();
        d2.dispose();
    }

    #[test]
    fn values_before_subscription_are_missed() {
        let pipe = SignalPipe::new();
        let recorder = Recorder::new();

        pipe.send(1);
        let disposable = pipe.signal().subscribe(recorder.observer());
        pipe.send(2);

        assert_eq!(recorder.values(), vec![2]);
        disposable.dispose();
    }

    #[test]
    fn disposed_observer_stops_receiving() {
        let pipe = SignalPipe::new();
        let recorder = Recorder::new();
        let disposable = pipe.signal().subscribe(recorder.observer());

        pipe.send(1);
        disposable.dispose();
        pipe.send(2);

        assert_eq!(recorder.values(), vec![1]);
        assert_eq!(pipe.observer_count(), 0);
    }

    #[test]
    fn observer_can_unsubscribe_itself_during_send() {
        let pipe = SignalPipe::new();
        let count = Arc::new(AtomicI32::new(0));
        let slot: Arc<Atomic<Option<Disposable>>> = Arc::new(Atomic::new(None));

        let counter = Arc::clone(&count);
        let own = Arc::clone(&slot);
        let disposable = pipe.signal().observe(move |_: i32| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(own) = own.swap(None) {
                own.dispose();
            }
        });
        slot.set(Some(disposable.clone()));

        pipe.send(1);
        pipe.send(2);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(disposable.is_disposed());
    }

    #[test]
    fn subscribing_after_pipe_is_dropped_is_inert() {
        let pipe = SignalPipe::<i32>::new();
        let signal = pipe.signal();
        let recorder = Recorder::new();
        let before = signal.subscribe(recorder.observer());
        drop(pipe);

        let after = signal.subscribe(recorder.observer());
        assert!(after.is_disposed());

        // Disposing once the bag is gone is a no-op.
        before.dispose();
    }

    #[test]
    fn concurrent_sends_are_all_delivered() {
        let pipe = SignalPipe::new();
        let total = Arc::new(AtomicI32::new(0));
        let counter = Arc::clone(&total);
        let disposable = pipe.signal().observe(move |n: i32| {
            counter.fetch_add(n, Ordering::SeqCst);
        });

        thread::scope(|scope| {
            for _ in 0..4 {
                let pipe = pipe.clone();
                scope.spawn(move || {
                    for _ in 0..250 {
                        pipe.send(1);
                    }
                });
            }
        });

        assert_eq!(total.load(Ordering::SeqCst), 1_000);
        disposable.dispose();
    }
}

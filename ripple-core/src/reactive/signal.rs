//! Signal Implementation
//!
//! A Signal is a re-subscribable description of a stream of values. It is
//! nothing but a subscription function: given an [`Observer`], start
//! delivering to it and return a [`Disposable`] that stops delivery.
//!
//! # How Signals Work
//!
//! 1. Building a signal runs nothing. Combinators wrap the subscription
//!    function and/or the observer handed to it.
//!
//! 2. Subscribing walks the combinator chain outward to the source. Each
//!    subscription re-executes the whole chain, so two subscriptions are
//!    independent streams (a [`SignalPipe`](super::SignalPipe) is the
//!    exception: it is multicast by nature).
//!
//! 3. Disposing walks the chain back inward, releasing whatever the
//!    subscription acquired.
//!
//! # Thread Safety
//!
//! Values are pushed synchronously on whichever thread produced them.
//! Combinators that keep state (`switch_map`, `merge_map`, `take_while`,
//! `skip_repeats`, ...) hold it in a per-subscription [`Atomic`] cell and
//! never deliver while holding the lock.

use std::fmt::Debug;
use std::sync::Arc;

use crate::dispose::{Disposable, DisposePool};
use crate::sync::Atomic;

use super::{Observer, SignalPipe};

type SubscribeFn<T> = dyn Fn(Observer<T>) -> Disposable + Send + Sync;
type ValueHook<T> = Arc<dyn Fn(&T) + Send + Sync>;
type Hook = Arc<dyn Fn() + Send + Sync>;

/// A typed, re-subscribable event source.
///
/// # Example
///
/// ```rust
/// use ripple_core::reactive::Signal;
///
/// let doubled = Signal::values(vec![1, 2, 3]).map(|n| n * 2);
/// let disposable = doubled.observe(|n| println!("{n}"));
/// disposable.dispose();
/// ```
pub struct Signal<T> {
    subscribe: Arc<SubscribeFn<T>>,
}

/// Inner subscription state of one `switch_map` subscription.
struct SwitchState {
    disposed: bool,
    inner: Option<Disposable>,
}

/// Minimum inner-subscription count at which `merge_map` prunes finished
/// inner subscriptions.
const MERGE_VACUUM_FLOOR: usize = 16;

/// Inner subscription state of one `merge_map` subscription.
struct MergeState {
    disposed: bool,
    inner: Vec<Disposable>,
    vacuum_threshold: usize,
}

/// Upstream state of one `take_while` subscription.
///
/// `stopped` and `upstream` live in one cell so that whichever of
/// "predicate failed" and "upstream token available" happens second
/// performs the disposal.
struct TakeWhileState {
    stopped: bool,
    upstream: Option<Disposable>,
}

impl<T: 'static> Signal<T> {
    /// Create a signal from its subscription function.
    pub fn new<F>(subscribe: F) -> Self
    where
        F: Fn(Observer<T>) -> Disposable + Send + Sync + 'static,
    {
        Self {
            subscribe: Arc::new(subscribe),
        }
    }

    /// Start delivering values to `observer`.
    pub fn subscribe(&self, observer: Observer<T>) -> Disposable {
        (self.subscribe)(observer)
    }

    /// Start delivering values to a callback.
    pub fn observe<F>(&self, observe: F) -> Disposable
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.subscribe(Observer::new(observe))
    }

    /// A signal that never delivers anything.
    pub fn never() -> Self {
        Self::new(|_| Disposable::disposed())
    }

    /// Build a signal by transforming every observer before it reaches
    /// this signal's subscription function.
    pub fn lift<U, F>(&self, transform: F) -> Signal<U>
    where
        U: 'static,
        F: Fn(Observer<U>) -> Observer<T> + Send + Sync + 'static,
    {
        let source = self.clone();
        Signal::new(move |observer: Observer<U>| source.subscribe(transform(observer)))
    }

    pub fn map<U, F>(&self, transform: F) -> Signal<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let transform = Arc::new(transform);
        self.lift(move |observer: Observer<U>| {
            let transform = Arc::clone(&transform);
            observer.contramap(move |t: T| transform(t))
        })
    }

    pub fn filter<P>(&self, predicate: P) -> Signal<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        self.lift(move |observer: Observer<T>| {
            let predicate = Arc::clone(&predicate);
            observer.filter(move |t| predicate(t))
        })
    }

    /// Map every value, dropping those `transform` cannot produce.
    pub fn compact_map<U, F>(&self, transform: F) -> Signal<U>
    where
        U: 'static,
        F: Fn(T) -> Option<U> + Send + Sync + 'static,
    {
        let transform = Arc::new(transform);
        self.lift(move |observer: Observer<U>| {
            let transform = Arc::clone(&transform);
            observer.compact_contramap(move |t: T| transform(t))
        })
    }

    /// Deliver `lazy()` on every subscription, then forward this signal.
    ///
    /// `lazy` runs once per subscription, at subscribe time.
    pub fn start_with_lazy<F>(&self, lazy: F) -> Signal<T>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let source = self.clone();
        Signal::new(move |observer: Observer<T>| {
            observer.observe(lazy());
            source.subscribe(observer)
        })
    }

    /// Flatten with "latest wins" semantics.
    ///
    /// Each value replaces the active inner subscription: the previous one
    /// is disposed before `transform(value)` is subscribed, so at most one
    /// inner subscription is active per subscriber.
    pub fn switch_map<U, F>(&self, transform: F) -> Signal<U>
    where
        U: 'static,
        F: Fn(T) -> Signal<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let transform = Arc::new(transform);
        Signal::new(move |observer: Observer<U>| {
            let state = Arc::new(Atomic::new(SwitchState {
                disposed: false,
                inner: None,
            }));

            let outer = {
                let state = Arc::clone(&state);
                let transform = Arc::clone(&transform);
                source.subscribe(Observer::new(move |t: T| {
                    let (disposed, previous) = state.access(|s| (s.disposed, s.inner.take()));
                    if let Some(previous) = previous {
                        previous.dispose();
                    }
                    if disposed {
                        return;
                    }

                    let next = transform(t).subscribe(observer.clone());
                    let stale = state.access(|s| {
                        if s.disposed {
                            Some(next)
                        } else {
                            s.inner.replace(next)
                        }
                    });
                    // Set when the subscriber was disposed meanwhile or a
                    // concurrent value installed its own inner first.
                    if let Some(stale) = stale {
                        stale.dispose();
                    }
                }))
            };

            Disposable::new(move || {
                outer.dispose();
                let inner = state.access(|s| {
                    s.disposed = true;
                    s.inner.take()
                });
                if let Some(inner) = inner {
                    inner.dispose();
                }
            })
        })
    }

    /// Flatten keeping every inner subscription active.
    ///
    /// Disposing the result disposes the outer subscription and every inner
    /// subscription it started.
    pub fn merge_map<U, F>(&self, transform: F) -> Signal<U>
    where
        U: 'static,
        F: Fn(T) -> Signal<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let transform = Arc::new(transform);
        Signal::new(move |observer: Observer<U>| {
            let state = Arc::new(Atomic::new(MergeState {
                disposed: false,
                inner: Vec::new(),
                vacuum_threshold: MERGE_VACUUM_FLOOR,
            }));

            let outer = {
                let sink = Arc::clone(&state);
                let transform = Arc::clone(&transform);
                source.subscribe(observer.merge_contramap(
                    move |t: T| transform(t),
                    move |disposable| {
                        if disposable.is_disposed() {
                            return;
                        }
                        let rejected = sink.access(|s| {
                            if s.disposed {
                                return Some(disposable);
                            }
                            s.inner.push(disposable);
                            // Inner subscriptions that ended on their own.
                            if s.inner.len() >= s.vacuum_threshold {
                                s.inner.retain(|d| !d.is_disposed());
                                s.vacuum_threshold = (s.inner.len() * 2).max(MERGE_VACUUM_FLOOR);
                            }
                            None
                        });
                        if let Some(rejected) = rejected {
                            rejected.dispose();
                        }
                    },
                ))
            };

            Disposable::new(move || {
                outer.dispose();
                let inner = state.access(|s| {
                    s.disposed = true;
                    std::mem::take(&mut s.inner)
                });
                for disposable in inner {
                    disposable.dispose();
                }
            })
        })
    }

    /// Forward values while `predicate` holds.
    ///
    /// The first failing value is not forwarded and ends the subscription
    /// upstream. This also works when the failing value arrives during
    /// `subscribe`, before the upstream token exists.
    pub fn take_while<P>(&self, predicate: P) -> Signal<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Signal::new(move |observer: Observer<T>| {
            let state = Arc::new(Atomic::new(TakeWhileState {
                stopped: false,
                upstream: None,
            }));

            let upstream = {
                let state = Arc::clone(&state);
                let predicate = Arc::clone(&predicate);
                source.subscribe(Observer::new(move |t: T| {
                    let should_stop = !predicate(&t);
                    let (stopped, upstream) = state.access(|s| {
                        if should_stop {
                            s.stopped = true;
                        }
                        (s.stopped, s.upstream.clone())
                    });
                    if !stopped {
                        observer.observe(t);
                    } else if let Some(upstream) = upstream {
                        upstream.dispose();
                    }
                }))
            };

            let stopped = state.access(|s| {
                s.upstream = Some(upstream.clone());
                s.stopped
            });
            if stopped {
                upstream.dispose();
            }

            Disposable::new(move || {
                let upstream = state.access(|s| {
                    s.stopped = true;
                    s.upstream.take()
                });
                if let Some(upstream) = upstream {
                    upstream.dispose();
                }
            })
        })
    }

    /// Wrap every subscription with instrumentation hooks.
    pub fn inject_effect(&self, effects: SignalEffects<T>) -> Signal<T>
    where
        T: Clone,
    {
        let source = self.clone();
        Signal::new(move |observer: Observer<T>| {
            if let Some(hook) = &effects.before_subscribe {
                hook();
            }
            let injected =
                observer.inject_effect(effects.before_value.clone(), effects.after_value.clone());
            let disposable = source.subscribe(injected);
            if let Some(hook) = &effects.after_subscribe {
                hook();
            }

            let before = effects.before_dispose.clone();
            let after = effects.after_dispose.clone();
            Disposable::new(move || {
                if let Some(hook) = before {
                    hook();
                }
                disposable.dispose();
                if let Some(hook) = after {
                    hook();
                }
            })
        })
    }
}

impl<T: Clone + Send + Sync + 'static> Signal<T> {
    /// A signal delivering `value` once per subscription.
    pub fn value(value: T) -> Self {
        Self::new(move |observer| {
            observer.observe(value.clone());
            Disposable::disposed()
        })
    }

    /// A signal delivering every element of `values` once per subscription.
    pub fn values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let values: Arc<[T]> = values.into_iter().collect();
        Self::new(move |observer| {
            for value in values.iter() {
                observer.observe(value.clone());
            }
            Disposable::disposed()
        })
    }

    /// Deliver every value of every signal in `signals`, concurrently.
    pub fn merge<I>(signals: I) -> Self
    where
        I: IntoIterator<Item = Signal<T>>,
    {
        Signal::values(signals).merge_all()
    }

    /// Deliver `value` on every subscription, then forward this signal.
    pub fn start_with(&self, value: T) -> Signal<T> {
        let source = self.clone();
        Signal::new(move |observer: Observer<T>| {
            observer.observe(value.clone());
            source.subscribe(observer)
        })
    }

    /// Forward values until `terminator` delivers anything.
    ///
    /// The terminator's values are discarded; only their occurrence counts.
    pub fn take_until<U: 'static>(&self, terminator: &Signal<U>) -> Signal<T> {
        let stop = terminator.map(|_| None::<T>);
        let values = self.map(Some);
        Signal::merge([stop, values])
            .take_while(Option::is_some)
            .compacted()
    }

    /// Drop values equal to their predecessor according to `are_equal`.
    ///
    /// Each subscription remembers its own predecessor.
    pub fn skip_repeats_by<E>(&self, are_equal: E) -> Signal<T>
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let are_equal = Arc::new(are_equal);
        self.lift(move |observer: Observer<T>| {
            let are_equal = Arc::clone(&are_equal);
            observer.skip_repeats_by(move |a, b| are_equal(a, b))
        })
    }

    /// Deliver `(previous, value)` pairs from the second value onward.
    pub fn with_previous(&self) -> Signal<(T, T)> {
        self.lift(Observer::with_previous)
    }

    /// Share one upstream subscription among all subscribers.
    ///
    /// The upstream subscription starts immediately and lives in `pool`.
    /// The returned signal only delivers values produced after a
    /// subscriber joins.
    pub fn multicast(&self, pool: &DisposePool) -> Signal<T> {
        let pipe = SignalPipe::new();
        let sender = pipe.clone();
        self.observe(move |t| sender.send(t)).dispose_in(pool);
        pipe.signal()
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Signal<T> {
    /// [`Signal::skip_repeats_by`] using `==`.
    pub fn skip_repeats(&self) -> Signal<T> {
        self.skip_repeats_by(|a, b| a == b)
    }
}

impl<U: 'static> Signal<Option<U>> {
    /// Drop `None` values.
    pub fn compacted(&self) -> Signal<U> {
        self.lift(|observer: Observer<U>| observer.compacted())
    }
}

impl<U: 'static> Signal<Signal<U>> {
    /// [`Signal::switch_map`] over signals delivered as values.
    pub fn switch_all(&self) -> Signal<U> {
        self.switch_map(|signal| signal)
    }

    /// [`Signal::merge_map`] over signals delivered as values.
    pub fn merge_all(&self) -> Signal<U> {
        self.merge_map(|signal| signal)
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe: Arc::clone(&self.subscribe),
        }
    }
}

impl<T> Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").finish_non_exhaustive()
    }
}

/// Hooks for [`Signal::inject_effect`]. Every hook is optional.
pub struct SignalEffects<T> {
    /// Runs before each value reaches the observer.
    pub before_value: Option<ValueHook<T>>,
    /// Runs after each value reached the observer.
    pub after_value: Option<ValueHook<T>>,
    pub before_subscribe: Option<Hook>,
    pub after_subscribe: Option<Hook>,
    pub before_dispose: Option<Hook>,
    pub after_dispose: Option<Hook>,
}

impl<T> Default for SignalEffects<T> {
    fn default() -> Self {
        Self {
            before_value: None,
            after_value: None,
            before_subscribe: None,
            after_subscribe: None,
            before_dispose: None,
            after_dispose: None,
        }
    }
}

impl<T> Clone for SignalEffects<T> {
    fn clone(&self) -> Self {
        Self {
            before_value: self.before_value.clone(),
            after_value: self.after_value.clone(),
            before_subscribe: self.before_subscribe.clone(),
            after_subscribe: self.after_subscribe.clone(),
            before_dispose: self.before_dispose.clone(),
            after_dispose: self.after_dispose.clone(),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

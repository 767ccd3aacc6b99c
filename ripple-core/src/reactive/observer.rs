//! Observer Implementation
//!
//! An Observer is a sink: a single callback invoked once per value. The
//! combinators here build a new Observer out of an existing one without
//! touching the source one, which is how every Signal combinator is lifted
//! (see [`Signal::lift`](super::Signal::lift)).
//!
//! # Private State
//!
//! Stateful combinators ([`Observer::skip_repeats_by`],
//! [`Observer::with_previous`]) close over their own [`Atomic`] cell. Two
//! observers built separately never share it.

use std::fmt::Debug;
use std::sync::Arc;

use crate::dispose::Disposable;
use crate::sync::Atomic;

use super::Signal;

/// A typed sink receiving one value at a time.
pub struct Observer<T> {
    observe: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T: 'static> Observer<T> {
    /// Create an observer from a callback.
    pub fn new<F>(observe: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            observe: Arc::new(observe),
        }
    }

    /// Deliver one value.
    pub fn observe(&self, value: T) {
        (self.observe)(value)
    }

    /// Observer that transforms each input with `transform` before
    /// forwarding it here.
    pub fn contramap<U, F>(&self, transform: F) -> Observer<U>
    where
        U: 'static,
        F: Fn(U) -> T + Send + Sync + 'static,
    {
        let observer = self.clone();
        Observer::new(move |u| observer.observe(transform(u)))
    }

    /// Observer that forwards only values matching `predicate`.
    pub fn filter<P>(&self, predicate: P) -> Observer<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let observer = self.clone();
        Observer::new(move |t| {
            if predicate(&t) {
                observer.observe(t);
            }
        })
    }

    /// Observer that forwards `transform(u)` when it produces a value and
    /// drops the input otherwise.
    pub fn compact_contramap<U, F>(&self, transform: F) -> Observer<U>
    where
        U: 'static,
        F: Fn(U) -> Option<T> + Send + Sync + 'static,
    {
        let observer = self.clone();
        Observer::new(move |u| {
            if let Some(t) = transform(u) {
                observer.observe(t);
            }
        })
    }

    /// Observer of optional values that forwards only the present ones.
    pub fn compacted(&self) -> Observer<Option<T>> {
        self.compact_contramap(|t| t)
    }

    /// Observer that subscribes this observer to `transform(u)` for every
    /// input and reports each resulting subscription to `add_disposable`.
    ///
    /// The caller owns the reported tokens.
    pub fn merge_contramap<U, F, D>(&self, transform: F, add_disposable: D) -> Observer<U>
    where
        U: 'static,
        F: Fn(U) -> Signal<T> + Send + Sync + 'static,
        D: Fn(Disposable) + Send + Sync + 'static,
    {
        let observer = self.clone();
        Observer::new(move |u| add_disposable(transform(u).subscribe(observer.clone())))
    }

    /// [`Observer::merge_contramap`] over signals delivered as values.
    pub fn merge_all<D>(&self, add_disposable: D) -> Observer<Signal<T>>
    where
        D: Fn(Disposable) + Send + Sync + 'static,
    {
        self.merge_contramap(|signal| signal, add_disposable)
    }

    /// Observer that runs `before` and `after` around every delivery.
    ///
    /// Returns a plain clone when neither effect is given.
    pub fn inject_effect(
        &self,
        before: Option<Arc<dyn Fn(&T) + Send + Sync>>,
        after: Option<Arc<dyn Fn(&T) + Send + Sync>>,
    ) -> Observer<T>
    where
        T: Clone,
    {
        if before.is_none() && after.is_none() {
            return self.clone();
        }
        let observer = self.clone();
        Observer::new(move |t: T| {
            if let Some(before) = &before {
                before(&t);
            }
            match &after {
                Some(after) => {
                    observer.observe(t.clone());
                    after(&t);
                }
                None => observer.observe(t),
            }
        })
    }
}

impl<T: Clone + Send + 'static> Observer<T> {
    /// Observer that drops a value when `are_equal(previous, value)` holds
    /// for the last value it was given.
    ///
    /// The remembered value is updated on every call, forwarded or not.
    pub fn skip_repeats_by<E>(&self, are_equal: E) -> Observer<T>
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let observer = self.clone();
        let last = Atomic::new(None::<T>);
        Observer::new(move |t: T| {
            let previous = last.swap(Some(t.clone()));
            match previous {
                Some(previous) if are_equal(&previous, &t) => {}
                _ => observer.observe(t),
            }
        })
    }

    /// Observer that forwards `(previous, value)` pairs to `observer`,
    /// starting from the second value it receives.
    pub fn with_previous(observer: Observer<(T, T)>) -> Observer<T> {
        let last = Atomic::new(None::<T>);
        Observer::new(move |t: T| {
            if let Some(previous) = last.swap(Some(t.clone())) {
                observer.observe((previous, t));
            }
        })
    }
}

impl<T: Clone + PartialEq + Send + 'static> Observer<T> {
    /// [`Observer::skip_repeats_by`] using `==`.
    pub fn skip_repeats(&self) -> Observer<T> {
        self.skip_repeats_by(|a, b| a == b)
    }
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            observe: Arc::clone(&self.observe),
        }
    }
}

impl<T> Debug for Observer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer").finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

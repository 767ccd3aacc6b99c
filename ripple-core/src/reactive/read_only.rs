//! Read-Only Property
//!
//! A current-value getter plus a [`Signal`] of subsequent changes. This is
//! the capability-restricted view of a [`Property`](super::Property): same
//! representation, no setter.
//!
//! Derived properties never cache. Their getters recompute from the live
//! sources on every call.

use std::fmt::Debug;
use std::sync::Arc;

use super::Signal;

pub(crate) type Getter<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// A stateful value that can be read and observed but not written.
pub struct ReadOnlyProperty<T> {
    pub(crate) getter: Getter<T>,
    pub(crate) new_values: Signal<T>,
}

impl<T: Clone + Send + Sync + 'static> ReadOnlyProperty<T> {
    /// Create a property from a getter and the signal of its changes.
    pub fn new<G>(getter: G, new_values: Signal<T>) -> Self
    where
        G: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            getter: Arc::new(getter),
            new_values,
        }
    }

    /// A property that always holds `value` and never changes.
    pub fn constant(value: T) -> Self {
        Self::new(move || value.clone(), Signal::never())
    }

    /// The current value.
    pub fn get(&self) -> T {
        (self.getter)()
    }

    /// Values set after subscription.
    pub fn new_values(&self) -> Signal<T> {
        self.new_values.clone()
    }

    /// The current value at subscribe time, followed by every new value.
    pub fn values(&self) -> Signal<T> {
        let getter = Arc::clone(&self.getter);
        self.new_values.start_with_lazy(move || getter())
    }

    /// Derive a property by applying `transform` to every value.
    pub fn map<U, F>(&self, transform: F) -> ReadOnlyProperty<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let transform = Arc::new(transform);
        let getter = Arc::clone(&self.getter);
        let to = Arc::clone(&transform);
        ReadOnlyProperty::new(
            move || transform(getter()),
            self.new_values.map(move |t| to(t)),
        )
    }

    /// Derive a property that follows whichever property `transform`
    /// selects for the current value.
    ///
    /// The getter re-selects on every call. The change signal switches to
    /// the newly selected property (emitting its current value) whenever
    /// this property changes.
    pub fn switch_map<U, F>(&self, transform: F) -> ReadOnlyProperty<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> ReadOnlyProperty<U> + Send + Sync + 'static,
    {
        let transform = Arc::new(transform);

        let new_values = {
            let on_change = Arc::clone(&transform);
            let on_subscribe = Arc::clone(&transform);
            let getter = Arc::clone(&self.getter);
            self.new_values
                .map(move |t| on_change(t).values())
                .start_with_lazy(move || on_subscribe(getter()).new_values())
                .switch_all()
        };

        let getter = Arc::clone(&self.getter);
        ReadOnlyProperty::new(move || transform(getter()).get(), new_values)
    }
}

impl<T> Clone for ReadOnlyProperty<T> {
    fn clone(&self) -> Self {
        Self {
            getter: Arc::clone(&self.getter),
            new_values: self.new_values.clone(),
        }
    }
}

impl<T: Debug> Debug for ReadOnlyProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadOnlyProperty")
            .field("value", &(self.getter)())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

//! Property Implementation
//!
//! A Property is a mutable, observable value: a getter, a setter, and a
//! [`Signal`] of values set after subscription.
//!
//! # Write Ordering
//!
//! A write stores the value first and then notifies `new_values`
//! subscribers, synchronously, before [`Property::set`] returns. A
//! subscriber that reads the property from inside its callback therefore
//! sees the value it was handed (or a later one).

use std::fmt::Debug;
use std::sync::Arc;

use crate::sync::Atomic;

use super::read_only::Getter;
use super::{ReadOnlyProperty, Signal, SignalPipe};

type Setter<T> = Arc<dyn Fn(T) + Send + Sync>;

/// A mutable observable value.
///
/// Clones share the same state.
///
/// # Example
///
/// ```rust
/// use ripple_core::reactive::Property;
///
/// let count = Property::new(0);
/// let disposable = count.values().observe(|n| println!("count = {n}"));
/// count.set(5); // prints "count = 5"
/// assert_eq!(count.get(), 5);
/// disposable.dispose();
/// ```
pub struct Property<T> {
    getter: Getter<T>,
    setter: Setter<T>,
    new_values: Signal<T>,
}

impl<T: Clone + Send + Sync + 'static> Property<T> {
    /// Create a property backed by its own [`Atomic`] cell.
    pub fn new(initial: T) -> Self {
        let cell = Arc::new(Atomic::new(initial));
        let read = Arc::clone(&cell);
        Self::with_accessors(move || read.get(), move |value| cell.set(value))
    }

    /// Create a property over external state.
    ///
    /// Every write through the returned property calls `setter` and then
    /// notifies `new_values`. Writes made to the state by other means are
    /// not observed.
    pub fn with_accessors<G, S>(getter: G, setter: S) -> Self
    where
        G: Fn() -> T + Send + Sync + 'static,
        S: Fn(T) + Send + Sync + 'static,
    {
        let pipe = SignalPipe::new();
        let new_values = pipe.signal();
        Self {
            getter: Arc::new(getter),
            setter: Arc::new(move |value: T| {
                setter(value.clone());
                pipe.send(value);
            }),
            new_values,
        }
    }

    /// Assemble a property from parts that already notify `new_values` on
    /// every write.
    pub fn from_parts<G, S>(getter: G, setter: S, new_values: Signal<T>) -> Self
    where
        G: Fn() -> T + Send + Sync + 'static,
        S: Fn(T) + Send + Sync + 'static,
    {
        Self {
            getter: Arc::new(getter),
            setter: Arc::new(setter),
            new_values,
        }
    }

    /// The current value.
    pub fn get(&self) -> T {
        (self.getter)()
    }

    /// Store `value` and notify `new_values` subscribers.
    pub fn set(&self, value: T) {
        (self.setter)(value)
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

    /// Derive a two-way property through a pair of conversions.
    ///
    /// Writes to the derived property go through `from` into this one,
    /// which notifies both.
    pub fn bimap<U, To, From>(&self, to: To, from: From) -> Property<U>
    where
        U: Clone + Send + Sync + 'static,
        To: Fn(T) -> U + Send + Sync + 'static,
        From: Fn(U) -> T + Send + Sync + 'static,
    {
        let to = Arc::new(to);
        let getter = Arc::clone(&self.getter);
        let setter = Arc::clone(&self.setter);
        let map = Arc::clone(&to);
        Property::from_parts(
            move || to(getter()),
            move |u| setter(from(u)),
            self.new_values.map(move |t| map(t)),
        )
    }

    /// The read-only view of this property.
    pub fn read_only(&self) -> ReadOnlyProperty<T> {
        ReadOnlyProperty {
            getter: Arc::clone(&self.getter),
            new_values: self.new_values.clone(),
        }
    }

    /// Derive a read-only property by applying `transform` to every value.
    pub fn map<U, F>(&self, transform: F) -> ReadOnlyProperty<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.read_only().map(transform)
    }
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            getter: Arc::clone(&self.getter),
            setter: Arc::clone(&self.setter),
            new_values: self.new_values.clone(),
        }
    }
}

impl<T: Debug> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("value", &(self.getter)())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

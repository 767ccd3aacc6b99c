//! Atomic Cell
//!
//! A single value behind a mutex. Every read and write happens inside a
//! closure that runs with the lock held, so no caller can observe a torn
//! value or forget to release the lock.
//!
//! # Re-entrancy
//!
//! The lock is not re-entrant. Calling back into the same cell from inside
//! its own transform deadlocks. Callers are expected to keep transforms
//! short and to do any observer delivery after `access` has returned.

use std::fmt::Debug;

use parking_lot::Mutex;

/// A mutually exclusive mutable container.
///
/// # Example
///
/// ```rust
/// use ripple_core::sync::Atomic;
///
/// let cell = Atomic::new(1);
/// let doubled = cell.access(|v| {
///     *v *= 2;
///     *v
/// });
/// assert_eq!(doubled, 2);
/// assert_eq!(cell.swap(10), 2);
/// assert_eq!(cell.get(), 10);
/// ```
pub struct Atomic<T> {
    value: Mutex<T>,
}

impl<T> Atomic<T> {
    /// Create a new cell holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
        }
    }

    /// Run `transform` with exclusive access to the value.
    ///
    /// The transform may read and replace the value. Its return value is
    /// passed back to the caller.
    pub fn access<U, F>(&self, transform: F) -> U
    where
        F: FnOnce(&mut T) -> U,
    {
        let mut guard = self.value.lock();
        transform(&mut guard)
    }

    /// Run `transform` with exclusive, read-only access to the value.
    pub fn read<U, F>(&self, transform: F) -> U
    where
        F: FnOnce(&T) -> U,
    {
        let guard = self.value.lock();
        transform(&guard)
    }

    /// Replace the value, returning the previous one.
    ///
    /// This is the "consume and clear" operation used for one-shot state.
    pub fn swap(&self, value: T) -> T {
        self.access(|current| std::mem::replace(current, value))
    }

    /// Overwrite the value.
    pub fn set(&self, value: T) {
        self.access(|current| *current = value);
    }

    /// Consume the cell, returning the value.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: Clone> Atomic<T> {
    /// Get a copy of the current value.
    pub fn get(&self) -> T {
        self.read(T::clone)
    }
}

impl<T: Default> Default for Atomic<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Debug> Debug for Atomic<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.read(|value| f.debug_struct("Atomic").field("value", value).finish())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

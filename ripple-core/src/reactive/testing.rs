//! Test helpers shared by the unit tests of this module.

use std::sync::Arc;

use crate::sync::Atomic;

use super::Observer;

/// Records every value delivered to its observers.
pub(crate) struct Recorder<T> {
    values: Arc<Atomic<Vec<T>>>,
}

impl<T: Clone + Send + 'static> Recorder<T> {
    pub(crate) fn new() -> Self {
        Self {
            values: Arc::new(Atomic::new(Vec::new())),
        }
    }

    pub(crate) fn observer(&self) -> Observer<T> {
        let values = Arc::clone(&self.values);
        Observer::new(move |value| values.access(|v| v.push(value)))
    }

    pub(crate) fn values(&self) -> Vec<T> {
        self.values.get()
    }
}

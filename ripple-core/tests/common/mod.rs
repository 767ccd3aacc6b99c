//! Helpers shared by the integration tests.

use std::sync::Arc;

use ripple_core::reactive::Observer;
use ripple_core::sync::Atomic;

/// Collects delivered values for later inspection.
pub fn recorder<T: Clone + Send + 'static>() -> (Arc<Atomic<Vec<T>>>, Observer<T>) {
    let values = Arc::new(Atomic::new(Vec::new()));
    let sink = Arc::clone(&values);
    (values, Observer::new(move |t| sink.access(|v| v.push(t))))
}

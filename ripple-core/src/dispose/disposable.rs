//! Disposable Implementation
//!
//! A Disposable wraps an optional release action behind an [`Atomic`]
//! cell. Disposing swaps the action out; whichever caller's swap finds
//! `Some` runs it, every other caller finds `None` and does nothing.
//!
//! # Leak Detection
//!
//! Dropping the last handle to a token that was never disposed means a
//! subscription leaked: its action (and everything it captured) is never
//! released. Debug builds assert on this. Release builds stay silent.

use std::fmt::Debug;
use std::sync::Arc;

use crate::sync::Atomic;

use super::DisposePool;

type DisposeAction = Box<dyn FnOnce() + Send>;

struct Inner {
    action: Atomic<Option<DisposeAction>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let leaked = self.action.read(Option::is_some);
        debug_assert!(!leaked, "Disposable dropped without being disposed");
    }
}

/// An idempotent cancellation token.
///
/// Clones share the same underlying action: disposing any clone disposes
/// them all.
///
/// # Example
///
/// ```rust
/// use ripple_core::dispose::Disposable;
///
/// let token = Disposable::new(|| println!("released"));
/// token.dispose();
/// token.dispose(); // no-op
/// assert!(token.is_disposed());
/// ```
#[derive(Clone)]
#[must_use = "a Disposable must be disposed or added to a DisposePool"]
pub struct Disposable {
    inner: Arc<Inner>,
}

impl Disposable {
    /// Create a token that runs `action` when first disposed.
    pub fn new<F>(action: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::from_action(Some(Box::new(action)))
    }

    /// Create a token that is already disposed.
    ///
    /// Returned by signals that finish synchronously and hold nothing.
    pub fn disposed() -> Self {
        Self::from_action(None)
    }

    /// Create a token that disposes every member, in order, when disposed.
    pub fn all<I>(disposables: I) -> Self
    where
        I: IntoIterator<Item = Disposable>,
    {
        let members: Vec<Disposable> = disposables.into_iter().collect();
        Self::new(move || {
            for member in members {
                member.dispose();
            }
        })
    }

    fn from_action(action: Option<DisposeAction>) -> Self {
        Self {
            inner: Arc::new(Inner {
                action: Atomic::new(action),
            }),
        }
    }

    /// Run the release action if no one has run it yet.
    pub fn dispose(&self) {
        // The action runs outside the lock so it may dispose other tokens.
        if let Some(action) = self.inner.action.swap(None) {
            action();
        }
    }

    /// Whether the release action has been taken.
    pub fn is_disposed(&self) -> bool {
        self.inner.action.read(Option::is_none)
    }

    /// Number of live handles sharing this token.
    #[cfg(test)]
    pub(crate) fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Hand the token to `pool`, which disposes it when drained.
    pub fn dispose_in(self, pool: &DisposePool) {
        pool.add(self);
    }
}

impl FromIterator<Disposable> for Disposable {
    fn from_iter<I: IntoIterator<Item = Disposable>>(iter: I) -> Self {
        Self::all(iter)
    }
}

impl Debug for Disposable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disposable")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::thread;

    fn counting(count: &Arc<AtomicI32>) -> Disposable {
        let count = Arc::clone(count);
        Disposable::new(move || {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn creation_does_not_run_action() {
        let count = Arc::new(AtomicI32::new(0));
        let disposable = counting(&count);

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!disposable.is_disposed());

        disposable.dispose();
    }

    #[test]
    fn dispose_runs_action_once() {
        let count = Arc::new(AtomicI32::new(0));
        let disposable = counting(&count);

        disposable.dispose();
        disposable.dispose();
        disposable.clone().dispose();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(disposable.is_disposed());
    }

    #[test]
    fn dispose_releases_captured_state() {
        let captured = Arc::new(());
        let held = Arc::clone(&captured);
        let disposable = Disposable::new(move || drop(held));

        assert_eq!(Arc::strong_count(&captured), 2);
        disposable.dispose();
        assert_eq!(Arc::strong_count(&captured), 1);
    }

    #[test]
    fn concurrent_dispose_runs_action_once() {
        for _ in 0..50 {
            let count = Arc::new(AtomicI32::new(0));
            let disposable = counting(&count);

            thread::scope(|scope| {
                for _ in 0..8 {
                    let disposable = disposable.clone();
                    scope.spawn(move || disposable.dispose());
                }
            });

            assert_eq!(count.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn composite_disposes_every_member_in_order() {
        let order = Arc::new(Atomic::new(Vec::new()));
        let members: Disposable = (0..3)
            .map(|i| {
                let order = Arc::clone(&order);
                Disposable::new(move || order.access(|o| o.push(i)))
            })
            .collect();

        members.dispose();
        members.dispose();

        assert_eq!(order.get(), vec![0, 1, 2]);
    }

    #[test]
    fn disposed_token_is_inert() {
        let disposable = Disposable::disposed();
        assert!(disposable.is_disposed());
        disposable.dispose();
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Disposable dropped without being disposed")]
    fn leaked_token_is_reported() {
        let _leaked = Disposable::new(|| {});
    }
}

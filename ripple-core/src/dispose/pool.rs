//! Dispose Pool
//!
//! A pool collects subscriptions that should be cancelled together. When
//! many pooled subscriptions end on their own (e.g. finite signals), the
//! pool would otherwise grow without bound, so it periodically vacuums
//! tokens that are already disposed.

use std::fmt::Debug;

use tracing::debug;

use crate::sync::Atomic;

use super::Disposable;

/// Default minimum size at which the pool vacuums.
const DEFAULT_VACUUM_FLOOR: usize = 10;

struct PoolState {
    disposables: Vec<Disposable>,
    vacuum_threshold: usize,
}

/// A batch of disposables released together.
///
/// Dropping the pool drains it.
pub struct DisposePool {
    state: Atomic<PoolState>,
    vacuum_floor: usize,
}

impl DisposePool {
    /// Create an empty pool with the default vacuum floor.
    pub fn new() -> Self {
        Self::with_vacuum_floor(DEFAULT_VACUUM_FLOOR)
    }

    /// Create an empty pool that vacuums no earlier than `floor` entries.
    pub fn with_vacuum_floor(floor: usize) -> Self {
        let floor = floor.max(1);
        Self {
            state: Atomic::new(PoolState {
                disposables: Vec::new(),
                vacuum_threshold: floor,
            }),
            vacuum_floor: floor,
        }
    }

    /// Retain `disposable` until the pool drains.
    ///
    /// Tokens that are already disposed are dropped immediately.
    pub fn add(&self, disposable: Disposable) {
        if disposable.is_disposed() {
            return;
        }

        let floor = self.vacuum_floor;
        self.state.access(|state| {
            state.disposables.push(disposable);
            if state.disposables.len() >= state.vacuum_threshold {
                let before = state.disposables.len();
                state.disposables.retain(|d| !d.is_disposed());
                state.vacuum_threshold = (state.disposables.len() * 2).max(floor);
                debug!(
                    before,
                    after = state.disposables.len(),
                    threshold = state.vacuum_threshold,
                    "vacuumed dispose pool"
                );
            }
        });
    }

    /// Dispose every retained token and empty the pool.
    ///
    /// Calling this again disposes nothing until new tokens are added.
    pub fn drain(&self) {
        let floor = self.vacuum_floor;
        let disposables = self.state.access(|state| {
            state.vacuum_threshold = floor;
            std::mem::take(&mut state.disposables)
        });

        if !disposables.is_empty() {
            debug!(count = disposables.len(), "draining dispose pool");
        }

        // Members are disposed outside the lock; their actions may add to
        // this same pool.
        for disposable in disposables {
            disposable.dispose();
        }
    }

    /// Number of retained tokens, including any that disposed themselves
    /// since the last vacuum.
    pub fn len(&self) -> usize {
        self.state.read(|state| state.disposables.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DisposePool {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DisposePool {
    fn drop(&mut self) {
        self.drain();
    }
}

impl Debug for DisposePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisposePool")
            .field("len", &self.len())
            .field("vacuum_floor", &self.vacuum_floor)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

//! Keyed Bag
//!
//! An unordered collection that hands out a key per insertion. Keys come
//! from a strictly increasing counter and are never reused, so a stale key
//! can never remove a later entry.

use indexmap::IndexMap;

/// Key returned by [`Bag::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BagKey(u64);

/// An unordered store with O(1) insertion and removal by key.
///
/// Iteration order is unspecified.
#[derive(Debug)]
pub struct Bag<T> {
    next_key: u64,
    items: IndexMap<u64, T>,
}

impl<T> Bag<T> {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self {
            next_key: 0,
            items: IndexMap::new(),
        }
    }

    /// Insert an item and return its key.
    pub fn insert(&mut self, item: T) -> BagKey {
        let key = self.next_key;
        self.next_key += 1;
        self.items.insert(key, item);
        BagKey(key)
    }

    /// Remove the item stored under `key`.
    ///
    /// Unknown keys are ignored.
    pub fn remove(&mut self, key: BagKey) -> Option<T> {
        self.items.swap_remove(&key.0)
    }

    /// Iterate over the current items.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for Bag<T> {
    fn default() -> Self {
        Self::new()
    }
}

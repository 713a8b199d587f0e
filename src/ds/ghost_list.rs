//! Bounded key-only recency list for tracking recent evictions.
//!
//! The ARC engine keeps one of these per half (B1 for the recency side, B2
//! for the frequency side). A ghost remembers that a key was evicted
//! recently without holding its value; finding a key here answers "should
//! this entry have been kept?" and drives the adaptive capacity transfer.
//!
//! Keys enter at the hot end when their entry is evicted; when the list is
//! full the coldest ghost is dropped first. Looking a ghost up is a plain
//! index probe; the engine consumes a ghost by removing it after a hit.

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::list::{NodeIndex, OrderList};

/// Bounded list of recently evicted keys, ordered by eviction time.
#[derive(Debug)]
pub struct GhostList<K> {
    list: OrderList<K>,
    index: FxHashMap<K, NodeIndex>,
    capacity: usize,
}

impl<K> GhostList<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a ghost list holding at most `capacity` keys.
    ///
    /// A capacity of 0 produces a list that ignores every `record`.
    pub fn new(capacity: usize) -> Self {
        Self {
            list: OrderList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
        }
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of ghosts currently tracked.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if no ghosts are tracked.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns `true` if `key` was evicted recently enough to still be
    /// tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Records `key` as the most recent eviction.
    ///
    /// A key already present is promoted to the hot end instead of being
    /// duplicated. At capacity, the oldest ghost is dropped first.
    pub fn record(&mut self, key: K) {
        if self.capacity == 0 {
            return;
        }
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_hot(id);
            return;
        }
        if self.list.len() >= self.capacity {
            if let Some(oldest) = self.list.pop_coldest() {
                self.index.remove(&oldest);
            }
        }
        let id = self.list.push_hot(key.clone());
        self.index.insert(key, id);
    }

    /// Removes `key` from the list; returns `true` if it was tracked.
    ///
    /// This is how a ghost hit is consumed: observing the ghost erases it.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(id) => {
                self.list.remove(id);
                true
            }
            None => false,
        }
    }

    /// Drops every tracked key, keeping the configured capacity.
    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
    }
}

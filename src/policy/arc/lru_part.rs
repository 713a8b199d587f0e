//! Recency half of the ARC engine.
//!
//! Plain LRU over entries that carry a per-entry access counter, plus a
//! ghost list of recently evicted keys (B1). Lookups report whether the
//! entry has crossed the promotion threshold; the top-level ARC object
//! performs the actual move into the frequency half.
//!
//! Capacity is adjustable one unit at a time: the top level transfers
//! capacity between the two halves when a ghost hit shows the current
//! split is wrong. A decrease first evicts this half's victim if the
//! resident set would otherwise overflow, and refuses (returning `false`)
//! when the capacity is already zero.

use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::{GhostList, NodeIndex, OrderList};

struct Entry<K, V> {
    key: K,
    value: V,
    accesses: usize,
}

struct State<K, V> {
    index: FxHashMap<K, NodeIndex>,
    list: OrderList<Entry<K, V>>,
    ghost: GhostList<K>,
    capacity: usize,
}

impl<K, V> State<K, V>
where
    K: Eq + Hash + Clone,
{
    fn evict_least_recent(&mut self) {
        if let Some(entry) = self.list.pop_coldest() {
            self.index.remove(&entry.key);
            // The ghost keeps only the key; the access count dies with
            // the entry, so a re-admitted key starts over at one access.
            self.ghost.record(entry.key);
            trace!(len = self.index.len(), "recency half evicted its least recently used entry");
        }
    }
}

/// Recency-ordered half of ARC (T1 + B1).
pub(crate) struct ArcLruPart<K, V> {
    state: Mutex<State<K, V>>,
    transform_threshold: usize,
}

impl<K, V> ArcLruPart<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// `capacity` is this half's share of the resident budget;
    /// `ghost_capacity` is the full cache capacity.
    pub(crate) fn new(capacity: usize, ghost_capacity: usize, transform_threshold: usize) -> Self {
        Self {
            state: Mutex::new(State {
                index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
                list: OrderList::with_capacity(capacity),
                ghost: GhostList::new(ghost_capacity),
                capacity,
            }),
            transform_threshold,
        }
    }

    /// Inserts or updates under LRU rules. Returns `false` when this
    /// half's capacity is currently zero and the entry cannot be admitted.
    pub(crate) fn put(&self, key: K, value: V) -> bool {
        let mut state = self.state.lock();
        if state.capacity == 0 {
            return false;
        }
        if let Some(&id) = state.index.get(&key) {
            let entry = state.list.get_mut(id).expect("indexed node missing from list");
            entry.value = value;
            state.list.move_to_hot(id);
            return true;
        }
        if state.index.len() >= state.capacity {
            state.evict_least_recent();
        }
        let id = state.list.push_hot(Entry {
            key: key.clone(),
            value,
            accesses: 1,
        });
        state.index.insert(key, id);
        true
    }

    /// Looks `key` up; on a hit, promotes it, counts the access, and
    /// reports whether the promotion threshold has been reached. The move
    /// itself is the caller's job.
    pub(crate) fn get(&self, key: &K) -> Option<(V, bool)> {
        let mut state = self.state.lock();
        let &id = state.index.get(key)?;
        state.list.move_to_hot(id);
        let threshold = self.transform_threshold;
        let entry = state.list.get_mut(id).expect("indexed node missing from list");
        entry.accesses += 1;
        let should_promote = entry.accesses >= threshold;
        Some((entry.value.clone(), should_promote))
    }

    /// Removes `key` without recording a ghost (used when the entry moves
    /// to the frequency half, and by the top-level remove).
    pub(crate) fn take(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        let id = state.index.remove(key)?;
        state.list.remove(id).map(|entry| entry.value)
    }

    /// Consumes a B1 ghost; returns `true` on a ghost hit.
    pub(crate) fn check_ghost(&self, key: &K) -> bool {
        self.state.lock().ghost.remove(key)
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.state.lock().index.contains_key(key)
    }

    /// Grants this half one more unit of resident budget.
    pub(crate) fn increase_capacity(&self) {
        self.state.lock().capacity += 1;
    }

    /// Takes one unit of resident budget away, evicting first if the
    /// resident set would overflow. Returns `false` when already at zero.
    pub(crate) fn decrease_capacity(&self) -> bool {
        let mut state = self.state.lock();
        if state.capacity == 0 {
            return false;
        }
        if state.index.len() == state.capacity {
            state.evict_least_recent();
        }
        state.capacity -= 1;
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().index.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.state.lock().capacity
    }

    pub(crate) fn ghost_len(&self) -> usize {
        self.state.lock().ghost.len()
    }

    /// Drops entries and ghosts and restores the given capacity split.
    pub(crate) fn purge(&self, capacity: usize) {
        let mut state = self.state.lock();
        state.index.clear();
        state.list.clear();
        state.ghost.clear();
        state.capacity = capacity;
    }
}

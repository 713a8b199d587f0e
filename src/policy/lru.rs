//! # Least Recently Used (LRU) Cache
//!
//! Recency-ordered cache with O(1) promotion and cold-end eviction. This is
//! the baseline engine of the crate: LRU-K composes two of its cores, and
//! the sharded wrapper partitions keys across many of them.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                         LruCache<K, V>                           │
//!   │                                                                  │
//!   │   ┌────────────────────────────────────────────────────────┐     │
//!   │   │                Mutex<LruCore<K, V>>                    │     │
//!   │   └────────────────────────────────────────────────────────┘     │
//!   │                              │                                   │
//!   │                              ▼                                   │
//!   │   ┌────────────────────────────────────────────────────────┐     │
//!   │   │                    LruCore<K, V>                       │     │
//!   │   │                                                        │     │
//!   │   │   index: FxHashMap<K, NodeIndex>                       │     │
//!   │   │   ┌─────────┬───────────┐                              │     │
//!   │   │   │   Key   │ NodeIndex │──┐                           │     │
//!   │   │   └─────────┴───────────┘  │                           │     │
//!   │   │                            ▼                           │     │
//!   │   │   list: OrderList<(K, V)>                              │     │
//!   │   │   head ──► [C] ◄──► [B] ◄──► [A] ◄── tail              │     │
//!   │   │          cold end          hot end                     │     │
//!   │   │       (next victim)    (most recent)                   │     │
//!   │   └────────────────────────────────────────────────────────┘     │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations flow
//!
//! ```text
//!   INSERT new key (cache full, capacity = 3)
//!   ═══════════════════════════════════════════════════════════════════
//!   Before:  head ──► [C] ◄──► [B] ◄──► [A] ◄── tail
//!   put(D):  1. evict [C] from the cold end, drop it from the index
//!            2. attach [D] at the hot end
//!   After:   head ──► [B] ◄──► [A] ◄──► [D] ◄── tail
//!
//!   ACCESS existing key
//!   ═══════════════════════════════════════════════════════════════════
//!   get(B):  1. index lookup: O(1)
//!            2. move [B] to the hot end: O(1)
//!   After:   head ──► [A] ◄──► [D] ◄──► [B] ◄── tail
//! ```
//!
//! ## Complexity
//!
//! | Method          | Cost     | Notes                                 |
//! |-----------------|----------|---------------------------------------|
//! | `put`           | O(1) avg | index update + list splice            |
//! | `get`           | O(1) avg | index lookup + move to hot end        |
//! | `remove`        | O(1) avg | `NotFound` when the key is absent     |
//! | `pop_coldest`   | O(1)     | used by LRU-K's history layer         |
//! | `purge`         | O(n)     | drops entries, keeps capacity         |
//!
//! ## Concurrency
//!
//! `LruCore` is single threaded; `LruCache` wraps it in one
//! `parking_lot::Mutex` that guards the index, the list, and every counter
//! together. `get` mutates recency order, so even lookups acquire the lock
//! exclusively. There is no lock hierarchy and no suspension point other
//! than the mutex itself.

use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::{NodeIndex, OrderList};
use crate::error::CacheError;
use crate::traits::{CachePolicy, PurgeableCache, RemovableCache};

struct Entry<K, V> {
    key: K,
    value: V,
}

/// Single-threaded LRU core: key index plus one recency-ordered list.
///
/// The two structures are kept mutually consistent at every public
/// operation boundary: a key is in the index if and only if its entry is
/// linked in the list, and the resident count never exceeds capacity.
pub struct LruCore<K, V> {
    index: FxHashMap<K, NodeIndex>,
    list: OrderList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a core with the given capacity.
    ///
    /// Callers validate capacity; the public wrappers reject 0 before any
    /// state is allocated.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "core constructed with zero capacity");
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: OrderList::with_capacity(capacity),
            capacity,
        }
    }

    /// Inserts or updates; evicts the coldest entry first when a new key
    /// arrives at capacity.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&id) = self.index.get(&key) {
            let entry = self.list.get_mut(id).expect("indexed node missing from list");
            entry.value = value;
            self.list.move_to_hot(id);
            return;
        }
        if self.index.len() == self.capacity {
            self.evict_coldest();
        }
        let id = self.list.push_hot(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
    }

    /// Returns the value and promotes the entry on a hit; a miss changes
    /// nothing.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let &id = self.index.get(key)?;
        self.list.move_to_hot(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Returns `true` without touching recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Removes `key`; [`CacheError::NotFound`] when absent.
    pub fn remove(&mut self, key: &K) -> Result<V, CacheError> {
        let id = self.index.remove(key).ok_or(CacheError::NotFound)?;
        let entry = self.list.remove(id).expect("indexed node missing from list");
        Ok(entry.value)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_coldest(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_coldest()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    fn evict_coldest(&mut self) {
        if let Some(entry) = self.list.pop_coldest() {
            self.index.remove(&entry.key);
            trace!(len = self.index.len(), capacity = self.capacity, "evicted least recently used entry");
        }
    }

    /// Drops every entry while keeping the capacity configuration.
    pub fn purge(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.index.len() <= self.capacity, "resident count exceeds capacity");
        assert_eq!(self.index.len(), self.list.len(), "index and list disagree on size");
        for (key, &id) in &self.index {
            let entry = self.list.get(id).expect("indexed node missing from list");
            assert!(&entry.key == key, "index points at a node with a different key");
        }
        self.list.debug_validate_invariants();
    }
}

/// Thread-safe LRU cache: one mutex guarding the whole core.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCache;
///
/// let cache = LruCache::new(2).unwrap();
/// cache.put(1, "A");
/// cache.put(2, "B");
/// cache.get(&1);          // 1 is now the most recently used
/// cache.put(3, "C");      // evicts 2, the least recently used
///
/// assert_eq!(cache.get(&1), Some("A"));
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.get(&3), Some("C"));
/// ```
pub struct LruCache<K, V> {
    inner: Mutex<LruCore<K, V>>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an LRU cache with the given capacity.
    ///
    /// Returns [`CacheError::InvalidArgument`] when `capacity` is 0; no
    /// state is allocated in that case.
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::invalid_argument("capacity must be greater than 0"));
        }
        Ok(Self {
            inner: Mutex::new(LruCore::new(capacity)),
        })
    }

    /// Inserts or updates `key`. Eviction happens only when a new key
    /// arrives at capacity.
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    /// Looks `key` up, marking it most recently used on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key).cloned()
    }

    /// Returns `true` without affecting recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Removes `key`; [`CacheError::NotFound`] when absent.
    pub fn remove(&self, key: &K) -> Result<V, CacheError> {
        self.inner.lock().remove(key)
    }

    /// Drops all entries while keeping the configured capacity.
    pub fn purge(&self) {
        self.inner.lock().purge();
    }

    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if no entries are resident.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.inner.lock().debug_validate_invariants();
    }
}

impl<K, V> CachePolicy<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn put(&self, key: K, value: V) {
        LruCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        LruCache::get(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruCache::capacity(self)
    }
}

impl<K, V> RemovableCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn remove(&self, key: &K) -> Result<V, CacheError> {
        LruCache::remove(self, key)
    }
}

impl<K, V> PurgeableCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn purge(&self) {
        LruCache::purge(self);
    }
}

impl<K, V> std::fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LruCache")
            .field("len", &core.len())
            .field("capacity", &core.capacity())
            .finish_non_exhaustive()
    }
}

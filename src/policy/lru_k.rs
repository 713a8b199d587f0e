//! # LRU-K Cache
//!
//! Two-stage admission on top of the LRU core: a key must be seen `k`
//! times before it is admitted to the main cache. One-shot scans touch
//! only the history layer and never displace established hot entries.
//!
//! ## Architecture
//!
//! ```text
//!   ┌───────────────────────────────────────────────────────────────┐
//!   │                      LruKCache<K, V>                          │
//!   │                   Mutex<LruKCore<K, V>>                       │
//!   │                                                               │
//!   │   main:    LruCore<K, V>      resident entries (capacity C)   │
//!   │   history: LruCore<K, usize>  access counts (capacity H,      │
//!   │                               evicted under LRU)              │
//!   │   pending: FxHashMap<K, V>    most recent value offered for   │
//!   │                               keys not yet admitted           │
//!   │                                                               │
//!   │   touch #1..k-1 ──► history[key] += 1, value parked pending   │
//!   │   touch #k      ──► promote: drop history + pending entry,    │
//!   │                     insert into main under LRU rules          │
//!   └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Admission contract
//!
//! A key becomes resident on the earliest `get` or `put` that brings its
//! history count to `k`, carrying the most recently offered value. The
//! threshold-crossing `get` returns that value. Evicting a history entry
//! forgets the count and drops the parked value with it, so a key that
//! falls out of history starts over from zero.
//!
//! A `get` below the threshold still returns the parked value when one
//! exists; the key is simply not resident yet. `k == 1` degenerates to
//! plain LRU with a pass-through history layer.

use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::CacheError;
use crate::policy::lru::LruCore;
use crate::traits::{CachePolicy, PurgeableCache, RemovableCache};

struct LruKCore<K, V> {
    main: LruCore<K, V>,
    history: LruCore<K, usize>,
    pending: FxHashMap<K, V>,
    k: usize,
}

impl<K, V> LruKCore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Bumps the history count for `key`, evicting the coldest history
    /// entry (and its parked value) first when the history is full.
    fn record_touch(&mut self, key: &K) -> usize {
        let count = self.history.get(key).copied().unwrap_or(0) + 1;
        if count == 1 && self.history.len() == self.history.capacity() {
            if let Some((victim, _)) = self.history.pop_coldest() {
                self.pending.remove(&victim);
            }
        }
        self.history.put(key.clone(), count);
        count
    }

    /// Drops all admission bookkeeping for `key`.
    fn forget(&mut self, key: &K) {
        let _ = self.history.remove(key);
        self.pending.remove(key);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        if self.main.contains(key) {
            return self.main.get(key).cloned();
        }
        let count = self.record_touch(key);
        if count >= self.k {
            if let Some(value) = self.pending.remove(key) {
                let _ = self.history.remove(key);
                self.main.put(key.clone(), value.clone());
                return Some(value);
            }
        }
        self.pending.get(key).cloned()
    }

    fn put(&mut self, key: K, value: V) {
        if self.main.contains(&key) {
            self.main.put(key, value);
            return;
        }
        let count = self.record_touch(&key);
        if count >= self.k {
            self.forget(&key);
            self.main.put(key, value);
        } else {
            self.pending.insert(key, value);
        }
    }

    fn remove(&mut self, key: &K) -> Result<V, CacheError> {
        self.forget(key);
        self.main.remove(key)
    }

    fn purge(&mut self) {
        self.main.purge();
        self.history.purge();
        self.pending.clear();
    }
}

/// Thread-safe LRU-K cache.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru_k::LruKCache;
///
/// let cache = LruKCache::new(2, 16, 2).unwrap();
///
/// // First touch parks the value; the key is not yet resident.
/// cache.put(1, "A");
/// assert_eq!(cache.len(), 0);
///
/// // Second touch reaches k = 2 and admits the key.
/// assert_eq!(cache.get(&1), Some("A"));
/// assert_eq!(cache.len(), 1);
/// ```
pub struct LruKCache<K, V> {
    inner: Mutex<LruKCore<K, V>>,
}

impl<K, V> LruKCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an LRU-K cache.
    ///
    /// `capacity` bounds the main cache, `history_capacity` bounds the
    /// access-count layer, and `k` is the admission threshold. All three
    /// must be at least 1.
    pub fn new(capacity: usize, history_capacity: usize, k: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::invalid_argument("capacity must be greater than 0"));
        }
        if history_capacity == 0 {
            return Err(CacheError::invalid_argument(
                "history capacity must be greater than 0",
            ));
        }
        if k == 0 {
            return Err(CacheError::invalid_argument("k must be greater than 0"));
        }
        Ok(Self {
            inner: Mutex::new(LruKCore {
                main: LruCore::new(capacity),
                history: LruCore::new(history_capacity),
                pending: FxHashMap::default(),
                k,
            }),
        })
    }

    /// Inserts or updates `key`, admitting it to the main cache once it
    /// has been touched `k` times.
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    /// Looks `key` up. Resident keys behave like LRU; non-resident keys
    /// count a touch and return the parked value when one exists.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key)
    }

    /// Returns `true` if `key` is resident in the main cache.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().main.contains(key)
    }

    /// Removes `key` everywhere; [`CacheError::NotFound`] when the key was
    /// not resident in the main cache (admission bookkeeping is cleared
    /// regardless).
    pub fn remove(&self, key: &K) -> Result<V, CacheError> {
        self.inner.lock().remove(key)
    }

    /// Drops resident entries, history counts, and parked values.
    pub fn purge(&self) {
        self.inner.lock().purge();
    }

    /// Returns the number of resident entries in the main cache.
    pub fn len(&self) -> usize {
        self.inner.lock().main.len()
    }

    /// Returns `true` if the main cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().main.is_empty()
    }

    /// Returns the main cache capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().main.capacity()
    }

    /// Returns the admission threshold.
    pub fn k_value(&self) -> usize {
        self.inner.lock().k
    }
}

impl<K, V> CachePolicy<K, V> for LruKCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn put(&self, key: K, value: V) {
        LruKCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        LruKCache::get(self, key)
    }

    fn len(&self) -> usize {
        LruKCache::len(self)
    }

    fn capacity(&self) -> usize {
        LruKCache::capacity(self)
    }
}

impl<K, V> RemovableCache<K, V> for LruKCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn remove(&self, key: &K) -> Result<V, CacheError> {
        LruKCache::remove(self, key)
    }
}

impl<K, V> PurgeableCache<K, V> for LruKCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn purge(&self) {
        LruKCache::purge(self);
    }
}

impl<K, V> std::fmt::Debug for LruKCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LruKCache")
            .field("len", &core.main.len())
            .field("capacity", &core.main.capacity())
            .field("k", &core.k)
            .finish_non_exhaustive()
    }
}

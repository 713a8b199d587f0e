//! # Adaptive Replacement Cache (ARC)
//!
//! Balances recency against frequency by splitting the resident budget
//! between two cooperating halves and letting recent eviction history
//! move the split. Entries enter through the recency half; entries proven
//! hot (accessed `transform_threshold` times) move to the frequency half.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────────┐
//!   │                        ArcCache<K, V>                           │
//!   │              (no lock of its own; fixed call order)             │
//!   │                                                                 │
//!   │   ┌───────────────────────────┐  ┌───────────────────────────┐  │
//!   │   │  ArcLruPart (recency)     │  │  ArcLfuPart (frequency)   │  │
//!   │   │  own mutex                │  │  own mutex                │  │
//!   │   │                           │  │                           │  │
//!   │   │  T1: LRU list of entries  │  │  T2: frequency buckets    │  │
//!   │   │      + access counters    │  │      (BTreeMap, no aging) │  │
//!   │   │  B1: ghost keys evicted   │  │  B2: ghost keys evicted   │  │
//!   │   │      from T1              │  │      from T2              │  │
//!   │   └───────────────────────────┘  └───────────────────────────┘  │
//!   │                                                                 │
//!   │   |T1| ≤ recency capacity,  |T2| ≤ frequency capacity,          │
//!   │   recency + frequency capacity = configured capacity  (always)  │
//!   └─────────────────────────────────────────────────────────────────┘
//!
//!   Adaptation on a miss whose key is still ghosted
//!   ═══════════════════════════════════════════════════════════════
//!   hit in B1 ──► the recency half was too small:
//!                 move one capacity unit frequency → recency
//!   hit in B2 ──► the frequency half was too small:
//!                 move one capacity unit recency → frequency
//!   A transfer first evicts inside the shrinking half if needed and
//!   is refused when that half is already at zero.
//!
//!   Promotion
//!   ═══════════════════════════════════════════════════════════════
//!   get(k) hits T1 and the entry has reached the threshold:
//!     1. take it out of the recency half (no ghost)
//!     2. put it into the frequency half (enters at frequency 1)
//! ```
//!
//! ## Locking
//!
//! Each half owns one mutex; the top level holds none and never takes
//! both at once. Every code path touches the halves in a fixed order
//! (ghost checks, then the main probes), so there is no deadlock and an
//! operation observes each half in a committed state.
//!
//! ## References
//!
//! - Megiddo & Modha, "ARC: A Self-Tuning, Low Overhead Replacement
//!   Cache", FAST 2003

mod lfu_part;
mod lru_part;

use std::hash::Hash;

use tracing::trace;

use crate::error::CacheError;
use crate::traits::{CachePolicy, PurgeableCache};

use lfu_part::ArcLfuPart;
use lru_part::ArcLruPart;

/// Adaptive replacement cache.
///
/// # Example
///
/// ```
/// use evictkit::policy::arc::ArcCache;
///
/// let cache = ArcCache::new(4, 2).unwrap();
/// cache.put(1, "A");
/// assert_eq!(cache.recency_len(), 1);
///
/// // Reaching the transform threshold moves the entry to the
/// // frequency half.
/// cache.get(&1);
/// assert_eq!(cache.recency_len(), 0);
/// assert_eq!(cache.frequency_len(), 1);
/// ```
pub struct ArcCache<K, V> {
    lru_part: ArcLruPart<K, V>,
    lfu_part: ArcLfuPart<K, V>,
    capacity: usize,
    /// Initial recency-half capacity, restored by `purge`.
    recency_split: usize,
}

impl<K, V> ArcCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an ARC cache.
    ///
    /// `capacity` bounds the total resident set (the two halves start
    /// with a ⌈c/2⌉ / ⌊c/2⌋ split and trade budget from there); each
    /// ghost list can remember up to `capacity` evicted keys.
    /// `transform_threshold` is the access count at which an entry moves
    /// from the recency half to the frequency half. Both parameters must
    /// be at least 1.
    pub fn new(capacity: usize, transform_threshold: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::invalid_argument("capacity must be greater than 0"));
        }
        if transform_threshold == 0 {
            return Err(CacheError::invalid_argument(
                "transform threshold must be at least 1",
            ));
        }
        let recency_split = capacity - capacity / 2;
        Ok(Self {
            lru_part: ArcLruPart::new(recency_split, capacity, transform_threshold),
            lfu_part: ArcLfuPart::new(capacity / 2, capacity),
            capacity,
            recency_split,
        })
    }

    /// Consumes a ghost hit for `key`, shifting one unit of capacity
    /// toward the half that evicted it too early.
    fn check_ghost_caches(&self, key: &K) -> bool {
        if self.lru_part.check_ghost(key) {
            if self.lfu_part.decrease_capacity() {
                self.lru_part.increase_capacity();
                trace!(
                    recency = self.lru_part.capacity(),
                    frequency = self.lfu_part.capacity(),
                    "ghost hit shifted one capacity unit toward recency"
                );
            }
            true
        } else if self.lfu_part.check_ghost(key) {
            if self.lru_part.decrease_capacity() {
                self.lfu_part.increase_capacity();
                trace!(
                    recency = self.lru_part.capacity(),
                    frequency = self.lfu_part.capacity(),
                    "ghost hit shifted one capacity unit toward frequency"
                );
            }
            true
        } else {
            false
        }
    }

    /// Looks `key` up in both halves, promoting a recency-half entry that
    /// has crossed the transform threshold.
    pub fn get(&self, key: &K) -> Option<V> {
        self.check_ghost_caches(key);
        if let Some((value, should_promote)) = self.lru_part.get(key) {
            if should_promote {
                if let Some(moved) = self.lru_part.take(key) {
                    // The frequency half refuses the move while its budget
                    // is zero; the entry stays resident on the recency side.
                    if !self.lfu_part.put(key.clone(), moved.clone()) {
                        self.lru_part.put(key.clone(), moved);
                    }
                }
            }
            return Some(value);
        }
        self.lfu_part.get(key)
    }

    /// Inserts or updates `key`: updates go to whichever half holds the
    /// key; new entries enter the recency half.
    pub fn put(&self, key: K, value: V) {
        self.check_ghost_caches(&key);
        if self.lfu_part.contains(&key) {
            self.lfu_part.put(key, value);
        } else if !self.lru_part.put(key.clone(), value.clone()) {
            // All capacity has been adapted to the frequency side; admit
            // the entry there rather than dropping it.
            self.lfu_part.put(key, value);
        }
    }

    /// Returns `true` if `key` is resident in either half.
    pub fn contains(&self, key: &K) -> bool {
        self.lru_part.contains(key) || self.lfu_part.contains(key)
    }

    /// Removes `key` if resident; absent keys are silently ignored. No
    /// ghost is recorded for an explicit removal.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.lru_part.take(key).or_else(|| self.lfu_part.take(key))
    }

    /// Drops all entries and ghosts and restores the initial capacity
    /// split.
    pub fn purge(&self) {
        self.lru_part.purge(self.recency_split);
        self.lfu_part.purge(self.capacity - self.recency_split);
    }

    /// Returns the total number of resident entries across both halves.
    pub fn len(&self) -> usize {
        self.lru_part.len() + self.lfu_part.len()
    }

    /// Returns `true` if neither half holds an entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the configured total capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries resident in the recency half (T1).
    pub fn recency_len(&self) -> usize {
        self.lru_part.len()
    }

    /// Number of entries resident in the frequency half (T2).
    pub fn frequency_len(&self) -> usize {
        self.lfu_part.len()
    }

    /// Current capacity share of the recency half.
    pub fn recency_capacity(&self) -> usize {
        self.lru_part.capacity()
    }

    /// Current capacity share of the frequency half.
    pub fn frequency_capacity(&self) -> usize {
        self.lfu_part.capacity()
    }

    /// Number of keys in the recency half's ghost list (B1).
    pub fn recency_ghost_len(&self) -> usize {
        self.lru_part.ghost_len()
    }

    /// Number of keys in the frequency half's ghost list (B2).
    pub fn frequency_ghost_len(&self) -> usize {
        self.lfu_part.ghost_len()
    }
}

impl<K, V> CachePolicy<K, V> for ArcCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn put(&self, key: K, value: V) {
        ArcCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        ArcCache::get(self, key)
    }

    fn len(&self) -> usize {
        ArcCache::len(self)
    }

    fn capacity(&self) -> usize {
        ArcCache::capacity(self)
    }
}

impl<K, V> PurgeableCache<K, V> for ArcCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn purge(&self) {
        ArcCache::purge(self);
    }
}

impl<K, V> std::fmt::Debug for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcCache")
            .field("capacity", &self.capacity)
            .field("recency_len", &self.lru_part.len())
            .field("frequency_len", &self.lfu_part.len())
            .field("recency_capacity", &self.lru_part.capacity())
            .field("frequency_capacity", &self.lfu_part.capacity())
            .finish()
    }
}

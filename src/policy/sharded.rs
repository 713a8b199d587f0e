//! # Sharded cache wrappers
//!
//! Partition a key space across `N` independent engines to cut lock
//! contention: each shard is a complete cache with its own mutex, and a
//! key always lands on the same shard, so threads working on different
//! keys rarely touch the same lock.
//!
//! ```text
//!                       hash(key) % N  (ShardSelector)
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//!   ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//!   │  Shard 0    │     │  Shard 1    │ ... │  Shard N-1  │
//!   │  own mutex  │     │  own mutex  │     │  own mutex  │
//!   │  cap ⌈C/N⌉  │     │  cap ⌈C/N⌉  │     │  cap ⌈C/N⌉  │
//!   └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! There is no global lock and no cross-shard consistency claim:
//! `purge()` drains shard by shard, so a concurrent `put` to an
//! already-purged shard can survive the purge. Eviction is shard-local:
//! a hot shard evicts under its own ⌈C/N⌉ budget even while other shards
//! have room.

use std::hash::Hash;

use crate::ds::ShardSelector;
use crate::error::CacheError;
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
use crate::traits::{CachePolicy, PurgeableCache, RemovableCache};

/// LRU cache sharded by key hash.
///
/// # Example
///
/// ```
/// use evictkit::policy::sharded::ShardedLruCache;
///
/// let cache = ShardedLruCache::new(100, 4).unwrap();
/// cache.put("k", 1);
/// assert_eq!(cache.get(&"k"), Some(1));
/// assert_eq!(cache.get_or_default(&"missing"), 0);
/// ```
pub struct ShardedLruCache<K, V> {
    shards: Vec<LruCache<K, V>>,
    selector: ShardSelector,
}

impl<K, V> ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a sharded LRU cache: `shard_count` shards, each with
    /// capacity ⌈total_capacity / shard_count⌉.
    pub fn new(total_capacity: usize, shard_count: usize) -> Result<Self, CacheError> {
        let per_shard = per_shard_capacity(total_capacity, shard_count)?;
        let shards = (0..shard_count)
            .map(|_| LruCache::new(per_shard))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            shards,
            selector: ShardSelector::new(shard_count, 0),
        })
    }

    fn shard(&self, key: &K) -> &LruCache<K, V> {
        &self.shards[self.selector.shard_for_key(key)]
    }

    /// Inserts or updates `key` on its shard.
    pub fn put(&self, key: K, value: V) {
        self.shard(&key).put(key, value);
    }

    /// Looks `key` up on its shard.
    pub fn get(&self, key: &K) -> Option<V> {
        self.shard(key).get(key)
    }

    /// Looks `key` up, falling back to `V::default()` on a miss.
    pub fn get_or_default(&self, key: &K) -> V
    where
        V: Default,
    {
        self.shard(key).get(key).unwrap_or_default()
    }

    /// Returns `true` if `key` is resident on its shard.
    pub fn contains(&self, key: &K) -> bool {
        self.shard(key).contains(key)
    }

    /// Removes `key` from its shard; [`CacheError::NotFound`] when absent.
    pub fn remove(&self, key: &K) -> Result<V, CacheError> {
        self.shard(key).remove(key)
    }

    /// Purges every shard in turn. Not a snapshot: concurrent `put`s to
    /// already-purged shards may remain afterwards.
    pub fn purge(&self) {
        for shard in &self.shards {
            shard.purge();
        }
    }

    /// Total resident entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }

    /// Returns `true` if every shard is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.is_empty())
    }

    /// Sum of per-shard capacities (⌈C/N⌉ · N).
    pub fn capacity(&self) -> usize {
        self.shards.iter().map(|shard| shard.capacity()).sum()
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}

/// LFU cache sharded by key hash.
pub struct ShardedLfuCache<K, V> {
    shards: Vec<LfuCache<K, V>>,
    selector: ShardSelector,
}

impl<K, V> ShardedLfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a sharded LFU cache with the default aging ceiling.
    pub fn new(total_capacity: usize, shard_count: usize) -> Result<Self, CacheError> {
        let per_shard = per_shard_capacity(total_capacity, shard_count)?;
        let shards = (0..shard_count)
            .map(|_| LfuCache::new(per_shard))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            shards,
            selector: ShardSelector::new(shard_count, 0),
        })
    }

    /// Creates a sharded LFU cache whose shards age once their access
    /// average exceeds `max_avg`.
    pub fn with_max_avg(
        total_capacity: usize,
        shard_count: usize,
        max_avg: u64,
    ) -> Result<Self, CacheError> {
        let per_shard = per_shard_capacity(total_capacity, shard_count)?;
        let shards = (0..shard_count)
            .map(|_| LfuCache::with_max_avg(per_shard, max_avg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            shards,
            selector: ShardSelector::new(shard_count, 0),
        })
    }

    fn shard(&self, key: &K) -> &LfuCache<K, V> {
        &self.shards[self.selector.shard_for_key(key)]
    }

    /// Inserts or updates `key` on its shard.
    pub fn put(&self, key: K, value: V) {
        self.shard(&key).put(key, value);
    }

    /// Looks `key` up on its shard, bumping its frequency on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        self.shard(key).get(key)
    }

    /// Looks `key` up, falling back to `V::default()` on a miss.
    pub fn get_or_default(&self, key: &K) -> V
    where
        V: Default,
    {
        self.shard(key).get(key).unwrap_or_default()
    }

    /// Returns `true` if `key` is resident on its shard.
    pub fn contains(&self, key: &K) -> bool {
        self.shard(key).contains(key)
    }

    /// Removes `key` from its shard; absent keys are silently ignored.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.shard(key).remove(key)
    }

    /// Purges every shard in turn. Not a snapshot: concurrent `put`s to
    /// already-purged shards may remain afterwards.
    pub fn purge(&self) {
        for shard in &self.shards {
            shard.purge();
        }
    }

    /// Total resident entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }

    /// Returns `true` if every shard is empty.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.is_empty())
    }

    /// Sum of per-shard capacities (⌈C/N⌉ · N).
    pub fn capacity(&self) -> usize {
        self.shards.iter().map(|shard| shard.capacity()).sum()
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}

fn per_shard_capacity(total_capacity: usize, shard_count: usize) -> Result<usize, CacheError> {
    if total_capacity == 0 {
        return Err(CacheError::invalid_argument(
            "total capacity must be greater than 0",
        ));
    }
    if shard_count == 0 {
        return Err(CacheError::invalid_argument(
            "shard count must be greater than 0",
        ));
    }
    Ok(total_capacity.div_ceil(shard_count))
}

impl<K, V> CachePolicy<K, V> for ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn put(&self, key: K, value: V) {
        ShardedLruCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        ShardedLruCache::get(self, key)
    }

    fn len(&self) -> usize {
        ShardedLruCache::len(self)
    }

    fn capacity(&self) -> usize {
        ShardedLruCache::capacity(self)
    }
}

impl<K, V> RemovableCache<K, V> for ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn remove(&self, key: &K) -> Result<V, CacheError> {
        ShardedLruCache::remove(self, key)
    }
}

impl<K, V> PurgeableCache<K, V> for ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn purge(&self) {
        ShardedLruCache::purge(self);
    }
}

impl<K, V> CachePolicy<K, V> for ShardedLfuCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn put(&self, key: K, value: V) {
        ShardedLfuCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        ShardedLfuCache::get(self, key)
    }

    fn len(&self) -> usize {
        ShardedLfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        ShardedLfuCache::capacity(self)
    }
}

impl<K, V> PurgeableCache<K, V> for ShardedLfuCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn purge(&self) {
        ShardedLfuCache::purge(self);
    }
}

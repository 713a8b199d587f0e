//! # Cache Policy Contract
//!
//! One polymorphic contract shared by every replacement-policy engine, so
//! application code can switch policies without structural changes.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌────────────────────────────────────────┐
//!                 │          CachePolicy<K, V>             │
//!                 │                                        │
//!                 │  put(&self, K, V)                      │
//!                 │  get(&self, &K) → Option<V>            │
//!                 │  len(&self) → usize                    │
//!                 │  capacity(&self) → usize               │
//!                 │  is_empty(&self) → bool                │
//!                 └─────────────────┬──────────────────────┘
//!                                   │
//!                ┌──────────────────┴──────────────────┐
//!                ▼                                     ▼
//!   ┌────────────────────────────┐       ┌────────────────────────────┐
//!   │   RemovableCache<K, V>     │       │   PurgeableCache<K, V>     │
//!   │                            │       │                            │
//!   │  remove(&K)                │       │  purge()                   │
//!   │    → Result<V, CacheError> │       │    drop entries, keep      │
//!   │    NotFound when absent    │       │    capacity configuration  │
//!   └────────────────────────────┘       └────────────────────────────┘
//! ```
//!
//! ## Contract summary
//!
//! | Operation | Semantics |
//! |-----------|-----------|
//! | `put`     | Insert or update; never fails for a validly constructed cache. Eviction happens here when a new key arrives at capacity. |
//! | `get`     | Hit: apply the policy's access side effects and return a copy of the value. Miss: return `None` with no structural change beyond what the policy documents (LRU-K and ARC update admission bookkeeping on misses). |
//! | `remove`  | Only on engines that surface `NotFound`; LFU and ARC instead expose an inherent `remove` that silently ignores absent keys. |
//! | `purge`   | Drop all entries while preserving the capacity configuration. |
//!
//! All methods take `&self`: every engine owns one internal mutex guarding
//! its whole state, acquired with scoped guards on each public operation,
//! so operations on a shared instance from many threads are linearized.
//! `Send + Sync` is a supertrait bound: a type implementing `CachePolicy`
//! is promising it is safe to share.
//!
//! Values are copied out on lookup; callers never hold references into
//! cache internals. Wrap expensive values in `Arc` before inserting.
//!
//! ## Example
//!
//! ```
//! use evictkit::traits::CachePolicy;
//! use evictkit::policy::lru::LruCache;
//! use evictkit::policy::lfu::LfuCache;
//!
//! fn warm<C: CachePolicy<u64, String>>(cache: &C, data: &[(u64, String)]) {
//!     for (key, value) in data {
//!         cache.put(*key, value.clone());
//!     }
//! }
//!
//! let lru = LruCache::new(8).unwrap();
//! let lfu = LfuCache::new(8).unwrap();
//! let rows = vec![(1, "one".to_string()), (2, "two".to_string())];
//! warm(&lru, &rows);
//! warm(&lfu, &rows);
//! assert_eq!(lru.get(&1), Some("one".to_string()));
//! assert_eq!(lfu.get(&2), Some("two".to_string()));
//! ```

use crate::error::CacheError;

/// Operations every replacement-policy engine supports.
pub trait CachePolicy<K, V>: Send + Sync {
    /// Inserts or updates `key`, evicting under the policy's rules when a
    /// new key arrives at capacity. Updates never evict.
    fn put(&self, key: K, value: V);

    /// Looks `key` up, applying the policy's access side effects on a hit.
    ///
    /// Returns a copy of the value, or `None` on a miss.
    fn get(&self, key: &K) -> Option<V>;

    /// Returns the number of resident entries.
    fn len(&self) -> usize;

    /// Returns the configured capacity bound.
    fn capacity(&self) -> usize;

    /// Returns `true` if no entries are resident.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Caches whose explicit `remove` reports a missing key as an error.
pub trait RemovableCache<K, V>: CachePolicy<K, V> {
    /// Removes `key`, returning its value, or [`CacheError::NotFound`] if
    /// the key is not resident.
    fn remove(&self, key: &K) -> Result<V, CacheError>;
}

/// Caches that can drop all entries while keeping their configuration.
pub trait PurgeableCache<K, V>: CachePolicy<K, V> {
    /// Drops every resident entry; capacity and tuning parameters survive.
    fn purge(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::lru::LruCache;

    // The contract must stay object safe: the builder hands out boxed
    // trait objects.
    #[test]
    fn contract_is_object_safe() {
        let cache: Box<dyn CachePolicy<u64, &'static str>> =
            Box::new(LruCache::new(2).unwrap());
        cache.put(1, "one");
        assert_eq!(cache.get(&1), Some("one"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.capacity(), 2);
        assert!(!cache.is_empty());
    }

    #[test]
    fn generic_code_can_switch_policies() {
        fn fill<C: CachePolicy<u32, u32>>(cache: &C) -> usize {
            for i in 0..10 {
                cache.put(i, i * 10);
            }
            cache.len()
        }

        let lru = LruCache::new(4).unwrap();
        assert_eq!(fill(&lru), 4);

        let lfu = crate::policy::lfu::LfuCache::new(4).unwrap();
        assert_eq!(fill(&lfu), 4);
    }
}

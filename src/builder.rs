//! Policy-erased cache construction.
//!
//! Builds any engine behind a `Box<dyn CachePolicy>` so call sites can
//! pick a replacement policy at runtime without structural changes.
//!
//! ## Example
//!
//! ```
//! use evictkit::builder::{CacheBuilder, PolicyKind};
//!
//! let cache = CacheBuilder::new(100)
//!     .policy(PolicyKind::LruK { history_capacity: 1000, k: 2 })
//!     .build::<u64, String>()
//!     .unwrap();
//! cache.put(1, "hello".to_string());
//! ```

use std::hash::Hash;

use crate::error::CacheError;
use crate::policy::arc::ArcCache;
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
use crate::policy::lru_k::LruKCache;
use crate::traits::CachePolicy;

/// Available replacement policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Least Recently Used.
    Lru,
    /// LRU with `k`-touch admission through a bounded history layer.
    LruK { history_capacity: usize, k: usize },
    /// Least Frequently Used with frequency aging; `None` keeps the
    /// default ceiling.
    Lfu { max_avg: Option<u64> },
    /// Adaptive Replacement Cache with the given promotion threshold.
    Arc { transform_threshold: usize },
}

/// Builder for policy-erased caches.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
    policy: PolicyKind,
}

impl CacheBuilder {
    /// Starts a builder for a cache of the given capacity (LRU unless
    /// overridden).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policy: PolicyKind::Lru,
        }
    }

    /// Selects the replacement policy.
    pub fn policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the cache, validating the construction parameters.
    pub fn build<K, V>(self) -> Result<Box<dyn CachePolicy<K, V>>, CacheError>
    where
        K: Eq + Hash + Clone + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        Ok(match self.policy {
            PolicyKind::Lru => Box::new(LruCache::new(self.capacity)?),
            PolicyKind::LruK {
                history_capacity,
                k,
            } => Box::new(LruKCache::new(self.capacity, history_capacity, k)?),
            PolicyKind::Lfu { max_avg } => match max_avg {
                Some(max_avg) => Box::new(LfuCache::with_max_avg(self.capacity, max_avg)?),
                None => Box::new(LfuCache::new(self.capacity)?),
            },
            PolicyKind::Arc {
                transform_threshold,
            } => Box::new(ArcCache::new(self.capacity, transform_threshold)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_every_policy() {
        let kinds = [
            PolicyKind::Lru,
            PolicyKind::LruK {
                history_capacity: 8,
                k: 1,
            },
            PolicyKind::Lfu { max_avg: Some(100) },
            PolicyKind::Arc {
                transform_threshold: 2,
            },
        ];
        for kind in kinds {
            let cache = CacheBuilder::new(4).policy(kind).build::<u32, u32>().unwrap();
            cache.put(1, 10);
            assert_eq!(cache.get(&1), Some(10));
            assert!(cache.len() <= cache.capacity());
        }
    }

    #[test]
    fn propagates_construction_errors() {
        assert!(CacheBuilder::new(0).build::<u32, u32>().is_err());
        let bad_k = CacheBuilder::new(4)
            .policy(PolicyKind::LruK {
                history_capacity: 8,
                k: 0,
            })
            .build::<u32, u32>();
        assert!(bad_k.is_err());
    }
}

//! Deterministic key-to-shard routing for the sharded cache wrappers.
//!
//! Maps any hashable key to a shard index in `[0, shards)` with a seeded
//! `DefaultHasher`, so the same key always lands on the same shard for a
//! given configuration. Different seeds produce different distributions,
//! which keeps unrelated sharded caches from sharing collision patterns.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Seeded, deterministic shard selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSelector {
    shards: usize,
    seed: u64,
}

impl ShardSelector {
    /// Creates a selector for `shards` shards (clamped to at least 1).
    pub fn new(shards: usize, seed: u64) -> Self {
        Self {
            shards: shards.max(1),
            seed,
        }
    }

    /// Returns the number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards
    }

    /// Maps a key to a shard index in `[0, shards)`.
    ///
    /// Stable: repeated calls with the same key return the same index.
    pub fn shard_for_key<K: Hash>(&self, key: &K) -> usize {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards
    }
}

impl Default for ShardSelector {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

//! # Least Frequently Used (LFU) Cache with frequency aging
//!
//! Frequency-bucketed cache: entries with the same access count share one
//! insertion-ordered list, and eviction takes the oldest entry of the
//! lowest-frequency bucket. A running access average triggers an aging
//! pass that decays every frequency, so entries that were hot under an old
//! workload cannot become unevictable after that workload ends.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                        LfuCache<K, V>                            │
//!   │                     Mutex<LfuCore<K, V>>                         │
//!   │                                                                  │
//!   │   index: FxHashMap<K, slot>        slots: Vec<Option<Node>>      │
//!   │                                                                  │
//!   │   buckets: FxHashMap<freq, FreqList>                             │
//!   │   ┌──────┬────────────────────────────────────────┐              │
//!   │   │ freq │  head (oldest) ◄──►  ...  ◄──► (newest)│              │
//!   │   ├──────┼────────────────────────────────────────┤              │
//!   │   │  1   │  [D]                                   │ ◄── min_freq │
//!   │   │  3   │  [B] ◄──► [C]                          │              │
//!   │   │  7   │  [A]                                   │              │
//!   │   └──────┴────────────────────────────────────────┘              │
//!   │                                                                  │
//!   │   eviction victim: head of the min_freq bucket                   │
//!   └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Access handling
//!
//! ```text
//!   HIT / UPDATE                       INSERT (cache full)
//!   ═══════════════════════════        ═══════════════════════════════
//!   1. detach from bucket f            1. evict head of min_freq bucket
//!      (advance min_freq if the           (running total -= its freq)
//!      bucket emptied and f was min)   2. insert new node at freq 1
//!   2. freq := f + 1                   3. min_freq := 1
//!   3. append to bucket f+1 tail       4. running total += 1
//!   4. running total += 1
//!
//!   After either: avg := total / len (integer division).
//!   If avg > max_avg, run the aging pass.
//! ```
//!
//! ## Aging
//!
//! Every resident frequency drops by `max_avg / 2`, floored at 1. Buckets
//! are rebuilt in ascending frequency order, preserving the relative order
//! inside each bucket, so eviction tie-breaks stay deterministic.
//! `min_freq` is recomputed as the smallest non-empty frequency afterwards
//! (1 when the cache is empty) and on every other path that can empty the
//! minimum bucket, so it is never left pointing at a missing bucket.
//!
//! ## Complexity
//!
//! | Method   | Cost       | Notes                                       |
//! |----------|------------|---------------------------------------------|
//! | `put`    | O(1) avg   | amortized; a triggered aging pass is O(n)   |
//! | `get`    | O(1) avg   | bucket splice + counter updates             |
//! | `remove` | O(1) avg   | absent keys are silently ignored            |
//! | `purge`  | O(n)       | resets counters and `min_freq`              |

use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::CacheError;
use crate::traits::{CachePolicy, PurgeableCache};

/// Default access-average ceiling; matches a cache that effectively never
/// ages unless configured to.
pub const DEFAULT_MAX_AVERAGE: u64 = 1_000_000;

struct LfuNode<K, V> {
    key: K,
    value: V,
    freq: u64,
    prev: Option<usize>,
    next: Option<usize>,
}

/// One frequency bucket: insertion-ordered, head = oldest.
#[derive(Debug, Default, Clone, Copy)]
struct FreqList {
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

struct LfuCore<K, V> {
    slots: Vec<Option<LfuNode<K, V>>>,
    free: Vec<usize>,
    index: FxHashMap<K, usize>,
    buckets: FxHashMap<u64, FreqList>,
    min_freq: u64,
    /// Running total of all recorded accesses (the basis of the average).
    total_accesses: u64,
    max_avg: u64,
    capacity: usize,
}

impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn new(capacity: usize, max_avg: u64) -> Self {
        debug_assert!(capacity > 0 && max_avg > 0);
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
            min_freq: 1,
            total_accesses: 0,
            max_avg,
            capacity,
        }
    }

    fn alloc(&mut self, node: LfuNode<K, V>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    fn node(&self, idx: usize) -> &LfuNode<K, V> {
        self.slots[idx].as_ref().expect("lfu node missing")
    }

    fn node_mut(&mut self, idx: usize) -> &mut LfuNode<K, V> {
        self.slots[idx].as_mut().expect("lfu node missing")
    }

    fn bucket_push_newest(slots: &mut [Option<LfuNode<K, V>>], list: &mut FreqList, idx: usize) {
        let old_tail = list.tail;
        {
            let node = slots[idx].as_mut().expect("lfu node missing");
            node.prev = old_tail;
            node.next = None;
        }
        if let Some(tail_idx) = old_tail {
            slots[tail_idx].as_mut().expect("lfu node missing").next = Some(idx);
        } else {
            list.head = Some(idx);
        }
        list.tail = Some(idx);
        list.len += 1;
    }

    fn bucket_detach(slots: &mut [Option<LfuNode<K, V>>], list: &mut FreqList, idx: usize) {
        let (prev, next) = {
            let node = slots[idx].as_ref().expect("lfu node missing");
            (node.prev, node.next)
        };
        match prev {
            Some(p) => slots[p].as_mut().expect("lfu node missing").next = next,
            None => list.head = next,
        }
        match next {
            Some(n) => slots[n].as_mut().expect("lfu node missing").prev = prev,
            None => list.tail = prev,
        }
        {
            let node = slots[idx].as_mut().expect("lfu node missing");
            node.prev = None;
            node.next = None;
        }
        list.len -= 1;
    }

    /// Detaches `idx` from the bucket at `freq`, dropping the bucket if it
    /// empties. Returns `true` if the bucket emptied.
    fn detach_from_bucket(&mut self, idx: usize, freq: u64) -> bool {
        let emptied = {
            let list = self
                .buckets
                .get_mut(&freq)
                .expect("node's frequency bucket missing");
            Self::bucket_detach(&mut self.slots, list, idx);
            list.len == 0
        };
        if emptied {
            self.buckets.remove(&freq);
        }
        emptied
    }

    /// Moves a resident node up one frequency and records the access.
    fn touch(&mut self, idx: usize) {
        let freq = self.node(idx).freq;
        let emptied = self.detach_from_bucket(idx, freq);
        let new_freq = freq + 1;
        self.node_mut(idx).freq = new_freq;
        if emptied && freq == self.min_freq {
            // The node left the minimum bucket and nothing smaller exists.
            self.min_freq = new_freq;
        }
        let list = self.buckets.entry(new_freq).or_default();
        Self::bucket_push_newest(&mut self.slots, list, idx);
        self.note_access();
    }

    /// Counts one access and runs the aging pass when the average crosses
    /// the ceiling.
    fn note_access(&mut self) {
        self.total_accesses += 1;
        let len = self.index.len() as u64;
        if len == 0 {
            return;
        }
        let avg = self.total_accesses / len;
        if avg > self.max_avg {
            self.age_entries(avg);
        }
    }

    /// Decays every resident frequency by `max_avg / 2`, floored at 1, and
    /// rebuilds the buckets in ascending frequency order.
    fn age_entries(&mut self, avg: u64) {
        let decay = self.max_avg / 2;
        debug!(
            avg,
            max_avg = self.max_avg,
            decay,
            len = self.index.len(),
            "access average over ceiling, aging resident frequencies"
        );
        if decay == 0 {
            return;
        }

        let mut freqs: Vec<u64> = self.buckets.keys().copied().collect();
        freqs.sort_unstable();
        let mut order: Vec<usize> = Vec::with_capacity(self.index.len());
        for freq in freqs {
            let mut current = self.buckets[&freq].head;
            while let Some(idx) = current {
                current = self.node(idx).next;
                order.push(idx);
            }
        }

        self.buckets.clear();
        for idx in order {
            let new_freq = {
                let node = self.slots[idx].as_mut().expect("lfu node missing");
                node.freq = node.freq.saturating_sub(decay).max(1);
                node.prev = None;
                node.next = None;
                node.freq
            };
            let list = self.buckets.entry(new_freq).or_default();
            Self::bucket_push_newest(&mut self.slots, list, idx);
        }
        self.recompute_min_freq();
    }

    fn recompute_min_freq(&mut self) {
        self.min_freq = self.buckets.keys().copied().min().unwrap_or(1);
    }

    /// Evicts the oldest entry of the minimum-frequency bucket.
    fn evict_least_frequent(&mut self) {
        debug_assert!(
            self.buckets.contains_key(&self.min_freq),
            "min_freq points at a missing bucket"
        );
        let Some(victim) = self.buckets.get(&self.min_freq).and_then(|list| list.head) else {
            return;
        };
        let min_freq = self.min_freq;
        self.detach_from_bucket(victim, min_freq);
        let node = self.slots[victim].take().expect("lfu node missing");
        self.free.push(victim);
        self.index.remove(&node.key);
        self.total_accesses = self.total_accesses.saturating_sub(node.freq);
        if !self.buckets.contains_key(&min_freq) {
            self.recompute_min_freq();
        }
        trace!(freq = node.freq, len = self.index.len(), "evicted least frequently used entry");
    }

    fn put(&mut self, key: K, value: V) {
        if let Some(&idx) = self.index.get(&key) {
            self.node_mut(idx).value = value;
            self.touch(idx);
            return;
        }
        if self.index.len() == self.capacity {
            self.evict_least_frequent();
        }
        let idx = self.alloc(LfuNode {
            key: key.clone(),
            value,
            freq: 1,
            prev: None,
            next: None,
        });
        self.index.insert(key, idx);
        let list = self.buckets.entry(1).or_default();
        Self::bucket_push_newest(&mut self.slots, list, idx);
        self.min_freq = 1;
        self.note_access();
    }

    fn get(&mut self, key: &K) -> Option<V> {
        let &idx = self.index.get(key)?;
        self.touch(idx);
        Some(self.node(idx).value.clone())
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        let freq = self.node(idx).freq;
        self.detach_from_bucket(idx, freq);
        let node = self.slots[idx].take().expect("lfu node missing");
        self.free.push(idx);
        self.total_accesses = self.total_accesses.saturating_sub(node.freq);
        if freq == self.min_freq && !self.buckets.contains_key(&freq) {
            self.recompute_min_freq();
        }
        Some(node.value)
    }

    fn purge(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 1;
        self.total_accesses = 0;
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        self.index.get(key).map(|&idx| self.node(idx).freq)
    }

    #[cfg(any(test, debug_assertions))]
    fn debug_validate_invariants(&self) {
        assert!(self.index.len() <= self.capacity, "resident count exceeds capacity");
        let bucket_total: usize = self.buckets.values().map(|list| list.len).sum();
        assert_eq!(bucket_total, self.index.len(), "bucket totals disagree with index");
        if let Some(&smallest) = self.buckets.keys().min() {
            assert_eq!(self.min_freq, smallest, "min_freq is not the smallest non-empty frequency");
        }
        for (freq, list) in &self.buckets {
            let mut count = 0usize;
            let mut prev = None;
            let mut current = list.head;
            while let Some(idx) = current {
                let node = self.node(idx);
                assert_eq!(node.freq, *freq, "node filed under the wrong frequency");
                assert_eq!(node.prev, prev, "broken bucket back link");
                assert!(self.index.get(&node.key) == Some(&idx), "bucket node not indexed");
                prev = current;
                current = node.next;
                count += 1;
                assert!(count <= list.len, "cycle detected in frequency bucket");
            }
            assert_eq!(count, list.len, "bucket length counter out of sync");
            assert_eq!(list.tail, prev, "bucket tail link mismatch");
        }
    }
}

/// Thread-safe LFU cache with frequency aging.
///
/// # Example
///
/// ```
/// use evictkit::policy::lfu::LfuCache;
///
/// let cache = LfuCache::new(2).unwrap();
/// cache.put(1, "A");
/// cache.put(2, "B");
/// cache.get(&1);
/// cache.get(&1);
///
/// // 2 has the lowest frequency and is evicted first.
/// cache.put(3, "C");
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.get(&1), Some("A"));
/// assert_eq!(cache.get(&3), Some("C"));
/// ```
pub struct LfuCache<K, V> {
    inner: Mutex<LfuCore<K, V>>,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates an LFU cache with the default aging ceiling
    /// ([`DEFAULT_MAX_AVERAGE`]).
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        Self::with_max_avg(capacity, DEFAULT_MAX_AVERAGE)
    }

    /// Creates an LFU cache whose aging pass triggers once the average
    /// access count exceeds `max_avg`.
    pub fn with_max_avg(capacity: usize, max_avg: u64) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::invalid_argument("capacity must be greater than 0"));
        }
        if max_avg == 0 {
            return Err(CacheError::invalid_argument(
                "max average access count must be at least 1",
            ));
        }
        Ok(Self {
            inner: Mutex::new(LfuCore::new(capacity, max_avg)),
        })
    }

    /// Inserts or updates `key`. New entries start at frequency 1; at
    /// capacity the oldest entry of the lowest-frequency bucket is evicted
    /// first.
    pub fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    /// Looks `key` up, bumping its frequency on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        self.inner.lock().get(key)
    }

    /// Returns `true` without recording an access.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().index.contains_key(key)
    }

    /// Removes `key` if present; absent keys are silently ignored.
    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().remove(key)
    }

    /// Drops all entries and resets the access counters and `min_freq`.
    pub fn purge(&self) {
        self.inner.lock().purge();
    }

    /// Returns the current access count of `key`, if resident.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.inner.lock().index.len()
    }

    /// Returns `true` if no entries are resident.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().index.is_empty()
    }

    /// Returns the configured capacity.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.inner.lock().debug_validate_invariants();
    }
}

impl<K, V> CachePolicy<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn put(&self, key: K, value: V) {
        LfuCache::put(self, key, value);
    }

    fn get(&self, key: &K) -> Option<V> {
        LfuCache::get(self, key)
    }

    fn len(&self) -> usize {
        LfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        LfuCache::capacity(self)
    }
}

impl<K, V> PurgeableCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn purge(&self) {
        LfuCache::purge(self);
    }
}

impl<K, V> std::fmt::Debug for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let core = self.inner.lock();
        f.debug_struct("LfuCache")
            .field("len", &core.index.len())
            .field("capacity", &core.capacity)
            .field("min_freq", &core.min_freq)
            .finish_non_exhaustive()
    }
}

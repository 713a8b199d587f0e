//! Frequency half of the ARC engine.
//!
//! A frequency-bucketed cache like the standalone LFU engine, but without
//! the aging mechanism and with its buckets in a `BTreeMap`: the ordered
//! map makes the minimum frequency the first key, trading a logarithmic
//! factor on bucket creation for trivial minimum maintenance. Evicted
//! keys are remembered in this half's ghost list (B2).
//!
//! Shares the capacity-transfer protocol of the recency half: one unit at
//! a time, evict first when the resident set would overflow, refuse at
//! zero.

use std::collections::BTreeMap;
use std::hash::Hash;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::GhostList;

struct Node<K, V> {
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

struct State<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    free: Vec<usize>,
    index: FxHashMap<K, usize>,
    buckets: BTreeMap<u64, FreqList>,
    ghost: GhostList<K>,
    capacity: usize,
}

impl<K, V> State<K, V>
where
    K: Eq + Hash + Clone,
{
    fn alloc(&mut self, node: Node<K, V>) -> usize {
        if let Some(idx) = self.free.pop() {
            self.slots[idx] = Some(node);
            idx
        } else {
            self.slots.push(Some(node));
            self.slots.len() - 1
        }
    }

    fn bucket_push_newest(slots: &mut [Option<Node<K, V>>], list: &mut FreqList, idx: usize) {
        let old_tail = list.tail;
        {
            let node = slots[idx].as_mut().expect("frequency node missing");
            node.prev = old_tail;
            node.next = None;
        }
        if let Some(tail_idx) = old_tail {
            slots[tail_idx].as_mut().expect("frequency node missing").next = Some(idx);
        } else {
            list.head = Some(idx);
        }
        list.tail = Some(idx);
        list.len += 1;
    }

    fn bucket_detach(slots: &mut [Option<Node<K, V>>], list: &mut FreqList, idx: usize) {
        let (prev, next) = {
            let node = slots[idx].as_ref().expect("frequency node missing");
            (node.prev, node.next)
        };
        match prev {
            Some(p) => slots[p].as_mut().expect("frequency node missing").next = next,
            None => list.head = next,
        }
        match next {
            Some(n) => slots[n].as_mut().expect("frequency node missing").prev = prev,
            None => list.tail = prev,
        }
        {
            let node = slots[idx].as_mut().expect("frequency node missing");
            node.prev = None;
            node.next = None;
        }
        list.len -= 1;
    }

    fn detach_from_bucket(&mut self, idx: usize, freq: u64) {
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
    }

    /// Moves a resident node up one frequency bucket.
    fn touch(&mut self, idx: usize) {
        let freq = self.slots[idx].as_ref().expect("frequency node missing").freq;
        self.detach_from_bucket(idx, freq);
        let new_freq = freq + 1;
        self.slots[idx].as_mut().expect("frequency node missing").freq = new_freq;
        let list = self.buckets.entry(new_freq).or_default();
        Self::bucket_push_newest(&mut self.slots, list, idx);
    }

    /// Links a brand-new entry into the frequency-1 bucket.
    fn insert_new(&mut self, key: K, value: V) {
        let idx = self.alloc(Node {
            key: key.clone(),
            value,
            freq: 1,
            prev: None,
            next: None,
        });
        self.index.insert(key, idx);
        let list = self.buckets.entry(1).or_default();
        Self::bucket_push_newest(&mut self.slots, list, idx);
    }

    /// Evicts the oldest entry of the lowest frequency bucket into B2.
    fn evict_least_frequent(&mut self) {
        let Some((&freq, list)) = self.buckets.iter().next() else {
            return;
        };
        let Some(victim) = list.head else {
            return;
        };
        self.detach_from_bucket(victim, freq);
        let node = self.slots[victim].take().expect("frequency node missing");
        self.free.push(victim);
        self.index.remove(&node.key);
        self.ghost.record(node.key);
        trace!(freq, len = self.index.len(), "frequency half evicted its least frequent entry");
    }
}

/// Frequency-ordered half of ARC (T2 + B2).
pub(crate) struct ArcLfuPart<K, V> {
    state: Mutex<State<K, V>>,
}

impl<K, V> ArcLfuPart<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// `capacity` is this half's share of the resident budget;
    /// `ghost_capacity` is the full cache capacity.
    pub(crate) fn new(capacity: usize, ghost_capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                slots: Vec::with_capacity(capacity),
                free: Vec::new(),
                index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
                buckets: BTreeMap::new(),
                ghost: GhostList::new(ghost_capacity),
                capacity,
            }),
        }
    }

    /// Inserts or updates. New entries start at frequency 1; updates bump
    /// the frequency like a hit. Returns `false` when this half's
    /// capacity is currently zero.
    pub(crate) fn put(&self, key: K, value: V) -> bool {
        let mut state = self.state.lock();
        if state.capacity == 0 {
            return false;
        }
        if let Some(&idx) = state.index.get(&key) {
            state.slots[idx].as_mut().expect("frequency node missing").value = value;
            state.touch(idx);
            return true;
        }
        if state.index.len() >= state.capacity {
            state.evict_least_frequent();
        }
        state.insert_new(key, value);
        true
    }

    /// Looks `key` up, bumping its frequency on a hit.
    pub(crate) fn get(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        let &idx = state.index.get(key)?;
        state.touch(idx);
        Some(state.slots[idx].as_ref().expect("frequency node missing").value.clone())
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.state.lock().index.contains_key(key)
    }

    /// Removes `key` without recording a ghost.
    pub(crate) fn take(&self, key: &K) -> Option<V> {
        let mut state = self.state.lock();
        let idx = state.index.remove(key)?;
        let freq = state.slots[idx].as_ref().expect("frequency node missing").freq;
        state.detach_from_bucket(idx, freq);
        let node = state.slots[idx].take().expect("frequency node missing");
        state.free.push(idx);
        Some(node.value)
    }

    /// Consumes a B2 ghost; returns `true` on a ghost hit.
    pub(crate) fn check_ghost(&self, key: &K) -> bool {
        self.state.lock().ghost.remove(key)
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
            state.evict_least_frequent();
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
        state.slots.clear();
        state.free.clear();
        state.index.clear();
        state.buckets.clear();
        state.ghost.clear();
        state.capacity = capacity;
    }
}

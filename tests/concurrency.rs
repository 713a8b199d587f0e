// ==============================================
// MULTI-THREAD CORRECTNESS SMOKE TESTS
// ==============================================
//
// Every engine is internally locked: a shared instance hammered from many
// threads must stay within capacity, keep its index and lists consistent,
// and never lose an entry on a committed code path. These tests do not
// assert cross-thread ordering (the engines promise linearization, not a
// particular interleaving); they assert the invariants that survive any
// interleaving.

use std::sync::Arc;
use std::thread;

use evictkit::policy::arc::ArcCache;
use evictkit::policy::lfu::LfuCache;
use evictkit::policy::lru::LruCache;
use evictkit::policy::lru_k::LruKCache;
use evictkit::policy::sharded::{ShardedLfuCache, ShardedLruCache};

const THREADS: usize = 8;
const OPS_PER_THREAD: u32 = 2_000;

#[test]
fn lru_survives_concurrent_mixed_load() {
    let cache = Arc::new(LruCache::new(64).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    let key = (t as u32 * 31 + i) % 256;
                    match i % 4 {
                        0 | 1 => cache.put(key, i),
                        2 => {
                            cache.get(&key);
                        }
                        _ => {
                            let _ = cache.remove(&key);
                        }
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= cache.capacity());
    cache.debug_validate_invariants();
}

#[test]
fn lru_writes_from_one_thread_are_visible_to_another() {
    let cache = Arc::new(LruCache::new(128).unwrap());

    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 0..100u32 {
                cache.put(i, i * 2);
            }
        })
    };
    writer.join().unwrap();

    let reader = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 0..100u32 {
                assert_eq!(cache.get(&i), Some(i * 2));
            }
        })
    };
    reader.join().unwrap();
}

#[test]
fn lru_k_survives_concurrent_mixed_load() {
    let cache = Arc::new(LruKCache::new(64, 256, 2).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    let key = (t as u32 * 17 + i) % 128;
                    if i % 3 == 0 {
                        cache.put(key, i);
                    } else {
                        cache.get(&key);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= cache.capacity());
}

#[test]
fn lfu_survives_concurrent_mixed_load_with_aging() {
    // A low ceiling so aging passes run while other threads mutate.
    let cache = Arc::new(LfuCache::with_max_avg(32, 4).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    let key = (t as u32 + i) % 64;
                    if i % 5 == 0 {
                        cache.put(key, i);
                    } else {
                        cache.get(&key);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= cache.capacity());
    cache.debug_validate_invariants();
}

#[test]
fn arc_survives_concurrent_mixed_load() {
    let cache = Arc::new(ArcCache::new(64, 2).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..OPS_PER_THREAD {
                    let key = (t as u32 * 13 + i) % 256;
                    match i % 3 {
                        0 => cache.put(key, i),
                        1 => {
                            cache.get(&key);
                        }
                        _ => {
                            let _ = cache.remove(&key);
                        }
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= cache.capacity());
    assert_eq!(
        cache.recency_capacity() + cache.frequency_capacity(),
        cache.capacity(),
        "capacity transfers must conserve the total under contention"
    );
}

#[test]
fn sharded_lru_scales_across_threads() {
    // Per-shard capacity 256: no shard can overflow even under a skewed
    // key distribution, so every write must survive.
    let cache = Arc::new(ShardedLruCache::new(2048, 8).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                // Disjoint key ranges: every thread's writes must survive.
                let base = t as u32 * 32;
                for i in 0..32u32 {
                    cache.put(base + i, base + i);
                }
                for i in 0..32u32 {
                    assert_eq!(cache.get(&(base + i)), Some(base + i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), THREADS * 32);
}

#[test]
fn sharded_lfu_purge_races_with_writers() {
    let cache = Arc::new(ShardedLfuCache::new(256, 4).unwrap());

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..1_000u32 {
                    cache.put(t * 1_000 + i, i);
                }
            })
        })
        .collect();
    let purger = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for _ in 0..50 {
                cache.purge();
            }
        })
    };

    for handle in writers {
        handle.join().unwrap();
    }
    purger.join().unwrap();

    // purge() is not a snapshot; all that holds afterwards is the
    // capacity bound and internal consistency.
    assert!(cache.len() <= cache.capacity());
    cache.purge();
    assert!(cache.is_empty());
}

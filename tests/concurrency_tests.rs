//! Concurrency Tests
//!
//! Many tasks hammer one engine and one coordinator; the structural
//! invariants must hold once they all finish.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use redis_proxy::{cache::CacheEngine, store::MemoryStore, Origin, ReadThrough};
use tokio::sync::RwLock;

const TASKS: usize = 32;
const OPS_PER_TASK: usize = 200;
const KEYS: usize = 16;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_engine_invariants_hold_under_contention() {
    let capacity = 5;
    let engine = Arc::new(RwLock::new(CacheEngine::new(capacity, Duration::from_secs(300))));

    let handles: Vec<_> = (0..TASKS)
        .map(|task| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                for i in 0..OPS_PER_TASK {
                    let key = format!("k{}", (task * 7 + i) % KEYS);
                    let mut guard = engine.write().await;
                    match i % 3 {
                        0 => {
                            guard.insert(key.clone(), Bytes::from(key));
                        }
                        1 => {
                            guard.lookup(&key);
                        }
                        _ => {
                            guard.remove(&key);
                        }
                    }
                    assert!(guard.size() <= capacity);
                    drop(guard);
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.expect("task panicked");
    }

    let engine = engine.read().await;
    assert!(engine.is_consistent());
    assert!(engine.size() <= capacity);

    let keys = engine.keys();
    let mut unique = keys.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), keys.len(), "duplicate keys in recency order");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolves_return_store_values() {
    let store = Arc::new(MemoryStore::with_entries(
        (0..KEYS).map(|i| (format!("k{}", i), format!("v{}", i))),
    ));
    let proxy = ReadThrough::new(CacheEngine::new(4, Duration::from_secs(300)), store.clone());

    let handles: Vec<_> = (0..TASKS)
        .map(|task| {
            let proxy = proxy.clone();
            tokio::spawn(async move {
                for i in 0..OPS_PER_TASK {
                    let n = (task + i) % (KEYS + 2);
                    let key = format!("k{}", n);
                    let resolved = proxy.resolve(&key).await;

                    if n < KEYS {
                        assert_eq!(resolved.value, Bytes::from(format!("v{}", n)));
                        assert_ne!(resolved.origin, Origin::Absent);
                    } else {
                        assert_eq!(resolved.origin, Origin::Absent);
                    }
                    if i % 10 == 0 {
                        proxy.invalidate(&key).await;
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.expect("task panicked");
    }

    {
        let engine = proxy.engine().read().await;
        assert!(engine.is_consistent());
        assert!(engine.size() <= 4);
    }

    let stats = proxy.stats().await;
    assert_eq!(
        stats.cache.lookups(),
        (TASKS * OPS_PER_TASK) as u64,
        "every resolve performs exactly one engine lookup"
    );
    assert_eq!(stats.store_fetches, store.get_count());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_key_misses_may_both_fetch() {
    let store = Arc::new(MemoryStore::with_entries([("hot", "value")]));
    let proxy = ReadThrough::new(CacheEngine::new(10, Duration::from_secs(300)), store.clone());

    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let proxy = proxy.clone();
            tokio::spawn(async move { proxy.resolve("hot").await })
        })
        .collect();

    for handle in handles {
        let resolved = handle.await.expect("task panicked");
        assert_eq!(resolved.value, Bytes::from("value"));
    }

    // No request coalescing: at least one fetch, at most one per task, and
    // a single cached entry either way
    let fetches = store.get_count();
    assert!(fetches >= 1 && fetches <= TASKS as u64);
    assert_eq!(proxy.size().await, 1);
    assert_eq!(proxy.resolve("hot").await.origin, Origin::Cache);
}

//! Read-Through Coordinator
//!
//! Couples the cache engine to the backing store: lookups fall back to the
//! store on miss or expiry, and fetched values are cached on the way out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn, Level};

use crate::cache::{CacheEngine, CacheStats, Lookup};
use crate::error::{ProxyError, Result};
use crate::store::BackingStore;

// == Origin ==
/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Fresh entry in the cache
    Cache,
    /// Fetched from the backing store
    Store,
    /// Neither had it, or the store could not be reached
    Absent,
}

/// Answer to a single-key lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: Bytes,
    pub origin: Origin,
}

impl Resolved {
    fn absent() -> Self {
        Self {
            value: Bytes::new(),
            origin: Origin::Absent,
        }
    }
}

#[derive(Debug, Default)]
struct StoreCounters {
    fetches: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
}

// == Proxy Stats ==
/// Engine counters plus backing store traffic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProxyStats {
    pub cache: CacheStats,
    /// GETs sent to the store
    pub store_fetches: u64,
    /// GETs the store answered with no value
    pub store_misses: u64,
    /// GETs that failed and were answered as absent
    pub store_errors: u64,
}

// == Read Through ==
/// Resolves keys through the cache, falling back to the backing store.
///
/// The engine lock is never held across a store call: a miss releases the
/// lock, queries the store, then re-acquires it to insert. Two concurrent
/// misses on the same key therefore both reach the store; whichever insert
/// lands last becomes the cached entry.
#[derive(Clone)]
pub struct ReadThrough {
    engine: Arc<RwLock<CacheEngine>>,
    store: Arc<dyn BackingStore>,
    counters: Arc<StoreCounters>,
}

impl ReadThrough {
    // == Constructor ==
    pub fn new(engine: CacheEngine, store: Arc<dyn BackingStore>) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            store,
            counters: Arc::new(StoreCounters::default()),
        }
    }

    pub fn engine(&self) -> &Arc<RwLock<CacheEngine>> {
        &self.engine
    }

    // == Resolve ==
    /// Answers `key` from the cache or, failing that, from the store.
    ///
    /// Store failures are logged and reported as [`Origin::Absent`]; they
    /// never surface as errors. The store is tried at most once.
    pub async fn resolve(&self, key: &str) -> Resolved {
        let lookup = self.engine.write().await.lookup(key);
        match lookup {
            Lookup::Hit(value) => {
                debug!(key, "Served from cache");
                return Resolved {
                    value,
                    origin: Origin::Cache,
                };
            }
            Lookup::Expired => debug!(key, "Cached entry expired"),
            Lookup::Miss => debug!(key, "Cache miss"),
        }

        self.counters.fetches.fetch_add(1, Ordering::Relaxed);
        match self.store.get(key).await {
            Ok(Some(value)) => {
                self.cache(key, value.clone()).await;
                Resolved {
                    value,
                    origin: Origin::Store,
                }
            }
            Ok(None) => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key, "Store has no value");
                Resolved::absent()
            }
            Err(err) => {
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
                warn!(key, error = %err, "Store lookup failed, answering with no value");
                Resolved::absent()
            }
        }
    }

    // == Write Through ==
    /// Writes `value` to the store, then caches it.
    ///
    /// The cache is only updated once the store has accepted the write.
    pub async fn write_through(&self, key: &str, value: Bytes) -> Result<()> {
        if key.is_empty() {
            return Err(ProxyError::InvalidRequest("Key cannot be empty".to_string()));
        }

        self.store.set(key, value.clone()).await?;
        self.cache(key, value).await;
        Ok(())
    }

    // == Invalidate ==
    /// Drops the cached entry for `key`. The store is left untouched.
    pub async fn invalidate(&self, key: &str) -> bool {
        self.engine.write().await.remove(key)
    }

    /// Number of cached entries, expired-but-untouched ones included.
    pub async fn size(&self) -> usize {
        self.engine.read().await.size()
    }

    // == Stats ==
    pub async fn stats(&self) -> ProxyStats {
        let cache = self.engine.read().await.stats();
        ProxyStats {
            cache,
            store_fetches: self.counters.fetches.load(Ordering::Relaxed),
            store_misses: self.counters.misses.load(Ordering::Relaxed),
            store_errors: self.counters.errors.load(Ordering::Relaxed),
        }
    }

    async fn cache(&self, key: &str, value: Bytes) {
        let mut engine = self.engine.write().await;
        if let Some(evicted) = engine.insert(key, value) {
            debug!(key = %evicted, "Evicted least recently used entry");
        }
        if tracing::enabled!(Level::TRACE) {
            trace!(contents = ?engine.keys(), "Cache contents, most recent first");
        }
    }
}

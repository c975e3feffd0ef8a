//! Cache Statistics Module
//!
//! Tracks engine metrics: hits, misses, lazy expirations and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Counters maintained by the cache engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups for keys that were not cached
    pub misses: u64,
    /// Lookups that found an entry past its TTL (and purged it)
    pub expirations: u64,
    /// Entries dropped from the tail to respect capacity
    pub evictions: u64,
    /// Current number of entries, expired-but-untouched ones included
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Expired lookups count against the rate. Returns 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total lookups seen by the engine.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses + self.expirations
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

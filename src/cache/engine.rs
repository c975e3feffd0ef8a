//! Cache Engine Module
//!
//! Bounded key-value store combining a hash index with an LRU ordering list
//! and lazy TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;

use crate::cache::{CacheEntry, CacheStats, LruList};

// == Lookup ==
/// Outcome of a single engine lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Entry present and fresh; it is now the most recently used
    Hit(Bytes),
    /// Entry was present but past its TTL and has been purged
    Expired,
    /// No entry for the key
    Miss,
}

impl Lookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }
}

// == Cache Engine ==
/// Fixed-capacity LRU cache with per-entry expiry.
///
/// Expiry is lazy: an entry past its TTL is only purged when a lookup
/// touches it. There is no background sweeper, so [`CacheEngine::size`] may
/// count entries that are already logically dead.
///
/// The engine itself is not synchronized. Callers share it behind a single
/// lock, because `lookup` mutates recency order and may purge entries.
#[derive(Debug)]
pub struct CacheEngine {
    /// Key to list slot
    index: HashMap<String, usize>,
    /// Entries in recency order
    order: LruList<CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of live entries
    capacity: usize,
    /// Maximum age of a servable entry
    ttl: Duration,
}

impl CacheEngine {
    // == Constructor ==
    /// Creates an engine holding at most `capacity` entries for `ttl` each.
    ///
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = capacity.max(1);
        Self {
            index: HashMap::with_capacity(capacity),
            order: LruList::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            ttl,
        }
    }

    // == Lookup ==
    /// Looks a key up, promoting it on a hit and purging it if expired.
    ///
    /// The empty key is never stored and always misses.
    pub fn lookup(&mut self, key: &str) -> Lookup {
        let Some(&slot) = self.index.get(key) else {
            self.stats.record_miss();
            return Lookup::Miss;
        };

        let expired = self
            .order
            .get(slot)
            .map(|entry| entry.is_expired(self.ttl))
            .unwrap_or(true);

        if expired {
            self.unlink(key);
            self.stats.record_expiration();
            return Lookup::Expired;
        }

        self.order.move_to_front(slot);
        self.stats.record_hit();
        match self.order.get(slot) {
            Some(entry) => Lookup::Hit(entry.value.clone()),
            None => Lookup::Miss,
        }
    }

    // == Insert ==
    /// Caches `value` under `key` as the most recently used entry.
    ///
    /// Re-inserting an existing key replaces its value, promotes it and
    /// restarts its TTL without consuming a new slot. If the insertion
    /// pushes the engine over capacity, the least recently used entry is
    /// evicted and its key returned. Empty keys are ignored.
    pub fn insert(&mut self, key: impl Into<String>, value: Bytes) -> Option<String> {
        let key = key.into();
        if key.is_empty() {
            return None;
        }

        if let Some(&slot) = self.index.get(&key) {
            if let Some(entry) = self.order.get_mut(slot) {
                *entry = CacheEntry::new(key, value);
            }
            self.order.move_to_front(slot);
            return None;
        }

        let slot = self.order.push_front(CacheEntry::new(key.clone(), value));
        self.index.insert(key, slot);

        let evicted = if self.index.len() > self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        self.stats.set_total_entries(self.index.len());
        evicted
    }

    // == Remove ==
    /// Drops the entry for `key`. Returns whether one was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.unlink(key);
        self.stats.set_total_entries(self.index.len());
        removed
    }

    // == Size ==
    /// Number of stored entries.
    ///
    /// This is an upper bound on the number of servable entries: expired
    /// entries are only purged when a lookup discovers them.
    pub fn size(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Keys ==
    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.order.iter().map(|entry| entry.key.clone()).collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    // == Consistency ==
    /// Verifies that the index and the ordering list describe the same
    /// set of keys and that the capacity bound holds.
    pub fn is_consistent(&self) -> bool {
        if self.index.len() != self.order.len() || self.index.len() > self.capacity {
            return false;
        }
        self.index.iter().all(|(key, &slot)| {
            self.order
                .get(slot)
                .map(|entry| &entry.key == key)
                .unwrap_or(false)
        })
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let slot = self.order.tail()?;
        let entry = self.order.remove(slot)?;
        self.index.remove(&entry.key);
        self.stats.record_eviction();
        Some(entry.key)
    }

    fn unlink(&mut self, key: &str) -> bool {
        match self.index.remove(key) {
            Some(slot) => {
                self.order.remove(slot);
                true
            }
            None => false,
        }
    }
}

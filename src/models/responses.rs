//! Response DTOs for the proxy API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::proxy::{Origin, ProxyStats, Resolved};

/// Response body for a lookup (GET /)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The resolved value, empty when absent
    pub value: String,
    /// Where the value came from
    pub origin: Origin,
}

impl GetResponse {
    /// Builds the response from a resolved lookup.
    ///
    /// Values are rendered as text; bytes that are not valid UTF-8 are
    /// replaced with U+FFFD.
    pub fn new(key: impl Into<String>, resolved: &Resolved) -> Self {
        Self {
            key: key.into(),
            value: String::from_utf8_lossy(&resolved.value).into_owned(),
            origin: resolved.origin,
        }
    }
}

/// Response body for a write-through (PUT /)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was written
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' written through to store", key),
            key,
        }
    }
}

/// Response body for a cache invalidation (DELETE /)
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
    pub key: String,
    /// Whether a cached entry was dropped
    pub removed: bool,
}

impl InvalidateResponse {
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        let key = key.into();
        let message = if removed {
            format!("Key '{}' evicted from cache", key)
        } else {
            format!("Key '{}' was not cached", key)
        };
        Self {
            message,
            key,
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of lookups for uncached keys
    pub misses: u64,
    /// Number of lookups that found an expired entry
    pub expirations: u64,
    /// Number of capacity evictions
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Configured capacity
    pub capacity: usize,
    /// GETs forwarded to the store
    pub store_fetches: u64,
    /// Store GETs with no value
    pub store_misses: u64,
    /// Store GETs that failed
    pub store_errors: u64,
    /// Hit rate (hits / lookups)
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: &ProxyStats, capacity: usize) -> Self {
        Self {
            hits: stats.cache.hits,
            misses: stats.cache.misses,
            expirations: stats.cache.expirations,
            evictions: stats.cache.evictions,
            total_entries: stats.cache.total_entries,
            capacity,
            store_fetches: stats.store_fetches,
            store_misses: stats.store_misses,
            store_errors: stats.store_errors,
            hit_rate: stats.cache.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with age tracking.

use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cached record.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Key the entry is indexed under
    pub key: String,
    /// The cached value
    pub value: Bytes,
    /// Insertion time; reset on every re-insertion
    pub created_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(key: String, value: Bytes) -> Self {
        Self {
            key,
            value,
            created_at: Instant::now(),
        }
    }

    // == Age ==
    /// Time elapsed since the entry was inserted.
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.created_at)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry is expired once its age is greater than
    /// or equal to `ttl`, so a zero TTL never yields a hit.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: &'static str) -> CacheEntry {
        CacheEntry::new("key".to_string(), Bytes::from_static(value.as_bytes()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_creation() {
        let entry = entry("test_value");

        assert_eq!(entry.key, "key");
        assert_eq!(entry.value, Bytes::from_static(b"test_value"));
        assert_eq!(entry.age(), Duration::ZERO);
        assert!(!entry.is_expired(Duration::from_secs(60)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expiration() {
        let entry = entry("test_value");
        let ttl = Duration::from_secs(1);

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(!entry.is_expired(ttl));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(entry.is_expired(ttl));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_is_always_expired() {
        let entry = entry("test_value");
        assert!(entry.is_expired(Duration::ZERO));
    }
}

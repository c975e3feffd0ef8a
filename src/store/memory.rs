//! In-memory store.
//!
//! Stands in for Redis in tests and local runs. Reachability can be toggled
//! to exercise the degraded path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;
use crate::store::BackingStore;

/// [`BackingStore`] over a local map.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Bytes>>,
    reachable: AtomicBool,
    gets: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            reachable: AtomicBool::new(true),
            gets: AtomicU64::new(0),
        }
    }

    /// Creates a store pre-filled with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Bytes>,
    {
        let store = Self::new();
        if let Ok(mut map) = store.entries.write() {
            map.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        store
    }

    /// Makes every subsequent call fail as if the store were down.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Number of `get` calls received, failed ones included.
    pub fn get_count(&self) -> u64 {
        self.gets.load(Ordering::SeqCst)
    }

    fn check_reachable(&self) -> Result<(), StoreError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Io(std::io::ErrorKind::ConnectionRefused.into()))
        }
    }

    fn poisoned() -> StoreError {
        StoreError::Server("memory store lock poisoned".into())
    }
}

#[async_trait]
impl BackingStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<(), StoreError> {
        self.check_reachable()?;
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_and_set() {
        let store = MemoryStore::with_entries([("k1", "v1")]);

        assert_eq!(store.get("k1").await.unwrap(), Some(Bytes::from("v1")));
        assert_eq!(store.get("k2").await.unwrap(), None);

        store.set("k2", Bytes::from("v2")).await.unwrap();
        assert_eq!(store.get("k2").await.unwrap(), Some(Bytes::from("v2")));
        assert_eq!(store.get_count(), 3);
    }

    #[tokio::test]
    async fn test_unreachable() {
        let store = MemoryStore::with_entries([("k1", "v1")]);
        store.set_reachable(false);

        assert!(matches!(store.get("k1").await, Err(StoreError::Io(_))));
        assert!(store.set("k1", Bytes::from("v")).await.is_err());

        store.set_reachable(true);
        assert!(store.get("k1").await.is_ok());
    }
}

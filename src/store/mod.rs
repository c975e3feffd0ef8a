//! Backing Store Module
//!
//! The remote key-value store the proxy reads through to, plus the
//! implementations of it: Redis over a pooled connection, and an in-memory
//! map for tests and local runs.

mod memory;
mod pool;
mod redis;
pub mod resp;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

pub use memory::MemoryStore;
pub use pool::{ConnectionPool, PooledConnection};
pub use redis::RedisStore;

// == Backing Store ==
/// Single-key access to the store behind the cache.
#[async_trait]
pub trait BackingStore: Send + Sync + 'static {
    /// Fetches `key`. `Ok(None)` means the store has no value for it.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    /// Writes `value` under `key`.
    async fn set(&self, key: &str, value: Bytes) -> Result<(), StoreError>;
}

//! Cache Module
//!
//! Provides the bounded in-process cache: LRU eviction and lazy TTL expiration.

mod engine;
mod entry;
mod lru;
mod stats;


// Re-export public types
pub use engine::{CacheEngine, Lookup};
pub use entry::CacheEntry;
pub use lru::LruList;
pub use stats::CacheStats;

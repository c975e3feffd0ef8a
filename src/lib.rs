//! Redis Proxy - A read-through caching proxy
//!
//! Serves single-key lookups from a bounded in-process LRU cache with lazy
//! TTL expiry, falling back to a Redis backing store on miss.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod store;

pub use api::AppState;
pub use config::Config;
pub use proxy::{Origin, ReadThrough, Resolved};

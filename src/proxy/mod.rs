//! Proxy Module
//!
//! Read-through coordination between the cache engine and the backing store.

mod coordinator;

pub use coordinator::{Origin, ProxyStats, ReadThrough, Resolved};

//! API Module
//!
//! HTTP handlers and routing for the proxy.
//!
//! # Endpoints
//! - `GET /` or `GET /get` - Resolve the key in the `key` header
//! - `PUT /` - Write a value through to the store
//! - `DELETE /` - Drop a key from the cache
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

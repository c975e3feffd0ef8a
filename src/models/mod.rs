//! Request and Response models for the proxy API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! extracting requests and serializing HTTP response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{KeyHeader, KEY_HEADER};
pub use responses::{GetResponse, HealthResponse, InvalidateResponse, SetResponse, StatsResponse};

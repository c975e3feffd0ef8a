//! Error types for the caching proxy
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Config Error ==
/// Startup configuration failures. These are fatal: the server never starts.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A setting is present but unusable
    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

// == Store Error ==
/// Failures talking to the backing store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection could not be opened, or broke mid-request
    #[error("store unreachable: {0}")]
    Io(#[from] std::io::Error),

    /// Reply did not follow the wire protocol
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Store answered with an error reply
    #[error("store error: {0}")]
    Server(String),

    /// Every pooled connection stayed busy for the whole wait
    #[error("no store connection available after {0:?}")]
    PoolTimeout(Duration),

    /// Pool has been shut down
    #[error("connection pool closed")]
    Closed,
}

impl StoreError {
    /// Whether the connection that produced this error must be discarded.
    pub fn breaks_connection(&self) -> bool {
        matches!(self, StoreError::Io(_) | StoreError::Protocol(_))
    }
}

// == Proxy Error ==
/// Errors surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backing store rejected or failed a write
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Store(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;

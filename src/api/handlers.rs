//! API Handlers
//!
//! HTTP request handlers for each proxy endpoint.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use tracing::info;

use crate::cache::CacheEngine;
use crate::config::Config;
use crate::error::Result;
use crate::models::{GetResponse, HealthResponse, InvalidateResponse, KeyHeader, SetResponse, StatsResponse};
use crate::proxy::ReadThrough;
use crate::store::BackingStore;

/// Application state shared across all handlers.
///
/// The coordinator owns the engine lock and the store handle; cloning the
/// state only clones `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub proxy: ReadThrough,
}

impl AppState {
    pub fn new(proxy: ReadThrough) -> Self {
        Self { proxy }
    }

    /// Creates a new AppState from configuration, reading through to `store`.
    pub fn from_config(config: &Config, store: Arc<dyn BackingStore>) -> Self {
        let engine = CacheEngine::new(config.capacity, config.ttl);
        Self::new(ReadThrough::new(engine, store))
    }
}

/// Handler for GET / and GET /get
///
/// Resolves the key named by the `key` header. Always answers 200: a value
/// the proxy could not find, or could not fetch, comes back empty with
/// origin `absent`.
pub async fn get_handler(State(state): State<AppState>, key: KeyHeader) -> Json<GetResponse> {
    let resolved = state.proxy.resolve(key.as_str()).await;
    Json(GetResponse::new(key.0, &resolved))
}

/// Handler for PUT /
///
/// Writes the request body to the store under the `key` header, then caches it.
pub async fn set_handler(
    State(state): State<AppState>,
    key: KeyHeader,
    body: Bytes,
) -> Result<Json<SetResponse>> {
    state.proxy.write_through(key.as_str(), body).await?;
    info!(key = key.as_str(), "Value written through");

    Ok(Json(SetResponse::new(key.0)))
}

/// Handler for DELETE /
///
/// Drops the cached entry for the `key` header. The store keeps its value.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    key: KeyHeader,
) -> Json<InvalidateResponse> {
    let removed = state.proxy.invalidate(key.as_str()).await;
    Json(InvalidateResponse::new(key.0, removed))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.proxy.stats().await;
    let capacity = state.proxy.engine().read().await.capacity();

    Json(StatsResponse::new(&stats, capacity))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

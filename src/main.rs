//! Redis Proxy - A read-through caching proxy
//!
//! Boots the HTTP front end over the cache engine and the Redis store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redis_proxy::api::{create_router, AppState};
use redis_proxy::store::{ConnectionPool, RedisStore};
use redis_proxy::Config;

/// Main entry point for the caching proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables (fatal if invalid)
/// 3. Create the store connection pool and check the store answers
/// 4. Create the cache engine and read-through coordinator
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redis_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Redis caching proxy");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: redis={}, capacity={}, ttl={}s, max_connections={}, port={}",
        config.redis_address,
        config.capacity,
        config.ttl.as_secs(),
        config.max_connections,
        config.server_port
    );

    let pool = ConnectionPool::new(
        config.redis_address.clone(),
        config.max_connections,
        config.pool_timeout,
    )
    .with_idle_timeout(config.pool_idle_timeout);
    let store = Arc::new(RedisStore::new(pool));

    // An unreachable store is not fatal: lookups degrade to absent until it returns
    match store.ping().await {
        Ok(()) => info!("Backing store reachable at {}", config.redis_address),
        Err(err) => warn!("Backing store not reachable yet: {}", err),
    }

    let state = AppState::from_config(&config, store.clone());
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Proxy listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    store.pool().close();
    info!("Proxy shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}

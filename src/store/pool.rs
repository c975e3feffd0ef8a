//! Connection Pool Module
//!
//! Bounded pool of store connections. A semaphore caps the number of
//! connections checked out at once; idle connections are kept for reuse
//! until they sit unused for longer than the idle timeout.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;
use tracing::debug;

use crate::error::StoreError;
use crate::store::resp::{RedisConnection, RespValue};

/// How long a parked connection may stay unused before it is closed.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// A parked connection and when it was returned.
#[derive(Debug)]
struct IdleConnection {
    conn: RedisConnection,
    parked_at: Instant,
}

type IdleList = Arc<Mutex<Vec<IdleConnection>>>;

// == Connection Pool ==
/// Fixed-size pool of lazily dialed connections.
#[derive(Debug)]
pub struct ConnectionPool {
    address: String,
    permits: Arc<Semaphore>,
    idle: IdleList,
    acquire_timeout: Duration,
    idle_timeout: Duration,
}

impl ConnectionPool {
    // == Constructor ==
    /// Creates a pool for `address` allowing `max_connections` concurrent
    /// checkouts. Waiting for a connection gives up after `acquire_timeout`.
    pub fn new(address: impl Into<String>, max_connections: usize, acquire_timeout: Duration) -> Self {
        let max_connections = max_connections.max(1);
        Self {
            address: address.into(),
            permits: Arc::new(Semaphore::new(max_connections)),
            idle: Arc::new(Mutex::new(Vec::with_capacity(max_connections))),
            acquire_timeout,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Sets how long an idle connection is kept before being closed.
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Connections not currently checked out.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Connections parked in the idle list.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().map(|idle| idle.len()).unwrap_or(0)
    }

    // == Get ==
    /// Borrows a connection, waiting for one to free up if the pool is
    /// exhausted. The connection goes back to the pool when the returned
    /// guard is dropped.
    pub async fn get(&self) -> Result<PooledConnection, StoreError> {
        let permit = tokio::time::timeout(self.acquire_timeout, Arc::clone(&self.permits).acquire_owned())
            .await
            .map_err(|_| StoreError::PoolTimeout(self.acquire_timeout))?
            .map_err(|_| StoreError::Closed)?;

        let conn = match self.take_idle() {
            Some(conn) => conn,
            None => {
                debug!("Dialing new store connection to {}", self.address);
                RedisConnection::connect(&self.address).await?
            }
        };

        Ok(PooledConnection {
            conn: Some(conn),
            idle: Arc::clone(&self.idle),
            broken: false,
            _permit: permit,
        })
    }

    /// Pops the most recently parked connection that is still fresh.
    /// Connections sitting idle for `idle_timeout` or longer are closed.
    fn take_idle(&self) -> Option<RedisConnection> {
        let mut idle = self.idle.lock().ok()?;
        while let Some(parked) = idle.pop() {
            let unused_for = parked.parked_at.elapsed();
            if unused_for < self.idle_timeout {
                return Some(parked.conn);
            }
            debug!("Closing store connection idle for {:?}", unused_for);
        }
        None
    }

    /// Stops handing out connections. Pending and future `get` calls fail.
    pub fn close(&self) {
        self.permits.close();
        if let Ok(mut idle) = self.idle.lock() {
            idle.clear();
        }
    }
}

// == Pooled Connection ==
/// A connection on loan from a [`ConnectionPool`].
///
/// Dropping the guard returns the connection, unless it failed with an
/// error that leaves the stream in an unknown state or was dropped while a
/// command was still in flight. Such connections are closed instead.
#[derive(Debug)]
pub struct PooledConnection {
    conn: Option<RedisConnection>,
    idle: IdleList,
    broken: bool,
    _permit: OwnedSemaphorePermit,
}

impl PooledConnection {
    /// Runs one command on the borrowed connection.
    pub async fn execute(&mut self, args: &[&[u8]]) -> Result<RespValue, StoreError> {
        let Some(conn) = self.conn.as_mut() else {
            return Err(StoreError::Closed);
        };

        // Stays set if this future is dropped before the reply is read
        self.broken = true;
        let reply = conn.execute(args).await;
        self.broken = match &reply {
            Ok(_) => false,
            Err(err) => err.breaks_connection(),
        };
        reply
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        if self.broken {
            debug!("Discarding broken store connection");
            return;
        }
        if let Ok(mut idle) = self.idle.lock() {
            idle.push(IdleConnection {
                conn,
                parked_at: Instant::now(),
            });
        }
    }
}

//! Redis-backed store.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;
use crate::store::resp::RespValue;
use crate::store::{BackingStore, ConnectionPool};

/// [`BackingStore`] talking to a Redis server through a [`ConnectionPool`].
#[derive(Debug)]
pub struct RedisStore {
    pool: ConnectionPool,
}

impl RedisStore {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Round-trips a `PING` to check the server is reachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        match conn.execute(&[b"PING"]).await? {
            RespValue::Simple(reply) if reply == "PONG" => Ok(()),
            other => Err(unexpected("PING", other)),
        }
    }
}

#[async_trait]
impl BackingStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let mut conn = self.pool.get().await?;
        match conn.execute(&[b"GET", key.as_bytes()]).await? {
            RespValue::Bulk(value) => Ok(value),
            other => Err(unexpected("GET", other)),
        }
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        match conn.execute(&[b"SET", key.as_bytes(), &value[..]]).await? {
            RespValue::Simple(reply) if reply == "OK" => Ok(()),
            other => Err(unexpected("SET", other)),
        }
    }
}

fn unexpected(command: &str, reply: RespValue) -> StoreError {
    match reply {
        RespValue::Error(message) => StoreError::Server(message),
        other => StoreError::Protocol(format!("unexpected reply to {command}: {other:?}")),
    }
}

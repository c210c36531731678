//! Redis-backed rate store.
//!
//! The snapshot lives as a JSON value under a single fixed key
//! (`cryptoRates`), written with `SET ... EX` so Redis owns expiry. A
//! payload that fails to deserialize is treated as a cache miss and
//! deleted.

use std::time::Duration;

use async_trait::async_trait;
use exchange_types::{RateSnapshot, RateStore, StoreError};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

/// Fixed cache key for the whole-snapshot slot.
pub const DEFAULT_CACHE_KEY: &str = "cryptoRates";

/// Rate store backed by a Redis instance.
///
/// `ConnectionManager` handles reconnects and is cheap to clone per
/// operation.
pub struct RedisRateStore {
    connection: ConnectionManager,
    key: String,
}

impl RedisRateStore {
    /// Connect with the default cache key.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        Self::connect_with_key(url, DEFAULT_CACHE_KEY).await
    }

    /// Connect with a custom cache key (used by integration tests to
    /// isolate themselves from a shared instance).
    pub async fn connect_with_key(url: &str, key: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        Ok(Self {
            connection,
            key: key.into(),
        })
    }
}

#[async_trait]
impl RateStore for RedisRateStore {
    async fn get(&self) -> Result<Option<RateSnapshot>, StoreError> {
        let mut conn = self.connection.clone();

        let payload: Option<String> = conn
            .get(&self.key)
            .await
            .map_err(|e| StoreError::new(e.to_string()))?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        match serde_json::from_str::<RateSnapshot>(&payload) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                // Corrupted payload: drop it and report a miss.
                tracing::warn!(error = %e, key = %self.key, "discarding unreadable cached snapshot");
                let _: () = conn
                    .del(&self.key)
                    .await
                    .map_err(|e| StoreError::new(e.to_string()))?;
                Ok(None)
            }
        }
    }

    async fn put(&self, snapshot: &RateSnapshot, ttl: Duration) -> Result<(), StoreError> {
        let payload =
            serde_json::to_string(snapshot).map_err(|e| StoreError::new(e.to_string()))?;

        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(&self.key, payload, ttl.as_secs())
            .await
            .map_err(|e| StoreError::new(e.to_string()))
    }

    async fn delete(&self) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(&self.key)
            .await
            .map_err(|e| StoreError::new(e.to_string()))
    }
}

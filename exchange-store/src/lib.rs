//! # Exchange Store
//!
//! Concrete cache store implementations (adapters) for the crypto exchange
//! service. This crate provides backends that implement the `RateStore` port:
//! Redis for deployments, an in-memory slot for tests and examples.

#[cfg(not(any(feature = "redis", feature = "memory")))]
compile_error!("Enable a store feature: `redis` or `memory`.");

use std::time::Duration;

use async_trait::async_trait;
use exchange_types::{RateSnapshot, RateStore, StoreError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis_store;

#[cfg(feature = "memory")]
pub use memory::InMemoryRateStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisRateStore;

/// Unified store wrapper selected by feature flag.
pub struct Store {
    #[cfg(all(feature = "memory", not(feature = "redis")))]
    inner: memory::InMemoryRateStore,
    #[cfg(feature = "redis")]
    inner: redis_store::RedisRateStore,
}

/// Build and initialize a rate store from a connection URL.
///
/// # Examples
///
/// ```ignore
/// // Redis (with `redis` feature)
/// let store = build_store("redis://127.0.0.1:6379").await?;
///
/// // In-memory (with `memory` feature; the URL is ignored)
/// let store = build_store("").await?;
/// ```
pub async fn build_store(url: &str) -> anyhow::Result<Store> {
    Store::new(url).await
}

impl Store {
    #[cfg(all(feature = "memory", not(feature = "redis")))]
    pub async fn new(_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            inner: memory::InMemoryRateStore::new(),
        })
    }

    #[cfg(feature = "redis")]
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let inner = redis_store::RedisRateStore::connect(url).await?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl RateStore for Store {
    async fn get(&self) -> Result<Option<RateSnapshot>, StoreError> {
        self.inner.get().await
    }

    async fn put(&self, snapshot: &RateSnapshot, ttl: Duration) -> Result<(), StoreError> {
        self.inner.put(snapshot, ttl).await
    }

    async fn delete(&self) -> Result<(), StoreError> {
        self.inner.delete().await
    }
}

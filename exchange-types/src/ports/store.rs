//! Rate cache store port.
//!
//! A key/value store holding at most one snapshot under a single fixed key,
//! with store-managed TTL expiry.

use std::time::Duration;

use crate::domain::RateSnapshot;
use crate::error::StoreError;

/// Port trait for the snapshot cache.
///
/// Get and set are assumed atomic at single-key granularity; writes always
/// replace the whole snapshot, so no compare-and-swap is needed. Concurrent
/// writers are last-write-wins.
#[async_trait::async_trait]
pub trait RateStore: Send + Sync + 'static {
    /// Read the cached snapshot, if present and not expired.
    async fn get(&self) -> Result<Option<RateSnapshot>, StoreError>;

    /// Replace the cached snapshot, expiring it after `ttl`.
    async fn put(&self, snapshot: &RateSnapshot, ttl: Duration) -> Result<(), StoreError>;

    /// Drop the cached snapshot. The core only uses this in test teardown.
    async fn delete(&self) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S: RateStore> RateStore for std::sync::Arc<S> {
    async fn get(&self) -> Result<Option<RateSnapshot>, StoreError> {
        (**self).get().await
    }

    async fn put(&self, snapshot: &RateSnapshot, ttl: Duration) -> Result<(), StoreError> {
        (**self).put(snapshot, ttl).await
    }

    async fn delete(&self) -> Result<(), StoreError> {
        (**self).delete().await
    }
}

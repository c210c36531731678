//! In-memory rate store with TTL, for tests and single-process runs.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use exchange_types::{RateSnapshot, RateStore, StoreError};

#[derive(Debug, Clone)]
struct CachedEntry {
    snapshot: RateSnapshot,
    expires_at: Instant,
}

impl CachedEntry {
    fn new(snapshot: RateSnapshot, ttl: Duration) -> Self {
        Self {
            snapshot,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Single-slot snapshot cache backed by process memory.
///
/// Holds at most one snapshot, mirroring the Redis adapter's single fixed
/// key. Expiry is checked lazily on read.
pub struct InMemoryRateStore {
    slot: Mutex<Option<CachedEntry>>,
}

impl InMemoryRateStore {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl Default for InMemoryRateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateStore for InMemoryRateStore {
    async fn get(&self) -> Result<Option<RateSnapshot>, StoreError> {
        let mut slot = self.slot.lock().unwrap();
        match slot.as_ref() {
            Some(entry) if entry.is_valid() => Ok(Some(entry.snapshot.clone())),
            Some(_) => {
                tracing::debug!("cached snapshot expired");
                *slot = None;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, snapshot: &RateSnapshot, ttl: Duration) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().unwrap();
        *slot = Some(CachedEntry::new(snapshot.clone(), ttl));
        Ok(())
    }

    async fn delete(&self) -> Result<(), StoreError> {
        let mut slot = self.slot.lock().unwrap();
        *slot = None;
        Ok(())
    }
}

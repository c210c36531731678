//! # Exchange Provider
//!
//! Outbound adapter for the upstream rates API. `HttpRateProvider`
//! implements the `RateProvider` port over plain HTTP: one GET returning the
//! provider's full rate table as JSON
//! (`{"rates": {"btc": {"name": "...", "unit": "...", "value": ..., "type": "..."}}}`).
//!
//! All failures (connect, timeout, non-2xx, malformed body) surface as the
//! single opaque `ProviderError` kind; classification happens nowhere below
//! the service layer.

use std::time::Duration;

use exchange_types::{ProviderError, RateProvider, RateSnapshot};
use reqwest::Client;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the upstream rates endpoint.
pub struct HttpRateProvider {
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl HttpRateProvider {
    /// Creates a provider for the given rates endpoint URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a provider with a custom per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            http: Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_rates(&self) -> Result<RateSnapshot, ProviderError> {
        tracing::debug!(url = %self.base_url, "fetching rates from upstream");

        let response = self
            .http
            .get(&self.base_url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ProviderError::new(e.to_string()))?;

        response
            .json::<RateSnapshot>()
            .await
            .map_err(|e| ProviderError::new(format!("malformed rates payload: {e}")))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock provider for testing
// ─────────────────────────────────────────────────────────────────────────────

/// Mock rate provider for tests and examples.
///
/// Returns the configured snapshot, or a provider error when none is set.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockRateProvider {
    snapshot: std::sync::Mutex<Option<RateSnapshot>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockRateProvider {
    pub fn new() -> Self {
        Self {
            snapshot: std::sync::Mutex::new(None),
        }
    }

    pub fn with_snapshot(snapshot: RateSnapshot) -> Self {
        let provider = Self::new();
        provider.set_snapshot(snapshot);
        provider
    }

    /// Sets the snapshot returned by subsequent fetches.
    pub fn set_snapshot(&self, snapshot: RateSnapshot) {
        *self.snapshot.lock().unwrap() = Some(snapshot);
    }

    /// Makes subsequent fetches fail, simulating an upstream outage.
    pub fn clear(&self) {
        *self.snapshot.lock().unwrap() = None;
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait::async_trait]
impl RateProvider for MockRateProvider {
    async fn fetch_rates(&self) -> Result<RateSnapshot, ProviderError> {
        self.snapshot
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ProviderError::new("upstream unavailable"))
    }
}

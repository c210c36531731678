//! Upstream rate provider port.
//!
//! Implementations can be HTTP clients, mock providers, etc.

use crate::domain::RateSnapshot;
use crate::error::ProviderError;

/// Port trait for the upstream rate provider.
///
/// A fetch returns the provider's full rate table; partial fetches are not
/// part of the contract. Failures (network, timeout, malformed payload) are
/// opaque and surface as a single [`ProviderError`] kind. Implementations
/// enforce their own timeouts.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync + 'static {
    /// Fetch a full snapshot of named rate entries from upstream.
    async fn fetch_rates(&self) -> Result<RateSnapshot, ProviderError>;
}

#[async_trait::async_trait]
impl<P: RateProvider> RateProvider for std::sync::Arc<P> {
    async fn fetch_rates(&self) -> Result<RateSnapshot, ProviderError> {
        (**self).fetch_rates().await
    }
}

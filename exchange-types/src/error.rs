//! Error types for the crypto exchange service.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Core errors for rate lookup, conversion, and refresh.
///
/// Every variant is terminal for the request: the core never retries, and
/// the HTTP layer maps each kind to a distinct status code.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    /// One or more currency codes absent from the current snapshot.
    /// Always carries the full set of offenders, never just the first.
    #[error("{}", currency_not_found_message(.0))]
    CurrencyNotFound(BTreeSet<String>),

    #[error("Exchange calculation error: {0}")]
    Calculation(String),

    #[error("Error fetching crypto rates: {0}")]
    Upstream(String),
}

impl ExchangeError {
    pub fn currency_not_found(code: impl Into<String>) -> Self {
        Self::CurrencyNotFound(BTreeSet::from([code.into()]))
    }

    pub fn currencies_not_found(codes: BTreeSet<String>) -> Self {
        Self::CurrencyNotFound(codes)
    }
}

fn currency_not_found_message(codes: &BTreeSet<String>) -> String {
    if codes.len() == 1 {
        let code = codes.iter().next().map(String::as_str).unwrap_or_default();
        format!("Currency {} not found in exchange rates.", code)
    } else {
        let joined = codes.iter().cloned().collect::<Vec<_>>().join(", ");
        format!("Currencies not found in exchange rates: {}", joined)
    }
}

/// Opaque upstream provider failure (network, timeout, malformed payload).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ProviderError(String);

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Opaque cache store failure (connection, serialization).
#[derive(Debug, thiserror::Error)]
#[error("rate store error: {0}")]
pub struct StoreError(String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<ProviderError> for ExchangeError {
    fn from(err: ProviderError) -> Self {
        ExchangeError::Upstream(err.to_string())
    }
}

impl From<StoreError> for ExchangeError {
    fn from(err: StoreError) -> Self {
        ExchangeError::Upstream(err.to_string())
    }
}

/// Structured error body returned by the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorMessage {
    /// When the error was produced (ISO 8601)
    #[schema(value_type = String, example = "2024-01-01T00:00:00Z")]
    pub timestamp: DateTime<Utc>,
    /// HTTP status code
    #[schema(example = 404)]
    pub status: u16,
    /// Short error category
    #[schema(example = "Currency Not Found")]
    pub error: String,
    /// Detailed message
    pub message: String,
}

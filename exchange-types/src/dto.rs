//! Data Transfer Objects (DTOs) for requests and responses.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─────────────────────────────────────────────────────────────────────────────
// Rate lookup DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Cross-rates for a base currency, derived per request from a snapshot.
///
/// `rates` never contains the source currency itself; values are
/// `target / base` rounded to 8 fractional digits, half-up.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrencyRatesResponse {
    /// Uppercased base currency as supplied by the caller
    #[schema(example = "BTC")]
    pub source: String,
    /// Uppercased currency code -> cross-rate
    #[schema(value_type = HashMap<String, String>, example = json!({"USD": "0.00005"}))]
    pub rates: HashMap<String, Decimal>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Exchange DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to calculate a fee-bearing conversion forecast.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExchangeRequest {
    /// Source currency code (case-insensitive)
    #[schema(example = "BTC")]
    pub from: String,
    /// Target currency codes (case-insensitive)
    #[schema(example = json!(["USD", "ETH"]))]
    pub to: HashSet<String>,
    /// Amount of the source currency to convert; must be positive
    #[schema(value_type = String, example = "2")]
    pub amount: Decimal,
}

/// Conversion outcome for a single target currency.
///
/// Invariant: `result = amount * rate - fee` with `fee = amount * rate * 0.01`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExchangeResult {
    /// Cross-rate used for the conversion
    #[schema(value_type = String, example = "0.00005")]
    pub rate: Decimal,
    /// Source amount, echoed back
    #[schema(value_type = String, example = "2")]
    pub amount: Decimal,
    /// Converted amount after the fee
    #[schema(value_type = String, example = "0.000099")]
    pub result: Decimal,
    /// Proportional fee (1% of the raw conversion)
    #[schema(value_type = String, example = "0.000001")]
    pub fee: Decimal,
}

/// Response for an exchange calculation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExchangeResponse {
    /// The caller's source currency, echoed verbatim (not re-cased)
    #[schema(example = "BTC")]
    pub from: String,
    /// Uppercased target currency code -> conversion outcome
    pub conversions: HashMap<String, ExchangeResult>,
}

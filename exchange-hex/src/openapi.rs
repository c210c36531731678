//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use exchange_types::domain::RateEntry;
use exchange_types::dto::{
    CurrencyRatesResponse, ExchangeRequest, ExchangeResponse, ExchangeResult,
};
use exchange_types::error::ErrorMessage;
use utoipa::OpenApi;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Look up cross-rates for a base currency
#[utoipa::path(
    get,
    path = "/currencies/{currency}",
    tag = "rates",
    params(
        ("currency" = String, Path, description = "Base currency code (case-insensitive)"),
        ("filter" = Option<String>, Query, description = "Comma-separated target currency codes; omit for all currencies")
    ),
    responses(
        (status = 200, description = "Cross-rates relative to the base currency", body = CurrencyRatesResponse),
        (status = 404, description = "Base or filter currency not found", body = ErrorMessage),
        (status = 400, description = "Base currency value is zero", body = ErrorMessage),
        (status = 503, description = "Upstream rate provider unavailable", body = ErrorMessage)
    )
)]
async fn get_crypto_rates() {}

/// Calculate a fee-bearing conversion forecast
#[utoipa::path(
    post,
    path = "/currencies/exchange",
    tag = "exchange",
    request_body = ExchangeRequest,
    responses(
        (status = 200, description = "Conversion results per target currency", body = ExchangeResponse),
        (status = 400, description = "Non-positive amount or unusable rate", body = ErrorMessage),
        (status = 404, description = "Source or target currency not found", body = ErrorMessage),
        (status = 503, description = "Upstream rate provider unavailable", body = ErrorMessage)
    )
)]
async fn exchange() {}

/// OpenAPI documentation for the Crypto Exchange API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Crypto Exchange Service API",
        version = "1.0.0",
        description = "Cryptocurrency exchange-rate lookup and conversion forecasts.\n\nRates are fetched from an upstream provider, cached with a 5 minute TTL, and served as cross-rates relative to a caller-chosen base currency. Conversions apply a 1% fee.",
        license(name = "MIT"),
    ),
    paths(health, get_crypto_rates, exchange),
    components(
        schemas(
            CurrencyRatesResponse,
            ExchangeRequest,
            ExchangeResponse,
            ExchangeResult,
            RateEntry,
            ErrorMessage,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rates", description = "Exchange rate lookup"),
        (name = "exchange", description = "Conversion calculations"),
    )
)]
pub struct ApiDoc;

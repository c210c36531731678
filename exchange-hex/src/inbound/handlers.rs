//! HTTP request handlers.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;

use exchange_types::{ErrorMessage, ExchangeError, ExchangeRequest, RateProvider, RateStore};

use crate::ExchangeService;

/// Application state shared across handlers.
pub struct AppState<P: RateProvider, S: RateStore> {
    pub service: Arc<ExchangeService<P, S>>,
}

/// Wrapper to implement IntoResponse for ExchangeError (orphan rule workaround).
pub struct ApiError(pub ExchangeError);

impl From<ExchangeError> for ApiError {
    fn from(err: ExchangeError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match &self.0 {
            ExchangeError::CurrencyNotFound(_) => (StatusCode::NOT_FOUND, "Currency Not Found"),
            ExchangeError::Calculation(_) => (StatusCode::BAD_REQUEST, "Exchange Calculation Error"),
            ExchangeError::Upstream(_) => (StatusCode::SERVICE_UNAVAILABLE, "External API Error"),
        };

        let body = ErrorMessage {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: error.to_string(),
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Query parameters for the rate lookup endpoint.
#[derive(Debug, Deserialize)]
pub struct RatesQuery {
    /// Comma-separated target currency codes
    pub filter: Option<String>,
}

fn parse_filter(raw: Option<&str>) -> HashSet<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Look up cross-rates for a base currency.
#[tracing::instrument(skip(state))]
pub async fn get_crypto_rates<P: RateProvider, S: RateStore>(
    State(state): State<Arc<AppState<P, S>>>,
    Path(currency): Path<String>,
    Query(query): Query<RatesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = parse_filter(query.filter.as_deref());
    let rates = state.service.get_rates(&currency, &filter).await?;
    Ok(Json(rates))
}

/// Calculate a fee-bearing conversion forecast.
#[tracing::instrument(skip(state), fields(from = %req.from, amount = %req.amount))]
pub async fn exchange<P: RateProvider, S: RateStore>(
    State(state): State<Arc<AppState<P, S>>>,
    Json(req): Json<ExchangeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.service.calculate_exchange(&req).await?;
    Ok(Json(response))
}

//! # Exchange Client SDK
//!
//! A typed Rust client for the Crypto Exchange API.

use std::collections::HashSet;

use exchange_types::{CurrencyRatesResponse, ExchangeRequest, ExchangeResponse};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Crypto Exchange API client.
pub struct CryptoExchangeClient {
    base_url: String,
    http: Client,
}

impl CryptoExchangeClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Checks if the API is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// Fetches cross-rates for a base currency.
    ///
    /// An empty `filter` returns all available currencies.
    pub async fn rates(
        &self,
        currency: &str,
        filter: &[String],
    ) -> Result<CurrencyRatesResponse, ClientError> {
        let path = if filter.is_empty() {
            format!("/currencies/{}", currency)
        } else {
            format!("/currencies/{}?filter={}", currency, filter.join(","))
        };
        self.get(&path).await
    }

    /// Requests a conversion forecast of `amount` from one currency into
    /// each of the targets.
    pub async fn exchange(
        &self,
        from: &str,
        to: &[String],
        amount: Decimal,
    ) -> Result<ExchangeResponse, ClientError> {
        let req = ExchangeRequest {
            from: from.to_string(),
            to: to.iter().cloned().collect::<HashSet<_>>(),
            amount,
        };
        self.post("/currencies/exchange", &req).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or(body);
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

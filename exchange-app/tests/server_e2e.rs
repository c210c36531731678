//! End-to-end tests driving a live server through the client SDK.
//!
//! These tests require the `memory` feature flag.

#![cfg(feature = "memory")]

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal_macros::dec;
use tokio::net::TcpListener;

use exchange_client::{ClientError, CryptoExchangeClient};
use exchange_hex::{ExchangeService, inbound::HttpServer};
use exchange_provider::MockRateProvider;
use exchange_store::InMemoryRateStore;
use exchange_types::{RateEntry, RateSnapshot};

/// Boots a server on an ephemeral port and returns a client pointed at it.
async fn start_test_server() -> CryptoExchangeClient {
    let provider = MockRateProvider::with_snapshot(RateSnapshot::new(HashMap::from([
        (
            "btc".to_string(),
            RateEntry::new("Bitcoin", "BTC", dec!(20000), "crypto"),
        ),
        (
            "usd".to_string(),
            RateEntry::new("US Dollar", "$", dec!(1), "fiat"),
        ),
    ])));
    let service = Arc::new(ExchangeService::new(provider, InMemoryRateStore::new()));
    let router = HttpServer::new(service).router();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .await
            .unwrap();
    });

    CryptoExchangeClient::new(format!("http://{}", addr))
}

#[tokio::test]
async fn test_health_over_the_wire() {
    let client = start_test_server().await;
    assert!(client.health().await.unwrap());
}

#[tokio::test]
async fn test_rates_round_trip() {
    let client = start_test_server().await;

    let rates = client.rates("btc", &[]).await.unwrap();

    assert_eq!(rates.source, "BTC");
    assert_eq!(rates.rates["USD"], dec!(0.00005));
    assert!(!rates.rates.contains_key("BTC"));
}

#[tokio::test]
async fn test_exchange_round_trip() {
    let client = start_test_server().await;

    let response = client
        .exchange("btc", &["usd".to_string()], dec!(2))
        .await
        .unwrap();

    assert_eq!(response.from, "btc");
    let conversion = &response.conversions["USD"];
    assert_eq!(conversion.rate, dec!(0.00005));
    assert_eq!(conversion.fee, dec!(0.000001));
    assert_eq!(conversion.result, dec!(0.000099));
}

#[tokio::test]
async fn test_api_errors_surface_with_message() {
    let client = start_test_server().await;

    let err = client.rates("doge", &[]).await.unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Currency doge not found in exchange rates.");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

//! Client example demonstrating rate lookup and conversion against a
//! running server with a mock upstream provider.
//!
//! Run with: cargo run -p exchange-app --example client_demo --no-default-features --features memory

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use rust_decimal_macros::dec;
use tokio::net::TcpListener;

use exchange_client::CryptoExchangeClient;
use exchange_hex::{ExchangeService, inbound::HttpServer, spawn_scheduled_refresh};
use exchange_provider::MockRateProvider;
use exchange_store::InMemoryRateStore;
use exchange_types::{RateEntry, RateSnapshot};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    // Find an available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    let port = addr.port();
    drop(listener);

    println!("🚀 Starting server on port {port}...");

    // Mock upstream quoting a handful of currencies
    let provider = MockRateProvider::with_snapshot(RateSnapshot::new(HashMap::from([
        (
            "btc".to_string(),
            RateEntry::new("Bitcoin", "BTC", dec!(20000), "crypto"),
        ),
        (
            "eth".to_string(),
            RateEntry::new("Ether", "ETH", dec!(1500), "crypto"),
        ),
        (
            "usd".to_string(),
            RateEntry::new("US Dollar", "$", dec!(1), "fiat"),
        ),
    ])));

    // Start server in background
    let service = Arc::new(ExchangeService::new(provider, InMemoryRateStore::new()));
    let _refresh = spawn_scheduled_refresh(service.clone(), std::time::Duration::from_secs(300));
    let router = HttpServer::new(service).router();

    let server_addr = format!("127.0.0.1:{port}");
    tokio::spawn(async move {
        axum::serve(
            TcpListener::bind(&server_addr).await.unwrap(),
            router.into_make_service(),
        )
        .await
        .unwrap();
    });

    // Wait for server to start
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    // Create client
    let base_url = format!("http://127.0.0.1:{port}");
    let client = CryptoExchangeClient::new(&base_url);

    // ─────────────────────────────────────────────────────────────────────────
    // Demo: Rate lookup and conversion
    // ─────────────────────────────────────────────────────────────────────────

    // Health check
    let health = client.health().await?;
    println!("✅ Server health: {health}");

    // All cross-rates for BTC
    let rates = client.rates("btc", &[]).await?;
    println!("\n📋 Cross-rates for {}:", rates.source);
    for (code, rate) in &rates.rates {
        println!("   - {code}: {rate}");
    }

    // Filtered lookup
    let rates = client.rates("eth", &["usd".to_string()]).await?;
    println!("✅ USD cross-rate against ETH: {}", rates.rates["USD"]);

    // Conversion forecast with the 1% fee
    let response = client
        .exchange("btc", &["usd".to_string(), "eth".to_string()], dec!(2))
        .await?;
    println!("\n💱 Converting 2 {}:", response.from);
    for (code, conversion) in &response.conversions {
        println!(
            "   - {code}: result {} (rate {}, fee {})",
            conversion.result, conversion.rate, conversion.fee
        );
    }

    // Errors carry the API's message through the client
    let err = client.rates("doge", &[]).await.unwrap_err();
    println!("\n✅ Unknown currency rejected: {err}");

    println!("\n🎉 Example completed successfully!");

    Ok(())
}

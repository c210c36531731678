//! # Exchange Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the cache store adapter and upstream provider
//! - Create the exchange service and the scheduled refresh task
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exchange_hex::{ExchangeService, inbound::HttpServer, spawn_scheduled_refresh};
use exchange_provider::HttpRateProvider;
use exchange_store::build_store;

fn init_tracer() -> (sdktrace::Tracer, sdktrace::SdkTracerProvider) {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
        .expect("failed to create OTLP span exporter");

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    (provider.tracer("exchange-service"), provider)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry tracing
    let (otel_tracer, otel_provider) = init_tracer();
    let telemetry = tracing_opentelemetry::layer().with_tracer(otel_tracer);

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,exchange_app=debug,exchange_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting exchange server on port {}", config.port);
    tracing::info!("Upstream rates endpoint: {}", config.rates_url);

    // Build the cache store (handles connection)
    let store = build_store(&config.redis_url).await?;

    // Create the exchange service
    let provider = HttpRateProvider::new(&config.rates_url);
    let service = Arc::new(ExchangeService::new(provider, store));

    // Warm the cache now and keep it fresh in the background
    let refresh = spawn_scheduled_refresh(service.clone(), config.refresh_interval);

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    refresh.abort();

    // Ensure traces are flushed before exit
    let _ = otel_provider.shutdown();
    Ok(())
}

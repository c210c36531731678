//! # Exchange Hex
//!
//! Application service layer and HTTP adapter for the crypto exchange
//! service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (rate refresh, lookup, conversion)
//! - `refresh/` - Scheduled cache refresh task
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `P: RateProvider` and `S: RateStore`,
//! allowing different upstream clients and cache backends to be injected.

pub mod inbound;
pub mod openapi;
pub mod refresh;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use refresh::spawn_scheduled_refresh;
pub use service::ExchangeService;

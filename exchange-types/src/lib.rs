//! # Exchange Types
//!
//! Domain types and port traits for the crypto exchange service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (RateEntry, RateSnapshot)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and adapter error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{RateEntry, RateSnapshot, canonical_key};
pub use dto::*;
pub use error::{ErrorMessage, ExchangeError, ProviderError, StoreError};
pub use ports::{RateProvider, RateStore};

//! Domain models for the crypto exchange service.

pub mod snapshot;

pub use snapshot::{RateEntry, RateSnapshot, canonical_key};

//! Port traits implemented by outbound adapters.

pub mod provider;
pub mod store;

pub use provider::RateProvider;
pub use store::RateStore;

//! Configuration loading from environment.

use std::env;
use std::time::Duration;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub redis_url: String,
    pub rates_url: String,
    pub refresh_interval: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let redis_url =
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

        let rates_url = env::var("CRYPTO_API_URL")
            .map_err(|_| anyhow::anyhow!("CRYPTO_API_URL environment variable is required"))?;

        let refresh_interval = env::var("REFRESH_INTERVAL_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .map(Duration::from_secs)?;

        Ok(Self {
            port,
            redis_url,
            rates_url,
            refresh_interval,
        })
    }
}

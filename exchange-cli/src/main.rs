//! Exchange CLI
//!
//! Command-line interface for the Crypto Exchange API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use exchange_client::CryptoExchangeClient;

#[derive(Parser)]
#[command(name = "exchange")]
#[command(author, version, about = "Crypto Exchange API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the Crypto Exchange API
    #[arg(
        long,
        env = "EXCHANGE_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up cross-rates for a base currency
    Rates {
        /// Base currency code (case-insensitive)
        currency: String,
        /// Target currencies to include (comma-separated)
        #[arg(long, value_delimiter = ',')]
        filter: Vec<String>,
    },
    /// Calculate a conversion forecast
    Exchange {
        /// Source currency code
        #[arg(long)]
        from: String,
        /// Target currency codes (comma-separated)
        #[arg(long, value_delimiter = ',')]
        to: Vec<String>,
        /// Amount of the source currency to convert
        #[arg(long)]
        amount: Decimal,
    },
    /// Check API health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let client = CryptoExchangeClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Rates { currency, filter } => {
            let filter: Vec<String> = filter.into_iter().filter(|f| !f.is_empty()).collect();
            let rates = client.rates(&currency, &filter).await?;
            println!("{}", serde_json::to_string_pretty(&rates)?);
        }

        Commands::Exchange { from, to, amount } => {
            let to: Vec<String> = to.into_iter().filter(|t| !t.is_empty()).collect();
            let response = client.exchange(&from, &to, amount).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

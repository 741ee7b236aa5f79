//! Market Data Integration
//!
//! Abstractions and implementations for public market-data providers.

mod coingecko;
mod mock;

pub use coingecko::{CoinGeckoClient, CoinGeckoConfig};
pub use mock::MockMarketClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{MarketSnapshot, PriceSeries};

/// Market data client trait (Strategy pattern)
///
/// Implement this for each provider: CoinGecko, CoinMarketCap, etc.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Resolve a free-text coin query (name or ticker) to the provider's
    /// canonical coin id. `None` when nothing matches.
    async fn find_coin(&self, query: &str) -> Result<Option<String>>;

    /// Fetch the OHLC series for a coin over the last `days` days.
    /// Empty series when the provider has no data for the coin.
    async fn ohlc(&self, coin_id: &str, days: u32) -> Result<PriceSeries>;

    /// Fetch a current market snapshot for a coin, if available
    async fn snapshot(&self, coin_id: &str) -> Result<Option<MarketSnapshot>>;

    /// Check if the provider is available
    async fn health_check(&self) -> bool;

    /// Provider name
    fn name(&self) -> &str;
}

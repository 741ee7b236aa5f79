//! CoinGecko Client
//!
//! Implementation of `MarketDataClient` against the public CoinGecko v3
//! API. A fixed post-request sleep keeps the client under the free-tier
//! rate limit; there is deliberately no retry or backoff logic.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use super::MarketDataClient;
use crate::error::Result;
use crate::model::{MarketSnapshot, PricePoint, PriceSeries};

/// CoinGecko provider configuration
#[derive(Clone, Debug)]
pub struct CoinGeckoConfig {
    /// API base URL
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sleep after every request, in milliseconds (free-tier rate limit)
    pub rate_limit_ms: u64,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".into(),
            timeout_secs: 30,
            rate_limit_ms: 1000,
        }
    }
}

impl CoinGeckoConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("COINGECKO_BASE_URL")
            .unwrap_or_else(|_| "https://api.coingecko.com/api/v3".into());
        let rate_limit_ms = std::env::var("COINGECKO_RATE_LIMIT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        Self {
            base_url,
            rate_limit_ms,
            ..Default::default()
        }
    }
}

// ── Response DTOs ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<SearchCoin>,
}

#[derive(Debug, Deserialize)]
struct SearchCoin {
    id: String,
    symbol: String,
}

/// OHLC rows arrive as `[timestamp_ms, open, high, low, close]`
type OhlcRow = [f64; 5];

#[derive(Debug, Deserialize)]
struct MarketsRow {
    id: String,
    symbol: String,
    name: String,
    current_price: Option<f64>,
    market_cap: Option<f64>,
    price_change_percentage_24h: Option<f64>,
}

/// CoinGecko market data client
pub struct CoinGeckoClient {
    http: reqwest::Client,
    config: CoinGeckoConfig,
}

impl CoinGeckoClient {
    /// Create from configuration
    pub fn from_config(config: CoinGeckoConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(CoinGeckoConfig::from_env())
    }

    /// Create with default settings
    pub fn new() -> Result<Self> {
        Self::from_config(CoinGeckoConfig::default())
    }

    async fn throttle(&self) {
        if self.config.rate_limit_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.rate_limit_ms)).await;
        }
    }

    fn convert_series(rows: Vec<OhlcRow>) -> PriceSeries {
        let points = rows
            .into_iter()
            .filter_map(|[ts, open, high, low, close]| {
                let timestamp = DateTime::from_timestamp_millis(ts as i64)?;
                Some(PricePoint::new(timestamp, open, high, low, close))
            })
            .collect();
        PriceSeries::new(points)
    }

    /// Pick the best search hit: exact id match, then exact symbol match,
    /// then the first result
    fn resolve(query: &str, coins: &[SearchCoin]) -> Option<String> {
        if let Some(coin) = coins.iter().find(|c| c.id.to_lowercase() == query) {
            return Some(coin.id.clone());
        }
        if let Some(coin) = coins.iter().find(|c| c.symbol.to_lowercase() == query) {
            return Some(coin.id.clone());
        }
        coins.first().map(|c| c.id.clone())
    }
}

#[async_trait]
impl MarketDataClient for CoinGeckoClient {
    async fn find_coin(&self, query: &str) -> Result<Option<String>> {
        let query = query.trim().to_lowercase();

        let response: SearchResponse = self
            .http
            .get(format!("{}/search", self.config.base_url))
            .query(&[("query", query.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        self.throttle().await;

        Ok(Self::resolve(&query, &response.coins))
    }

    async fn ohlc(&self, coin_id: &str, days: u32) -> Result<PriceSeries> {
        let days = days.to_string();
        let rows: Vec<OhlcRow> = self
            .http
            .get(format!("{}/coins/{}/ohlc", self.config.base_url, coin_id))
            .query(&[("vs_currency", "usd"), ("days", days.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        self.throttle().await;

        Ok(Self::convert_series(rows))
    }

    async fn snapshot(&self, coin_id: &str) -> Result<Option<MarketSnapshot>> {
        let rows: Vec<MarketsRow> = self
            .http
            .get(format!("{}/coins/markets", self.config.base_url))
            .query(&[("vs_currency", "usd"), ("ids", coin_id)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        self.throttle().await;

        Ok(rows.into_iter().next().map(|row| MarketSnapshot {
            id: row.id,
            symbol: row.symbol,
            name: row.name,
            current_price: row.current_price,
            market_cap: row.market_cap,
            price_change_percentage_24h: row.price_change_percentage_24h,
        }))
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/ping", self.config.base_url);
        match self.http.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("CoinGecko health check failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "CoinGecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CoinGeckoConfig::default();
        assert_eq!(config.base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.rate_limit_ms, 1000);
    }

    #[test]
    fn test_search_response_decoding() {
        let json = r#"{"coins":[{"id":"bitcoin","symbol":"btc","name":"Bitcoin"},
                       {"id":"bitcoin-cash","symbol":"bch","name":"Bitcoin Cash"}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.coins.len(), 2);
        assert_eq!(response.coins[0].id, "bitcoin");
    }

    #[test]
    fn test_resolution_prefers_id_then_symbol() {
        let coins = vec![
            SearchCoin {
                id: "wrapped-bitcoin".into(),
                symbol: "wbtc".into(),
            },
            SearchCoin {
                id: "bitcoin".into(),
                symbol: "btc".into(),
            },
        ];

        assert_eq!(
            CoinGeckoClient::resolve("bitcoin", &coins),
            Some("bitcoin".into())
        );
        assert_eq!(
            CoinGeckoClient::resolve("btc", &coins),
            Some("bitcoin".into())
        );
        // no exact match: first hit wins
        assert_eq!(
            CoinGeckoClient::resolve("bit", &coins),
            Some("wrapped-bitcoin".into())
        );
        assert_eq!(CoinGeckoClient::resolve("xyz", &[]), None);
    }

    #[test]
    fn test_ohlc_conversion() {
        let rows = vec![
            [1_700_000_000_000.0, 1.0, 2.0, 0.5, 1.5],
            [1_700_014_400_000.0, 1.5, 2.5, 1.0, 2.0],
        ];
        let series = CoinGeckoClient::convert_series(rows);

        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![1.5, 2.0]);
        assert!(series.points()[0].timestamp < series.points()[1].timestamp);
    }

    #[test]
    fn test_markets_row_decoding() {
        let json = r#"[{"id":"bitcoin","symbol":"btc","name":"Bitcoin",
                       "current_price":97500.0,"market_cap":1900000000000.0,
                       "price_change_percentage_24h":2.5}]"#;
        let rows: Vec<MarketsRow> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].current_price, Some(97500.0));
    }
}

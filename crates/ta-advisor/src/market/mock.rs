//! Mock Market Client
//!
//! For testing and demo purposes. Returns deterministic synthetic series
//! so indicator outputs are reproducible.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use super::MarketDataClient;
use crate::error::Result;
use crate::model::{MarketSnapshot, PricePoint, PriceSeries};

/// Mock market data client with synthetic candles
pub struct MockMarketClient {
    /// Per-candle drift; zero yields an oscillating series, a nonzero
    /// value a strictly monotonic one (useful to force RSI extremes)
    trend: f64,
}

impl Default for MockMarketClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketClient {
    pub fn new() -> Self {
        Self { trend: 0.0 }
    }

    /// Create with a per-candle drift (for signal-path testing)
    pub fn with_trend(trend: f64) -> Self {
        Self { trend }
    }

    /// Known coins: (id, symbol, name, base price)
    fn coin(query: &str) -> Option<(&'static str, &'static str, &'static str, f64)> {
        let table: [(&str, &str, &str, f64); 5] = [
            ("bitcoin", "btc", "Bitcoin", 97_500.0),
            ("ethereum", "eth", "Ethereum", 3_450.0),
            ("solana", "sol", "Solana", 195.0),
            ("cardano", "ada", "Cardano", 0.95),
            ("dogecoin", "doge", "Dogecoin", 0.38),
        ];

        let query = query.trim().to_lowercase();
        table
            .into_iter()
            .find(|(id, symbol, name, _)| {
                *id == query || *symbol == query || name.to_lowercase() == query
            })
    }

    /// Candle width in hours for a lookback, matching the real provider's
    /// granularities
    fn step_hours(days: u32) -> f64 {
        match days {
            1 => 0.5,
            2..=30 => 4.0,
            _ => 96.0,
        }
    }

    fn synthesize_series(&self, base: f64, days: u32) -> PriceSeries {
        let step = Self::step_hours(days);
        let count = ((f64::from(days) * 24.0) / step).round() as usize;

        let end = Utc::now();
        let step_minutes = (step * 60.0) as i64;
        let start = end - Duration::minutes(step_minutes * count as i64);

        let amplitude = if self.trend == 0.0 { 0.04 } else { 0.0 };

        let mut points = Vec::with_capacity(count);
        let mut prev_close = base;
        for i in 0..count {
            let drift = (1.0 + self.trend).powi(i as i32);
            let wave = 1.0 + amplitude * ((i as f64) * 0.35).sin();
            let close = base * drift * wave;

            let open = if i == 0 { close } else { prev_close };
            let high = open.max(close) * 1.004;
            let low = open.min(close) * 0.996;
            let timestamp = start + Duration::minutes(step_minutes * (i as i64 + 1));

            points.push(PricePoint::new(timestamp, open, high, low, close));
            prev_close = close;
        }

        PriceSeries::new(points)
    }
}

#[async_trait]
impl MarketDataClient for MockMarketClient {
    async fn find_coin(&self, query: &str) -> Result<Option<String>> {
        Ok(Self::coin(query).map(|(id, _, _, _)| id.to_string()))
    }

    async fn ohlc(&self, coin_id: &str, days: u32) -> Result<PriceSeries> {
        match Self::coin(coin_id) {
            Some((_, _, _, base)) => Ok(self.synthesize_series(base, days)),
            None => Ok(PriceSeries::default()),
        }
    }

    async fn snapshot(&self, coin_id: &str) -> Result<Option<MarketSnapshot>> {
        Ok(Self::coin(coin_id).map(|(id, symbol, name, base)| MarketSnapshot {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            current_price: Some(base),
            market_cap: Some(base * 19_000_000.0),
            price_change_percentage_24h: Some(2.5),
        }))
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "MockMarket"
    }
}

//! Domain Models
//!
//! Core data types for price series and indicator outputs. Prices are
//! `f64`: the engine is statistical (exponential smoothing, square roots)
//! and there is no monetary bookkeeping that would want fixed-point.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLC candle
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PricePoint {
    /// Candle open time
    pub timestamp: DateTime<Utc>,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }
}

/// An ordered OHLC series, oldest candle first
///
/// Timestamps are strictly increasing with no duplicates; the fetching
/// client is responsible for ordering. Immutable once fetched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Extract close prices, oldest first
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Close of the most recent candle
    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Caller-selectable lookback windows and the provider's data granularity
/// for each (CoinGecko OHLC candle widths)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lookback {
    Day,
    Week,
    TwoWeeks,
    Month,
    Quarter,
}

impl Lookback {
    pub const ALL: [Lookback; 5] = [
        Lookback::Day,
        Lookback::Week,
        Lookback::TwoWeeks,
        Lookback::Month,
        Lookback::Quarter,
    ];

    /// Window length in days
    pub fn days(self) -> u32 {
        match self {
            Lookback::Day => 1,
            Lookback::Week => 7,
            Lookback::TwoWeeks => 14,
            Lookback::Month => 30,
            Lookback::Quarter => 90,
        }
    }

    /// Candle width the provider returns for this window
    pub fn granularity(self) -> &'static str {
        match self {
            Lookback::Day => "30 minutes",
            Lookback::Week | Lookback::TwoWeeks | Lookback::Month => "4 hours",
            Lookback::Quarter => "4 days",
        }
    }

    pub fn from_days(days: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.days() == days)
    }

    /// Keyboard label, e.g. "14 days (4 hours)"
    pub fn label(self) -> String {
        format!("{} ({})", self, self.granularity())
    }
}

impl std::fmt::Display for Lookback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.days() {
            1 => write!(f, "1 day"),
            d => write!(f, "{} days", d),
        }
    }
}

/// A manually entered trade plan
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TradePlan {
    pub entry: f64,
    pub stop: f64,
    pub target: f64,
}

impl TradePlan {
    pub fn new(entry: f64, stop: f64, target: f64) -> Self {
        Self {
            entry,
            stop,
            target,
        }
    }

    /// Classify the plan and compute risk, reward and their ratio
    pub fn evaluate(&self) -> RiskReward {
        crate::metrics::risk_reward(self.entry, self.stop, self.target)
    }
}

/// Position direction implied by a trade plan's price ordering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
    Invalid,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
            Direction::Invalid => write!(f, "invalid"),
        }
    }
}

/// Result of risk/reward classification
///
/// `risk`, `reward` and `ratio` are absent when the direction is invalid;
/// `ratio` is additionally absent when risk is zero (never infinite).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RiskReward {
    pub direction: Direction,
    pub risk: Option<f64>,
    pub reward: Option<f64>,
    pub ratio: Option<f64>,
}

/// Directional bias derived from the latest RSI reading
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

/// A synthesized trading signal
///
/// Neutral bias carries no levels and no ratio.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Signal {
    pub bias: Bias,
    pub entry: Option<f64>,
    pub stop: Option<f64>,
    pub target: Option<f64>,
    pub ratio: Option<f64>,
}

/// Market snapshot from the provider's markets endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_series_closes() {
        let t0 = Utc::now();
        let series = PriceSeries::new(vec![
            PricePoint::new(t0, 1.0, 2.0, 0.5, 1.5),
            PricePoint::new(t0 + chrono::Duration::hours(4), 1.5, 2.5, 1.0, 2.0),
        ]);

        assert_eq!(series.closes(), vec![1.5, 2.0]);
        assert_eq!(series.last_close(), Some(2.0));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_lookback_round_trip() {
        for lookback in Lookback::ALL {
            assert_eq!(Lookback::from_days(lookback.days()), Some(lookback));
        }
        assert_eq!(Lookback::from_days(3), None);
    }

    #[test]
    fn test_lookback_labels() {
        assert_eq!(Lookback::Day.label(), "1 day (30 minutes)");
        assert_eq!(Lookback::Quarter.label(), "90 days (4 days)");
    }
}

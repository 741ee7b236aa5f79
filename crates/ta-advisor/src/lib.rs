//! # ta-advisor
//!
//! Technical-analysis advisor for cryptocurrencies: a pure indicator
//! engine, a signal synthesizer, a market-data client, and the
//! conversation flows that tie them to a chat bot.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌─────────────────────┐
//! │  MarketData  │──▶│ Indicator Engine │──▶│ Signal Synthesizer  │
//! │  (CoinGecko) │   │  rsi/vol/risk    │   │  bias + levels      │
//! └──────────────┘   └──────────────────┘   └─────────────────────┘
//!        ▲                                            │
//!        │            ┌──────────────────┐            ▼
//!        └────────────│      Flows       │──▶  chart + text replies
//!                     └──────────────────┘
//! ```
//!
//! The engine (`metrics`) is pure and reentrant: ordered close prices in,
//! scalars and series out, no I/O anywhere. Everything stateful lives in
//! the chat session owned by the caller.

pub mod chart;
pub mod error;
pub mod flows;
pub mod market;
pub mod metrics;
pub mod model;
pub mod signal;
pub mod text;

pub use error::{AdvisorError, Result};
pub use flows::{RiskRewardFlow, RsiFlow, VolatilityFlow};
pub use model::{
    Bias, Direction, Lookback, MarketSnapshot, PricePoint, PriceSeries, RiskReward, Signal,
    TradePlan,
};

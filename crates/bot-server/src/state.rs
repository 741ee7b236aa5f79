//! Application State

use std::sync::Arc;

use bot_core::Dispatcher;
use ta_advisor::market::MarketDataClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Conversation dispatcher with all registered flows
    pub dispatcher: Arc<Dispatcher>,

    /// Market data provider (CoinGecko or mock)
    pub market: Arc<dyn MarketDataClient>,
}

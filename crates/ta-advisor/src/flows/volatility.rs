//! Volatility Flow
//!
//! Coin → timeframe → annualized volatility estimate.

use std::sync::Arc;

use async_trait::async_trait;
use bot_core::{ChatId, Flow, FlowReply, FlowState, Incoming, Reply, Result as BotResult};

use super::{lookback_keyboard, parse_lookback};
use crate::market::MarketDataClient;
use crate::metrics;
use crate::text;

pub struct VolatilityFlow {
    market: Arc<dyn MarketDataClient>,
}

impl VolatilityFlow {
    pub fn new(market: Arc<dyn MarketDataClient>) -> Self {
        Self { market }
    }

    async fn collect_coin(&self, state: &mut FlowState, input: &Incoming) -> BotResult<FlowReply> {
        let Some(query) = input.text() else {
            return Ok(FlowReply::repeat(Reply::text(text::prompt_coin())));
        };

        match self.market.find_coin(query).await {
            Ok(Some(coin_id)) => {
                state.set("coin_id", coin_id.clone());
                Ok(FlowReply::advance(
                    Reply::text(text::coin_selected(&coin_id))
                        .with_keyboard(lookback_keyboard(self.name())),
                ))
            }
            Ok(None) => Ok(FlowReply::repeat(Reply::text(text::coin_not_found()))),
            Err(e) => {
                tracing::warn!(error = %e, "Coin lookup failed");
                Ok(FlowReply::repeat(Reply::text(e.user_message())))
            }
        }
    }

    async fn estimate(&self, state: &mut FlowState, input: &Incoming) -> BotResult<FlowReply> {
        let lookback = input
            .callback()
            .and_then(|data| parse_lookback(data, self.name()));
        let Some(lookback) = lookback else {
            return Ok(FlowReply::repeat(Reply::text(text::choose_timeframe())));
        };
        let Some(coin_id) = state.get_str("coin_id").map(String::from) else {
            return Ok(FlowReply::done(vec![Reply::text(text::no_data())]));
        };

        let series = match self.market.ohlc(&coin_id, lookback.days()).await {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!(error = %e, coin = %coin_id, "OHLC fetch failed");
                return Ok(FlowReply::done(vec![Reply::text(text::no_data())]));
            }
        };
        if series.is_empty() {
            return Ok(FlowReply::done(vec![Reply::text(text::no_data())]));
        }

        let reply = match metrics::annualized_volatility(&series.closes()) {
            Ok(volatility) => Reply::text(text::volatility_result(&coin_id, lookback, volatility)),
            Err(e) => {
                tracing::debug!(error = %e, coin = %coin_id, "Volatility unavailable");
                Reply::text(text::volatility_unavailable())
            }
        };

        Ok(FlowReply::done(vec![reply]))
    }
}

#[async_trait]
impl Flow for VolatilityFlow {
    fn name(&self) -> &str {
        "volatility"
    }

    fn description(&self) -> &str {
        "Annualized volatility estimate"
    }

    async fn enter(&self, _chat: &ChatId) -> BotResult<Reply> {
        Ok(Reply::text(text::prompt_coin()))
    }

    async fn handle(&self, state: &mut FlowState, input: &Incoming) -> BotResult<FlowReply> {
        match state.step {
            0 => self.collect_coin(state, input).await,
            _ => self.estimate(state, input).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MockMarketClient;
    use bot_core::StepOutcome;

    #[tokio::test]
    async fn test_full_conversation() {
        let flow = VolatilityFlow::new(Arc::new(MockMarketClient::new()));
        let mut state = FlowState::new("volatility");

        let reply = flow
            .handle(&mut state, &Incoming::Text("ethereum".into()))
            .await
            .unwrap();
        assert_eq!(reply.outcome, StepOutcome::Advance);

        state.step += 1;
        let reply = flow
            .handle(&mut state, &Incoming::Callback("volatility_days_7".into()))
            .await
            .unwrap();
        assert_eq!(reply.outcome, StepOutcome::Done);
        assert!(reply.replies[0].text.contains("annualized volatility"));
        assert!(reply.replies[0].text.contains('%'));
    }

    #[tokio::test]
    async fn test_ignores_other_flows_buttons() {
        let flow = VolatilityFlow::new(Arc::new(MockMarketClient::new()));
        let mut state = FlowState::new("volatility");
        state.set("coin_id", "bitcoin");
        state.step = 1;

        let reply = flow
            .handle(&mut state, &Incoming::Callback("rsi_days_7".into()))
            .await
            .unwrap();
        assert_eq!(reply.outcome, StepOutcome::Repeat);
    }
}

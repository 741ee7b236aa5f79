//! RSI Flow
//!
//! Coin → timeframe → RSI analysis with chart and synthesized signal.

use std::sync::Arc;

use async_trait::async_trait;
use bot_core::{ChatId, Flow, FlowReply, FlowState, Incoming, Photo, Reply, Result as BotResult};

use super::{lookback_keyboard, parse_lookback};
use crate::chart;
use crate::market::MarketDataClient;
use crate::metrics;
use crate::signal;
use crate::text;

pub struct RsiFlow {
    market: Arc<dyn MarketDataClient>,
}

impl RsiFlow {
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

    async fn analyze(&self, state: &mut FlowState, input: &Incoming) -> BotResult<FlowReply> {
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

        let closes = series.closes();
        let Ok(rsi_values) = metrics::rsi(&closes, metrics::DEFAULT_RSI_LENGTH) else {
            return Ok(FlowReply::done(vec![Reply::text(text::rsi_unavailable())]));
        };
        let Some(last_rsi) = rsi_values.last().copied().flatten() else {
            return Ok(FlowReply::done(vec![Reply::text(text::rsi_unavailable())]));
        };
        let Some(last_close) = series.last_close() else {
            return Ok(FlowReply::done(vec![Reply::text(text::no_data())]));
        };

        let realized_vol =
            metrics::realized_volatility(&closes).unwrap_or(signal::DEFAULT_REALIZED_VOL);
        let derived = signal::synthesize(last_rsi, last_close, realized_vol);
        let snapshot = self.market.snapshot(&coin_id).await.ok().flatten();

        let mut replies = Vec::new();
        match chart::render_rsi_chart(&series, &rsi_values, &coin_id, lookback) {
            Ok(bytes) => replies.push(
                Reply::text(text::chart_caption(&coin_id, lookback))
                    .with_photo(Photo::new(chart::chart_filename(&coin_id), bytes)),
            ),
            // The analysis is still worth sending without the chart
            Err(e) => tracing::warn!(error = %e, "Chart rendering failed"),
        }
        replies.push(Reply::text(text::rsi_analysis(
            &coin_id,
            lookback,
            last_close,
            last_rsi,
            &derived,
            snapshot.as_ref(),
        )));

        Ok(FlowReply::done(replies))
    }
}

#[async_trait]
impl Flow for RsiFlow {
    fn name(&self) -> &str {
        "rsi"
    }

    fn description(&self) -> &str {
        "RSI analysis with chart and signal"
    }

    async fn enter(&self, _chat: &ChatId) -> BotResult<Reply> {
        Ok(Reply::text(text::prompt_coin()))
    }

    async fn handle(&self, state: &mut FlowState, input: &Incoming) -> BotResult<FlowReply> {
        match state.step {
            0 => self.collect_coin(state, input).await,
            _ => self.analyze(state, input).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MockMarketClient;
    use bot_core::StepOutcome;

    fn flow(market: MockMarketClient) -> RsiFlow {
        RsiFlow::new(Arc::new(market))
    }

    #[tokio::test]
    async fn test_unknown_coin_reprompts() {
        let flow = flow(MockMarketClient::new());
        let mut state = FlowState::new("rsi");

        let reply = flow
            .handle(&mut state, &Incoming::Text("notacoin".into()))
            .await
            .unwrap();
        assert_eq!(reply.outcome, StepOutcome::Repeat);
        assert_eq!(reply.replies[0].text, text::coin_not_found());
    }

    #[tokio::test]
    async fn test_full_conversation() {
        let flow = flow(MockMarketClient::new());
        let mut state = FlowState::new("rsi");

        let reply = flow
            .handle(&mut state, &Incoming::Text("btc".into()))
            .await
            .unwrap();
        assert_eq!(reply.outcome, StepOutcome::Advance);
        assert!(reply.replies[0].keyboard.is_some());
        assert_eq!(state.get_str("coin_id"), Some("bitcoin"));

        state.step += 1;
        let reply = flow
            .handle(&mut state, &Incoming::Callback("rsi_days_14".into()))
            .await
            .unwrap();
        assert_eq!(reply.outcome, StepOutcome::Done);
        assert_eq!(reply.replies.len(), 2);
        assert!(reply.replies[0].photo.is_some());
        assert!(reply.replies[1].text.contains("RSI"));
    }

    #[tokio::test]
    async fn test_downtrend_yields_oversold_signal() {
        let flow = flow(MockMarketClient::with_trend(-0.01));
        let mut state = FlowState::new("rsi");
        state.set("coin_id", "bitcoin");
        state.step = 1;

        let reply = flow
            .handle(&mut state, &Incoming::Callback("rsi_days_30".into()))
            .await
            .unwrap();
        assert_eq!(reply.outcome, StepOutcome::Done);

        let analysis = &reply.replies.last().unwrap().text;
        assert!(analysis.contains("oversold"), "got: {}", analysis);
    }

    #[tokio::test]
    async fn test_text_instead_of_timeframe_reprompts() {
        let flow = flow(MockMarketClient::new());
        let mut state = FlowState::new("rsi");
        state.set("coin_id", "bitcoin");
        state.step = 1;

        let reply = flow
            .handle(&mut state, &Incoming::Text("tomorrow".into()))
            .await
            .unwrap();
        assert_eq!(reply.outcome, StepOutcome::Repeat);
        assert_eq!(reply.replies[0].text, text::choose_timeframe());
    }
}

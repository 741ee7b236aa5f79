//! Risk/Reward Flow
//!
//! Entry → stop → target, each validated as a number, then the plan is
//! classified and the ratio reported.

use async_trait::async_trait;
use bot_core::{ChatId, Flow, FlowReply, FlowState, Incoming, Reply, Result as BotResult};

use crate::model::TradePlan;
use crate::text;

#[derive(Default)]
pub struct RiskRewardFlow;

impl RiskRewardFlow {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Flow for RiskRewardFlow {
    fn name(&self) -> &str {
        "riskreward"
    }

    fn description(&self) -> &str {
        "Risk/reward ratio for a trade plan"
    }

    async fn enter(&self, _chat: &ChatId) -> BotResult<Reply> {
        Ok(Reply::text(text::prompt_entry()))
    }

    async fn handle(&self, state: &mut FlowState, input: &Incoming) -> BotResult<FlowReply> {
        let value = input.text().and_then(|t| t.trim().parse::<f64>().ok());
        let Some(value) = value else {
            return Ok(FlowReply::repeat(Reply::text(text::invalid_number())));
        };

        match state.step {
            0 => {
                state.set("entry", value);
                Ok(FlowReply::advance(Reply::text(text::prompt_stop())))
            }
            1 => {
                state.set("stop", value);
                Ok(FlowReply::advance(Reply::text(text::prompt_target())))
            }
            _ => {
                let (Some(entry), Some(stop)) = (state.get_f64("entry"), state.get_f64("stop"))
                else {
                    return Ok(FlowReply::done(vec![Reply::text(text::invalid_number())]));
                };

                let plan = TradePlan::new(entry, stop, value);
                let result = plan.evaluate();

                Ok(FlowReply::done(vec![Reply::text(text::riskreward_result(
                    &plan, &result,
                ))]))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bot_core::StepOutcome;

    async fn step(
        flow: &RiskRewardFlow,
        state: &mut FlowState,
        input: &str,
    ) -> FlowReply {
        let reply = flow
            .handle(state, &Incoming::Text(input.into()))
            .await
            .unwrap();
        if reply.outcome == StepOutcome::Advance {
            state.step += 1;
        }
        reply
    }

    #[tokio::test]
    async fn test_long_plan_conversation() {
        let flow = RiskRewardFlow;
        let mut state = FlowState::new("riskreward");

        let reply = step(&flow, &mut state, "110").await;
        assert_eq!(reply.replies[0].text, text::prompt_stop());

        let reply = step(&flow, &mut state, "95").await;
        assert_eq!(reply.replies[0].text, text::prompt_target());

        let reply = step(&flow, &mut state, "130").await;
        assert_eq!(reply.outcome, StepOutcome::Done);
        let result = &reply.replies[0].text;
        assert!(result.contains("long"));
        assert!(result.contains("1.33"));
    }

    #[tokio::test]
    async fn test_invalid_number_repeats_step() {
        let flow = RiskRewardFlow;
        let mut state = FlowState::new("riskreward");

        let reply = step(&flow, &mut state, "not a price").await;
        assert_eq!(reply.outcome, StepOutcome::Repeat);
        assert_eq!(reply.replies[0].text, text::invalid_number());
        assert_eq!(state.step, 0);
    }

    #[tokio::test]
    async fn test_invalid_ordering_reports_invalid_position() {
        let flow = RiskRewardFlow;
        let mut state = FlowState::new("riskreward");

        step(&flow, &mut state, "100").await;
        step(&flow, &mut state, "90").await;
        let reply = step(&flow, &mut state, "80").await;

        assert_eq!(reply.outcome, StepOutcome::Done);
        assert!(reply.replies[0].text.contains("not valid"));
    }
}

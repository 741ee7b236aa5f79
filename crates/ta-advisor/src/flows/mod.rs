//! Conversation Flows
//!
//! One linear flow per bot feature: collect the inputs a feature needs,
//! one step at a time, then invoke the indicator engine and format the
//! result. Flows own no state; everything collected lives in the
//! session's `FlowState`.

mod riskreward;
mod rsi;
mod volatility;

pub use riskreward::RiskRewardFlow;
pub use rsi::RsiFlow;
pub use volatility::VolatilityFlow;

use bot_core::{Button, Keyboard};

use crate::model::Lookback;

/// Inline keyboard with the five lookback windows. Callback data is
/// `"{prefix}_days_{n}"`, mirroring the entry-flow name so each feature
/// only reacts to its own buttons.
pub(crate) fn lookback_keyboard(prefix: &str) -> Keyboard {
    let button =
        |lookback: Lookback| Button::new(lookback.label(), format!("{}_days_{}", prefix, lookback.days()));

    Keyboard::new()
        .row(vec![button(Lookback::Day), button(Lookback::Week)])
        .row(vec![button(Lookback::TwoWeeks), button(Lookback::Month)])
        .row(vec![button(Lookback::Quarter)])
}

/// Parse `"{prefix}_days_{n}"` callback data back into a lookback
pub(crate) fn parse_lookback(data: &str, prefix: &str) -> Option<Lookback> {
    let days = data
        .strip_prefix(prefix)?
        .strip_prefix("_days_")?
        .parse()
        .ok()?;
    Lookback::from_days(days)
}

//! User-Facing Text
//!
//! Welcome menu, per-step prompts and result formatting. All strings live
//! here so the flows stay free of copy.

use bot_core::{Button, Keyboard, Reply};

use crate::model::{Bias, Lookback, MarketSnapshot, RiskReward, Signal, TradePlan};

/// Welcome menu with one button per feature
pub fn welcome() -> Reply {
    let keyboard = Keyboard::new()
        .row(vec![
            Button::new("📊 RSI Analysis", "rsi"),
            Button::new("📈 Volatility", "volatility"),
        ])
        .row(vec![Button::new("⚖️ Risk/Reward Ratio", "riskreward")]);

    Reply::text(
        "👋 Hi!\n\n\
         I'm a crypto technical-analysis bot. Pick a tool to get started:\n\n\
         🔹 RSI Analysis: spot overbought and oversold zones\n\
         🔹 Volatility: estimate how risky the market is\n\
         🔹 Risk/Reward Ratio: sanity-check a trade plan\n\n\
         Choose one of the buttons below.",
    )
    .with_keyboard(keyboard)
}

pub fn prompt_coin() -> &'static str {
    "Please enter the coin name or symbol (e.g. bitcoin or btc):"
}

pub fn coin_not_found() -> &'static str {
    "⚠️ Coin not found. Please try again."
}

pub fn coin_selected(coin_id: &str) -> String {
    format!(
        "Coin {} selected. Please choose a timeframe:\n\
         Note: data granularity depends on the timeframe.",
        capitalize(coin_id)
    )
}

pub fn choose_timeframe() -> &'static str {
    "Please pick one of the timeframe buttons."
}

pub fn no_data() -> &'static str {
    "❌ No data found for this coin. Please try again."
}

pub fn rsi_unavailable() -> &'static str {
    "⚠️ RSI could not be computed or there is not enough data. Please pick another timeframe."
}

pub fn volatility_unavailable() -> &'static str {
    "⚠️ Volatility could not be computed for this coin."
}

pub fn prompt_entry() -> &'static str {
    "Please enter the entry price:"
}

pub fn prompt_stop() -> &'static str {
    "Please enter the stop-loss price:"
}

pub fn prompt_target() -> &'static str {
    "Please enter the profit target price:"
}

pub fn invalid_number() -> &'static str {
    "Invalid input. Please enter a number."
}

pub fn chart_caption(coin_id: &str, lookback: Lookback) -> String {
    format!("{} price and RSI over {}", capitalize(coin_id), lookback)
}

/// Annualized volatility result
pub fn volatility_result(coin_id: &str, lookback: Lookback, volatility_pct: f64) -> String {
    format!(
        "📈 Estimated annualized volatility for {} over the last {}:\n🔹 {:.2}%",
        capitalize(coin_id),
        lookback,
        volatility_pct
    )
}

/// Full RSI analysis message: headline, explanation, and trade levels when
/// the signal is actionable
pub fn rsi_analysis(
    coin_id: &str,
    lookback: Lookback,
    last_price: f64,
    rsi_value: f64,
    signal: &Signal,
    snapshot: Option<&MarketSnapshot>,
) -> String {
    let mut msg = format!(
        "📊 Technical analysis for {} based on the last {}:\n\
         🔹 Last price: ${}\n\
         🔹 RSI: {:.2}\n",
        capitalize(coin_id),
        lookback,
        format_number(last_price),
        rsi_value
    );

    if let Some(change) = snapshot.and_then(|s| s.price_change_percentage_24h) {
        msg.push_str(&format!("🔹 24h change: {:+.2}%\n", change));
    }
    msg.push('\n');

    let (headline, explanation) = match signal.bias {
        Bias::Bullish => (
            "✅ Buy entry signal (oversold)",
            "RSI is below 30, which indicates oversold conditions. This is often read \
             as an opportunity to open a long position, since a bounce becomes more \
             likely. Check volume and confirming indicators before entering; the stop \
             below is sized from realized volatility to keep the risk/reward sensible.",
        ),
        Bias::Bearish => (
            "🔻 Exit or sell signal (overbought)",
            "RSI is above 70, which indicates overbought conditions. This is usually a \
             warning that a correction or trend reversal may start. Experienced traders \
             tend to close longs here or open shorts with strict risk management; stop \
             and target below are sized from realized volatility.",
        ),
        Bias::Neutral => (
            "🔄 Market is ranging - caution advised",
            "RSI sits between 30 and 70, which signals a balanced market without a \
             clear trend. Entering a trade on RSI alone carries real risk here; waiting \
             for stronger confirmation from other indicators is the safer play.",
        ),
    };

    msg.push_str(headline);
    msg.push_str("\n\n");
    msg.push_str(explanation);
    msg.push_str("\n\n");

    match (signal.entry, signal.stop, signal.target, signal.ratio) {
        (Some(entry), Some(stop), Some(target), Some(ratio)) => {
            msg.push_str(&format!(
                "🎯 Suggested entry: ${}\n\
                 🛑 Stop loss: ${}\n\
                 🏆 Take profit: ${}\n\
                 ⚖️ Risk/Reward ratio: {:.2}\n\n\
                 💡 Note: this is a probabilistic signal, not financial advice. \
                 Always manage your risk and respect the stop loss.",
                format_number(entry),
                format_number(stop),
                format_number(target),
                ratio
            ));
        }
        _ => {
            msg.push_str("💡 Under current conditions it is better to stay out and avoid unnecessary risk.");
        }
    }

    msg
}

/// Risk/reward breakdown for a valid trade plan
pub fn riskreward_result(plan: &TradePlan, result: &RiskReward) -> String {
    let (risk, reward, ratio) = match (result.risk, result.reward, result.ratio) {
        (Some(risk), Some(reward), Some(ratio)) => (risk, reward, ratio),
        _ => return crate::error::AdvisorError::InvalidPosition.user_message(),
    };

    format!(
        "⚖️ Risk/reward analysis for a {} position:\n\
         Entry: {}\n\
         Stop loss: {}\n\
         Profit target: {}\n\
         ------------------\n\
         📉 Risk: {}\n\
         📈 Reward: {}\n\
         ------------------\n\
         🔹 Reward/Risk ratio: {:.2}\n\n\
         For every 1 unit of risk you take, you stand to gain {:.2} units of reward.",
        result.direction,
        format_number(plan.entry),
        format_number(plan.stop),
        format_number(plan.target),
        format_number(risk),
        format_number(reward),
        ratio,
        ratio
    )
}

/// Thousands separators with 2 decimals, or 6 decimals below one unit
pub fn format_number(value: f64) -> String {
    let decimals: usize = if value.abs() >= 1.0 { 2 } else { 6 };
    let formatted = format!("{value:.decimals$}");

    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int, frac)) => (int.to_string(), Some(frac.to_string())),
        None => (formatted, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part.as_str()),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

//! Signal Synthesizer
//!
//! Maps the latest RSI reading plus realized volatility to a directional
//! bias and, when actionable, a suggested entry/stop/target triple.
//!
//! Threshold policy: RSI below 30 is a bullish (oversold) signal, above 70
//! bearish (overbought), anything between is neutral. Stop and target are
//! placed multiplicatively around the last close, scaled by the realized
//! per-period volatility so quiet markets get tight levels and volatile
//! ones wide levels. Bearish bias flips the offsets.

use crate::metrics;
use crate::model::{Bias, Signal};

/// RSI at or below this is oversold
pub const OVERSOLD_THRESHOLD: f64 = 30.0;

/// RSI at or above this is overbought
pub const OVERBOUGHT_THRESHOLD: f64 = 70.0;

/// Stop offset: realized volatility times this
pub const RISK_MULTIPLIER: f64 = 1.5;

/// Target offset: realized volatility times this
pub const REWARD_MULTIPLIER: f64 = 3.0;

/// Fallback realized volatility when the series has too few returns
pub const DEFAULT_REALIZED_VOL: f64 = 0.02;

/// Derive a signal from the latest RSI value, the last close and the
/// realized (per-period, fractional) volatility.
///
/// Neutral bias produces no levels and no ratio. For an actionable bias
/// the ratio comes from feeding the synthesized levels through
/// [`metrics::risk_reward`], so a zero volatility (levels collapsing onto
/// the entry) yields no ratio.
pub fn synthesize(last_rsi: f64, last_close: f64, realized_vol: f64) -> Signal {
    let risk_pct = realized_vol * RISK_MULTIPLIER;
    let reward_pct = realized_vol * REWARD_MULTIPLIER;

    let (bias, entry, stop, target) = if last_rsi < OVERSOLD_THRESHOLD {
        (
            Bias::Bullish,
            Some(last_close),
            Some(last_close * (1.0 - risk_pct)),
            Some(last_close * (1.0 + reward_pct)),
        )
    } else if last_rsi > OVERBOUGHT_THRESHOLD {
        (
            Bias::Bearish,
            Some(last_close),
            Some(last_close * (1.0 + risk_pct)),
            Some(last_close * (1.0 - reward_pct)),
        )
    } else {
        (Bias::Neutral, None, None, None)
    };

    let ratio = match (entry, stop, target) {
        (Some(e), Some(s), Some(t)) => metrics::risk_reward(e, s, t).ratio,
        _ => None,
    };

    Signal {
        bias,
        entry,
        stop,
        target,
        ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_oversold_is_bullish() {
        let signal = synthesize(25.0, 100.0, 0.02);

        assert_eq!(signal.bias, Bias::Bullish);
        assert_eq!(signal.entry, Some(100.0));
        assert!((signal.stop.unwrap() - 97.0).abs() < EPS);
        assert!((signal.target.unwrap() - 106.0).abs() < EPS);
        // target > entry > stop: a valid long
        assert!(signal.target.unwrap() > signal.entry.unwrap());
        assert!(signal.entry.unwrap() > signal.stop.unwrap());
        // reward_pct / risk_pct = 3 / 1.5
        assert!((signal.ratio.unwrap() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_overbought_is_bearish() {
        let signal = synthesize(75.0, 100.0, 0.02);

        assert_eq!(signal.bias, Bias::Bearish);
        assert!((signal.stop.unwrap() - 103.0).abs() < EPS);
        assert!((signal.target.unwrap() - 94.0).abs() < EPS);
        assert!(signal.stop.unwrap() > signal.entry.unwrap());
        assert!(signal.entry.unwrap() > signal.target.unwrap());
        assert!((signal.ratio.unwrap() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_mid_range_is_neutral() {
        let signal = synthesize(50.0, 100.0, 0.02);

        assert_eq!(signal.bias, Bias::Neutral);
        assert!(signal.entry.is_none());
        assert!(signal.stop.is_none());
        assert!(signal.target.is_none());
        assert!(signal.ratio.is_none());
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert_eq!(synthesize(30.0, 100.0, 0.02).bias, Bias::Neutral);
        assert_eq!(synthesize(70.0, 100.0, 0.02).bias, Bias::Neutral);
        assert_eq!(synthesize(29.9, 100.0, 0.02).bias, Bias::Bullish);
        assert_eq!(synthesize(70.1, 100.0, 0.02).bias, Bias::Bearish);
    }

    #[test]
    fn test_zero_volatility_has_no_ratio() {
        let signal = synthesize(25.0, 100.0, 0.0);

        assert_eq!(signal.bias, Bias::Bullish);
        // levels collapse onto the entry, so no valid ordering and no ratio
        assert!(signal.ratio.is_none());
    }
}

//! Indicator Engine
//!
//! Pure computation over ordered close-price series. No I/O, no shared
//! state; every function is reentrant and safe to call from concurrent
//! requests. Inputs are oldest-first.

use crate::error::{AdvisorError, Result};
use crate::model::{Direction, RiskReward};

/// Default RSI smoothing length
pub const DEFAULT_RSI_LENGTH: usize = 14;

/// Assumed trading periods per year used for annualization. A fixed
/// simplification: the actual sampling cadence varies from 30-minute to
/// 4-day candles depending on the lookback window.
pub const TRADING_PERIODS_PER_YEAR: f64 = 252.0;

/// Relative Strength Index over a close-price series.
///
/// Wilder-style smoothing expressed as an exponentially weighted mean with
/// center of mass `length - 1` (smoothing factor `1/length`, adjusted
/// weighting). The output is index-aligned with the input; the first
/// `length` entries are `None` because an average needs `length` delta
/// observations before it is defined. When the average loss is zero and
/// gains exist the value saturates at 100; a window with neither gains nor
/// losses has no defined value.
///
/// Requires at least `length + 1` closes so the trailing value is defined;
/// fewer fail with `InsufficientData`, as does a series (e.g. a constant
/// one) whose output would be entirely undefined.
pub fn rsi(closes: &[f64], length: usize) -> Result<Vec<Option<f64>>> {
    if length == 0 {
        return Err(AdvisorError::InsufficientData(
            "rsi length must be at least 1".into(),
        ));
    }
    if closes.len() < length + 1 {
        return Err(AdvisorError::InsufficientData(format!(
            "rsi({}) needs at least {} closes, got {}",
            length,
            length + 1,
            closes.len()
        )));
    }

    let alpha = 1.0 / length as f64;
    let decay = 1.0 - alpha;

    let mut out = vec![None; closes.len()];

    // Adjusted EWM: weighted sums with weights decay^k, normalized by the
    // running weight total, updated one delta at a time.
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    let mut weight_sum = 0.0;

    for i in 1..closes.len() {
        let delta = closes[i] - closes[i - 1];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        gain_sum = gain + decay * gain_sum;
        loss_sum = loss + decay * loss_sum;
        weight_sum = 1.0 + decay * weight_sum;

        // Warm-up: fewer than `length` observed deltas
        if i < length {
            continue;
        }

        let avg_gain = gain_sum / weight_sum;
        let avg_loss = loss_sum / weight_sum;

        out[i] = if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                None
            } else {
                Some(100.0)
            }
        } else {
            let rs = avg_gain / avg_loss;
            Some(100.0 - 100.0 / (1.0 + rs))
        };
    }

    if out.iter().all(Option::is_none) {
        return Err(AdvisorError::InsufficientData(
            "rsi produced no defined values".into(),
        ));
    }

    Ok(out)
}

/// Fractional period returns `(c_i - c_{i-1}) / c_{i-1}`, oldest first.
/// One element shorter than the input.
fn period_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect()
}

/// Per-period realized volatility: the sample standard deviation of
/// fractional returns (N-1 denominator), as a fraction.
///
/// Needs at least two return observations (three closes); fewer fail with
/// `InsufficientData`.
pub fn realized_volatility(closes: &[f64]) -> Result<f64> {
    let returns = period_returns(closes);
    if returns.len() < 2 {
        return Err(AdvisorError::InsufficientData(format!(
            "volatility needs at least 2 return observations, got {}",
            returns.len()
        )));
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns
        .iter()
        .map(|r| {
            let d = r - mean;
            d * d
        })
        .sum::<f64>()
        / (n - 1.0);

    Ok(variance.sqrt())
}

/// Annualized volatility as a percentage: realized volatility scaled by
/// the square root of [`TRADING_PERIODS_PER_YEAR`].
pub fn annualized_volatility(closes: &[f64]) -> Result<f64> {
    Ok(realized_volatility(closes)? * TRADING_PERIODS_PER_YEAR.sqrt() * 100.0)
}

/// Classify a trade plan and compute risk, reward and their ratio.
///
/// Strict ordering decides the direction: `target > entry > stop` is long,
/// `stop > entry > target` is short, anything else is invalid with all
/// quantities absent. When risk is zero the ratio is absent, never
/// infinite. Never errors; the invalid direction is the only sentinel.
pub fn risk_reward(entry: f64, stop: f64, target: f64) -> RiskReward {
    let (direction, risk, reward) = if target > entry && entry > stop {
        (Direction::Long, Some(entry - stop), Some(target - entry))
    } else if stop > entry && entry > target {
        (Direction::Short, Some(stop - entry), Some(entry - target))
    } else {
        (Direction::Invalid, None, None)
    };

    let ratio = match (risk, reward) {
        (Some(r), Some(w)) if r > 0.0 => Some(w / r),
        _ => None,
    };

    RiskReward {
        direction,
        risk,
        reward,
        ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn rising(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_rsi_short_series_fails() {
        // length + 1 closes required
        let closes = rising(14);
        assert!(matches!(
            rsi(&closes, 14),
            Err(AdvisorError::InsufficientData(_))
        ));
        assert!(rsi(&[], 14).is_err());
    }

    #[test]
    fn test_rsi_warm_up_prefix() {
        let closes = rising(20);
        let values = rsi(&closes, 14).unwrap();

        assert_eq!(values.len(), 20);
        assert!(values[..14].iter().all(Option::is_none));
        assert!(values[14..].iter().all(Option::is_some));
    }

    #[test]
    fn test_rsi_monotonic_up_is_100() {
        let values = rsi(&rising(30), 14).unwrap();
        for v in values.into_iter().flatten() {
            assert!((v - 100.0).abs() < EPS);
        }
    }

    #[test]
    fn test_rsi_monotonic_down_is_0() {
        let closes: Vec<f64> = (1..=30).rev().map(|i| i as f64).collect();
        let values = rsi(&closes, 14).unwrap();
        for v in values.into_iter().flatten() {
            assert!(v.abs() < EPS);
        }
    }

    #[test]
    fn test_rsi_bounded() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + 10.0 * ((i as f64) * 0.7).sin() + (i as f64) * 0.1)
            .collect();
        let values = rsi(&closes, 14).unwrap();

        let mut defined = 0;
        for v in values.into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "rsi {} out of range", v);
            defined += 1;
        }
        assert_eq!(defined, 60 - 14);
    }

    #[test]
    fn test_rsi_constant_series_fails() {
        let closes = vec![42.0; 20];
        assert!(matches!(
            rsi(&closes, 14),
            Err(AdvisorError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_volatility_constant_is_zero() {
        let closes = vec![100.0; 10];
        assert!(annualized_volatility(&closes).unwrap().abs() < EPS);
    }

    #[test]
    fn test_volatility_insufficient() {
        assert!(annualized_volatility(&[]).is_err());
        assert!(annualized_volatility(&[100.0]).is_err());
        // a single return has no sample standard deviation
        assert!(annualized_volatility(&[100.0, 110.0]).is_err());
    }

    #[test]
    fn test_volatility_known_value() {
        // returns: 0.1, -0.1, 0.1 -> sample std 0.11547, annualized 183.3%
        let closes = vec![100.0, 110.0, 99.0, 108.9];
        let vol = annualized_volatility(&closes).unwrap();
        assert!((vol - 183.303).abs() < 1e-2, "got {}", vol);
    }

    #[test]
    fn test_risk_reward_long() {
        let rr = risk_reward(110.0, 95.0, 130.0);
        assert_eq!(rr.direction, Direction::Long);
        assert_eq!(rr.risk, Some(15.0));
        assert_eq!(rr.reward, Some(20.0));
        assert!((rr.ratio.unwrap() - 20.0 / 15.0).abs() < EPS);
    }

    #[test]
    fn test_risk_reward_short() {
        let rr = risk_reward(100.0, 110.0, 90.0);
        assert_eq!(rr.direction, Direction::Short);
        assert_eq!(rr.risk, Some(10.0));
        assert_eq!(rr.reward, Some(10.0));
        assert!((rr.ratio.unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_risk_reward_tight_stop_is_still_short() {
        // stop > entry > target holds however close the stop sits
        let rr = risk_reward(100.0, 105.0, 90.0);
        assert_eq!(rr.direction, Direction::Short);
        assert_eq!(rr.risk, Some(5.0));
        assert_eq!(rr.reward, Some(10.0));
        assert!((rr.ratio.unwrap() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_risk_reward_invalid_ordering() {
        // stop and target both below entry: neither long nor short
        let rr = risk_reward(100.0, 90.0, 80.0);
        assert_eq!(rr.direction, Direction::Invalid);
        assert!(rr.risk.is_none());
        assert!(rr.reward.is_none());
        assert!(rr.ratio.is_none());
    }

    #[test]
    fn test_risk_reward_zero_risk_has_no_ratio() {
        // entry == stop fails the strict ordering, so no ratio is reported
        let rr = risk_reward(100.0, 100.0, 120.0);
        assert!(rr.ratio.is_none());
    }
}

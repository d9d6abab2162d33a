//! Historical risk metrics over a daily return series
//!
//! Every function is pure over its inputs. Degenerate inputs (flat returns,
//! an empty tail) produce documented fallbacks rather than errors.

use crate::error::{RiskError, Result};
use statrs::statistics::Statistics;

pub const TRADING_DAYS: f64 = 252.0;
pub const ROLLING_WINDOW: usize = 21;

/// Standard deviations at or below this are treated as zero
const FLAT_STD: f64 = 1e-12;

/// Percentile with linear interpolation between closest ranks, `p` in [0, 100]
pub fn percentile(data: &[f64], p: f64) -> Result<f64> {
    if data.is_empty() {
        return Err(RiskError::InsufficientData("percentile of an empty sample".to_string()));
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(RiskError::Validation(format!("percentile must be in [0, 100], got {}", p)));
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Historical VaR at `confidence` as a positive dollar loss
pub fn value_at_risk(returns: &[f64], confidence: f64, base_value: f64) -> Result<f64> {
    if !(0.0 < confidence && confidence < 1.0) {
        return Err(RiskError::Validation(format!(
            "confidence must be in (0, 1), got {}",
            confidence
        )));
    }
    let cutoff = percentile(returns, 100.0 * (1.0 - confidence))?;
    Ok(-cutoff * base_value)
}

/// Mean loss of the returns strictly below the VaR cutoff
///
/// An empty tail yields `var` itself.
pub fn conditional_var(returns: &[f64], var: f64, base_value: f64) -> f64 {
    let threshold = -var / base_value;
    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r < threshold).collect();
    if tail.is_empty() {
        return var;
    }
    -tail.iter().mean() * base_value
}

/// Population standard deviation of daily returns scaled by sqrt(252)
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    returns.iter().population_std_dev() * TRADING_DAYS.sqrt()
}

/// Annualized mean over annualized volatility, `None` for a flat series
pub fn sharpe_ratio(returns: &[f64]) -> Option<f64> {
    if returns.is_empty() {
        return None;
    }
    let std = returns.iter().population_std_dev();
    if !std.is_finite() || std <= FLAT_STD {
        return None;
    }
    Some(returns.iter().mean() * TRADING_DAYS / (std * TRADING_DAYS.sqrt()))
}

/// Fractional distance from the running peak at each point, always <= 0
pub fn drawdown_series(values: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    values
        .iter()
        .map(|&v| {
            peak = peak.max(v);
            if peak > 0.0 {
                (v - peak) / peak
            } else {
                0.0
            }
        })
        .collect()
}

pub fn max_drawdown(values: &[f64]) -> f64 {
    drawdown_series(values).into_iter().fold(0.0, f64::min)
}

/// VaR at 95% over each trailing window; `None` until the window fills
pub fn rolling_var(returns: &[f64], window: usize, base_value: f64) -> Result<Vec<Option<f64>>> {
    if window == 0 {
        return Err(RiskError::Validation("rolling window must be positive".to_string()));
    }
    let mut out = vec![None; returns.len()];
    for end in window..=returns.len() {
        out[end - 1] = Some(value_at_risk(&returns[end - window..end], 0.95, base_value)?);
    }
    Ok(out)
}

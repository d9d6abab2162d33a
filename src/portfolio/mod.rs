//! Portfolio value-at-risk and performance metrics
//!
//! A [`PortfolioRiskReport`] is derived from a single [`ReturnSeries`]
//! snapshot. All figures are computed together so the dashboard never mixes
//! metrics from different series.

mod metrics;
mod series;

pub use metrics::{
    annualized_volatility, conditional_var, drawdown_series, max_drawdown, percentile, rolling_var,
    sharpe_ratio, value_at_risk, ROLLING_WINDOW, TRADING_DAYS,
};
pub use series::ReturnSeries;

use crate::error::Result;
use serde::Serialize;

/// Market risk summary for one return series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioRiskReport {
    /// Notional the dollar figures are scaled by
    pub base_value: f64,
    pub var_95: f64,
    pub var_99: f64,
    /// Expected shortfall beyond VaR95, or VaR95 when no return is worse
    pub cvar_95: f64,
    pub volatility: f64,
    /// `None` when the return series is flat
    pub sharpe: Option<f64>,
    pub max_drawdown: f64,
    /// 21-day VaR95 per position; the first 20 are undefined
    pub rolling_var: Vec<Option<f64>>,
}

impl PortfolioRiskReport {
    /// Number of rolling VaR positions that carry a value
    pub fn rolling_defined(&self) -> usize {
        self.rolling_var.iter().filter(|v| v.is_some()).count()
    }
}

/// Compute every portfolio metric from one series snapshot
pub fn compute_portfolio_risk_report(series: &ReturnSeries, base_value: f64) -> Result<PortfolioRiskReport> {
    let returns = series.returns();
    let var_95 = value_at_risk(returns, 0.95, base_value)?;
    let var_99 = value_at_risk(returns, 0.99, base_value)?;

    Ok(PortfolioRiskReport {
        base_value,
        var_95,
        var_99,
        cvar_95: conditional_var(returns, var_95, base_value),
        volatility: annualized_volatility(returns),
        sharpe: sharpe_ratio(returns),
        max_drawdown: max_drawdown(series.values()),
        rolling_var: rolling_var(returns, ROLLING_WINDOW, base_value)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_for_flat_series() {
        let series = ReturnSeries::from_returns(10_000_000.0, vec![0.0003; 40], Vec::new()).unwrap();
        let report = compute_portfolio_risk_report(&series, 10_000_000.0).unwrap();

        assert_eq!(report.sharpe, None);
        assert_eq!(report.cvar_95, report.var_95);
        assert_eq!(report.max_drawdown, 0.0);
        assert_eq!(report.rolling_var.len(), 40);
        assert_eq!(report.rolling_defined(), 20);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["sharpe"].is_null());
        assert!(json["rolling_var"][0].is_null());
    }

    #[test]
    fn test_report_with_losses() {
        let returns: Vec<f64> = (0..100)
            .map(|i| if i % 10 == 0 { -0.03 } else { 0.004 })
            .collect();
        let series = ReturnSeries::from_returns(1_000_000.0, returns, Vec::new()).unwrap();
        let report = compute_portfolio_risk_report(&series, 1_000_000.0).unwrap();

        assert!(report.var_95 > 0.0);
        assert!(report.var_99 >= report.var_95);
        assert!(report.cvar_95 >= report.var_95);
        assert!(report.max_drawdown < 0.0);
        assert!(report.sharpe.is_some());
        assert_eq!(report.rolling_defined(), 100 - 20);
    }
}

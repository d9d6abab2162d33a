//! Market risk page

use super::stats::{dated, Histogram, SeriesPoint};
use crate::context::RiskContext;
use crate::portfolio::{drawdown_series, PortfolioRiskReport};
use serde::Serialize;

const RETURN_BINS: usize = 60;

#[derive(Debug, Clone, Serialize)]
pub struct MarketRiskDashboard {
    pub report: PortfolioRiskReport,
    /// Daily returns in percent
    pub return_histogram_pct: Histogram,
    pub drawdown_pct: Vec<SeriesPoint>,
    /// Rolling VaR95 in thousands of dollars
    pub rolling_var_kusd: Vec<SeriesPoint>,
    pub portfolio_value_musd: Vec<SeriesPoint>,
}

pub fn market_risk(ctx: &RiskContext) -> MarketRiskDashboard {
    let series = &ctx.data().market;
    let report = ctx.market_report().clone();
    let returns_pct: Vec<f64> = series.returns().iter().map(|r| r * 100.0).collect();

    MarketRiskDashboard {
        return_histogram_pct: Histogram::new(&returns_pct, RETURN_BINS),
        drawdown_pct: dated(
            series.dates(),
            drawdown_series(series.values()).into_iter().map(|d| Some(d * 100.0)),
        ),
        rolling_var_kusd: dated(
            series.dates(),
            report.rolling_var.iter().map(|v| v.map(|var| var / 1e3)),
        ),
        portfolio_value_musd: dated(series.dates(), series.values().iter().map(|v| Some(v / 1e6))),
        report,
    }
}

//! Chart-ready aggregates for each dashboard page
//!
//! Pages are computed on demand from the immutable [`RiskContext`] and
//! returned as plain serializable structs; the front end owns the rendering.

mod banking;
mod insurance;
mod market;
mod stats;

pub use banking::{
    age_group, credit_risk, debt_group, fraud_detection, home, largest_purpose, loan_portfolio,
    CreditRiskDashboard, FlaggedTransaction, FraudDashboard, HomeDashboard, LoanPortfolioDashboard, PurposeStat,
};
pub use insurance::{
    claims, loss_ratio, underwriting, ClaimStats, ClaimsDashboard, LossRatioDashboard, MonthlyRatio,
    RegionLossRatio, UnderwritingDashboard, EXPENSE_RATIO,
};
pub use market::{market_risk, MarketRiskDashboard};
pub use stats::{FeatureWeight, GroupStat, Heatmap, Histogram, SeriesPoint, Summary};

use crate::context::RiskContext;
use crate::error::Result;
use serde_json::Value;

/// Dashboard pages addressable by URL slug
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardPage {
    Home,
    CreditRisk,
    FraudDetection,
    MarketRisk,
    LoanPortfolio,
    Claims,
    Underwriting,
    LossRatio,
}

impl DashboardPage {
    pub const ALL: [DashboardPage; 8] = [
        DashboardPage::Home,
        DashboardPage::CreditRisk,
        DashboardPage::FraudDetection,
        DashboardPage::MarketRisk,
        DashboardPage::LoanPortfolio,
        DashboardPage::Claims,
        DashboardPage::Underwriting,
        DashboardPage::LossRatio,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            DashboardPage::Home => "home",
            DashboardPage::CreditRisk => "credit-risk",
            DashboardPage::FraudDetection => "fraud-detection",
            DashboardPage::MarketRisk => "market-risk",
            DashboardPage::LoanPortfolio => "loan-portfolio",
            DashboardPage::Claims => "claims",
            DashboardPage::Underwriting => "underwriting",
            DashboardPage::LossRatio => "loss-ratio",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.slug() == slug)
    }
}

/// Compute one page as JSON
pub fn render(ctx: &RiskContext, page: DashboardPage) -> Result<Value> {
    let value = match page {
        DashboardPage::Home => serde_json::to_value(home(ctx))?,
        DashboardPage::CreditRisk => serde_json::to_value(credit_risk(ctx))?,
        DashboardPage::FraudDetection => serde_json::to_value(fraud_detection(ctx))?,
        DashboardPage::MarketRisk => serde_json::to_value(market_risk(ctx))?,
        DashboardPage::LoanPortfolio => serde_json::to_value(loan_portfolio(ctx))?,
        DashboardPage::Claims => serde_json::to_value(claims(ctx))?,
        DashboardPage::Underwriting => serde_json::to_value(underwriting(ctx)?)?,
        DashboardPage::LossRatio => serde_json::to_value(loss_ratio(ctx))?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures::stub_context;

    #[test]
    fn test_slugs_round_trip() {
        for page in DashboardPage::ALL {
            assert_eq!(DashboardPage::from_slug(page.slug()), Some(page));
        }
        assert_eq!(DashboardPage::from_slug("admin"), None);
    }

    #[test]
    fn test_every_page_renders_object() {
        let ctx = stub_context(0.3, 0.3, 0.3);
        for page in DashboardPage::ALL {
            let json = render(&ctx, page).unwrap();
            assert!(json.is_object(), "{} did not render an object", page.slug());
        }
    }
}

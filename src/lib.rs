//! RiskSight - banking and insurance risk analytics
//!
//! This library provides:
//! - Credit default, fraud and underwriting scoring over fitted models
//! - Expected loss and premium loading calculators
//! - Portfolio VaR, CVaR, volatility, Sharpe and drawdown metrics
//! - Seeded synthetic datasets and chart-ready dashboard aggregates
//! - An axum HTTP service sharing one immutable risk context

pub mod analytics;
pub mod config;
pub mod context;
pub mod error;
pub mod features;
pub mod models;
pub mod portfolio;
pub mod scoring;
pub mod server;
pub mod synthetic;

// Re-export commonly used types
pub use config::DashboardConfig;
pub use context::RiskContext;
pub use error::{Result, RiskError};
pub use features::{CreditApplication, FraudTransaction, MerchantRisk, Region, UnderwritingApplicant};
pub use portfolio::{compute_portfolio_risk_report, PortfolioRiskReport, ReturnSeries};
pub use scoring::{CreditAssessment, FraudAssessment, UnderwritingAssessment};

//! Process-wide risk context built once at startup
//!
//! Generates the synthetic datasets, fits the three models and computes the
//! market report. After [`RiskContext::build`] returns nothing in the context
//! changes, so it can be shared behind an `Arc` by any number of request
//! handlers without locking.

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::features::{CreditApplication, FeatureScaler, FraudTransaction, UnderwritingApplicant};
use crate::models::{
    training_accuracy, GradientBoosting, LogisticRegression, ModelDiagnostics, ProbabilityModel,
    RandomForest, TrainedModel,
};
use crate::portfolio::{compute_portfolio_risk_report, PortfolioRiskReport};
use crate::scoring::{self, CreditAssessment, FraudAssessment, UnderwritingAssessment};
use crate::synthetic::{self, SyntheticData};
use chrono::Local;
use log::info;
use std::time::Instant;

/// Trained models, their training data and the market snapshot
#[derive(Debug)]
pub struct RiskContext {
    config: DashboardConfig,
    data: SyntheticData,
    credit_model: TrainedModel,
    fraud_model: TrainedModel,
    underwriting_model: TrainedModel,
    market_report: PortfolioRiskReport,
}

impl RiskContext {
    /// Generate data and fit every model; any failure here is fatal for the service
    pub fn build(config: &DashboardConfig) -> Result<Self> {
        config.validate()?;
        let started = Instant::now();

        let market_end = config.market_end.unwrap_or_else(|| Local::now().date_naive());
        let data = synthetic::generate(config.seed, &config.sizes, config.base_value, market_end)?;

        let forest_params = config.models.forest;
        let credit_model = fit_model(
            "credit",
            &CreditApplication::FEATURE_NAMES,
            data.credit.iter().map(|r| r.application().to_vector().to_vec()).collect(),
            data.credit.iter().map(|r| label(r.default)).collect(),
            |x, y| RandomForest::fit(x, y, forest_params),
        )?;

        let boosting_params = config.models.boosting;
        let fraud_model = fit_model(
            "fraud",
            &FraudTransaction::FEATURE_NAMES,
            data.transactions.iter().map(|t| t.transaction().to_vector().to_vec()).collect(),
            data.transactions.iter().map(|t| label(t.fraud)).collect(),
            |x, y| GradientBoosting::fit(x, y, boosting_params),
        )?;

        let logistic_params = config.models.logistic;
        let underwriting_model = fit_model(
            "underwriting",
            &UnderwritingApplicant::FEATURE_NAMES,
            data.policies.iter().map(|p| p.applicant().to_vector().to_vec()).collect(),
            data.policies.iter().map(|p| label(p.high_risk)).collect(),
            |x, y| LogisticRegression::fit(x, y, logistic_params),
        )?;

        let context = Self::from_parts(config.clone(), data, credit_model, fraud_model, underwriting_model)?;
        info!("Risk context ready in {} ms", started.elapsed().as_millis());
        Ok(context)
    }

    /// Assemble a context from already fitted models
    pub(crate) fn from_parts(
        config: DashboardConfig,
        data: SyntheticData,
        credit_model: TrainedModel,
        fraud_model: TrainedModel,
        underwriting_model: TrainedModel,
    ) -> Result<Self> {
        let market_report = compute_portfolio_risk_report(&data.market, config.base_value)?;
        info!(
            "Market report: VaR95 {:.0}, VaR99 {:.0}, CVaR95 {:.0}, max drawdown {:.2}%",
            market_report.var_95,
            market_report.var_99,
            market_report.cvar_95,
            market_report.max_drawdown * 100.0
        );
        Ok(Self {
            config,
            data,
            credit_model,
            fraud_model,
            underwriting_model,
            market_report,
        })
    }

    pub fn score_credit(&self, application: &CreditApplication) -> Result<CreditAssessment> {
        scoring::score_credit(&self.credit_model, application)
    }

    pub fn score_fraud(&self, transaction: &FraudTransaction) -> Result<FraudAssessment> {
        scoring::score_fraud(&self.fraud_model, transaction)
    }

    pub fn score_underwriting(&self, applicant: &UnderwritingApplicant) -> Result<UnderwritingAssessment> {
        scoring::score_underwriting(&self.underwriting_model, applicant)
    }

    /// Report computed from the startup market series
    pub fn market_report(&self) -> &PortfolioRiskReport {
        &self.market_report
    }

    pub fn data(&self) -> &SyntheticData {
        &self.data
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn credit_model(&self) -> &TrainedModel {
        &self.credit_model
    }

    pub fn fraud_model(&self) -> &TrainedModel {
        &self.fraud_model
    }

    pub fn underwriting_model(&self) -> &TrainedModel {
        &self.underwriting_model
    }

    /// `(domain, model name)` for each fitted model
    pub fn model_names(&self) -> [(&'static str, &'static str); 3] {
        [
            ("credit", self.credit_model.name()),
            ("fraud", self.fraud_model.name()),
            ("underwriting", self.underwriting_model.name()),
        ]
    }
}

fn label(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Fit a scaler on `rows`, then a model on the scaled rows, recording diagnostics
fn fit_model<M, F>(
    domain: &str,
    feature_names: &[&'static str],
    rows: Vec<Vec<f64>>,
    labels: Vec<f64>,
    fit: F,
) -> Result<TrainedModel>
where
    M: ProbabilityModel + 'static,
    F: FnOnce(&[Vec<f64>], &[f64]) -> Result<M>,
{
    let started = Instant::now();
    let scaler = FeatureScaler::fit(&rows)?;
    let x = scaler.transform_all(&rows)?;
    let model = fit(&x, &labels)?;

    let diagnostics = ModelDiagnostics {
        model: model.name(),
        training_rows: x.len(),
        training_accuracy: training_accuracy(&model, &x, &labels),
        positive_rate: labels.iter().sum::<f64>() / labels.len().max(1) as f64,
        fit_millis: started.elapsed().as_millis() as u64,
    };
    info!(
        "Fitted {} model ({}) on {} rows in {} ms: training accuracy {:.3}, positive rate {:.3}",
        domain,
        diagnostics.model,
        diagnostics.training_rows,
        diagnostics.fit_millis,
        diagnostics.training_accuracy,
        diagnostics.positive_rate
    );

    Ok(TrainedModel::new(feature_names, scaler, Box::new(model))?.with_diagnostics(diagnostics))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::models::stub::constant;
    use crate::synthetic::DatasetSizes;
    use chrono::NaiveDate;

    /// Small dataset with constant-probability models
    pub fn stub_context(credit_pd: f64, fraud_prob: f64, risk_score: f64) -> RiskContext {
        let config = DashboardConfig {
            sizes: DatasetSizes {
                credit: 120,
                transactions: 200,
                policies: 100,
                market_days: 60,
            },
            market_end: NaiveDate::from_ymd_opt(2024, 6, 28),
            ..DashboardConfig::default()
        };
        let end = config.market_end.unwrap();
        let data = synthetic::generate(config.seed, &config.sizes, config.base_value, end).unwrap();
        RiskContext::from_parts(
            config,
            data,
            constant(&CreditApplication::FEATURE_NAMES, credit_pd),
            constant(&FraudTransaction::FEATURE_NAMES, fraud_prob),
            constant(&UnderwritingApplicant::FEATURE_NAMES, risk_score),
        )
        .unwrap()
    }
}

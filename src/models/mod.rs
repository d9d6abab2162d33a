//! Probability models fitted once on synthetic data and shared read-only
//!
//! The scoring calculators only depend on [`ProbabilityModel`], so they can be
//! exercised with stub models that return known probabilities.

mod boosting;
mod forest;
mod logistic;
mod tree;

pub use boosting::{BoostingParams, GradientBoosting};
pub use forest::{ForestParams, RandomForest};
pub use logistic::{LogisticParams, LogisticRegression};
pub use tree::{RegressionTree, TreeParams};

use crate::error::{RiskError, Result};
use crate::features::FeatureScaler;
use serde::Serialize;

/// Black-box scorer over standardized features
pub trait ProbabilityModel: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Probability of the positive class, in [0, 1]
    fn predict_proba(&self, features: &[f64]) -> f64;

    /// Per-feature weight for display (importances or absolute coefficients)
    fn feature_weights(&self) -> Vec<f64> {
        Vec::new()
    }
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Fit summary reported at startup and on the dashboards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDiagnostics {
    pub model: &'static str,
    pub training_rows: usize,
    /// Share of training rows classified correctly at the 0.5 cutoff
    pub training_accuracy: f64,
    pub positive_rate: f64,
    pub fit_millis: u64,
}

/// A fitted scaler paired with the model that consumes its output
#[derive(Debug)]
pub struct TrainedModel {
    feature_names: Vec<&'static str>,
    scaler: FeatureScaler,
    model: Box<dyn ProbabilityModel>,
    diagnostics: Option<ModelDiagnostics>,
}

impl TrainedModel {
    pub fn new(
        feature_names: &[&'static str],
        scaler: FeatureScaler,
        model: Box<dyn ProbabilityModel>,
    ) -> Result<Self> {
        if scaler.n_features() != feature_names.len() {
            return Err(RiskError::DimensionMismatch {
                expected: feature_names.len(),
                actual: scaler.n_features(),
            });
        }
        Ok(Self {
            feature_names: feature_names.to_vec(),
            scaler,
            model,
            diagnostics: None,
        })
    }

    pub fn with_diagnostics(mut self, diagnostics: ModelDiagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Standardize raw features and return the model probability
    pub fn score(&self, raw: &[f64]) -> Result<f64> {
        let standardized = self.scaler.transform(raw)?;
        let probability = self.model.predict_proba(&standardized);
        if probability.is_nan() {
            return Err(RiskError::Validation("model produced NaN for the given features".to_string()));
        }
        Ok(probability.clamp(0.0, 1.0))
    }

    /// Score many raw rows, used for dashboard distributions
    pub fn score_all(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.score(row)).collect()
    }

    /// Feature names paired with the model's display weights
    pub fn feature_weights(&self) -> Vec<(&'static str, f64)> {
        self.feature_names
            .iter()
            .copied()
            .zip(self.model.feature_weights())
            .collect()
    }

    pub fn name(&self) -> &'static str {
        self.model.name()
    }

    pub fn feature_names(&self) -> &[&'static str] {
        &self.feature_names
    }

    pub fn scaler(&self) -> &FeatureScaler {
        &self.scaler
    }

    pub fn diagnostics(&self) -> Option<&ModelDiagnostics> {
        self.diagnostics.as_ref()
    }
}

/// Share of rows where the 0.5-thresholded probability matches the label
pub fn training_accuracy(model: &dyn ProbabilityModel, x: &[Vec<f64>], y: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let correct = x
        .iter()
        .zip(y)
        .filter(|&(row, label)| (model.predict_proba(row) > 0.5) == (*label > 0.5))
        .count();
    correct as f64 / x.len() as f64
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use crate::features::ScalingParameters;

    /// Returns a fixed probability regardless of input
    #[derive(Debug)]
    pub struct ConstantModel(pub f64);

    impl ProbabilityModel for ConstantModel {
        fn name(&self) -> &'static str {
            "Constant"
        }

        fn predict_proba(&self, _features: &[f64]) -> f64 {
            self.0
        }
    }

    /// Identity-scaled model that always answers `probability`
    pub fn constant(feature_names: &[&'static str], probability: f64) -> TrainedModel {
        let width = feature_names.len();
        let scaler = FeatureScaler::new(ScalingParameters {
            means: vec![0.0; width],
            stds: vec![1.0; width],
        })
        .unwrap();
        TrainedModel::new(feature_names, scaler, Box::new(ConstantModel(probability))).unwrap()
    }
}

//! Gradient boosted trees with logistic loss, used for fraud scoring

use super::tree::{RegressionTree, TreeParams};
use super::{sigmoid, ProbabilityModel};
use crate::error::{RiskError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Boosting hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    pub n_stages: usize,
    pub learning_rate: f64,
    pub max_depth: usize,
    pub seed: u64,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_stages: 100,
            learning_rate: 0.1,
            max_depth: 3,
            seed: 42,
        }
    }
}

/// Additive model on the log-odds scale
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    /// Log-odds of the training base rate
    init: f64,
    learning_rate: f64,
    stages: Vec<RegressionTree>,
    importances: Vec<f64>,
}

impl GradientBoosting {
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: BoostingParams) -> Result<Self> {
        if x.is_empty() || x.len() != y.len() {
            return Err(RiskError::InsufficientData(format!(
                "boosting needs matching non-empty rows and labels, got {} rows and {} labels",
                x.len(),
                y.len()
            )));
        }
        if !(params.learning_rate > 0.0) {
            return Err(RiskError::Validation("learning rate must be positive".to_string()));
        }

        let n = x.len();
        let n_features = x[0].len();
        let positive_rate = y.iter().sum::<f64>() / n as f64;
        let init = if positive_rate <= 0.0 || positive_rate >= 1.0 {
            // Single-class data: fall back to a large but finite margin
            if positive_rate >= 1.0 { 10.0 } else { -10.0 }
        } else {
            (positive_rate / (1.0 - positive_rate)).ln()
        };

        let tree_params = TreeParams {
            max_depth: Some(params.max_depth),
            ..TreeParams::default()
        };
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut raw = vec![init; n];
        let mut stages = Vec::with_capacity(params.n_stages);
        let mut importances = vec![0.0; n_features];

        for _ in 0..params.n_stages {
            let probs: Vec<f64> = raw.iter().map(|&f| sigmoid(f)).collect();
            let residuals: Vec<f64> = y.iter().zip(&probs).map(|(yi, p)| yi - p).collect();

            let mut tree = RegressionTree::fit(x, &residuals, (0..n).collect(), tree_params, &mut rng, &mut importances);

            // Newton step per leaf: sum(residual) / sum(p * (1 - p))
            let mut leaf_stats: HashMap<usize, (f64, f64)> = HashMap::new();
            let leaves: Vec<usize> = x.iter().map(|row| tree.leaf_index(row)).collect();
            for (i, &leaf) in leaves.iter().enumerate() {
                let entry = leaf_stats.entry(leaf).or_insert((0.0, 0.0));
                entry.0 += residuals[i];
                entry.1 += probs[i] * (1.0 - probs[i]);
            }
            for (&leaf, &(numerator, denominator)) in &leaf_stats {
                let step = if denominator.abs() < 1e-150 { 0.0 } else { numerator / denominator };
                tree.set_leaf_value(leaf, step);
            }

            for (f, row) in raw.iter_mut().zip(x) {
                *f += params.learning_rate * tree.predict(row);
            }
            stages.push(tree);
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }

        Ok(Self {
            init,
            learning_rate: params.learning_rate,
            stages,
            importances,
        })
    }

    /// Raw additive score before the sigmoid
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        self.init
            + self
                .stages
                .iter()
                .map(|tree| self.learning_rate * tree.predict(features))
                .sum::<f64>()
    }

    pub fn n_stages(&self) -> usize {
        self.stages.len()
    }
}

impl ProbabilityModel for GradientBoosting {
    fn name(&self) -> &'static str {
        "Gradient Boosting"
    }

    fn predict_proba(&self, features: &[f64]) -> f64 {
        sigmoid(self.decision_function(features))
    }

    fn feature_weights(&self) -> Vec<f64> {
        self.importances.clone()
    }
}

//! Random forest classifier used for credit default scoring

use super::tree::{RegressionTree, TreeParams};
use super::ProbabilityModel;
use crate::error::{RiskError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Forest hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

/// Bagged ensemble of classification trees
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<RegressionTree>,
    importances: Vec<f64>,
}

impl RandomForest {
    /// Fit on standardized rows and 0/1 labels
    ///
    /// Each tree draws its own bootstrap sample from a generator seeded with
    /// `seed + tree index`, so the fitted forest does not depend on how rayon
    /// schedules the trees.
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: ForestParams) -> Result<Self> {
        if x.is_empty() || x.len() != y.len() {
            return Err(RiskError::InsufficientData(format!(
                "forest needs matching non-empty rows and labels, got {} rows and {} labels",
                x.len(),
                y.len()
            )));
        }
        if params.n_trees == 0 {
            return Err(RiskError::Validation("forest needs at least one tree".to_string()));
        }

        let n = x.len();
        let n_features = x[0].len();
        let max_features = ((n_features as f64).sqrt() as usize).max(1);
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: 2,
            min_samples_leaf: params.min_samples_leaf,
            max_features: Some(max_features),
        };

        let fitted: Vec<(RegressionTree, Vec<f64>)> = (0..params.n_trees)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(t as u64));
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                let mut importances = vec![0.0; n_features];
                let tree = RegressionTree::fit(x, y, bootstrap, tree_params, &mut rng, &mut importances);
                (tree, normalized(importances))
            })
            .collect();

        let mut importances = vec![0.0; n_features];
        let mut trees = Vec::with_capacity(fitted.len());
        for (tree, tree_importances) in fitted {
            for (total, value) in importances.iter_mut().zip(&tree_importances) {
                *total += value;
            }
            trees.push(tree);
        }

        Ok(Self { trees, importances: normalized(importances) })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean impurity decrease per feature, summing to 1
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }
}

fn normalized(mut values: Vec<f64>) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter_mut().for_each(|v| *v /= total);
    }
    values
}

impl ProbabilityModel for RandomForest {
    fn name(&self) -> &'static str {
        "Random Forest"
    }

    fn predict_proba(&self, features: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        (total / self.trees.len() as f64).clamp(0.0, 1.0)
    }

    fn feature_weights(&self) -> Vec<f64> {
        self.importances.clone()
    }
}

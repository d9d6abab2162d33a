//! L2-regularised logistic regression, used for underwriting risk
//!
//! Minimises `0.5 * ||w||^2 + C * sum(log_loss)` with the intercept left
//! unpenalised, using Newton-Raphson (iteratively reweighted least squares).

use super::{sigmoid, ProbabilityModel};
use crate::error::{RiskError, Result};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Solver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    /// Inverse regularisation strength
    pub c: f64,
    pub max_iter: usize,
    pub tolerance: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 100,
            tolerance: 1e-8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
    iterations: usize,
}

impl LogisticRegression {
    pub fn fit(x: &[Vec<f64>], y: &[f64], params: LogisticParams) -> Result<Self> {
        if x.is_empty() || x.len() != y.len() {
            return Err(RiskError::InsufficientData(format!(
                "logistic regression needs matching non-empty rows and labels, got {} rows and {} labels",
                x.len(),
                y.len()
            )));
        }
        if !(params.c > 0.0) {
            return Err(RiskError::Validation("regularisation C must be positive".to_string()));
        }

        let n = x.len();
        let p = x[0].len();
        // Column 0 is the intercept
        let design = DMatrix::from_fn(n, p + 1, |i, j| if j == 0 { 1.0 } else { x[i][j - 1] });
        let labels = DVector::from_column_slice(y);
        let mut weights = DVector::<f64>::zeros(p + 1);
        let mut iterations = 0;

        for iter in 0..params.max_iter {
            iterations = iter + 1;
            let margins = &design * &weights;
            let probs = margins.map(sigmoid);

            // Gradient of the penalised objective
            let mut gradient = design.transpose() * (&probs - &labels) * params.c;
            for j in 1..=p {
                gradient[j] += weights[j];
            }

            // Hessian: C * X^T W X + I (intercept unpenalised)
            let curvature = probs.map(|q| (q * (1.0 - q)).max(1e-12));
            let weighted = DMatrix::from_fn(n, p + 1, |i, j| design[(i, j)] * curvature[i]);
            let mut hessian = design.transpose() * weighted * params.c;
            for j in 1..=p {
                hessian[(j, j)] += 1.0;
            }
            // Keeps the intercept row invertible on separable data
            hessian[(0, 0)] += 1e-10;

            let step = hessian
                .cholesky()
                .map(|chol| chol.solve(&gradient))
                .ok_or_else(|| {
                    RiskError::Initialization("logistic regression Hessian is not positive definite".to_string())
                })?;

            weights -= &step;

            if step.amax() < params.tolerance {
                break;
            }
        }

        if weights.iter().any(|w| !w.is_finite()) {
            return Err(RiskError::Initialization("logistic regression diverged".to_string()));
        }

        Ok(Self {
            intercept: weights[0],
            coefficients: weights.iter().skip(1).copied().collect(),
            iterations,
        })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn decision_function(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(w, v)| w * v)
                .sum::<f64>()
    }
}

impl ProbabilityModel for LogisticRegression {
    fn name(&self) -> &'static str {
        "Logistic Regression"
    }

    fn predict_proba(&self, features: &[f64]) -> f64 {
        sigmoid(self.decision_function(features))
    }

    /// Absolute coefficient per standardized feature
    fn feature_weights(&self) -> Vec<f64> {
        self.coefficients.iter().map(|w| w.abs()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_recovers_coefficient_signs() {
        let mut rng = StdRng::seed_from_u64(9);
        let x: Vec<Vec<f64>> = (0..500)
            .map(|_| vec![rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0)])
            .collect();
        let y: Vec<f64> = x
            .iter()
            .map(|row| {
                let p = sigmoid(1.5 * row[0] - 1.0 * row[1]);
                if rng.gen::<f64>() < p { 1.0 } else { 0.0 }
            })
            .collect();

        let model = LogisticRegression::fit(&x, &y, LogisticParams::default()).unwrap();
        assert!(model.coefficients()[0] > 0.8);
        assert!(model.coefficients()[1] < -0.5);
        assert!(model.iterations() < 100);
    }

    #[test]
    fn test_separable_data_stays_finite() {
        let x: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64 / 10.0 - 2.0]).collect();
        let y: Vec<f64> = x.iter().map(|row| if row[0] > 0.0 { 1.0 } else { 0.0 }).collect();

        let model = LogisticRegression::fit(&x, &y, LogisticParams::default()).unwrap();
        assert!(model.coefficients()[0].is_finite());
        assert!(model.predict_proba(&[1.5]) > 0.9);
        assert!(model.predict_proba(&[-1.5]) < 0.1);
    }

    #[test]
    fn test_balanced_noise_gives_half() {
        let x = vec![vec![0.0], vec![0.0], vec![0.0], vec![0.0]];
        let y = vec![1.0, 0.0, 1.0, 0.0];
        let model = LogisticRegression::fit(&x, &y, LogisticParams::default()).unwrap();
        assert_abs_diff_eq!(model.predict_proba(&[0.0]), 0.5, epsilon = 1e-6);
    }
}

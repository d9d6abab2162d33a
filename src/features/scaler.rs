//! Standardization of feature vectors using statistics fixed at training time

use crate::error::{RiskError, Result};
use serde::{Deserialize, Serialize};

/// Per-feature mean and standard deviation from the reference dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingParameters {
    pub means: Vec<f64>,
    /// Population standard deviations; zero-variance columns hold 1.0
    pub stds: Vec<f64>,
}

/// Z-score scaler, immutable once fitted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    params: ScalingParameters,
}

impl FeatureScaler {
    /// Build a scaler from known parameters
    pub fn new(params: ScalingParameters) -> Result<Self> {
        if params.means.len() != params.stds.len() {
            return Err(RiskError::DimensionMismatch {
                expected: params.means.len(),
                actual: params.stds.len(),
            });
        }
        if params.stds.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(RiskError::Validation(
                "scaling standard deviations must be positive and finite".to_string(),
            ));
        }
        Ok(Self { params })
    }

    /// Fit column means and population standard deviations
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| RiskError::InsufficientData("cannot fit scaler on empty data".to_string()))?;
        let width = first.len();
        let n = rows.len() as f64;

        let mut means = vec![0.0; width];
        for row in rows {
            if row.len() != width {
                return Err(RiskError::DimensionMismatch { expected: width, actual: row.len() });
            }
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut stds = vec![0.0; width];
        for row in rows {
            for ((s, v), m) in stds.iter_mut().zip(row).zip(&means) {
                *s += (v - m) * (v - m);
            }
        }
        for s in stds.iter_mut() {
            let std = (*s / n).sqrt();
            // Constant columns are left centred but unscaled
            *s = if std > f64::EPSILON { std } else { 1.0 };
        }

        Ok(Self { params: ScalingParameters { means, stds } })
    }

    pub fn params(&self) -> &ScalingParameters {
        &self.params
    }

    pub fn n_features(&self) -> usize {
        self.params.means.len()
    }

    /// Standardize one vector: `(value - mean) / std` per column
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.n_features() {
            return Err(RiskError::DimensionMismatch {
                expected: self.n_features(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(&self.params.means)
            .zip(&self.params.stds)
            .map(|((v, m), s)| (v - m) / s)
            .collect())
    }

    /// Standardize every row of a training matrix
    pub fn transform_all(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fit_population_statistics() {
        let rows = vec![vec![1.0, 10.0], vec![3.0, 10.0], vec![5.0, 10.0]];
        let scaler = FeatureScaler::fit(&rows).unwrap();

        assert_abs_diff_eq!(scaler.params().means[0], 3.0);
        assert_abs_diff_eq!(scaler.params().stds[0], (8.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
        // Constant column keeps a unit scale
        assert_eq!(scaler.params().stds[1], 1.0);
    }

    #[test]
    fn test_transform_standardizes() {
        let scaler = FeatureScaler::new(ScalingParameters {
            means: vec![10.0, 0.5],
            stds: vec![2.0, 0.25],
        })
        .unwrap();

        let z = scaler.transform(&[14.0, 0.0]).unwrap();
        assert_abs_diff_eq!(z[0], 2.0);
        assert_abs_diff_eq!(z[1], -2.0);
    }

    #[test]
    fn test_transform_length_mismatch() {
        let scaler = FeatureScaler::fit(&[vec![1.0, 2.0, 3.0], vec![2.0, 3.0, 4.0]]).unwrap();
        let err = scaler.transform(&[1.0, 2.0]).unwrap_err();
        assert_eq!(err, RiskError::DimensionMismatch { expected: 3, actual: 2 });
    }

    #[test]
    fn test_fit_empty_is_error() {
        assert!(matches!(FeatureScaler::fit(&[]), Err(RiskError::InsufficientData(_))));
    }

    #[test]
    fn test_new_rejects_zero_std() {
        let result = FeatureScaler::new(ScalingParameters { means: vec![0.0], stds: vec![0.0] });
        assert!(result.is_err());
    }
}

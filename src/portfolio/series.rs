use crate::error::{RiskError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Daily fractional returns with the portfolio value path they produce
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    returns: Vec<f64>,
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Build from explicit returns and values; both must be non-empty, finite and equal length
    pub fn new(dates: Vec<NaiveDate>, returns: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if returns.is_empty() {
            return Err(RiskError::InsufficientData("return series is empty".to_string()));
        }
        if values.len() != returns.len() {
            return Err(RiskError::DimensionMismatch {
                expected: returns.len(),
                actual: values.len(),
            });
        }
        if !dates.is_empty() && dates.len() != returns.len() {
            return Err(RiskError::DimensionMismatch {
                expected: returns.len(),
                actual: dates.len(),
            });
        }
        if returns.iter().chain(values.iter()).any(|v| !v.is_finite()) {
            return Err(RiskError::Validation("return series contains non-finite values".to_string()));
        }
        Ok(Self { dates, returns, values })
    }

    /// Compound `base_value` through the returns: `value[t] = base * prod(1 + r[..=t])`
    pub fn from_returns(base_value: f64, returns: Vec<f64>, dates: Vec<NaiveDate>) -> Result<Self> {
        let values = returns
            .iter()
            .scan(base_value, |value, r| {
                *value *= 1.0 + r;
                Some(*value)
            })
            .collect();
        Self::new(dates, returns, values)
    }

    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }
}

//! Error types shared by scoring, training and portfolio analytics

use thiserror::Error;

/// Errors raised by the risk library
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    /// Malformed caller input (non-finite values, bad lengths, bad parameters)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Feature vector width does not match the fitted scaler or model
    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Synthetic data generation or model fitting failed; fatal at startup
    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl RiskError {
    /// True for errors caused by the caller's input rather than the computation
    pub fn is_validation(&self) -> bool {
        matches!(self, RiskError::Validation(_) | RiskError::DimensionMismatch { .. })
    }
}

impl From<serde_json::Error> for RiskError {
    fn from(err: serde_json::Error) -> Self {
        RiskError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RiskError>;

/// Reject NaN and infinite inputs before they reach a model
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RiskError::Validation(format!("{} must be a finite number, got {}", field, value)))
    }
}

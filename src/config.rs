//! Runtime configuration for the dashboard service and helper binaries

use crate::error::{RiskError, Result};
use crate::models::{BoostingParams, ForestParams, LogisticParams};
use crate::synthetic::DatasetSizes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;

/// Hyperparameters for the three models
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelSettings {
    pub forest: ForestParams,
    pub boosting: BoostingParams,
    pub logistic: LogisticParams,
}

/// Everything needed to build a risk context and serve it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    /// Seed for data generation and model training
    pub seed: u64,
    pub sizes: DatasetSizes,
    /// Notional portfolio value the market figures are scaled by
    pub base_value: f64,
    pub models: ModelSettings,
    /// Last business day of the market series; None means today
    pub market_end: Option<NaiveDate>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7860,
            seed: 42,
            sizes: DatasetSizes::default(),
            base_value: 10_000_000.0,
            models: ModelSettings::default(),
            market_end: None,
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by `RISKSIGHT_*` and `PORT` environment variables
    pub fn from_env() -> Self {
        Self::default().with_env(|key| env::var(key).ok())
    }

    /// Apply overrides from any key lookup; unparsable values are ignored
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("RISKSIGHT_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("RISKSIGHT_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|p| p.parse().ok())
        {
            self.port = port;
        }
        if let Some(seed) = lookup("RISKSIGHT_SEED").and_then(|s| s.parse().ok()) {
            self = self.with_seed(seed);
        }
        self
    }

    /// Smaller datasets and ensembles for tests and demos
    pub fn quick() -> Self {
        let mut config = Self::default();
        config.sizes = DatasetSizes {
            credit: 400,
            transactions: 800,
            policies: 400,
            market_days: 252,
        };
        config.models.forest.n_trees = 20;
        config.models.boosting.n_stages = 30;
        config
    }

    /// Use `seed` for data generation and every model
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.models.forest.seed = seed;
        self.models.boosting.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_value.is_finite() && self.base_value > 0.0) {
            return Err(RiskError::Validation(format!(
                "base_value must be positive, got {}",
                self.base_value
            )));
        }
        if self.models.forest.n_trees == 0 || self.models.boosting.n_stages == 0 {
            return Err(RiskError::Validation("ensembles need at least one member".to_string()));
        }
        if !(self.models.logistic.c > 0.0) {
            return Err(RiskError::Validation(format!(
                "logistic C must be positive, got {}",
                self.models.logistic.c
            )));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:7860");
        assert_eq!(config.seed, 42);
        assert_eq!(config.sizes.credit, 1200);
        assert_eq!(config.models.forest.n_trees, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = DashboardConfig::default().with_env(lookup(&[
            ("RISKSIGHT_HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("RISKSIGHT_SEED", "7"),
        ]));
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.seed, 7);
        assert_eq!(config.models.forest.seed, 7);
        assert_eq!(config.models.boosting.seed, 7);
    }

    #[test]
    fn test_specific_port_wins_and_garbage_ignored() {
        let config = DashboardConfig::default().with_env(lookup(&[
            ("RISKSIGHT_PORT", "8100"),
            ("PORT", "9000"),
            ("RISKSIGHT_SEED", "not-a-number"),
        ]));
        assert_eq!(config.port, 8100);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_validate_rejects_bad_base() {
        let config = DashboardConfig {
            base_value: 0.0,
            ..DashboardConfig::default()
        };
        assert!(config.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_quick_profile_keeps_rolling_window() {
        let config = DashboardConfig::quick();
        assert!(config.sizes.market_days >= 21);
        assert!(config.models.forest.n_trees < DashboardConfig::default().models.forest.n_trees);
    }
}

//! Seeded synthetic datasets the dashboard trains on and charts
//!
//! All generators draw from one `StdRng` in a fixed order, so a seed fully
//! determines every record and the market series.

mod credit;
mod export;
mod fraud;
mod insurance;
mod market;

pub use credit::{generate_credit, CreditGrade, CreditRecord, LoanPurpose};
pub use export::{export_all, market_rows, write_records, MarketRow};
pub use fraud::{generate_transactions, Channel, TransactionRecord};
pub use insurance::{generate_policies, PolicyRecord, PolicyType};
pub use market::{business_days_ending, generate_market};

use crate::error::{RiskError, Result};
use crate::portfolio::ReturnSeries;
use chrono::NaiveDate;
use log::info;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Row counts for each generated dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSizes {
    pub credit: usize,
    pub transactions: usize,
    pub policies: usize,
    pub market_days: usize,
}

impl Default for DatasetSizes {
    fn default() -> Self {
        Self {
            credit: 1200,
            transactions: 3000,
            policies: 1000,
            market_days: 252,
        }
    }
}

/// Everything generated at startup
#[derive(Debug, Clone)]
pub struct SyntheticData {
    pub credit: Vec<CreditRecord>,
    pub transactions: Vec<TransactionRecord>,
    pub policies: Vec<PolicyRecord>,
    pub market: ReturnSeries,
}

/// Generate all datasets from `seed`; the market series ends on `market_end`
pub fn generate(
    seed: u64,
    sizes: &DatasetSizes,
    base_value: f64,
    market_end: NaiveDate,
) -> Result<SyntheticData> {
    for (name, n) in [
        ("credit", sizes.credit),
        ("transactions", sizes.transactions),
        ("policies", sizes.policies),
        ("market_days", sizes.market_days),
    ] {
        if n == 0 {
            return Err(RiskError::InsufficientData(format!("{} dataset size must be positive", name)));
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let credit = generate_credit(&mut rng, sizes.credit)?;
    let transactions = generate_transactions(&mut rng, sizes.transactions)?;
    let policies = generate_policies(&mut rng, sizes.policies)?;
    let market = generate_market(&mut rng, sizes.market_days, base_value, market_end)?;

    info!(
        "Generated {} loans, {} transactions, {} policies, {} market days (seed {})",
        credit.len(),
        transactions.len(),
        policies.len(),
        market.len(),
        seed
    );

    Ok(SyntheticData {
        credit,
        transactions,
        policies,
        market,
    })
}

/// The market series exactly as [`generate`] draws it for `seed` and `sizes`
///
/// The market draws come after the credit, transaction and policy draws, so
/// the other dataset sizes matter.
pub fn market_series(
    seed: u64,
    sizes: &DatasetSizes,
    base_value: f64,
    market_end: NaiveDate,
) -> Result<ReturnSeries> {
    Ok(generate(seed, sizes, base_value, market_end)?.market)
}

pub(crate) fn init_err(what: &str, err: impl Display) -> RiskError {
    RiskError::Initialization(format!("{}: {}", what, err))
}

/// Draw one label with the given probabilities
pub(crate) struct Weighted<T: Copy> {
    labels: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> Weighted<T> {
    pub(crate) fn new(labels: &[T], weights: &[f64]) -> Result<Self> {
        let index = WeightedIndex::new(weights).map_err(|e| init_err("category weights", e))?;
        Ok(Self {
            labels: labels.to_vec(),
            index,
        })
    }

    pub(crate) fn uniform(labels: &[T]) -> Result<Self> {
        Self::new(labels, &vec![1.0; labels.len()])
    }

    pub(crate) fn sample(&self, rng: &mut StdRng) -> T {
        self.labels[self.index.sample(rng)]
    }
}

pub(crate) fn round_dp(value: f64, decimals: i32) -> f64 {
    crate::scoring::round_to(value, decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> DatasetSizes {
        DatasetSizes {
            credit: 200,
            transactions: 300,
            policies: 150,
            market_days: 60,
        }
    }

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = generate(7, &small(), 1_000_000.0, end()).unwrap();
        let b = generate(7, &small(), 1_000_000.0, end()).unwrap();
        assert_eq!(a.credit, b.credit);
        assert_eq!(a.transactions, b.transactions);
        assert_eq!(a.policies, b.policies);
        assert_eq!(a.market, b.market);
    }

    #[test]
    fn test_different_seed_differs() {
        let a = generate(1, &small(), 1_000_000.0, end()).unwrap();
        let b = generate(2, &small(), 1_000_000.0, end()).unwrap();
        assert_ne!(a.market.returns(), b.market.returns());
    }

    #[test]
    fn test_sizes_respected() {
        let data = generate(42, &small(), 1_000_000.0, end()).unwrap();
        assert_eq!(data.credit.len(), 200);
        assert_eq!(data.transactions.len(), 300);
        assert_eq!(data.policies.len(), 150);
        assert_eq!(data.market.len(), 60);
    }

    #[test]
    fn test_market_series_matches_full_generation() {
        let full = generate(42, &small(), 10_000_000.0, end()).unwrap();
        let series = market_series(42, &small(), 10_000_000.0, end()).unwrap();
        assert_eq!(series, full.market);

        let mut fresh = StdRng::seed_from_u64(42);
        let standalone = generate_market(&mut fresh, small().market_days, 10_000_000.0, end()).unwrap();
        assert_ne!(series.returns(), standalone.returns());
    }

    #[test]
    fn test_zero_size_rejected() {
        let sizes = DatasetSizes {
            policies: 0,
            ..small()
        };
        assert!(matches!(
            generate(42, &sizes, 1.0, end()),
            Err(RiskError::InsufficientData(_))
        ));
    }
}

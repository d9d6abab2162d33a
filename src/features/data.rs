//! Applicant and transaction feature vectors with their fixed column orders

use crate::error::{ensure_finite, Result};
use serde::{Deserialize, Serialize};

/// Merchant risk category of a card transaction
///
/// One-hot columns are ordered `[High, Low, Medium]`. Labels outside the
/// three known categories map to `Unrecognized`, which encodes as all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MerchantRisk {
    Low,
    Medium,
    High,
    Unrecognized,
}

impl MerchantRisk {
    pub const KNOWN: [MerchantRisk; 3] = [MerchantRisk::Low, MerchantRisk::Medium, MerchantRisk::High];

    pub fn from_label(label: &str) -> Self {
        match label {
            "Low" => MerchantRisk::Low,
            "Medium" => MerchantRisk::Medium,
            "High" => MerchantRisk::High,
            _ => MerchantRisk::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MerchantRisk::Low => "Low",
            MerchantRisk::Medium => "Medium",
            MerchantRisk::High => "High",
            MerchantRisk::Unrecognized => "Unrecognized",
        }
    }

    /// One-hot encoding in `[High, Low, Medium]` column order
    pub fn one_hot(&self) -> [f64; 3] {
        match self {
            MerchantRisk::High => [1.0, 0.0, 0.0],
            MerchantRisk::Low => [0.0, 1.0, 0.0],
            MerchantRisk::Medium => [0.0, 0.0, 1.0],
            MerchantRisk::Unrecognized => [0.0, 0.0, 0.0],
        }
    }
}

impl Default for MerchantRisk {
    fn default() -> Self {
        MerchantRisk::Low
    }
}

/// Geographic region of a borrower or policyholder
///
/// One-hot columns are ordered `[East, North, South, West]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
    Unrecognized,
}

impl Region {
    pub const KNOWN: [Region; 4] = [Region::North, Region::South, Region::East, Region::West];

    pub fn from_label(label: &str) -> Self {
        match label {
            "North" => Region::North,
            "South" => Region::South,
            "East" => Region::East,
            "West" => Region::West,
            _ => Region::Unrecognized,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "North",
            Region::South => "South",
            Region::East => "East",
            Region::West => "West",
            Region::Unrecognized => "Unrecognized",
        }
    }

    /// One-hot encoding in `[East, North, South, West]` column order
    pub fn one_hot(&self) -> [f64; 4] {
        match self {
            Region::East => [1.0, 0.0, 0.0, 0.0],
            Region::North => [0.0, 1.0, 0.0, 0.0],
            Region::South => [0.0, 0.0, 1.0, 0.0],
            Region::West => [0.0, 0.0, 0.0, 1.0],
            Region::Unrecognized => [0.0, 0.0, 0.0, 0.0],
        }
    }
}

/// Loan applicant as seen by the credit model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreditApplication {
    pub age: f64,
    /// Annual income
    pub income: f64,
    /// Debt-to-income ratio, doubles as the LGD proxy
    pub debt_ratio: f64,
    pub credit_score: f64,
    pub emp_years: f64,
    /// Requested loan amount, used as exposure at default
    pub loan_amt: f64,
}

impl CreditApplication {
    pub const FEATURE_NAMES: [&'static str; 6] =
        ["age", "income", "debt_ratio", "credit_score", "emp_years", "loan_amt"];

    pub fn validate(&self) -> Result<()> {
        let values = self.to_vector();
        for (name, value) in Self::FEATURE_NAMES.iter().zip(values) {
            ensure_finite(name, value)?;
        }
        Ok(())
    }

    pub fn to_vector(&self) -> [f64; 6] {
        [self.age, self.income, self.debt_ratio, self.credit_score, self.emp_years, self.loan_amt]
    }
}

/// Card transaction as seen by the fraud model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FraudTransaction {
    pub amount: f64,
    /// Hour of day, 0-23
    pub hour: f64,
    /// 1.0 when the card is used abroad
    pub foreign: f64,
    /// Recent transaction count on the card
    pub velocity: f64,
    pub merch_risk: MerchantRisk,
}

impl FraudTransaction {
    pub const FEATURE_NAMES: [&'static str; 7] =
        ["amount", "hour", "foreign", "velocity", "mr_High", "mr_Low", "mr_Medium"];

    pub fn validate(&self) -> Result<()> {
        ensure_finite("amount", self.amount)?;
        ensure_finite("hour", self.hour)?;
        ensure_finite("foreign", self.foreign)?;
        ensure_finite("velocity", self.velocity)
    }

    pub fn to_vector(&self) -> [f64; 7] {
        let [high, low, medium] = self.merch_risk.one_hot();
        [self.amount, self.hour, self.foreign, self.velocity, high, low, medium]
    }
}

/// Insurance applicant as seen by the underwriting model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingApplicant {
    pub age: f64,
    pub bmi: f64,
    /// 1.0 for smokers
    pub smoker: f64,
    pub children: f64,
    pub veh_age: f64,
    pub region: Region,
}

impl UnderwritingApplicant {
    pub const FEATURE_NAMES: [&'static str; 9] = [
        "age", "bmi", "smoker", "children", "veh_age", "r_East", "r_North", "r_South", "r_West",
    ];

    pub fn validate(&self) -> Result<()> {
        ensure_finite("age", self.age)?;
        ensure_finite("bmi", self.bmi)?;
        ensure_finite("smoker", self.smoker)?;
        ensure_finite("children", self.children)?;
        ensure_finite("veh_age", self.veh_age)
    }

    pub fn to_vector(&self) -> [f64; 9] {
        let [east, north, south, west] = self.region.one_hot();
        [self.age, self.bmi, self.smoker, self.children, self.veh_age, east, north, south, west]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merchant_risk_one_hot_order() {
        assert_eq!(MerchantRisk::High.one_hot(), [1.0, 0.0, 0.0]);
        assert_eq!(MerchantRisk::Low.one_hot(), [0.0, 1.0, 0.0]);
        assert_eq!(MerchantRisk::Medium.one_hot(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unrecognized_categories_encode_to_zero() {
        assert_eq!(MerchantRisk::from_label("Extreme"), MerchantRisk::Unrecognized);
        assert_eq!(MerchantRisk::from_label("low"), MerchantRisk::Unrecognized);
        assert_eq!(MerchantRisk::from_label("Extreme").one_hot(), [0.0; 3]);
        assert_eq!(Region::from_label("Central").one_hot(), [0.0; 4]);
    }

    #[test]
    fn test_region_round_trip_labels() {
        for region in Region::KNOWN {
            assert_eq!(Region::from_label(region.as_str()), region);
        }
        for risk in MerchantRisk::KNOWN {
            assert_eq!(MerchantRisk::from_label(risk.as_str()), risk);
        }
    }

    #[test]
    fn test_underwriting_vector_layout() {
        let applicant = UnderwritingApplicant {
            age: 45.0,
            bmi: 27.0,
            smoker: 0.0,
            children: 2.0,
            veh_age: 5.0,
            region: Region::North,
        };
        assert_eq!(
            applicant.to_vector(),
            [45.0, 27.0, 0.0, 2.0, 5.0, 0.0, 1.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_credit_validation_rejects_nan() {
        let mut app = CreditApplication {
            age: 35.0,
            income: 60_000.0,
            debt_ratio: 0.30,
            credit_score: 680.0,
            emp_years: 5.0,
            loan_amt: 25_000.0,
        };
        assert!(app.validate().is_ok());
        app.income = f64::NAN;
        assert!(app.validate().unwrap_err().is_validation());
    }
}

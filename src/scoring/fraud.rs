//! Fraud probability and flag for card transactions

use crate::error::Result;
use crate::features::FraudTransaction;
use crate::models::TrainedModel;
use serde::Serialize;

/// Transactions scoring strictly above this probability are flagged
pub const FRAUD_THRESHOLD: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FraudAssessment {
    pub fraud_prob: f64,
    pub fraud_flag: bool,
}

impl FraudAssessment {
    pub fn from_probability(fraud_prob: f64) -> Self {
        Self {
            fraud_prob,
            fraud_flag: fraud_prob > FRAUD_THRESHOLD,
        }
    }
}

pub fn score_fraud(model: &TrainedModel, transaction: &FraudTransaction) -> Result<FraudAssessment> {
    transaction.validate()?;
    let probability = model.score(&transaction.to_vector())?;
    Ok(FraudAssessment::from_probability(probability))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::MerchantRisk;
    use crate::models::stub::constant;

    fn transaction(merch_risk: MerchantRisk) -> FraudTransaction {
        FraudTransaction {
            amount: 1_250.0,
            hour: 3.0,
            foreign: 1.0,
            velocity: 12.0,
            merch_risk,
        }
    }

    #[test]
    fn test_flag_is_strictly_above_threshold() {
        assert!(!FraudAssessment::from_probability(0.25).fraud_flag);
        assert!(FraudAssessment::from_probability(0.250_001).fraud_flag);
        assert!(!FraudAssessment::from_probability(0.0).fraud_flag);
    }

    #[test]
    fn test_score_with_stub_model() {
        let model = constant(&FraudTransaction::FEATURE_NAMES, 0.4);
        let result = score_fraud(&model, &transaction(MerchantRisk::High)).unwrap();
        assert_eq!(result.fraud_prob, 0.4);
        assert!(result.fraud_flag);
    }

    #[test]
    fn test_unrecognized_merchant_risk_scores() {
        let model = constant(&FraudTransaction::FEATURE_NAMES, 0.1);
        let tx = transaction(MerchantRisk::from_label("Critical"));
        assert_eq!(&tx.to_vector()[4..], &[0.0, 0.0, 0.0]);
        let result = score_fraud(&model, &tx).unwrap();
        assert!(!result.fraud_flag);
    }
}

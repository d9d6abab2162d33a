//! Probability of default and expected loss for loan applications

use super::format::format_currency;
use crate::error::Result;
use crate::features::CreditApplication;
use crate::models::TrainedModel;
use serde::{Deserialize, Serialize};

/// PD bucket shown next to a credit decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditRiskBand {
    Low,
    Moderate,
    High,
}

impl CreditRiskBand {
    /// `< 0.2` Low, `[0.2, 0.5)` Moderate, `>= 0.5` High
    pub fn from_pd(pd: f64) -> Self {
        if pd < 0.2 {
            CreditRiskBand::Low
        } else if pd < 0.5 {
            CreditRiskBand::Moderate
        } else {
            CreditRiskBand::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CreditRiskBand::Low => "Low Risk",
            CreditRiskBand::Moderate => "Moderate Risk",
            CreditRiskBand::High => "High Risk",
        }
    }
}

/// Scored loan application
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreditAssessment {
    /// Probability of default
    pub pd: f64,
    /// Loss given default proxy (the applicant's debt ratio)
    pub lgd: f64,
    /// Exposure at default (the requested loan amount)
    pub ead: f64,
    /// `pd * lgd * ead` in dollars
    pub expected_loss: f64,
    pub band: CreditRiskBand,
}

impl CreditAssessment {
    /// Derive the loss figures from an already computed PD
    pub fn from_pd(pd: f64, application: &CreditApplication) -> Self {
        let lgd = application.debt_ratio;
        let ead = application.loan_amt;
        Self {
            pd,
            lgd,
            ead,
            expected_loss: expected_loss(pd, lgd, ead),
            band: CreditRiskBand::from_pd(pd),
        }
    }

    pub fn expected_loss_display(&self) -> String {
        format_currency(self.expected_loss)
    }
}

/// `EL = PD x LGD x EAD`
pub fn expected_loss(pd: f64, lgd: f64, ead: f64) -> f64 {
    pd * lgd * ead
}

/// Validate, score and derive expected loss for one application
pub fn score_credit(model: &TrainedModel, application: &CreditApplication) -> Result<CreditAssessment> {
    application.validate()?;
    let pd = model.score(&application.to_vector())?;
    Ok(CreditAssessment::from_pd(pd, application))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stub::constant;
    use approx::assert_relative_eq;

    fn scenario() -> CreditApplication {
        CreditApplication {
            age: 35.0,
            income: 60_000.0,
            debt_ratio: 0.30,
            credit_score: 680.0,
            emp_years: 5.0,
            loan_amt: 25_000.0,
        }
    }

    #[test]
    fn test_expected_loss_with_stub_model() {
        let model = constant(&CreditApplication::FEATURE_NAMES, 0.12);
        let result = score_credit(&model, &scenario()).unwrap();

        assert_eq!(result.pd, 0.12);
        assert_eq!(result.lgd, 0.30);
        assert_eq!(result.ead, 25_000.0);
        assert_relative_eq!(result.expected_loss, 0.12 * 0.30 * 25_000.0);
        assert_eq!(result.expected_loss_display(), "$900");
        assert_eq!(result.band, CreditRiskBand::Low);
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(CreditRiskBand::from_pd(0.0), CreditRiskBand::Low);
        assert_eq!(CreditRiskBand::from_pd(0.199_999), CreditRiskBand::Low);
        assert_eq!(CreditRiskBand::from_pd(0.2), CreditRiskBand::Moderate);
        assert_eq!(CreditRiskBand::from_pd(0.499_999), CreditRiskBand::Moderate);
        assert_eq!(CreditRiskBand::from_pd(0.5), CreditRiskBand::High);
        assert_eq!(CreditRiskBand::from_pd(1.0).label(), "High Risk");
    }

    #[test]
    fn test_rejects_non_finite_input() {
        let model = constant(&CreditApplication::FEATURE_NAMES, 0.5);
        let mut application = scenario();
        application.loan_amt = f64::INFINITY;
        assert!(score_credit(&model, &application).unwrap_err().is_validation());
    }

    #[test]
    fn test_out_of_range_values_do_not_fail() {
        let model = constant(&CreditApplication::FEATURE_NAMES, 0.7);
        let application = CreditApplication {
            age: -4.0,
            income: 0.0,
            debt_ratio: 3.5,
            credit_score: 2_000.0,
            emp_years: -1.0,
            loan_amt: -10.0,
        };
        let result = score_credit(&model, &application).unwrap();
        assert_relative_eq!(result.expected_loss, 0.7 * 3.5 * -10.0);
    }
}

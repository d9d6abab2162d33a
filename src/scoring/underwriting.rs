//! Underwriting risk score and premium loading

use super::format::format_currency;
use crate::error::Result;
use crate::features::UnderwritingApplicant;
use crate::models::TrainedModel;
use serde::{Deserialize, Serialize};

/// Loading applied at a risk score of 1.0, in percent
pub const MAX_LOADING_PCT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnderwritingDecision {
    Standard,
    Substandard,
    Decline,
}

impl UnderwritingDecision {
    /// `< 0.3` Standard, `[0.3, 0.6)` Substandard, `>= 0.6` Decline / High Loading
    pub fn from_score(risk_score: f64) -> Self {
        if risk_score < 0.3 {
            UnderwritingDecision::Standard
        } else if risk_score < 0.6 {
            UnderwritingDecision::Substandard
        } else {
            UnderwritingDecision::Decline
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UnderwritingDecision::Standard => "Standard Risk",
            UnderwritingDecision::Substandard => "Substandard Risk",
            UnderwritingDecision::Decline => "Decline / High Loading",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnderwritingAssessment {
    pub risk_score: f64,
    pub base_premium: f64,
    /// Whole-percent loading on the base premium
    pub loading: u32,
    pub estimated_premium: f64,
    pub decision: UnderwritingDecision,
}

impl UnderwritingAssessment {
    pub fn from_score(risk_score: f64, applicant: &UnderwritingApplicant) -> Self {
        let base = base_premium(applicant);
        let loading = loading_pct(risk_score);
        Self {
            risk_score,
            base_premium: base,
            loading,
            estimated_premium: loaded_premium(base, loading),
            decision: UnderwritingDecision::from_score(risk_score),
        }
    }

    pub fn estimated_premium_display(&self) -> String {
        format_currency(self.estimated_premium)
    }
}

/// `5000 + age*100 + bmi*50 + smoker*10000 + children*500`
pub fn base_premium(applicant: &UnderwritingApplicant) -> f64 {
    5000.0
        + applicant.age * 100.0
        + applicant.bmi * 50.0
        + applicant.smoker * 10_000.0
        + applicant.children * 500.0
}

/// `round(risk_score * 80)`, halves to even, risk clamped to [0, 1]
pub fn loading_pct(risk_score: f64) -> u32 {
    (risk_score.clamp(0.0, 1.0) * MAX_LOADING_PCT).round_ties_even() as u32
}

pub fn loaded_premium(base_premium: f64, loading: u32) -> f64 {
    base_premium * (1.0 + loading as f64 / 100.0)
}

pub fn score_underwriting(
    model: &TrainedModel,
    applicant: &UnderwritingApplicant,
) -> Result<UnderwritingAssessment> {
    applicant.validate()?;
    let risk_score = model.score(&applicant.to_vector())?;
    Ok(UnderwritingAssessment::from_score(risk_score, applicant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Region;
    use crate::models::stub::constant;
    use approx::assert_relative_eq;

    fn scenario(region: Region) -> UnderwritingApplicant {
        UnderwritingApplicant {
            age: 45.0,
            bmi: 27.0,
            smoker: 0.0,
            children: 2.0,
            veh_age: 5.0,
            region,
        }
    }

    #[test]
    fn test_base_premium_scenario() {
        assert_eq!(base_premium(&scenario(Region::North)), 11_850.0);
    }

    #[test]
    fn test_loading_and_premium() {
        let model = constant(&UnderwritingApplicant::FEATURE_NAMES, 0.35);
        let result = score_underwriting(&model, &scenario(Region::North)).unwrap();

        assert_eq!(result.loading, 28);
        assert_relative_eq!(result.estimated_premium, 11_850.0 * 1.28);
        assert_eq!(result.estimated_premium_display(), "$15,168");
        assert_eq!(result.decision, UnderwritingDecision::Substandard);
    }

    #[test]
    fn test_loading_rounds_half_to_even() {
        // 0.15625 * 80 = 12.5 exactly
        assert_eq!(loading_pct(0.15625), 12);
        // 0.09375 * 80 = 7.5 exactly
        assert_eq!(loading_pct(0.09375), 8);
        assert_eq!(loading_pct(1.0), 80);
        assert_eq!(loading_pct(0.0), 0);
    }

    #[test]
    fn test_decision_boundaries() {
        assert_eq!(UnderwritingDecision::from_score(0.29), UnderwritingDecision::Standard);
        assert_eq!(UnderwritingDecision::from_score(0.3), UnderwritingDecision::Substandard);
        assert_eq!(UnderwritingDecision::from_score(0.6), UnderwritingDecision::Decline);
        assert_eq!(UnderwritingDecision::Decline.label(), "Decline / High Loading");
    }

    #[test]
    fn test_unrecognized_region_scores() {
        let model = constant(&UnderwritingApplicant::FEATURE_NAMES, 0.8);
        let applicant = scenario(Region::from_label("Atlantis"));
        assert_eq!(&applicant.to_vector()[5..], &[0.0; 4]);
        let result = score_underwriting(&model, &applicant).unwrap();
        assert_eq!(result.loading, 64);
    }
}

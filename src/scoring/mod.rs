//! Per-request calculators built on top of the trained models
//!
//! Each calculator validates its input, asks the model for a probability and
//! derives the dollar figure and decision label from it. None of them mutate
//! the model, so they can run concurrently against a shared context.

mod credit;
mod format;
mod fraud;
mod underwriting;

pub use credit::{expected_loss, score_credit, CreditAssessment, CreditRiskBand};
pub use format::{format_currency, round_to};
pub use fraud::{score_fraud, FraudAssessment, FRAUD_THRESHOLD};
pub use underwriting::{
    base_premium, loaded_premium, loading_pct, score_underwriting, UnderwritingAssessment,
    UnderwritingDecision, MAX_LOADING_PCT,
};

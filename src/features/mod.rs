//! Feature vectors, categorical encodings and standardization

mod data;
mod scaler;

pub use data::{CreditApplication, FraudTransaction, MerchantRisk, Region, UnderwritingApplicant};
pub use scaler::{FeatureScaler, ScalingParameters};

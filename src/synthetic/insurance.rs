use super::{init_err, round_dp, Weighted};
use crate::error::Result;
use crate::features::{Region, UnderwritingApplicant};
use crate::scoring::base_premium;
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, LogNormal, Normal};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PolicyType {
    Basic,
    Standard,
    Premium,
}

impl PolicyType {
    pub const ALL: [PolicyType; 3] = [PolicyType::Basic, PolicyType::Standard, PolicyType::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyType::Basic => "Basic",
            PolicyType::Standard => "Standard",
            PolicyType::Premium => "Premium",
        }
    }
}

/// One synthetic insurance policy with its claim experience
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyRecord {
    pub age: u32,
    pub bmi: f64,
    pub smoker: u8,
    pub region: Region,
    pub children: u32,
    pub policy_type: PolicyType,
    pub veh_age: u32,
    pub claim_amt: f64,
    pub premium: f64,
    pub loss_ratio: f64,
    pub high_risk: bool,
    /// Claim month, 1-12
    pub month: u32,
}

impl PolicyRecord {
    pub fn applicant(&self) -> UnderwritingApplicant {
        UnderwritingApplicant {
            age: self.age as f64,
            bmi: self.bmi,
            smoker: self.smoker as f64,
            children: self.children as f64,
            veh_age: self.veh_age as f64,
            region: self.region,
        }
    }
}

/// Smokers, BMI above 35 and applicants over 60 are high risk
pub fn is_high_risk(age: u32, bmi: f64, smoker: u8) -> bool {
    smoker == 1 || bmi > 35.0 || age > 60
}

pub fn generate_policies(rng: &mut StdRng, n: usize) -> Result<Vec<PolicyRecord>> {
    let bmi_dist = Normal::new(27.0, 5.0).map_err(|e| init_err("bmi distribution", e))?;
    let claim_noise = LogNormal::new(0.0, 0.3).map_err(|e| init_err("claim distribution", e))?;
    let regions = Weighted::uniform(&Region::KNOWN)?;
    let policy_types = Weighted::new(&PolicyType::ALL, &[0.3, 0.5, 0.2])?;

    let mut records = Vec::with_capacity(n);
    for _ in 0..n {
        let age = rng.gen_range(18..75);
        let bmi = round_dp(bmi_dist.sample(rng), 1);
        let smoker = u8::from(rng.gen_bool(0.25));
        let region = regions.sample(rng);
        let children = rng.gen_range(0..5);
        let policy_type = policy_types.sample(rng);
        let veh_age = rng.gen_range(0..20);

        let applicant = UnderwritingApplicant {
            age: age as f64,
            bmi,
            smoker: smoker as f64,
            children: children as f64,
            veh_age: veh_age as f64,
            region,
        };
        let claim_amt = round_dp(base_premium(&applicant) * claim_noise.sample(rng), 2);
        let premium = round_dp(claim_amt * rng.gen_range(0.6..1.4), 2);

        records.push(PolicyRecord {
            age,
            bmi,
            smoker,
            region,
            children,
            policy_type,
            veh_age,
            claim_amt,
            premium,
            loss_ratio: round_dp(claim_amt / premium, 3),
            high_risk: is_high_risk(age, bmi, smoker),
            month: rng.gen_range(1..13),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_policies_consistent() {
        let mut rng = StdRng::seed_from_u64(42);
        let records = generate_policies(&mut rng, 400).unwrap();
        for p in &records {
            assert!((18..75).contains(&p.age));
            assert!((1..=12).contains(&p.month));
            assert!(p.premium > 0.0);
            assert!(
                p.loss_ratio > 0.6 && p.loss_ratio < 1.75,
                "loss ratio {} outside premium band",
                p.loss_ratio
            );
            assert_eq!(p.high_risk, is_high_risk(p.age, p.bmi, p.smoker));
            assert_eq!(p.applicant().region, p.region);
        }
        assert!(records.iter().any(|p| p.high_risk));
        assert!(records.iter().any(|p| !p.high_risk));
    }

    #[test]
    fn test_high_risk_rule() {
        assert!(is_high_risk(30, 22.0, 1));
        assert!(is_high_risk(30, 35.1, 0));
        assert!(is_high_risk(61, 22.0, 0));
        assert!(!is_high_risk(60, 35.0, 0));
    }
}

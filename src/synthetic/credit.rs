use super::{init_err, round_dp, Weighted};
use crate::error::Result;
use crate::features::{CreditApplication, Region};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Beta, Distribution, LogNormal, Normal};
use serde::Serialize;

/// Latent default probability above which a loan is labelled as defaulted
pub const DEFAULT_CUTOFF: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum LoanPurpose {
    Mortgage,
    Auto,
    Personal,
    Business,
}

impl LoanPurpose {
    pub const ALL: [LoanPurpose; 4] = [
        LoanPurpose::Mortgage,
        LoanPurpose::Auto,
        LoanPurpose::Personal,
        LoanPurpose::Business,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanPurpose::Mortgage => "Mortgage",
            LoanPurpose::Auto => "Auto",
            LoanPurpose::Personal => "Personal",
            LoanPurpose::Business => "Business",
        }
    }
}

/// Letter grade from credit score bands (300,580] F ... (800,850] A
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CreditGrade {
    A,
    B,
    C,
    D,
    F,
}

impl CreditGrade {
    pub const ALL: [CreditGrade; 5] = [
        CreditGrade::A,
        CreditGrade::B,
        CreditGrade::C,
        CreditGrade::D,
        CreditGrade::F,
    ];

    /// Grade for a score; a score of exactly 300 or above 850 is ungraded
    pub fn from_score(score: u32) -> Option<Self> {
        match score {
            301..=580 => Some(CreditGrade::F),
            581..=670 => Some(CreditGrade::D),
            671..=740 => Some(CreditGrade::C),
            741..=800 => Some(CreditGrade::B),
            801..=850 => Some(CreditGrade::A),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CreditGrade::A => "A",
            CreditGrade::B => "B",
            CreditGrade::C => "C",
            CreditGrade::D => "D",
            CreditGrade::F => "F",
        }
    }
}

/// One synthetic loan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditRecord {
    pub age: u32,
    pub income: u64,
    pub debt_ratio: f64,
    pub credit_score: u32,
    pub emp_years: u32,
    pub loan_amt: u64,
    pub purpose: LoanPurpose,
    pub region: Region,
    /// Latent probability the labels were drawn from
    pub default_prob: f64,
    pub default: bool,
    pub risk_grade: Option<CreditGrade>,
}

impl CreditRecord {
    pub fn application(&self) -> CreditApplication {
        CreditApplication {
            age: self.age as f64,
            income: self.income as f64,
            debt_ratio: self.debt_ratio,
            credit_score: self.credit_score as f64,
            emp_years: self.emp_years as f64,
            loan_amt: self.loan_amt as f64,
        }
    }
}

/// Latent PD before noise: weighted credit score, leverage, loan size and tenure
pub fn latent_default_probability(
    credit_score: u32,
    debt_ratio: f64,
    loan_amt: u64,
    income: u64,
    emp_years: u32,
) -> f64 {
    0.3 * (1.0 - (credit_score as f64 - 300.0) / 550.0)
        + 0.2 * debt_ratio
        + 0.1 * (loan_amt as f64 / income.max(1) as f64)
        + 0.1 * (1.0 - emp_years as f64 / 30.0)
}

pub fn generate_credit(rng: &mut StdRng, n: usize) -> Result<Vec<CreditRecord>> {
    let income_dist = LogNormal::new(10.5, 0.5).map_err(|e| init_err("income distribution", e))?;
    let loan_dist = LogNormal::new(10.0, 0.8).map_err(|e| init_err("loan distribution", e))?;
    let debt_dist = Beta::new(2.0, 5.0).map_err(|e| init_err("debt ratio distribution", e))?;
    let noise = Normal::new(0.0, 0.05).map_err(|e| init_err("default noise", e))?;
    let purposes = Weighted::new(&LoanPurpose::ALL, &[0.35, 0.25, 0.25, 0.15])?;
    let regions = Weighted::uniform(&Region::KNOWN)?;

    let mut records = Vec::with_capacity(n);
    for _ in 0..n {
        let age = rng.gen_range(22..70);
        let income = income_dist.sample(rng) as u64;
        let debt_ratio = round_dp(debt_dist.sample(rng), 3);
        let credit_score = rng.gen_range(300..850);
        let emp_years = rng.gen_range(0..30);
        let loan_amt = loan_dist.sample(rng) as u64;
        let purpose = purposes.sample(rng);
        let region = regions.sample(rng);

        let default_prob = (latent_default_probability(credit_score, debt_ratio, loan_amt, income, emp_years)
            + noise.sample(rng))
        .clamp(0.0, 1.0);

        records.push(CreditRecord {
            age,
            income,
            debt_ratio,
            credit_score,
            emp_years,
            loan_amt,
            purpose,
            region,
            default_prob,
            default: default_prob > DEFAULT_CUTOFF,
            risk_grade: CreditGrade::from_score(credit_score),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_grade_bands() {
        assert_eq!(CreditGrade::from_score(300), None);
        assert_eq!(CreditGrade::from_score(301), Some(CreditGrade::F));
        assert_eq!(CreditGrade::from_score(580), Some(CreditGrade::F));
        assert_eq!(CreditGrade::from_score(670), Some(CreditGrade::D));
        assert_eq!(CreditGrade::from_score(740), Some(CreditGrade::C));
        assert_eq!(CreditGrade::from_score(800), Some(CreditGrade::B));
        assert_eq!(CreditGrade::from_score(849), Some(CreditGrade::A));
    }

    #[test]
    fn test_records_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let records = generate_credit(&mut rng, 500).unwrap();
        for r in &records {
            assert!((22..70).contains(&r.age));
            assert!((300..850).contains(&r.credit_score));
            assert!((0.0..=1.0).contains(&r.debt_ratio));
            assert!((0.0..=1.0).contains(&r.default_prob));
            assert_eq!(r.default, r.default_prob > DEFAULT_CUTOFF);
        }
        let defaults = records.iter().filter(|r| r.default).count();
        assert!(defaults > 0 && defaults < records.len(), "both classes expected, got {} defaults", defaults);
    }

    #[test]
    fn test_latent_probability_direction() {
        let safe = latent_default_probability(820, 0.1, 10_000, 80_000, 20);
        let risky = latent_default_probability(420, 0.6, 60_000, 30_000, 1);
        assert!(risky > safe);
    }
}

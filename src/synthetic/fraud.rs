use super::{init_err, round_dp, Weighted};
use crate::error::{RiskError, Result};
use crate::features::{FraudTransaction, MerchantRisk};
use crate::scoring::FRAUD_THRESHOLD;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, LogNormal};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    Online,
    #[serde(rename = "POS")]
    Pos,
    #[serde(rename = "ATM")]
    Atm,
    Mobile,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Online, Channel::Pos, Channel::Atm, Channel::Mobile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Online => "Online",
            Channel::Pos => "POS",
            Channel::Atm => "ATM",
            Channel::Mobile => "Mobile",
        }
    }
}

/// One synthetic card transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub txn_id: String,
    pub amount: f64,
    pub hour: u32,
    pub merch_risk: MerchantRisk,
    pub foreign: u8,
    pub velocity: u32,
    pub channel: Channel,
    pub timestamp: NaiveDateTime,
    pub fraud_prob: f64,
    pub fraud: bool,
}

impl TransactionRecord {
    pub fn transaction(&self) -> FraudTransaction {
        FraudTransaction {
            amount: self.amount,
            hour: self.hour as f64,
            foreign: self.foreign as f64,
            velocity: self.velocity as f64,
            merch_risk: self.merch_risk,
        }
    }
}

/// Rule-based fraud signal before the uniform noise term
pub fn latent_fraud_score(amount: f64, hour: u32, foreign: u8, velocity: u32, merch_risk: MerchantRisk) -> f64 {
    let mut score = 0.2 * foreign as f64;
    if amount > 1000.0 {
        score += 0.10;
    }
    if merch_risk == MerchantRisk::High {
        score += 0.15;
    }
    if hour < 5 || hour > 22 {
        score += 0.10;
    }
    if velocity > 15 {
        score += 0.05;
    }
    score
}

fn series_start() -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| RiskError::Initialization("invalid transaction series start".to_string()))
}

pub fn generate_transactions(rng: &mut StdRng, n: usize) -> Result<Vec<TransactionRecord>> {
    let amount_dist = LogNormal::new(5.0, 1.5).map_err(|e| init_err("amount distribution", e))?;
    let merchants = Weighted::new(
        &[MerchantRisk::Low, MerchantRisk::Medium, MerchantRisk::High],
        &[0.6, 0.3, 0.1],
    )?;
    let channels = Weighted::uniform(&Channel::ALL)?;
    let start = series_start()?;

    let mut records = Vec::with_capacity(n);
    for i in 0..n {
        let amount = round_dp(amount_dist.sample(rng), 2);
        let hour = rng.gen_range(0..24);
        let merch_risk = merchants.sample(rng);
        let foreign = u8::from(rng.gen_bool(0.15));
        let velocity = rng.gen_range(1..20);
        let channel = channels.sample(rng);

        let fraud_prob = (latent_fraud_score(amount, hour, foreign, velocity, merch_risk)
            + rng.gen_range(0.0..0.1))
        .clamp(0.0, 1.0);

        records.push(TransactionRecord {
            txn_id: format!("TXN{:06}", i),
            amount,
            hour,
            merch_risk,
            foreign,
            velocity,
            channel,
            timestamp: start + Duration::hours(i as i64),
            fraud_prob,
            fraud: fraud_prob > FRAUD_THRESHOLD,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_ids_and_timestamps() {
        let mut rng = StdRng::seed_from_u64(3);
        let records = generate_transactions(&mut rng, 30).unwrap();
        assert_eq!(records[0].txn_id, "TXN000000");
        assert_eq!(records[29].txn_id, "TXN000029");
        assert_eq!(records[25].timestamp - records[0].timestamp, Duration::hours(25));
    }

    #[test]
    fn test_labels_follow_latent_score() {
        let mut rng = StdRng::seed_from_u64(11);
        let records = generate_transactions(&mut rng, 1000).unwrap();
        for r in &records {
            assert!(r.hour < 24);
            assert!((1..20).contains(&r.velocity));
            assert_eq!(r.fraud, r.fraud_prob > FRAUD_THRESHOLD);
        }
        // foreign alone plus noise can cross the cutoff; all-clear rows never do
        assert!(records
            .iter()
            .filter(|r| latent_fraud_score(r.amount, r.hour, r.foreign, r.velocity, r.merch_risk) == 0.0)
            .all(|r| !r.fraud));
    }

    #[test]
    fn test_latent_score_rules() {
        assert_eq!(latent_fraud_score(50.0, 12, 0, 3, MerchantRisk::Low), 0.0);
        let score = latent_fraud_score(1500.0, 2, 1, 18, MerchantRisk::High);
        assert!((score - 0.6).abs() < 1e-12, "got {}", score);
    }
}

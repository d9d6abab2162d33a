//! Home, credit risk, fraud and loan portfolio pages

use super::stats::{
    dated, feature_weights, group_by, mean, pct, share, FeatureWeight, GroupStat, Heatmap, Histogram,
    SeriesPoint, Summary,
};
use crate::context::RiskContext;
use crate::features::Region;
use crate::scoring::expected_loss;
use crate::synthetic::{Channel, CreditGrade, CreditRecord, LoanPurpose, PolicyType, TransactionRecord};
use chrono::NaiveDateTime;
use serde::Serialize;

const AGE_GROUPS: [&str; 5] = ["20s", "30s", "40s", "50s", "60s"];
const DEBT_GROUPS: [&str; 5] = ["0-20%", "20-40%", "40-60%", "60-80%", "80-100%"];
const SCORE_BINS: usize = 40;
const RECENT_FLAGGED: usize = 12;

#[derive(Debug, Clone, Serialize)]
pub struct HomeDashboard {
    pub total_loans: usize,
    pub default_rate_pct: f64,
    pub fraud_rate_pct: f64,
    pub avg_loss_ratio: f64,
    pub default_rate_by_grade: Vec<GroupStat>,
    pub fraud_rate_by_channel: Vec<GroupStat>,
    /// Portfolio value in millions of dollars
    pub portfolio_value_musd: Vec<SeriesPoint>,
    pub loss_ratio_by_policy_type: Vec<GroupStat>,
}

pub fn home(ctx: &RiskContext) -> HomeDashboard {
    let data = ctx.data();
    let market = &data.market;
    HomeDashboard {
        total_loans: data.credit.len(),
        default_rate_pct: pct(share(data.credit.iter().map(|r| r.default))),
        fraud_rate_pct: pct(share(data.transactions.iter().map(|t| t.fraud))),
        avg_loss_ratio: crate::scoring::round_to(
            mean(data.policies.iter().map(|p| p.loss_ratio)).unwrap_or(0.0),
            3,
        ),
        default_rate_by_grade: group_by(&data.credit, &grade_labels(), grade_index, default_flag),
        fraud_rate_by_channel: group_by(&data.transactions, &channel_labels(), channel_index, fraud_flag),
        portfolio_value_musd: dated(market.dates(), market.values().iter().map(|v| Some(v / 1e6))),
        loss_ratio_by_policy_type: group_by(
            &data.policies,
            &PolicyType::ALL.map(|p| p.as_str()),
            |p| PolicyType::ALL.iter().position(|t| *t == p.policy_type),
            |p| p.loss_ratio,
        ),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditRiskDashboard {
    pub default_rate_pct: f64,
    pub avg_credit_score: u32,
    /// Loans with a latent default probability above 50%
    pub high_risk_loans: usize,
    pub avg_lgd_pct: f64,
    pub score_histogram_current: Histogram,
    pub score_histogram_default: Histogram,
    /// Mean latent PD by age group and debt ratio group
    pub pd_heatmap: Heatmap,
    pub feature_importances: Vec<FeatureWeight>,
}

pub fn credit_risk(ctx: &RiskContext) -> CreditRiskDashboard {
    let credit = &ctx.data().credit;
    let scores = |defaulted: bool| -> Vec<f64> {
        credit
            .iter()
            .filter(|r| r.default == defaulted)
            .map(|r| r.credit_score as f64)
            .collect()
    };
    let lo = credit.iter().map(|r| r.credit_score).min().unwrap_or(300) as f64;
    let hi = credit.iter().map(|r| r.credit_score).max().unwrap_or(850) as f64;

    CreditRiskDashboard {
        default_rate_pct: pct(share(credit.iter().map(|r| r.default))),
        avg_credit_score: mean(credit.iter().map(|r| r.credit_score as f64)).unwrap_or(0.0) as u32,
        high_risk_loans: credit.iter().filter(|r| r.default_prob > 0.5).count(),
        avg_lgd_pct: pct(mean(credit.iter().map(|r| r.debt_ratio)).unwrap_or(0.0)),
        score_histogram_current: Histogram::over(&scores(false), SCORE_BINS, lo, hi),
        score_histogram_default: Histogram::over(&scores(true), SCORE_BINS, lo, hi),
        pd_heatmap: Heatmap::mean_grid(
            credit,
            &AGE_GROUPS,
            &DEBT_GROUPS,
            |r| Some((age_group(r.age)?, debt_group(r.debt_ratio)?)),
            |r| r.default_prob,
        ),
        feature_importances: feature_weights(ctx.credit_model().feature_weights()),
    }
}

/// Decade buckets closed on the right: (20, 30] is "20s"
pub fn age_group(age: u32) -> Option<usize> {
    (21..=70).contains(&age).then(|| ((age - 21) / 10) as usize)
}

/// Fifths of (0, 1], closed on the right
pub fn debt_group(ratio: f64) -> Option<usize> {
    if ratio <= 0.0 || ratio > 1.0 {
        return None;
    }
    Some(((ratio / 0.2).ceil() as usize).saturating_sub(1).min(4))
}

#[derive(Debug, Clone, Serialize)]
pub struct FlaggedTransaction {
    pub txn_id: String,
    pub timestamp: NaiveDateTime,
    pub amount: f64,
    pub hour: u32,
    pub foreign: u8,
    pub channel: Channel,
    pub merch_risk: &'static str,
    pub fraud_prob: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FraudDashboard {
    pub fraud_count: usize,
    pub fraud_rate_pct: f64,
    pub legit_amounts: Summary,
    pub fraud_amounts: Summary,
    /// Share of frauds between midnight and 5am; None without frauds
    pub night_fraud_pct: Option<f64>,
    /// `mean` is the fraud rate for each hour 0-23
    pub fraud_rate_by_hour: Vec<GroupStat>,
    /// `count` is the transaction count, `total` the fraud count
    pub channel_volume: Vec<GroupStat>,
    pub recent_flagged: Vec<FlaggedTransaction>,
}

pub fn fraud_detection(ctx: &RiskContext) -> FraudDashboard {
    let txns = &ctx.data().transactions;
    let amounts = |fraud: bool| -> Vec<f64> {
        txns.iter().filter(|t| t.fraud == fraud).map(|t| t.amount).collect()
    };
    let frauds: Vec<&TransactionRecord> = txns.iter().filter(|t| t.fraud).collect();
    let hours: Vec<String> = (0..24).map(|h| h.to_string()).collect();

    let mut recent: Vec<&TransactionRecord> = frauds.clone();
    recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    FraudDashboard {
        fraud_count: frauds.len(),
        fraud_rate_pct: pct(share(txns.iter().map(|t| t.fraud))),
        legit_amounts: Summary::of(&amounts(false)),
        fraud_amounts: Summary::of(&amounts(true)),
        night_fraud_pct: (!frauds.is_empty()).then(|| pct(share(frauds.iter().map(|t| t.hour < 5)))),
        fraud_rate_by_hour: group_by(txns, &hours, |t| Some(t.hour as usize), fraud_flag),
        channel_volume: group_by(txns, &channel_labels(), channel_index, fraud_flag),
        recent_flagged: recent
            .into_iter()
            .take(RECENT_FLAGGED)
            .map(|t| FlaggedTransaction {
                txn_id: t.txn_id.clone(),
                timestamp: t.timestamp,
                amount: t.amount,
                hour: t.hour,
                foreign: t.foreign,
                channel: t.channel,
                merch_risk: t.merch_risk.as_str(),
                fraud_prob: t.fraud_prob,
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PurposeStat {
    pub purpose: LoanPurpose,
    pub count: usize,
    pub total_amount: f64,
    pub default_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoanPortfolioDashboard {
    pub total_exposure: f64,
    pub avg_loan_size: f64,
    /// Sum of PD x LGD x EAD over the book, using the latent PD
    pub expected_loss: f64,
    /// Purpose with the most loans
    pub largest_purpose: Option<LoanPurpose>,
    pub by_purpose: Vec<PurposeStat>,
    pub count_by_grade: Vec<GroupStat>,
    /// Default rate by region and purpose, empty cells as 0
    pub default_heatmap: Heatmap,
}

pub fn loan_portfolio(ctx: &RiskContext) -> LoanPortfolioDashboard {
    let credit = &ctx.data().credit;
    let by_purpose: Vec<PurposeStat> = LoanPurpose::ALL
        .iter()
        .map(|&purpose| {
            let loans: Vec<&CreditRecord> = credit.iter().filter(|r| r.purpose == purpose).collect();
            PurposeStat {
                purpose,
                count: loans.len(),
                total_amount: loans.iter().map(|r| r.loan_amt as f64).sum(),
                default_rate: mean(loans.iter().map(|r| default_flag(r))),
            }
        })
        .collect();

    LoanPortfolioDashboard {
        total_exposure: credit.iter().map(|r| r.loan_amt as f64).sum(),
        avg_loan_size: mean(credit.iter().map(|r| r.loan_amt as f64)).unwrap_or(0.0),
        expected_loss: credit
            .iter()
            .map(|r| expected_loss(r.default_prob, r.debt_ratio, r.loan_amt as f64))
            .sum(),
        largest_purpose: largest_purpose(&by_purpose),
        count_by_grade: group_by(credit, &grade_labels(), grade_index, |_| 1.0),
        default_heatmap: Heatmap::mean_grid(
            credit,
            &Region::KNOWN.map(|r| r.as_str()),
            &LoanPurpose::ALL.map(|p| p.as_str()),
            |r| {
                Some((
                    Region::KNOWN.iter().position(|k| *k == r.region)?,
                    LoanPurpose::ALL.iter().position(|p| *p == r.purpose)?,
                ))
            },
            default_flag,
        )
        .filled(0.0),
        by_purpose,
    }
}

/// Purpose with the most loans; ties go to the earliest purpose
pub fn largest_purpose(stats: &[PurposeStat]) -> Option<LoanPurpose> {
    stats
        .iter()
        .filter(|p| p.count > 0)
        .fold(None, |best: Option<&PurposeStat>, p| match best {
            Some(b) if b.count >= p.count => Some(b),
            _ => Some(p),
        })
        .map(|p| p.purpose)
}

fn grade_labels() -> [&'static str; 5] {
    CreditGrade::ALL.map(|g| g.as_str())
}

fn grade_index(record: &CreditRecord) -> Option<usize> {
    let grade = record.risk_grade?;
    CreditGrade::ALL.iter().position(|g| *g == grade)
}

fn channel_labels() -> [&'static str; 4] {
    Channel::ALL.map(|c| c.as_str())
}

fn channel_index(txn: &TransactionRecord) -> Option<usize> {
    Channel::ALL.iter().position(|c| *c == txn.channel)
}

fn default_flag(record: &CreditRecord) -> f64 {
    if record.default {
        1.0
    } else {
        0.0
    }
}

fn fraud_flag(txn: &TransactionRecord) -> f64 {
    if txn.fraud {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::fixtures::stub_context;

    #[test]
    fn test_age_and_debt_groups() {
        assert_eq!(age_group(20), None);
        assert_eq!(age_group(30), Some(0));
        assert_eq!(age_group(31), Some(1));
        assert_eq!(age_group(69), Some(4));
        assert_eq!(debt_group(0.0), None);
        assert_eq!(debt_group(0.2), Some(0));
        assert_eq!(debt_group(0.21), Some(1));
        assert_eq!(debt_group(0.6), Some(2));
        assert_eq!(debt_group(1.0), Some(4));
    }

    #[test]
    fn test_home_totals() {
        let ctx = stub_context(0.1, 0.1, 0.1);
        let home = home(&ctx);
        assert_eq!(home.total_loans, ctx.data().credit.len());
        assert!((0.0..=100.0).contains(&home.default_rate_pct));
        assert_eq!(home.fraud_rate_by_channel.len(), 4);
        assert_eq!(home.portfolio_value_musd.len(), ctx.data().market.len());
        let counted: usize = home.fraud_rate_by_channel.iter().map(|g| g.count).sum();
        assert_eq!(counted, ctx.data().transactions.len());
    }

    #[test]
    fn test_credit_histograms_partition_loans() {
        let ctx = stub_context(0.1, 0.1, 0.1);
        let page = credit_risk(&ctx);
        assert_eq!(
            page.score_histogram_current.total() + page.score_histogram_default.total(),
            ctx.data().credit.len()
        );
        assert_eq!(page.score_histogram_current.edges, page.score_histogram_default.edges);
        assert_eq!(page.pd_heatmap.values.len(), 5);
    }

    #[test]
    fn test_fraud_recent_flagged_newest_first() {
        let ctx = stub_context(0.1, 0.1, 0.1);
        let page = fraud_detection(&ctx);
        assert!(page.recent_flagged.len() <= RECENT_FLAGGED);
        assert!(page
            .recent_flagged
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp));
        assert_eq!(page.fraud_rate_by_hour.len(), 24);
    }

    #[test]
    fn test_flagged_rows_carry_hour_and_foreign() {
        let ctx = stub_context(0.1, 0.1, 0.1);
        let page = fraud_detection(&ctx);
        let row = page.recent_flagged.first().expect("synthetic data has frauds");
        let source = ctx
            .data()
            .transactions
            .iter()
            .find(|t| t.txn_id == row.txn_id)
            .unwrap();
        assert_eq!(row.hour, source.hour);
        assert_eq!(row.foreign, source.foreign);
        let json = serde_json::to_value(row).unwrap();
        assert!(json.get("hour").is_some() && json.get("foreign").is_some());
    }

    #[test]
    fn test_largest_purpose_ties_go_first() {
        let stat = |purpose, count| PurposeStat {
            purpose,
            count,
            total_amount: 0.0,
            default_rate: None,
        };
        let [first, second, third, fourth] = LoanPurpose::ALL;
        let stats = vec![stat(first, 3), stat(second, 5), stat(third, 5), stat(fourth, 0)];
        assert_eq!(largest_purpose(&stats), Some(second));
        assert_eq!(largest_purpose(&[stat(first, 0)]), None);
    }

    #[test]
    fn test_loan_portfolio_purposes() {
        let ctx = stub_context(0.1, 0.1, 0.1);
        let page = loan_portfolio(&ctx);
        let counted: usize = page.by_purpose.iter().map(|p| p.count).sum();
        assert_eq!(counted, ctx.data().credit.len());
        assert!(page.largest_purpose.is_some());
        assert!(page
            .default_heatmap
            .values
            .iter()
            .flatten()
            .all(|v| v.is_some()));
    }
}

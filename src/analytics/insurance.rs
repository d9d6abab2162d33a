//! Claims, underwriting and loss ratio pages

use super::stats::{feature_weights, group_by, mean, pct, share, FeatureWeight, GroupStat, Heatmap, Histogram};
use crate::context::RiskContext;
use crate::error::Result;
use crate::features::Region;
use crate::portfolio::percentile;
use crate::scoring::round_to;
use crate::synthetic::{PolicyRecord, PolicyType};
use serde::Serialize;

/// Expense load added to the loss ratio to get the combined ratio
pub const EXPENSE_RATIO: f64 = 0.25;
const RISK_SCORE_BINS: usize = 40;
const MONTHS: [&str; 12] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12"];

#[derive(Debug, Clone, Serialize)]
pub struct ClaimStats {
    pub policy_type: PolicyType,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClaimsDashboard {
    pub total_claims: f64,
    pub avg_claim: f64,
    pub high_risk_pct: f64,
    pub smoker_avg_claim: Option<f64>,
    pub non_smoker_avg_claim: Option<f64>,
    /// `count` claims and `total` amount per month
    pub by_month: Vec<GroupStat>,
    pub by_policy_type: Vec<ClaimStats>,
}

pub fn claims(ctx: &RiskContext) -> ClaimsDashboard {
    let policies = &ctx.data().policies;
    let by_policy_type = PolicyType::ALL
        .iter()
        .map(|&policy_type| {
            let amounts: Vec<f64> = policies
                .iter()
                .filter(|p| p.policy_type == policy_type)
                .map(|p| p.claim_amt)
                .collect();
            ClaimStats {
                policy_type,
                mean: mean(amounts.iter().copied()),
                median: percentile(&amounts, 50.0).ok(),
                max: amounts.iter().copied().reduce(f64::max),
            }
        })
        .collect();

    ClaimsDashboard {
        total_claims: policies.iter().map(|p| p.claim_amt).sum(),
        avg_claim: mean(policies.iter().map(|p| p.claim_amt)).unwrap_or(0.0),
        high_risk_pct: pct(share(policies.iter().map(|p| p.high_risk))),
        smoker_avg_claim: mean(policies.iter().filter(|p| p.smoker == 1).map(|p| p.claim_amt)),
        non_smoker_avg_claim: mean(policies.iter().filter(|p| p.smoker == 0).map(|p| p.claim_amt)),
        by_month: group_by(policies, &MONTHS, month_index, |p| p.claim_amt),
        by_policy_type,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnderwritingDashboard {
    pub high_risk_count: usize,
    pub total_policies: usize,
    /// Training accuracy of the underwriting model, in percent
    pub model_accuracy_pct: Option<f64>,
    pub model: &'static str,
    /// Share of policyholders with BMI above 35
    pub obese_pct: f64,
    /// Absolute coefficient per standardized feature
    pub risk_factors: Vec<FeatureWeight>,
    pub risk_score_histogram: Histogram,
}

pub fn underwriting(ctx: &RiskContext) -> Result<UnderwritingDashboard> {
    let policies = &ctx.data().policies;
    let model = ctx.underwriting_model();
    let rows: Vec<Vec<f64>> = policies.iter().map(|p| p.applicant().to_vector().to_vec()).collect();
    let scores = model.score_all(&rows)?;

    Ok(UnderwritingDashboard {
        high_risk_count: policies.iter().filter(|p| p.high_risk).count(),
        total_policies: policies.len(),
        model_accuracy_pct: model.diagnostics().map(|d| pct(d.training_accuracy)),
        model: model.name(),
        obese_pct: pct(share(policies.iter().map(|p| p.bmi > 35.0))),
        risk_factors: feature_weights(model.feature_weights()),
        risk_score_histogram: Histogram::over(&scores, RISK_SCORE_BINS, 0.0, 1.0),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionLossRatio {
    pub region: Region,
    pub loss_ratio: f64,
    pub claims: f64,
    pub premiums: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRatio {
    pub month: u32,
    pub loss_ratio: Option<f64>,
    pub combined_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LossRatioDashboard {
    pub avg_loss_ratio: f64,
    pub expense_ratio: f64,
    pub combined_ratio: f64,
    pub unprofitable_policies: usize,
    pub unprofitable_pct: f64,
    /// Region with the lowest mean loss ratio
    pub best_region: Option<RegionLossRatio>,
    pub by_region: Vec<RegionLossRatio>,
    /// Mean loss ratio by region and policy type
    pub heatmap: Heatmap,
    pub monthly: Vec<MonthlyRatio>,
}

pub fn loss_ratio(ctx: &RiskContext) -> LossRatioDashboard {
    let policies = &ctx.data().policies;
    let avg = mean(policies.iter().map(|p| p.loss_ratio)).unwrap_or(0.0);

    let by_region: Vec<RegionLossRatio> = Region::KNOWN
        .iter()
        .filter_map(|&region| {
            let book: Vec<&PolicyRecord> = policies.iter().filter(|p| p.region == region).collect();
            Some(RegionLossRatio {
                region,
                loss_ratio: mean(book.iter().map(|p| p.loss_ratio))?,
                claims: book.iter().map(|p| p.claim_amt).sum(),
                premiums: book.iter().map(|p| p.premium).sum(),
            })
        })
        .collect();

    let monthly = group_by(policies, &MONTHS, month_index, |p| p.loss_ratio)
        .into_iter()
        .zip(1..)
        .map(|(group, month)| MonthlyRatio {
            month,
            loss_ratio: group.mean,
            combined_ratio: group.mean.map(|lr| lr + EXPENSE_RATIO),
        })
        .collect();

    let unprofitable = policies.iter().filter(|p| p.loss_ratio > 1.0).count();

    LossRatioDashboard {
        avg_loss_ratio: round_to(avg, 3),
        expense_ratio: EXPENSE_RATIO,
        combined_ratio: round_to(avg + EXPENSE_RATIO, 3),
        unprofitable_policies: unprofitable,
        unprofitable_pct: pct(share(policies.iter().map(|p| p.loss_ratio > 1.0))),
        best_region: by_region
            .iter()
            .min_by(|a, b| a.loss_ratio.total_cmp(&b.loss_ratio))
            .cloned(),
        heatmap: Heatmap::mean_grid(
            policies,
            &Region::KNOWN.map(|r| r.as_str()),
            &PolicyType::ALL.map(|t| t.as_str()),
            |p| {
                Some((
                    Region::KNOWN.iter().position(|r| *r == p.region)?,
                    PolicyType::ALL.iter().position(|t| *t == p.policy_type)?,
                ))
            },
            |p| p.loss_ratio,
        ),
        monthly,
        by_region,
    }
}

fn month_index(policy: &PolicyRecord) -> Option<usize> {
    (1..=12).contains(&policy.month).then(|| policy.month as usize - 1)
}

//! Request and response bodies for the scoring API and dashboard endpoints

use super::error::{ApiError, ApiResult};
use super::AppState;
use crate::analytics::{self, DashboardPage};
use crate::features::{CreditApplication, FraudTransaction, MerchantRisk, Region, UnderwritingApplicant};
use crate::portfolio::PortfolioRiskReport;
use crate::scoring::{round_to, CreditAssessment, FraudAssessment, UnderwritingAssessment};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct CreditRequest {
    pub age: f64,
    pub income: f64,
    pub debt_ratio: f64,
    pub credit_score: f64,
    pub emp_years: f64,
    pub loan_amt: f64,
}

impl From<CreditRequest> for CreditApplication {
    fn from(req: CreditRequest) -> Self {
        CreditApplication {
            age: req.age,
            income: req.income,
            debt_ratio: req.debt_ratio,
            credit_score: req.credit_score,
            emp_years: req.emp_years,
            loan_amt: req.loan_amt,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditResponse {
    pub pd: f64,
    pub lgd: f64,
    pub ead: f64,
    pub expected_loss: String,
    pub risk_label: String,
}

impl From<CreditAssessment> for CreditResponse {
    fn from(a: CreditAssessment) -> Self {
        Self {
            pd: a.pd,
            lgd: round_to(a.lgd, 3),
            ead: a.ead,
            expected_loss: a.expected_loss_display(),
            risk_label: a.band.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FraudRequest {
    pub amount: f64,
    pub hour: f64,
    pub foreign: f64,
    #[serde(default = "default_velocity")]
    pub velocity: f64,
    /// Missing means Low; null or any non-matching value encodes as all zeros
    #[serde(default = "default_merch_risk")]
    pub merch_risk: Value,
}

fn default_velocity() -> f64 { 1.0 }
fn default_merch_risk() -> Value { Value::String("Low".to_string()) }

/// Label of a categorical request field; non-strings match no category
fn category_label(value: &Value) -> &str {
    value.as_str().unwrap_or_default()
}

impl From<FraudRequest> for FraudTransaction {
    fn from(req: FraudRequest) -> Self {
        FraudTransaction {
            amount: req.amount,
            hour: req.hour,
            foreign: req.foreign,
            velocity: req.velocity,
            merch_risk: MerchantRisk::from_label(category_label(&req.merch_risk)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudResponse {
    pub fraud_prob: f64,
    pub fraud_flag: bool,
}

impl From<FraudAssessment> for FraudResponse {
    fn from(a: FraudAssessment) -> Self {
        Self {
            fraud_prob: a.fraud_prob,
            fraud_flag: a.fraud_flag,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnderwritingRequest {
    pub age: f64,
    pub bmi: f64,
    pub smoker: f64,
    pub children: f64,
    pub veh_age: f64,
    /// Required, but null or non-string values encode as all zeros
    pub region: Value,
}

impl From<UnderwritingRequest> for UnderwritingApplicant {
    fn from(req: UnderwritingRequest) -> Self {
        UnderwritingApplicant {
            age: req.age,
            bmi: req.bmi,
            smoker: req.smoker,
            children: req.children,
            veh_age: req.veh_age,
            region: Region::from_label(category_label(&req.region)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnderwritingResponse {
    pub risk_score: f64,
    pub est_premium: String,
    pub loading: u32,
    pub decision: String,
}

impl From<UnderwritingAssessment> for UnderwritingResponse {
    fn from(a: UnderwritingAssessment) -> Self {
        Self {
            risk_score: a.risk_score,
            est_premium: a.estimated_premium_display(),
            loading: a.loading,
            decision: a.decision.label().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub domain: &'static str,
    pub model: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub seed: u64,
    pub models: Vec<ModelInfo>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started.elapsed().as_secs(),
        seed: state.ctx.config().seed,
        models: state
            .ctx
            .model_names()
            .into_iter()
            .map(|(domain, model)| ModelInfo { domain, model })
            .collect(),
    })
}

pub async fn score_credit(
    State(state): State<AppState>,
    payload: Result<Json<CreditRequest>, JsonRejection>,
) -> ApiResult<Json<CreditResponse>> {
    let Json(req) = payload?;
    debug!("Credit request: {:?}", req);
    let assessment = state.ctx.score_credit(&req.into())?;
    Ok(Json(assessment.into()))
}

pub async fn score_fraud(
    State(state): State<AppState>,
    payload: Result<Json<FraudRequest>, JsonRejection>,
) -> ApiResult<Json<FraudResponse>> {
    let Json(req) = payload?;
    debug!("Fraud request: {:?}", req);
    let assessment = state.ctx.score_fraud(&req.into())?;
    Ok(Json(assessment.into()))
}

pub async fn score_underwriting(
    State(state): State<AppState>,
    payload: Result<Json<UnderwritingRequest>, JsonRejection>,
) -> ApiResult<Json<UnderwritingResponse>> {
    let Json(req) = payload?;
    debug!("Underwriting request: {:?}", req);
    let assessment = state.ctx.score_underwriting(&req.into())?;
    Ok(Json(assessment.into()))
}

pub async fn market_risk(State(state): State<AppState>) -> Json<PortfolioRiskReport> {
    Json(state.ctx.market_report().clone())
}

pub async fn dashboard(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Json<Value>> {
    let page = DashboardPage::from_slug(&slug)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown dashboard page: {}", slug)))?;
    debug!("Rendering dashboard page {}", page.slug());
    Ok(Json(analytics::render(&state.ctx, page)?))
}

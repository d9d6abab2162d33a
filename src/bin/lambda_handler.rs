//! AWS Lambda handler for risk scoring
//!
//! Accepts `{"kind": "credit" | "fraud" | "underwriting" | "market_risk", "payload": {...}}`
//! and returns the same JSON bodies as the HTTP API. The risk context is built
//! once per cold start and reused for every invocation.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::info;
use risksight::server::{
    CreditRequest, CreditResponse, FraudRequest, FraudResponse, UnderwritingRequest, UnderwritingResponse,
};
use risksight::{DashboardConfig, RiskContext};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

/// Incoming scoring request
#[derive(Debug, Deserialize)]
pub struct ScoringEvent {
    pub kind: String,

    #[serde(default = "default_payload")]
    pub payload: Value,
}

fn default_payload() -> Value { json!({}) }

/// Outgoing result; `error` is set instead of `result` on failure
#[derive(Debug, Serialize)]
pub struct ScoringResponse {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub execution_time_ms: u64,
}

fn score(ctx: &RiskContext, kind: &str, payload: Value) -> Result<Value, String> {
    let value = match kind {
        "credit" => {
            let req: CreditRequest = serde_json::from_value(payload).map_err(|e| e.to_string())?;
            let body: CreditResponse = ctx.score_credit(&req.into()).map_err(|e| e.to_string())?.into();
            serde_json::to_value(body)
        }
        "fraud" => {
            let req: FraudRequest = serde_json::from_value(payload).map_err(|e| e.to_string())?;
            let body: FraudResponse = ctx.score_fraud(&req.into()).map_err(|e| e.to_string())?.into();
            serde_json::to_value(body)
        }
        "underwriting" => {
            let req: UnderwritingRequest = serde_json::from_value(payload).map_err(|e| e.to_string())?;
            let body: UnderwritingResponse =
                ctx.score_underwriting(&req.into()).map_err(|e| e.to_string())?.into();
            serde_json::to_value(body)
        }
        "market_risk" => serde_json::to_value(ctx.market_report()),
        other => return Err(format!("Unknown request kind: {}", other)),
    };
    value.map_err(|e| e.to_string())
}

async fn handler(ctx: Arc<RiskContext>, event: LambdaEvent<ScoringEvent>) -> Result<ScoringResponse, Error> {
    let start = Instant::now();
    let ScoringEvent { kind, payload } = event.payload;

    let (result, error) = match score(&ctx, &kind, payload) {
        Ok(value) => (Some(value), None),
        Err(message) => (None, Some(message)),
    };

    Ok(ScoringResponse {
        kind,
        result,
        error,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let start = Instant::now();
    let config = DashboardConfig::from_env();
    let ctx = Arc::new(RiskContext::build(&config)?);
    info!("Cold start: risk context built in {:?}", start.elapsed());

    run(service_fn(move |event: LambdaEvent<ScoringEvent>| {
        let ctx = Arc::clone(&ctx);
        async move { handler(ctx, event).await }
    }))
    .await
}

//! HTTP surface: scoring API, market report and dashboard aggregates
//!
//! Routes:
//! - `POST /api/credit`, `/api/fraud`, `/api/underwriting`
//! - `GET /api/market-risk`
//! - `GET /api/dashboard/:page`
//! - `GET /health`

mod error;
mod handlers;

pub use error::{ApiError, ApiResult};
pub use handlers::{
    CreditRequest, CreditResponse, FraudRequest, FraudResponse, HealthResponse, UnderwritingRequest,
    UnderwritingResponse,
};

use crate::context::RiskContext;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<RiskContext>,
    pub started: Instant,
}

impl AppState {
    pub fn new(ctx: Arc<RiskContext>) -> Self {
        Self {
            ctx,
            started: Instant::now(),
        }
    }
}

/// Build the router with every route and an open CORS policy
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/credit", post(handlers::score_credit))
        .route("/api/fraud", post(handlers::score_fraud))
        .route("/api/underwriting", post(handlers::score_underwriting))
        .route("/api/market-risk", get(handlers::market_risk))
        .route("/api/dashboard/:page", get(handlers::dashboard))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

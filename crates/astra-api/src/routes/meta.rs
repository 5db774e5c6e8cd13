//! # Service Metadata API
//!
//! Banner, health summary, and request counters. Kubernetes-style health checks
//! live in `lib.rs`, outside the middleware stack.

use axum::extract::State;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db;
use crate::middleware::metrics::{ApiMetrics, MetricsSnapshot};
use crate::state::AppState;

pub const BANNER: &str = "AstraMark AI Marketing Platform API - Enhanced Edition";

#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub ai_enabled: bool,
    pub db_connected: bool,
    pub serp_enabled: bool,
    pub blockchain_enabled: bool,
    pub scanner_enabled: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api", get(root))
        .route("/api/", get(root))
        .route("/api/health", get(health))
        .route("/api/metrics", get(metrics))
}

/// GET /api/: Service banner.
#[utoipa::path(
    get,
    path = "/api/",
    responses((status = 200, description = "Banner", body = RootResponse)),
    tag = "meta"
)]
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: BANNER.to_string(),
    })
}

/// GET /api/health: Which integrations are active.
#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Health summary", body = HealthResponse)),
    tag = "meta"
)]
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_connected = match &state.db_pool {
        Some(pool) => db::ping(pool).await,
        None => false,
    };
    Json(HealthResponse {
        status: "healthy".to_string(),
        ai_enabled: state.llm.is_some(),
        db_connected,
        serp_enabled: state.serp.is_some(),
        blockchain_enabled: state.ledger.is_some(),
        scanner_enabled: state.config.enable_background_scanner,
    })
}

/// GET /api/metrics: Request and error counters since startup.
#[utoipa::path(
    get,
    path = "/api/metrics",
    responses((status = 200, description = "Counters", body = MetricsSnapshot)),
    tag = "meta"
)]
async fn metrics(Extension(metrics): Extension<ApiMetrics>) -> Json<MetricsSnapshot> {
    Json(metrics.snapshot())
}

//! # Market Intelligence API
//!
//! Read access to what the background scanner has stored, plus on-demand
//! keyword metrics.

use std::collections::BTreeMap;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use astra_core::market::{CompetitorSnapshot, KeywordMetrics, MarketSignalRecord};

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::routes::{check_limit, default_limit, parse_id};
use crate::services::market_data::MarketDataService;
use crate::services::scanner;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SignalsQuery {
    /// Only signals for this business type.
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KeywordsQuery {
    /// Comma-separated keywords; only the first five are looked up.
    pub keywords: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignalsResponse {
    pub signals: Vec<MarketSignalRecord>,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompetitorUpdatesResponse {
    pub updates: Vec<CompetitorSnapshot>,
    pub count: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/market/signals", get(market_signals))
        .route("/api/market/competitors/:business_id", get(competitor_updates))
        .route("/api/market/keywords", get(keyword_metrics))
}

/// GET /api/market/signals: Latest scanner signals.
#[utoipa::path(
    get,
    path = "/api/market/signals",
    params(SignalsQuery),
    responses(
        (status = 200, description = "Signals, newest first", body = SignalsResponse),
    ),
    tag = "market"
)]
async fn market_signals(
    State(state): State<AppState>,
    query: Result<Query<SignalsQuery>, QueryRejection>,
) -> Result<Json<SignalsResponse>, AppError> {
    let query = extract_query(query)?;
    let limit = check_limit(query.limit)?;
    let business_type = query.business_type.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let signals = scanner::latest_signals(&state, business_type, limit);
    let count = signals.len();
    Ok(Json(SignalsResponse { signals, count }))
}

/// GET /api/market/competitors/:business_id: Recent competitor snapshots.
#[utoipa::path(
    get,
    path = "/api/market/competitors/{business_id}",
    params(("business_id" = String, Path, description = "Business ID")),
    responses(
        (status = 200, description = "Snapshots, newest first", body = CompetitorUpdatesResponse),
        (status = 404, description = "Business not found", body = crate::error::ErrorBody),
    ),
    tag = "market"
)]
async fn competitor_updates(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> Result<Json<CompetitorUpdatesResponse>, AppError> {
    let business_id = parse_id("business", &business_id)?;
    if state.businesses.get(&business_id).is_none() {
        return Err(AppError::NotFound(format!("business {business_id} not found")));
    }
    let updates = scanner::competitor_updates(&state, business_id);
    let count = updates.len();
    Ok(Json(CompetitorUpdatesResponse { updates, count }))
}

/// GET /api/market/keywords: Search metrics per keyword.
#[utoipa::path(
    get,
    path = "/api/market/keywords",
    params(KeywordsQuery),
    responses(
        (status = 200, description = "Metrics keyed by keyword", body = BTreeMap<String, KeywordMetrics>),
        (status = 422, description = "No keywords given", body = crate::error::ErrorBody),
    ),
    tag = "market"
)]
async fn keyword_metrics(
    State(state): State<AppState>,
    query: Result<Query<KeywordsQuery>, QueryRejection>,
) -> Result<Json<BTreeMap<String, KeywordMetrics>>, AppError> {
    let query = extract_query(query)?;
    let keywords: Vec<String> = query
        .keywords
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    if keywords.is_empty() {
        return Err(AppError::Validation("at least one keyword is required".into()));
    }
    let report = MarketDataService::from_state(&state).keywords(&keywords).await;
    Ok(Json(report))
}

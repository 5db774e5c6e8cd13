//! # Analysis API
//!
//! Runs the analysis pipeline and serves stored analyses and business
//! profiles, newest first.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;

use astra_core::{AnalysisResult, BusinessInput, BusinessProfile};

use crate::error::AppError;
use crate::extractors::{extract_query, extract_validated_json};
use crate::routes::{check_limit, default_limit, find_analysis};
use crate::services::analysis;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyzeQuery {
    /// Unlock premium execution actions.
    #[serde(default)]
    pub premium: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page size, 1 to 100.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/api/analyses", get(list_analyses))
        .route("/api/analyses/:id", get(get_analysis))
        .route("/api/businesses", get(list_businesses))
}

/// POST /api/analyze: Run a full marketing analysis for a business.
#[utoipa::path(
    post,
    path = "/api/analyze",
    params(AnalyzeQuery),
    request_body = BusinessInput,
    responses(
        (status = 200, description = "Analysis created", body = AnalysisResult),
        (status = 422, description = "Invalid business input", body = crate::error::ErrorBody),
    ),
    tag = "analysis"
)]
async fn analyze(
    State(state): State<AppState>,
    query: Result<Query<AnalyzeQuery>, QueryRejection>,
    body: Result<Json<BusinessInput>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let query = extract_query(query)?;
    let input = extract_validated_json(body)?;
    let result = analysis::analyze(&state, input, query.premium).await?;
    Ok(Json(result))
}

/// GET /api/analyses: Most recent analyses.
#[utoipa::path(
    get,
    path = "/api/analyses",
    params(ListQuery),
    responses(
        (status = 200, description = "Analyses, newest first", body = Vec<AnalysisResult>),
    ),
    tag = "analysis"
)]
async fn list_analyses(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<AnalysisResult>>, AppError> {
    let limit = check_limit(extract_query(query)?.limit)?;
    Ok(Json(state.analyses.latest(limit, |a| a.created_at)))
}

/// GET /api/analyses/:id: One stored analysis.
#[utoipa::path(
    get,
    path = "/api/analyses/{id}",
    params(("id" = String, Path, description = "Analysis ID")),
    responses(
        (status = 200, description = "Analysis found", body = AnalysisResult),
        (status = 404, description = "Analysis not found", body = crate::error::ErrorBody),
    ),
    tag = "analysis"
)]
async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResult>, AppError> {
    find_analysis(&state, &id).map(Json)
}

/// GET /api/businesses: Most recent business profiles.
#[utoipa::path(
    get,
    path = "/api/businesses",
    params(ListQuery),
    responses(
        (status = 200, description = "Businesses, newest first", body = Vec<BusinessProfile>),
    ),
    tag = "analysis"
)]
async fn list_businesses(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<BusinessProfile>>, AppError> {
    let limit = check_limit(extract_query(query)?.limit)?;
    Ok(Json(state.businesses.latest(limit, |b| b.created_at)))
}

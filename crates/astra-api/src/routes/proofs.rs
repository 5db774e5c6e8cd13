//! # Proof Verification API

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::find_analysis;
use crate::services::proof;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct VerificationResponse {
    pub analysis_id: Uuid,
    pub hash: String,
    pub tx_hash: Option<String>,
    /// The ledger transaction carries `hash` as calldata.
    pub verified: bool,
    /// The stored analysis still hashes to `hash`.
    pub content_intact: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/proofs/:analysis_id/verify", get(verify_proof))
}

/// GET /api/proofs/:analysis_id/verify: Check an analysis against its proof.
#[utoipa::path(
    get,
    path = "/api/proofs/{analysis_id}/verify",
    params(("analysis_id" = String, Path, description = "Analysis ID")),
    responses(
        (status = 200, description = "Verification result", body = VerificationResponse),
        (status = 404, description = "Analysis or proof not found", body = crate::error::ErrorBody),
    ),
    tag = "proofs"
)]
async fn verify_proof(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> Result<Json<VerificationResponse>, AppError> {
    let analysis = find_analysis(&state, &analysis_id)?;
    let stored = analysis.blockchain_proof.as_ref().ok_or_else(|| {
        AppError::NotFound(format!("analysis {} has no proof", analysis.id))
    })?;

    let verified = proof::verify(&state, &stored.hash, stored.tx_hash.as_deref()).await;
    Ok(Json(VerificationResponse {
        analysis_id: analysis.id,
        hash: stored.hash.clone(),
        tx_hash: stored.tx_hash.clone(),
        verified,
        content_intact: proof::content_intact(&analysis),
    }))
}

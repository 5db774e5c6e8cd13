//! # Report Export API

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::routes::{blocking, find_analysis};
use crate::services::report::{render_pdf, report_filename};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/export/pdf/:id", get(export_pdf))
}

/// GET /api/export/pdf/:id: Download an analysis as a PDF report.
#[utoipa::path(
    get,
    path = "/api/export/pdf/{id}",
    params(("id" = String, Path, description = "Analysis ID")),
    responses(
        (status = 200, description = "PDF report", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Analysis not found", body = crate::error::ErrorBody),
    ),
    tag = "export"
)]
async fn export_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let analysis = find_analysis(&state, &id)?;
    let analysis_id = analysis.id;
    let bytes = blocking(move || render_pdf(&analysis)).await??;
    tracing::info!(%analysis_id, bytes = bytes.len(), "rendered PDF report");

    let disposition = format!("attachment; filename={}", report_filename(analysis_id));
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

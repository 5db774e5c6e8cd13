//! # API Route Modules
//!
//! - `meta`: banner, health summary, request counters.
//! - `users`: registration, token issue, current user.
//! - `plans`: subscription catalogue.
//! - `analysis`: the analysis pipeline and read access to stored
//!   analyses and businesses.
//! - `content`: pitch deck, content calendar, email sequence, social posts.
//! - `export`: PDF report download.
//! - `market`: scanner signals, competitor snapshots, keyword metrics.
//! - `proofs`: proof verification.

pub mod analysis;
pub mod content;
pub mod export;
pub mod market;
pub mod meta;
pub mod plans;
pub mod proofs;
pub mod users;

use astra_core::AnalysisResult;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::check_range;
use crate::state::AppState;

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size accepted by list endpoints.
pub const MAX_LIMIT: u32 = 100;

pub(crate) fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

pub(crate) fn check_limit(limit: u32) -> Result<usize, AppError> {
    check_range("limit", limit, 1, MAX_LIMIT).map(|l| l as usize)
}

/// Parse a path or query id. Malformed ids cannot name a stored record,
/// so they are reported as not found.
pub(crate) fn parse_id(kind: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(format!("{kind} {raw} not found")))
}

/// Run CPU-bound work on the blocking pool.
pub(crate) async fn blocking<T: Send + 'static>(
    f: impl FnOnce() -> T + Send + 'static,
) -> Result<T, AppError> {
    Ok(tokio::task::spawn_blocking(f).await?)
}

pub(crate) fn find_analysis(state: &AppState, raw_id: &str) -> Result<AnalysisResult, AppError> {
    let id = parse_id("analysis", raw_id)?;
    state
        .analyses
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("analysis {id} not found")))
}

//! # Content Generation API
//!
//! Every generator works from a stored analysis named by `analysis_id`.
//! Generation failures never surface as errors: the offline content is
//! returned with `data_source = "mock"` instead.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::IntoParams;

use astra_core::content::{
    ContentCalendarEnvelope, EmailSequenceEnvelope, PitchDeckEnvelope, SocialPostsEnvelope,
};

use crate::error::AppError;
use crate::extractors::{check_range, extract_query};
use crate::routes::find_analysis;
use crate::services::content::{
    self, DEFAULT_POST_COUNT, DEFAULT_SEQUENCE_TYPE, DEFAULT_WEEKS, MAX_POST_COUNT, MAX_WEEKS,
};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PitchDeckQuery {
    pub analysis_id: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    pub analysis_id: String,
    /// Calendar length, 1 to 12 weeks.
    #[serde(default = "default_weeks")]
    pub weeks: u32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailSequenceQuery {
    pub analysis_id: String,
    /// e.g. `onboarding`, `nurture`, `re_engagement`.
    #[serde(default = "default_sequence_type")]
    pub sequence_type: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SocialPostsQuery {
    pub analysis_id: String,
    /// Channel name from the analysis strategies; the first strategy when omitted.
    #[serde(default)]
    pub channel: Option<String>,
    /// Posts to generate, 1 to 30.
    #[serde(default = "default_post_count")]
    pub count: u32,
}

fn default_weeks() -> u32 {
    DEFAULT_WEEKS
}

fn default_sequence_type() -> String {
    DEFAULT_SEQUENCE_TYPE.to_string()
}

fn default_post_count() -> u32 {
    DEFAULT_POST_COUNT
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/generate/pitch-deck", post(generate_pitch_deck))
        .route("/api/generate/content-calendar", post(generate_content_calendar))
        .route("/api/generate/email-sequence", post(generate_email_sequence))
        .route("/api/generate/social-posts", post(generate_social_posts))
}

/// POST /api/generate/pitch-deck: Investor pitch deck for an analysis.
#[utoipa::path(
    post,
    path = "/api/generate/pitch-deck",
    params(PitchDeckQuery),
    responses(
        (status = 200, description = "Pitch deck", body = PitchDeckEnvelope),
        (status = 404, description = "Analysis not found", body = crate::error::ErrorBody),
    ),
    tag = "content"
)]
async fn generate_pitch_deck(
    State(state): State<AppState>,
    query: Result<Query<PitchDeckQuery>, QueryRejection>,
) -> Result<Json<PitchDeckEnvelope>, AppError> {
    let query = extract_query(query)?;
    let analysis = find_analysis(&state, &query.analysis_id)?;
    Ok(Json(content::pitch_deck(&state, &analysis).await))
}

/// POST /api/generate/content-calendar: Week-by-week posting calendar.
#[utoipa::path(
    post,
    path = "/api/generate/content-calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Content calendar", body = ContentCalendarEnvelope),
        (status = 404, description = "Analysis not found", body = crate::error::ErrorBody),
        (status = 422, description = "Weeks out of range", body = crate::error::ErrorBody),
    ),
    tag = "content"
)]
async fn generate_content_calendar(
    State(state): State<AppState>,
    query: Result<Query<CalendarQuery>, QueryRejection>,
) -> Result<Json<ContentCalendarEnvelope>, AppError> {
    let query = extract_query(query)?;
    let weeks = check_range("weeks", query.weeks, 1, MAX_WEEKS)?;
    let analysis = find_analysis(&state, &query.analysis_id)?;
    Ok(Json(content::content_calendar(&state, &analysis, weeks).await))
}

/// POST /api/generate/email-sequence: Email campaign sequence.
#[utoipa::path(
    post,
    path = "/api/generate/email-sequence",
    params(EmailSequenceQuery),
    responses(
        (status = 200, description = "Email sequence", body = EmailSequenceEnvelope),
        (status = 404, description = "Analysis not found", body = crate::error::ErrorBody),
    ),
    tag = "content"
)]
async fn generate_email_sequence(
    State(state): State<AppState>,
    query: Result<Query<EmailSequenceQuery>, QueryRejection>,
) -> Result<Json<EmailSequenceEnvelope>, AppError> {
    let query = extract_query(query)?;
    let sequence_type = query.sequence_type.trim();
    if sequence_type.is_empty() {
        return Err(AppError::Validation("sequence_type must not be empty".into()));
    }
    let analysis = find_analysis(&state, &query.analysis_id)?;
    Ok(Json(content::email_sequence(&state, &analysis, sequence_type).await))
}

/// POST /api/generate/social-posts: Ready-to-publish posts for one channel.
#[utoipa::path(
    post,
    path = "/api/generate/social-posts",
    params(SocialPostsQuery),
    responses(
        (status = 200, description = "Social posts", body = SocialPostsEnvelope),
        (status = 404, description = "Analysis or channel not found", body = crate::error::ErrorBody),
        (status = 422, description = "Count out of range", body = crate::error::ErrorBody),
    ),
    tag = "content"
)]
async fn generate_social_posts(
    State(state): State<AppState>,
    query: Result<Query<SocialPostsQuery>, QueryRejection>,
) -> Result<Json<SocialPostsEnvelope>, AppError> {
    let query = extract_query(query)?;
    let count = check_range("count", query.count, 1, MAX_POST_COUNT)?;
    let analysis = find_analysis(&state, &query.analysis_id)?;
    let channel = query.channel.as_deref().filter(|c| !c.trim().is_empty());
    content::social_posts(&state, &analysis, channel, count)
        .await
        .map(Json)
}

//! # Content Generators
//!
//! Secondary generators that work from a stored analysis. Each asks the
//! model rotation for JSON; when no model is configured or none produces
//! parsable output, the offline envelope is returned (tagged
//! `data_source = "mock"`).

use astra_core::content::{
    ContentCalendar, ContentCalendarEnvelope, EmailSequence, EmailSequenceEnvelope, PitchDeck,
    PitchDeckEnvelope, SocialPostBatch, SocialPostsEnvelope,
};
use astra_core::fallback;
use astra_core::prompts::{
    content_calendar_prompt, email_sequence_prompt, pitch_deck_prompt, social_posts_prompt,
    CALENDAR_TEMPERATURE, EMAIL_TEMPERATURE, PITCH_DECK_TEMPERATURE, SOCIAL_TEMPERATURE,
};
use astra_core::AnalysisResult;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::services::engine::{generate_json, EngineError};
use crate::state::AppState;

pub const DEFAULT_WEEKS: u32 = 4;
pub const MAX_WEEKS: u32 = 12;
pub const DEFAULT_SEQUENCE_TYPE: &str = "onboarding";
pub const DEFAULT_POST_COUNT: u32 = 10;
pub const MAX_POST_COUNT: u32 = 30;

async fn generate<T: DeserializeOwned>(
    state: &AppState,
    prompt: &str,
    temperature: f32,
) -> Result<T, EngineError> {
    let llm = state.llm.as_ref().ok_or(EngineError::NoModels)?;
    generate_json(llm, None, prompt, temperature).await
}

pub async fn pitch_deck(state: &AppState, analysis: &AnalysisResult) -> PitchDeckEnvelope {
    let prompt = pitch_deck_prompt(analysis);
    match generate::<PitchDeck>(state, &prompt, PITCH_DECK_TEMPERATURE).await {
        Ok(deck) => PitchDeckEnvelope::new(deck, None),
        Err(e) => {
            tracing::warn!(analysis_id = %analysis.id, error = %e, "pitch deck generation failed, using mock");
            fallback::mock_pitch_deck()
        }
    }
}

pub async fn content_calendar(
    state: &AppState,
    analysis: &AnalysisResult,
    weeks: u32,
) -> ContentCalendarEnvelope {
    let prompt = content_calendar_prompt(analysis, weeks);
    match generate::<ContentCalendar>(state, &prompt, CALENDAR_TEMPERATURE).await {
        Ok(calendar) => ContentCalendarEnvelope::new(calendar, weeks, None),
        Err(e) => {
            tracing::warn!(analysis_id = %analysis.id, error = %e, "content calendar generation failed, using mock");
            fallback::mock_content_calendar(weeks)
        }
    }
}

pub async fn email_sequence(
    state: &AppState,
    analysis: &AnalysisResult,
    sequence_type: &str,
) -> EmailSequenceEnvelope {
    let prompt = email_sequence_prompt(analysis, sequence_type);
    match generate::<EmailSequence>(state, &prompt, EMAIL_TEMPERATURE).await {
        Ok(sequence) => EmailSequenceEnvelope::new(sequence, sequence_type, None),
        Err(e) => {
            tracing::warn!(analysis_id = %analysis.id, error = %e, "email sequence generation failed, using mock");
            fallback::mock_email_sequence(sequence_type)
        }
    }
}

/// Posts for one of the analysis' channels. Without `channel`, the first
/// strategy is used. A channel the analysis has no strategy for is a 404.
pub async fn social_posts(
    state: &AppState,
    analysis: &AnalysisResult,
    channel: Option<&str>,
    count: u32,
) -> Result<SocialPostsEnvelope, AppError> {
    let strategy = match channel {
        Some(channel) => analysis.strategy_for(channel).ok_or_else(|| {
            AppError::NotFound(format!("No strategy for channel '{channel}' in this analysis"))
        })?,
        None => analysis
            .strategies
            .first()
            .ok_or_else(|| AppError::NotFound("Analysis has no channel strategies".into()))?,
    };

    let prompt = social_posts_prompt(strategy, count);
    Ok(
        match generate::<SocialPostBatch>(state, &prompt, SOCIAL_TEMPERATURE).await {
            Ok(batch) => SocialPostsEnvelope::new(&strategy.channel, batch.posts, None),
            Err(e) => {
                tracing::warn!(analysis_id = %analysis.id, error = %e, "social post generation failed, returning empty batch");
                fallback::empty_social_posts(&strategy.channel)
            }
        },
    )
}

//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into one OpenAPI document,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AstraMark API",
        version = "0.1.0",
        description = "Marketing intelligence backend: business analysis, content generation, market monitoring, and analysis proofs.",
    ),
    paths(
        // Meta
        crate::routes::meta::root,
        crate::routes::meta::health,
        crate::routes::meta::metrics,
        // Accounts
        crate::routes::users::register,
        crate::routes::users::issue_token,
        crate::routes::users::current_user,
        crate::routes::plans::list_plans,
        // Analysis
        crate::routes::analysis::analyze,
        crate::routes::analysis::list_analyses,
        crate::routes::analysis::get_analysis,
        crate::routes::analysis::list_businesses,
        // Content
        crate::routes::content::generate_pitch_deck,
        crate::routes::content::generate_content_calendar,
        crate::routes::content::generate_email_sequence,
        crate::routes::content::generate_social_posts,
        crate::routes::export::export_pdf,
        // Market
        crate::routes::market::market_signals,
        crate::routes::market::competitor_updates,
        crate::routes::market::keyword_metrics,
        // Proofs
        crate::routes::proofs::verify_proof,
    ),
    components(schemas(
        // Domain records
        astra_core::BusinessInput,
        astra_core::BusinessProfile,
        astra_core::AnalysisResult,
        astra_core::analysis::MarketAnalysis,
        astra_core::analysis::UserPersona,
        astra_core::analysis::AiInsight,
        astra_core::analysis::ChannelStrategy,
        astra_core::analysis::RevenueProjection,
        astra_core::analysis::AiLearningUpdate,
        astra_core::analysis::ExecutionAction,
        astra_core::market::CompetitorInsight,
        astra_core::market::MarketTrends,
        astra_core::market::MarketSignal,
        astra_core::market::MarketSignalRecord,
        astra_core::market::CompetitorSnapshot,
        astra_core::market::KeywordMetrics,
        astra_core::market::SignalType,
        astra_core::market::Severity,
        astra_core::proof::BlockchainProof,
        astra_core::plans::Plan,
        astra_core::plans::PlanPrice,
        // Content
        astra_core::content::PitchDeckEnvelope,
        astra_core::content::PitchDeck,
        astra_core::content::Slide,
        astra_core::content::ContentCalendarEnvelope,
        astra_core::content::ContentCalendar,
        astra_core::content::CalendarWeek,
        astra_core::content::CalendarDay,
        astra_core::content::CalendarPost,
        astra_core::content::EmailSequenceEnvelope,
        astra_core::content::EmailSequence,
        astra_core::content::Email,
        astra_core::content::SocialPostsEnvelope,
        astra_core::content::SocialPost,
        // Accounts
        astra_core::user::RegisterRequest,
        astra_core::user::LoginForm,
        astra_core::user::User,
        astra_core::user::SubscriptionTier,
        astra_core::user::Token,
        // Responses
        crate::routes::meta::RootResponse,
        crate::routes::meta::HealthResponse,
        crate::middleware::metrics::MetricsSnapshot,
        crate::routes::market::SignalsResponse,
        crate::routes::market::CompetitorUpdatesResponse,
        crate::routes::proofs::VerificationResponse,
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "meta", description = "Banner, health, and counters"),
        (name = "auth", description = "Accounts and bearer tokens"),
        (name = "plans", description = "Subscription plans"),
        (name = "analysis", description = "Business analysis pipeline"),
        (name = "content", description = "Generated marketing content"),
        (name = "export", description = "Report downloads"),
        (name = "market", description = "Market signals and competitor monitoring"),
        (name = "proofs", description = "Analysis proof verification"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec = ApiDoc::openapi();
        for path in [
            "/api/analyze",
            "/api/analyses/{id}",
            "/api/generate/social-posts",
            "/api/export/pdf/{id}",
            "/api/market/keywords",
            "/api/proofs/{analysis_id}/verify",
            "/api/auth/token",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
        assert!(spec.components.unwrap().security_schemes.contains_key("bearer_auth"));
    }
}

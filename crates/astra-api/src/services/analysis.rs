//! # Analysis Pipeline
//!
//! `POST /api/analyze` end to end:
//!
//! 1. persist the business profile
//! 2. fetch competitors and trends ([`MarketDataService`])
//! 3. ask the model rotation for an [`AnalysisDraft`], or fall back to the
//!    offline draft when every model fails or none is configured
//! 4. attach agent features and market data
//! 5. fingerprint and anchor the result ([`proof`])
//! 6. persist the analysis and kick off one market scan

use astra_core::fallback::{agent_features, offline_analysis};
use astra_core::prompts::{analysis_prompt, ANALYSIS_TEMPERATURE, SYSTEM_PROFILE};
use astra_core::{AnalysisDraft, AnalysisResult, BusinessInput, BusinessProfile};

use crate::error::AppError;
use crate::services::engine::generate_json;
use crate::services::market_data::MarketDataService;
use crate::services::{proof, scanner};
use crate::state::AppState;

const NO_MODEL_CONFIGURED: &str = "AI service not configured";

pub async fn analyze(
    state: &AppState,
    input: BusinessInput,
    is_premium: bool,
) -> Result<AnalysisResult, AppError> {
    let input = input.into_validated()?;
    let business = state.save(BusinessProfile::new(input.clone())).await?;
    tracing::info!(business_id = %business.id, business_type = %business.business_type, "analysis requested");

    let market = MarketDataService::from_state(state);
    let competitors = market
        .competitors(&business.business_type, &business.target_market)
        .await;
    let trends = market.trends(&business.business_type).await;

    let prompt = analysis_prompt(&input, &competitors, &trends);
    let draft = match &state.llm {
        Some(llm) => {
            match generate_json::<AnalysisDraft>(llm, Some(SYSTEM_PROFILE), &prompt, ANALYSIS_TEMPERATURE)
                .await
            {
                Ok(draft) => draft,
                Err(e) => {
                    tracing::error!(business_id = %business.id, error = %e, "all models failed, using offline analysis");
                    offline_analysis(&e.to_string())
                }
            }
        }
        None => {
            tracing::warn!(business_id = %business.id, "no language model configured, using offline analysis");
            offline_analysis(NO_MODEL_CONFIGURED)
        }
    };

    let mut analysis = AnalysisResult::assemble(
        business.id,
        draft,
        agent_features(&business.business_type, &business.primary_goal),
        competitors.competitors,
        Some(trends),
        is_premium,
    );
    analysis.blockchain_proof = Some(proof::timestamp(state, &analysis).await?);

    let analysis = state.save(analysis).await?;
    tracing::info!(analysis_id = %analysis.id, business_id = %business.id, "analysis stored");

    if state.config.enable_background_scanner {
        scanner::spawn_market_scan(state.clone());
    }

    Ok(analysis)
}

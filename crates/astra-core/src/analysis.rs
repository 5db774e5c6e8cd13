//! # Analysis Documents
//!
//! [`AnalysisDraft`] is the JSON shape requested from the language model.
//! [`AnalysisResult`] is the persisted document: a draft plus identity,
//! agent features, live competitor data, and an optional ledger proof.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::market::{CompetitorInsight, MarketSignal, MarketTrends};
use crate::proof::BlockchainProof;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MarketAnalysis {
    pub market_size: String,
    pub growth_rate: String,
    pub entry_barriers: String,
    pub opportunities: Vec<String>,
    pub risks: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserPersona {
    pub name: String,
    pub demographics: String,
    pub psychographics: String,
    pub pain_points: Vec<String>,
    pub buying_triggers: Vec<String>,
    pub objections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AiInsight {
    pub insight_type: String,
    pub description: String,
    pub confidence: u32,
}

/// Marketing plan for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChannelStrategy {
    pub channel: String,
    pub strategy: String,
    pub content_ideas: Vec<String>,
    pub posting_schedule: String,
    /// Free-form targets, e.g. `{"cpc": "$1.20", "roas": "3x"}`.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub kpi_benchmarks: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RevenueProjection {
    pub min_monthly: String,
    pub max_monthly: String,
    pub growth_timeline: String,
}

/// The structured analysis produced by the language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisDraft {
    pub overview: String,
    pub market_analysis: MarketAnalysis,
    pub user_personas: Vec<UserPersona>,
    pub ai_insights: Vec<AiInsight>,
    pub strategies: Vec<ChannelStrategy>,
    pub revenue_projection: RevenueProjection,
    pub virality_score: u32,
    pub retention_score: u32,
    pub ai_verdict: String,
    pub confidence_score: u32,
    pub biggest_opportunity: String,
    pub biggest_risk: String,
    pub next_action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AiLearningUpdate {
    pub id: Uuid,
    pub update_type: String,
    pub learning_description: String,
    pub improvement_metric: String,
    pub timestamp: String,
}

/// An automation the product can run on top of an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExecutionAction {
    pub action_id: String,
    pub action_type: String,
    pub action_name: String,
    pub description: String,
    pub is_premium: bool,
    /// `active` or `locked`.
    pub status: String,
}

/// Monitoring features attached to every new analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentFeatures {
    pub market_signals: Vec<MarketSignal>,
    pub ai_learning_updates: Vec<AiLearningUpdate>,
    pub execution_actions: Vec<ExecutionAction>,
    pub last_market_scan: String,
    pub monitoring_status: String,
}

/// A persisted analysis document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub business_id: Uuid,
    pub overview: String,
    pub market_analysis: MarketAnalysis,
    pub user_personas: Vec<UserPersona>,
    pub ai_insights: Vec<AiInsight>,
    pub strategies: Vec<ChannelStrategy>,
    pub revenue_projection: RevenueProjection,
    pub virality_score: u32,
    pub retention_score: u32,
    pub ai_verdict: String,
    pub confidence_score: u32,
    pub biggest_opportunity: String,
    pub biggest_risk: String,
    pub next_action: String,
    #[serde(default)]
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub market_signals: Vec<MarketSignal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockchain_proof: Option<BlockchainProof>,
    #[serde(default)]
    pub ai_learning_updates: Vec<AiLearningUpdate>,
    #[serde(default)]
    pub execution_actions: Vec<ExecutionAction>,
    #[serde(default)]
    pub competitor_insights: Vec<CompetitorInsight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_trends: Option<MarketTrends>,
    #[serde(default)]
    pub last_market_scan: String,
    #[serde(default = "default_monitoring_status")]
    pub monitoring_status: String,
}

fn default_monitoring_status() -> String {
    "active".to_string()
}

impl AnalysisResult {
    /// Combine a model draft with agent features and market data.
    ///
    /// The result carries a fresh id and no proof yet.
    pub fn assemble(
        business_id: Uuid,
        draft: AnalysisDraft,
        features: AgentFeatures,
        competitor_insights: Vec<CompetitorInsight>,
        market_trends: Option<MarketTrends>,
        is_premium: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            business_id,
            overview: draft.overview,
            market_analysis: draft.market_analysis,
            user_personas: draft.user_personas,
            ai_insights: draft.ai_insights,
            strategies: draft.strategies,
            revenue_projection: draft.revenue_projection,
            virality_score: draft.virality_score,
            retention_score: draft.retention_score,
            ai_verdict: draft.ai_verdict,
            confidence_score: draft.confidence_score,
            biggest_opportunity: draft.biggest_opportunity,
            biggest_risk: draft.biggest_risk,
            next_action: draft.next_action,
            is_premium,
            created_at: Utc::now(),
            market_signals: features.market_signals,
            blockchain_proof: None,
            ai_learning_updates: features.ai_learning_updates,
            execution_actions: features.execution_actions,
            competitor_insights,
            market_trends,
            last_market_scan: features.last_market_scan,
            monitoring_status: features.monitoring_status,
        }
    }

    /// The strategy for a channel, matched case-insensitively.
    pub fn strategy_for(&self, channel: &str) -> Option<&ChannelStrategy> {
        self.strategies
            .iter()
            .find(|s| s.channel.eq_ignore_ascii_case(channel))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fallback;

    pub(crate) fn sample_analysis() -> AnalysisResult {
        AnalysisResult::assemble(
            Uuid::new_v4(),
            fallback::offline_analysis("timeout"),
            fallback::agent_features("SaaS", "Grow signups"),
            fallback::mock_competitors("SaaS", "India").competitors,
            Some(fallback::mock_trends()),
            false,
        )
    }

    #[test]
    fn assemble_copies_draft_and_features() {
        let analysis = sample_analysis();
        assert!(analysis.overview.contains("offline mode"));
        assert_eq!(analysis.execution_actions.len(), 3);
        assert_eq!(analysis.competitor_insights.len(), 3);
        assert_eq!(analysis.monitoring_status, "active");
        assert!(analysis.blockchain_proof.is_none());
    }

    #[test]
    fn draft_parses_model_json() {
        let raw = serde_json::json!({
            "overview": "o",
            "market_analysis": {
                "market_size": "$1B", "growth_rate": "10%", "entry_barriers": "low",
                "opportunities": ["a"], "risks": ["b"], "strengths": [], "weaknesses": []
            },
            "user_personas": [],
            "ai_insights": [{"insight_type": "Market Gap", "description": "d", "confidence": 85}],
            "strategies": [{
                "channel": "SEO", "strategy": "s", "content_ideas": [],
                "posting_schedule": "weekly",
                "kpi_benchmarks": {"organic_traffic": "10k", "conversion_rate": 2.5}
            }],
            "revenue_projection": {"min_monthly": "$1", "max_monthly": "$2", "growth_timeline": "6m"},
            "virality_score": 75, "retention_score": 80, "ai_verdict": "High",
            "confidence_score": 85, "biggest_opportunity": "x", "biggest_risk": "y",
            "next_action": "z"
        });
        let draft: AnalysisDraft = serde_json::from_value(raw).unwrap();
        assert_eq!(draft.strategies[0].kpi_benchmarks.len(), 2);
        assert_eq!(draft.confidence_score, 85);
    }

    #[test]
    fn strategy_lookup_ignores_case() {
        let analysis = sample_analysis();
        assert!(analysis.strategy_for("content marketing").is_some());
        assert!(analysis.strategy_for("TikTok").is_none());
    }

    #[test]
    fn stored_documents_without_optional_sections_load() {
        let mut json = serde_json::to_value(sample_analysis()).unwrap();
        let obj = json.as_object_mut().unwrap();
        obj.remove("market_signals");
        obj.remove("execution_actions");
        obj.remove("monitoring_status");
        let back: AnalysisResult = serde_json::from_value(json).unwrap();
        assert!(back.market_signals.is_empty());
        assert_eq!(back.monitoring_status, "active");
    }
}

//! # Offline Payloads
//!
//! Deterministic stand-ins returned when the language model, the search
//! API, or the ledger is unavailable. Every function here is pure apart
//! from fresh ids and timestamps.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::analysis::{
    AgentFeatures, AiInsight, AiLearningUpdate, AnalysisDraft, ChannelStrategy, ExecutionAction,
    MarketAnalysis, RevenueProjection, UserPersona,
};
use crate::content::{
    title_case, CalendarDay, CalendarPost, CalendarWeek, ContentCalendar, ContentCalendarEnvelope,
    Email, EmailSequence, EmailSequenceEnvelope, PitchDeck, PitchDeckEnvelope, Slide,
    SocialPostsEnvelope,
};
use crate::market::{
    CompetitorData, CompetitorInsight, KeywordMetrics, KeywordReport, MarketSignal, MarketTrends,
    Severity, SignalType,
};

/// Provenance tag carried by every offline payload.
pub const MOCK_SOURCE: &str = "mock";

/// Longest slice of the upstream error echoed into the offline overview.
const ERROR_EXCERPT_CHARS: usize = 100;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The analysis returned when every model in the rotation failed.
pub fn offline_analysis(last_error: &str) -> AnalysisDraft {
    let excerpt: String = last_error.chars().take(ERROR_EXCERPT_CHARS).collect();
    let mut kpi_benchmarks = serde_json::Map::new();
    kpi_benchmarks.insert("traffic".into(), json!("1000/mo"));
    kpi_benchmarks.insert("leads".into(), json!("50/mo"));

    AnalysisDraft {
        overview: format!(
            "Analysis generated in offline mode due to high AI demand. (Error: {excerpt}...)"
        ),
        market_analysis: MarketAnalysis {
            market_size: "Estimated $10B+ (Offline Estimate)".into(),
            growth_rate: "15% CAGR".into(),
            entry_barriers: "Moderate".into(),
            opportunities: strings(&["Digital Transformation", "AI Integration", "Niche Targeting"]),
            risks: strings(&["Competition", "Market Saturation", "Tech Changes"]),
            strengths: strings(&["Agility", "Cost Structure"]),
            weaknesses: strings(&["Brand Awareness", "Resources"]),
        },
        user_personas: vec![UserPersona {
            name: "Tech Savvy Founder".into(),
            demographics: "25-40, Urban".into(),
            psychographics: "Early adopter, ambitious".into(),
            pain_points: strings(&["Efficiency", "Scaling"]),
            buying_triggers: strings(&["Automation", "ROI"]),
            objections: strings(&["Cost", "Complexity"]),
        }],
        ai_insights: vec![AiInsight {
            insight_type: "Market Gap".into(),
            description: "High demand for specialized solutions in this vertical.".into(),
            confidence: 80,
        }],
        strategies: vec![ChannelStrategy {
            channel: "Content Marketing".into(),
            strategy: "Focus on educational content and thought leadership.".into(),
            content_ideas: strings(&["How-to Guides", "Case Studies", "Industry Trends"]),
            posting_schedule: "2x Weekly".into(),
            kpi_benchmarks,
        }],
        revenue_projection: RevenueProjection {
            min_monthly: "$2,000".into(),
            max_monthly: "$15,000".into(),
            growth_timeline: "6-12 Months".into(),
        },
        virality_score: 65,
        retention_score: 75,
        ai_verdict: "Medium Growth Potential".into(),
        confidence_score: 70,
        biggest_opportunity: "Niche dominance".into(),
        biggest_risk: "Competitor speed".into(),
        next_action: "Launch MVP marketing campaign".into(),
    }
}

/// Monitoring features attached to a freshly generated analysis.
pub fn agent_features(business_type: &str, primary_goal: &str) -> AgentFeatures {
    let action = |id: &str, kind: &str, name: &str, description: &str, premium: bool| ExecutionAction {
        action_id: id.into(),
        action_type: kind.into(),
        action_name: name.into(),
        description: description.into(),
        is_premium: premium,
        status: if premium { "locked" } else { "active" }.into(),
    };

    AgentFeatures {
        market_signals: vec![
            MarketSignal {
                id: Uuid::new_v4(),
                signal_type: SignalType::Competitive,
                severity: Severity::Critical,
                message: format!("Major competitor in {business_type} increased ad spend by 40%"),
                detected_at: "2 mins ago".into(),
            },
            MarketSignal {
                id: Uuid::new_v4(),
                signal_type: SignalType::Consumer,
                severity: Severity::Info,
                message: "Shift in search patterns detected for target audience".into(),
                detected_at: "15 mins ago".into(),
            },
        ],
        ai_learning_updates: vec![AiLearningUpdate {
            id: Uuid::new_v4(),
            update_type: "Pattern Recognition".into(),
            learning_description: format!("Model refined for {primary_goal} optimization"),
            improvement_metric: "+14.2% Efficiency".into(),
            timestamp: "Just now".into(),
        }],
        execution_actions: vec![
            action(
                "auto-content",
                "content",
                "Generate Social Content",
                "AI-written posts based on this strategy",
                false,
            ),
            action(
                "competitor-track",
                "monitoring",
                "Live Competitor Tracking",
                "Monitor landing page changes in real-time",
                true,
            ),
            action(
                "ad-optimize",
                "execution",
                "Auto-Optimize Ad Spend",
                "Dynamic budget allocation based on performance",
                true,
            ),
        ],
        last_market_scan: "Recently".into(),
        monitoring_status: "active".into(),
    }
}

/// Three plausible competitors for a market.
pub fn mock_competitors(business_type: &str, target_market: &str) -> CompetitorData {
    let competitor = |suffix: &str,
                      domain: &str,
                      description: String,
                      position: u32,
                      traffic: &str,
                      spend: &str,
                      campaigns: u32,
                      keywords: &[&str]| CompetitorInsight {
        name: format!("{business_type} {suffix}"),
        domain: domain.into(),
        description,
        position,
        estimated_traffic: traffic.into(),
        ad_spend_monthly: Some(spend.into()),
        active_campaigns: Some(campaigns),
        top_keywords: Some(strings(keywords)),
    };

    CompetitorData {
        competitors: vec![
            competitor(
                "Leader A",
                "competitor-a.com",
                format!("Leading {business_type} platform in {target_market}"),
                1,
                "8,000-12,000",
                "$15,000-$25,000",
                24,
                &["saas platform", "business software", "automation tool"],
            ),
            competitor(
                "Challenger B",
                "competitor-b.com",
                format!("Fast-growing {business_type} solution"),
                2,
                "5,000-8,000",
                "$8,000-$15,000",
                18,
                &["digital marketing", "growth tools", "analytics"],
            ),
            competitor(
                "Innovator C",
                "competitor-c.com",
                format!("AI-powered {business_type} platform"),
                3,
                "3,000-5,000",
                "$5,000-$10,000",
                12,
                &["ai marketing", "smart automation", "data insights"],
            ),
        ],
        total_results: 45_600_000,
        fetched_at: Utc::now(),
        data_source: Some(MOCK_SOURCE.into()),
    }
}

pub fn mock_trends() -> MarketTrends {
    MarketTrends {
        google_ads_cpc_trend: Some("+18%".into()),
        meta_ads_cpm_trend: Some("-12%".into()),
        market_growth: Some("+25% YoY".into()),
        top_rising_keywords: strings(&["ai automation", "smart analytics", "predictive insights"]),
        data_source: Some(MOCK_SOURCE.into()),
        ..Default::default()
    }
}

/// Identical metrics for each keyword.
pub fn mock_keywords(keywords: &[String]) -> KeywordReport {
    keywords
        .iter()
        .map(|k| {
            (
                k.clone(),
                KeywordMetrics {
                    search_volume: "10,000-50,000".into(),
                    competition: "Medium".into(),
                    cpc: "$2.50-$5.00".into(),
                    trend: Some("Rising".into()),
                    results_count: None,
                },
            )
        })
        .collect()
}

pub fn mock_pitch_deck() -> PitchDeckEnvelope {
    let deck = PitchDeck {
        slides: vec![
            Slide {
                slide_number: 1,
                title: "Problem".into(),
                content: strings(&[
                    "Market inefficiency identified",
                    "Customer pain points unaddressed",
                    "Opportunity for disruption",
                ]),
                speaker_notes: "Start with the problem to hook investors".into(),
            },
            Slide {
                slide_number: 2,
                title: "Solution".into(),
                content: strings(&[
                    "AI-powered platform",
                    "Automated insights",
                    "10x faster than competitors",
                ]),
                speaker_notes: "Explain how we solve the problem uniquely".into(),
            },
        ],
    };
    PitchDeckEnvelope::new(deck, Some(MOCK_SOURCE.into()))
}

pub fn mock_content_calendar(weeks: u32) -> ContentCalendarEnvelope {
    let calendar = ContentCalendar {
        weeks: vec![CalendarWeek {
            week_number: 1,
            days: vec![CalendarDay {
                day: "Monday".into(),
                date: "2026-01-13".into(),
                posts: vec![CalendarPost {
                    channel: "LinkedIn".into(),
                    content_type: "Article".into(),
                    topic: "AI Marketing Trends 2026".into(),
                    caption: "The future of marketing is here...".into(),
                    hashtags: strings(&["#AIMarketing", "#DigitalTransformation"]),
                    time: "09:00 AM".into(),
                }],
            }],
        }],
    };
    ContentCalendarEnvelope::new(calendar, weeks, Some(MOCK_SOURCE.into()))
}

pub fn mock_email_sequence(sequence_type: &str) -> EmailSequenceEnvelope {
    let sequence = EmailSequence {
        sequence_name: format!("{} Sequence", title_case(sequence_type)),
        emails: vec![Email {
            email_number: 1,
            send_delay_days: 0,
            subject_line: "Welcome to AstraMark!".into(),
            preview_text: "Get started with AI-powered marketing".into(),
            body: "Welcome email body...".into(),
            cta: "Get Started".into(),
            cta_link: "https://astramark.com/start".into(),
        }],
    };
    EmailSequenceEnvelope::new(sequence, sequence_type, Some(MOCK_SOURCE.into()))
}

/// Social posts cannot be faked usefully; failure yields an empty batch.
pub fn empty_social_posts(channel: &str) -> SocialPostsEnvelope {
    SocialPostsEnvelope::new(channel, Vec::new(), Some(MOCK_SOURCE.into()))
}

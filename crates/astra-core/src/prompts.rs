//! # Prompt Builders
//!
//! Each generator is a prompt handed to the language model together with a
//! sampling temperature. Builders take only domain records so they can be
//! tested without a model.

use crate::analysis::{AnalysisResult, ChannelStrategy, UserPersona};
use crate::business::BusinessInput;
use crate::market::{CompetitorData, MarketTrends};

pub const ANALYSIS_TEMPERATURE: f32 = 0.7;
pub const PITCH_DECK_TEMPERATURE: f32 = 0.7;
pub const CALENDAR_TEMPERATURE: f32 = 0.8;
pub const EMAIL_TEMPERATURE: f32 = 0.7;
pub const SOCIAL_TEMPERATURE: f32 = 0.9;

/// System instruction for market analysis.
pub const SYSTEM_PROFILE: &str = "\
You are AstraMark, a production-grade AI Marketing & Business Intelligence Platform.

Your role is to act as:
- A senior digital marketing strategist
- A data analyst
- A market research expert
- A business consultant
- A financial planner
- A startup advisor

You DO NOT behave like a chatbot.
You behave like a professional SaaS intelligence engine.

CORE OBJECTIVES:
1. Generate actionable, data-backed marketing strategies
2. Perform market research and competitor analysis
3. Create revenue projections and business models
4. Design go-to-market strategies
5. Build reports, dashboards, and growth plans
6. Provide automation-ready outputs for execution

OUTPUT RULES:
- Always structured JSON
- Always actionable (no generic advice)
- Always business-ready
- Assume the user wants results they can implement or present

LIMITATIONS:
- Never hallucinate exact numbers without stating \"Estimated\" or \"Projected\".
- Prefer clarity over hype.
";

const ANALYSIS_SCHEMA: &str = r#"{
    "overview": "Brief business snapshot and goal alignment",
    "market_analysis": {
        "market_size": "Estimated market size with specifics",
        "growth_rate": "Annual growth rate percentage",
        "entry_barriers": "Key barriers to entry",
        "opportunities": ["opportunity1", "opportunity2", "opportunity3"],
        "risks": ["risk1", "risk2", "risk3"],
        "strengths": ["strength1", "strength2"],
        "weaknesses": ["weakness1", "weakness2"]
    },
    "user_personas": [
        {
            "name": "Persona Name",
            "demographics": "Age, location, income details",
            "psychographics": "Interests, values, lifestyle",
            "pain_points": ["pain1", "pain2", "pain3"],
            "buying_triggers": ["trigger1", "trigger2"],
            "objections": ["objection1", "objection2"]
        }
    ],
    "ai_insights": [
        {
            "insight_type": "Pattern Recognition / Market Gap / Growth Opportunity",
            "description": "Detailed insight",
            "confidence": 85
        }
    ],
    "strategies": [
        {
            "channel": "SEO",
            "strategy": "Detailed SEO strategy",
            "content_ideas": ["idea1", "idea2", "idea3"],
            "posting_schedule": "Frequency and timing",
            "kpi_benchmarks": {"organic_traffic": "Target number", "conversion_rate": "Target percentage"}
        },
        {
            "channel": "Content Marketing",
            "strategy": "Content strategy details",
            "content_ideas": ["idea1", "idea2", "idea3"],
            "posting_schedule": "Content calendar",
            "kpi_benchmarks": {"engagement_rate": "Target", "lead_generation": "Target"}
        },
        {
            "channel": "Paid Ads",
            "strategy": "Paid advertising strategy",
            "content_ideas": ["ad_concept1", "ad_concept2"],
            "posting_schedule": "Campaign frequency",
            "kpi_benchmarks": {"cpc": "Target cost", "roas": "Target return"}
        },
        {
            "channel": "Social Media",
            "strategy": "Social media strategy",
            "content_ideas": ["post_idea1", "post_idea2", "post_idea3"],
            "posting_schedule": "Daily/Weekly schedule",
            "kpi_benchmarks": {"followers_growth": "Monthly target", "engagement_rate": "Target percentage"}
        }
    ],
    "revenue_projection": {
        "min_monthly": "Currency Amount",
        "max_monthly": "Currency Amount",
        "growth_timeline": "Timeline to reach targets"
    },
    "virality_score": 75,
    "retention_score": 80,
    "ai_verdict": "High / Medium / Low Growth Potential",
    "confidence_score": 85,
    "biggest_opportunity": "The single biggest opportunity",
    "biggest_risk": "The single biggest risk",
    "next_action": "The immediate next step to take"
}"#;

/// User prompt for a market analysis, including live market context.
pub fn analysis_prompt(
    business: &BusinessInput,
    competitors: &CompetitorData,
    trends: &MarketTrends,
) -> String {
    let top: Vec<&str> = competitors
        .competitors
        .iter()
        .take(3)
        .map(|c| c.name.as_str())
        .collect();
    let additional = business
        .additional_info
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("None");

    format!(
        "Analyze this business and provide a comprehensive marketing strategy:

Business Type: {business_type}
Target Market: {target_market}
Monthly Budget: {budget}
Primary Goal: {goal}
Additional Info: {additional}

LIVE MARKET DATA:
- Competitor Count: {count}
- Top Competitors: {top}
- Market Trends: {trends}

Provide a detailed analysis in the following JSON structure (AND ONLY JSON):
{ANALYSIS_SCHEMA}

Return strict JSON ONLY. No markdown formatting like ```json ... ```.
",
        business_type = business.business_type,
        target_market = business.target_market,
        budget = business.monthly_budget,
        goal = business.primary_goal,
        count = competitors.competitors.len(),
        top = top.join(", "),
        trends = trends.summary(),
    )
}

pub fn pitch_deck_prompt(analysis: &AnalysisResult) -> String {
    let personas: Vec<&str> = analysis.user_personas.iter().map(|p| p.name.as_str()).collect();
    format!(
        r#"Based on this business analysis, create a comprehensive pitch deck outline:

Business Overview: {overview}
Market Size: {market_size}
Target Personas: {personas}
Revenue Projection: {revenue}

Create a pitch deck with the following slides (return as JSON):
{{
    "slides": [
        {{
            "slide_number": 1,
            "title": "Problem",
            "content": ["Bullet point 1", "Bullet point 2", "Bullet point 3"],
            "speaker_notes": "What to say during this slide"
        }}
    ]
}}
Include one slide each for: Problem, Solution, Market Opportunity, Business Model, Traction, Competition, Team, Financials, Ask.

Return ONLY valid JSON.
"#,
        overview = analysis.overview,
        market_size = analysis.market_analysis.market_size,
        personas = personas.join(", "),
        revenue = analysis.revenue_projection.max_monthly,
    )
}

pub fn content_calendar_prompt(analysis: &AnalysisResult, weeks: u32) -> String {
    format!(
        r##"Create a {weeks}-week content calendar based on these marketing strategies:

{strategies}

Return a JSON content calendar with daily posts across all channels:
{{
    "weeks": [
        {{
            "week_number": 1,
            "days": [
                {{
                    "day": "Monday",
                    "date": "2026-01-13",
                    "posts": [
                        {{
                            "channel": "LinkedIn",
                            "content_type": "Article",
                            "topic": "...",
                            "caption": "...",
                            "hashtags": ["#marketing", "#ai"],
                            "time": "09:00 AM"
                        }}
                    ]
                }}
            ]
        }}
    ]
}}

Return ONLY valid JSON.
"##,
        strategies = format_strategies(&analysis.strategies),
    )
}

pub fn email_sequence_prompt(analysis: &AnalysisResult, sequence_type: &str) -> String {
    format!(
        r#"Create a {sequence_type} email sequence for these user personas:

{personas}

Generate a 5-email sequence with:
{{
    "sequence_name": "{name} Sequence",
    "emails": [
        {{
            "email_number": 1,
            "send_delay_days": 0,
            "subject_line": "...",
            "preview_text": "...",
            "body": "Full email body with personalization tags",
            "cta": "Call to action button text",
            "cta_link": "https://example.com/action"
        }}
    ]
}}

Return ONLY valid JSON.
"#,
        personas = format_personas(&analysis.user_personas),
        name = crate::content::title_case(sequence_type),
    )
}

pub fn social_posts_prompt(strategy: &ChannelStrategy, count: u32) -> String {
    let ideas: Vec<String> = strategy
        .content_ideas
        .iter()
        .map(|idea| format!("- {idea}"))
        .collect();
    format!(
        r##"Generate {count} ready-to-post {channel} posts based on these content ideas:

{ideas}

Return JSON array of posts:
{{
    "posts": [
        {{
            "post_number": 1,
            "caption": "Engaging post caption with emojis",
            "hashtags": ["#tag1", "#tag2", "#tag3"],
            "best_time": "Tuesday 10:00 AM",
            "content_type": "Image/Video/Carousel",
            "image_description": "Description for image generation"
        }}
    ]
}}

Return ONLY valid JSON.
"##,
        channel = strategy.channel,
        ideas = ideas.join("\n"),
    )
}

fn format_strategies(strategies: &[ChannelStrategy]) -> String {
    strategies
        .iter()
        .map(|s| format!("- {}: {}", s.channel, s.strategy))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_personas(personas: &[UserPersona]) -> String {
    personas
        .iter()
        .map(|p| format!("- {}: {}", p.name, p.demographics))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove a surrounding markdown code fence from model output.
///
/// Handles a leading ```` ```json ```` or ```` ``` ```` and a trailing
/// ```` ``` ````; anything else is returned trimmed.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::sample_analysis;
    use crate::fallback;

    fn input() -> BusinessInput {
        BusinessInput {
            business_type: "Coffee roastery".into(),
            target_market: "Seattle".into(),
            monthly_budget: "$2,000".into(),
            primary_goal: "Grow wholesale accounts".into(),
            additional_info: None,
        }
    }

    #[test]
    fn analysis_prompt_embeds_market_context() {
        let competitors = fallback::mock_competitors("Coffee roastery", "Seattle");
        let prompt = analysis_prompt(&input(), &competitors, &fallback::mock_trends());
        assert!(prompt.contains("Business Type: Coffee roastery"));
        assert!(prompt.contains("Additional Info: None"));
        assert!(prompt.contains("Competitor Count: 3"));
        assert!(prompt.contains(
            "Top Competitors: Coffee roastery Leader A, Coffee roastery Challenger B, Coffee roastery Innovator C"
        ));
        assert!(prompt.contains("Google Ads CPC +18%"));
        assert!(prompt.contains("\"next_action\""));
    }

    #[test]
    fn content_prompts_reference_analysis() {
        let analysis = sample_analysis();
        assert!(pitch_deck_prompt(&analysis).contains("Tech Savvy Founder"));
        assert!(content_calendar_prompt(&analysis, 3).starts_with("Create a 3-week"));
        assert!(content_calendar_prompt(&analysis, 3)
            .contains("- Content Marketing: Focus on educational content"));
        let email = email_sequence_prompt(&analysis, "onboarding");
        assert!(email.contains("\"Onboarding Sequence\""));
        assert!(email.contains("- Tech Savvy Founder: 25-40, Urban"));
        let social = social_posts_prompt(&analysis.strategies[0], 5);
        assert!(social.starts_with("Generate 5 ready-to-post Content Marketing posts"));
        assert!(social.contains("- Case Studies"));
    }

    #[test]
    fn hashtag_examples_survive_in_templates() {
        let analysis = sample_analysis();
        let calendar = content_calendar_prompt(&analysis, 2);
        assert!(calendar.contains(r##""hashtags": ["#marketing", "#ai"]"##));
        assert!(calendar.trim_end().ends_with("Return ONLY valid JSON."));
        let social = social_posts_prompt(&analysis.strategies[0], 2);
        assert!(social.contains(r##"["#tag1", "#tag2", "#tag3"]"##));
        assert!(social.trim_end().ends_with("Return ONLY valid JSON."));
    }

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n[1]\n```  "), "[1]");
        assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn stripped_output_parses() {
        let raw = "```json\n{\"slides\": []}\n```";
        let deck: crate::content::PitchDeck =
            serde_json::from_str(strip_code_fences(raw)).unwrap();
        assert!(deck.slides.is_empty());
    }
}

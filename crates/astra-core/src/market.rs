//! # Market Intelligence Records
//!
//! Competitor listings, search-trend summaries, keyword metrics, and the
//! market signals produced by the background scanner.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A competitor surfaced by a search-engine results page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompetitorInsight {
    pub name: String,
    pub domain: String,
    pub description: String,
    pub position: u32,
    pub estimated_traffic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_spend_monthly: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_campaigns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_keywords: Option<Vec<String>>,
}

/// Result of a competitor search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompetitorData {
    pub competitors: Vec<CompetitorInsight>,
    pub total_results: u64,
    pub fetched_at: DateTime<Utc>,
    /// `"mock"` when the data did not come from the live search API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

impl CompetitorData {
    /// Whether this data was produced offline.
    pub fn is_mock(&self) -> bool {
        self.data_source.as_deref() == Some("mock")
    }
}

/// Market trend summary for an industry.
///
/// Live trend lookups fill the time-series fields; offline data fills the
/// ad-cost and keyword fields. Every field is optional so either shape
/// round-trips through storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MarketTrends {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_ads_cpc_trend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_ads_cpm_trend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_growth: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_rising_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub interest_over_time: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub rising_queries: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub top_queries: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

impl MarketTrends {
    /// One-line description used inside prompts.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(cpc) = &self.google_ads_cpc_trend {
            parts.push(format!("Google Ads CPC {cpc}"));
        }
        if let Some(cpm) = &self.meta_ads_cpm_trend {
            parts.push(format!("Meta Ads CPM {cpm}"));
        }
        if let Some(growth) = &self.market_growth {
            parts.push(format!("market growth {growth}"));
        }
        if !self.top_rising_keywords.is_empty() {
            parts.push(format!(
                "rising keywords: {}",
                self.top_rising_keywords.join(", ")
            ));
        }
        if let Some(serde_json::Value::Array(points)) = &self.interest_over_time {
            parts.push(format!("{} interest-over-time data points", points.len()));
        }
        if parts.is_empty() {
            "no trend data available".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// Search metrics for a single keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct KeywordMetrics {
    pub search_volume: String,
    pub competition: String,
    pub cpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_count: Option<u64>,
}

/// Keyword metrics keyed by keyword.
pub type KeywordReport = BTreeMap<String, KeywordMetrics>;

/// Category of a market signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum SignalType {
    Competitive,
    Consumer,
    Market,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Competitive => "Competitive",
            Self::Consumer => "Consumer",
            Self::Market => "Market",
        }
    }
}

/// How urgently a signal should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// A signal embedded in an analysis document.
///
/// `detected_at` is a display string ("2 mins ago", "14:05:11"), not a
/// timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MarketSignal {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub severity: Severity,
    pub message: String,
    pub detected_at: String,
}

/// A signal stored in the `market_signals` collection by the scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MarketSignalRecord {
    pub id: Uuid,
    pub business_type: String,
    pub target_market: String,
    pub signal_type: SignalType,
    pub severity: Severity,
    pub message: String,
    pub detected_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A point-in-time competitor listing for one business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CompetitorSnapshot {
    pub id: Uuid,
    pub business_id: Uuid,
    pub business_type: String,
    pub target_market: String,
    pub competitors: Vec<CompetitorInsight>,
    pub total_results: u64,
    pub snapshot_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl CompetitorSnapshot {
    pub fn new(business_id: Uuid, business_type: &str, target_market: &str, data: CompetitorData) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            business_id,
            business_type: business_type.to_string(),
            target_market: target_market.to_string(),
            competitors: data.competitors,
            total_results: data.total_results,
            snapshot_at: now,
            created_at: now,
        }
    }
}

/// Rough monthly organic traffic for a results-page position.
pub fn estimate_traffic(position: u32) -> &'static str {
    match position {
        1 => "5,000-10,000",
        2 => "3,000-6,000",
        3 => "2,000-4,000",
        4 => "1,500-3,000",
        5 => "1,000-2,000",
        _ => "500-1,000",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traffic_estimates_by_position() {
        assert_eq!(estimate_traffic(1), "5,000-10,000");
        assert_eq!(estimate_traffic(5), "1,000-2,000");
        assert_eq!(estimate_traffic(6), "500-1,000");
        assert_eq!(estimate_traffic(0), "500-1,000");
    }

    #[test]
    fn embedded_signal_uses_type_key() {
        let signal = MarketSignal {
            id: Uuid::nil(),
            signal_type: SignalType::Competitive,
            severity: Severity::Critical,
            message: "m".into(),
            detected_at: "2 mins ago".into(),
        };
        let json = serde_json::to_value(&signal).unwrap();
        assert_eq!(json["type"], "Competitive");
        assert_eq!(json["severity"], "critical");
    }

    #[test]
    fn trend_summary_mentions_present_fields() {
        let trends = MarketTrends {
            google_ads_cpc_trend: Some("+18%".into()),
            top_rising_keywords: vec!["ai automation".into()],
            ..Default::default()
        };
        let summary = trends.summary();
        assert!(summary.contains("+18%"));
        assert!(summary.contains("ai automation"));
        assert_eq!(MarketTrends::default().summary(), "no trend data available");
    }

    #[test]
    fn live_trends_deserialize_without_ad_fields() {
        let trends: MarketTrends = serde_json::from_value(serde_json::json!({
            "interest_over_time": [{"value": 10}],
            "rising_queries": [],
            "top_queries": []
        }))
        .unwrap();
        assert!(trends.google_ads_cpc_trend.is_none());
        assert!(trends.summary().contains("1 interest-over-time"));
    }
}

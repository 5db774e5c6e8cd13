//! Typed client for a serpapi-compatible search endpoint.
//!
//! | Engine          | Use |
//! |-----------------|-----|
//! | `google`        | Competitor discovery and keyword result counts |
//! | `google_trends` | Interest-over-time for an industry (`TIMESERIES`) |
//!
//! Responses carry many more fields than are modeled here; unknown fields
//! are ignored.

use std::time::Duration;

use astra_core::market::{
    estimate_traffic, CompetitorData, CompetitorInsight, KeywordMetrics, MarketTrends,
};
use chrono::Utc;
use serde::Deserialize;

use crate::config::SerpConfig;
use crate::error::{check_status, ClientError};
use crate::retry::{retry_send, RetryPolicy};

/// Competitors kept from a results page.
pub const MAX_COMPETITORS: usize = 5;

// -- Response types -----------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub organic_results: Vec<OrganicResult>,
    #[serde(default)]
    pub search_information: Option<SearchInformation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchInformation {
    #[serde(default)]
    pub total_results: Option<u64>,
}

impl SearchResults {
    pub fn total_results(&self) -> u64 {
        self.search_information
            .as_ref()
            .and_then(|i| i.total_results)
            .unwrap_or(0)
    }

    /// Top organic results as competitor insights.
    pub fn competitor_insights(&self) -> Vec<CompetitorInsight> {
        self.organic_results
            .iter()
            .take(MAX_COMPETITORS)
            .enumerate()
            .map(|(idx, r)| {
                let position = r.position.unwrap_or(idx as u32 + 1);
                CompetitorInsight {
                    name: r
                        .title
                        .clone()
                        .unwrap_or_else(|| format!("Competitor {}", idx + 1)),
                    domain: r.link.clone().unwrap_or_default(),
                    description: r.snippet.clone().unwrap_or_default(),
                    position,
                    estimated_traffic: estimate_traffic(position).to_string(),
                    ad_spend_monthly: None,
                    active_campaigns: None,
                    top_keywords: None,
                }
            })
            .collect()
    }

    pub fn into_competitor_data(self) -> CompetitorData {
        CompetitorData {
            competitors: self.competitor_insights(),
            total_results: self.total_results(),
            fetched_at: Utc::now(),
            data_source: None,
        }
    }

    /// Keyword metrics. Only the result count is measured; volume and cost
    /// need an ads API and are reported as estimates.
    pub fn keyword_metrics(&self) -> KeywordMetrics {
        KeywordMetrics {
            search_volume: "N/A".to_string(),
            competition: "Medium".to_string(),
            cpc: "$2.50".to_string(),
            trend: None,
            results_count: Some(self.total_results()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendsResults {
    #[serde(default)]
    pub interest_over_time: Option<serde_json::Value>,
    #[serde(default)]
    pub rising_queries: Option<serde_json::Value>,
    #[serde(default)]
    pub top_queries: Option<serde_json::Value>,
}

impl TrendsResults {
    /// Absent sections become empty arrays.
    pub fn into_market_trends(self) -> MarketTrends {
        let or_empty = |v: Option<serde_json::Value>| Some(v.unwrap_or_else(|| serde_json::json!([])));
        MarketTrends {
            interest_over_time: or_empty(self.interest_over_time),
            rising_queries: or_empty(self.rising_queries),
            top_queries: or_empty(self.top_queries),
            ..Default::default()
        }
    }
}

// -- Client -------------------------------------------------------------------

#[derive(Clone)]
pub struct SerpClient {
    http: reqwest::Client,
    api_url: url::Url,
    api_key: zeroize::Zeroizing<String>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for SerpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl SerpClient {
    pub fn new(config: SerpConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            api_url: config.api_url,
            api_key: config.api_key,
            retry: config.retry,
        })
    }

    /// Web search returning up to `num` organic results.
    pub async fn search(&self, query: &str, num: u32) -> Result<SearchResults, ClientError> {
        let num = num.to_string();
        self.get("GET search (google)", &[("engine", "google"), ("q", query), ("num", &num)])
            .await
    }

    /// Web search on google.com for a single keyword.
    pub async fn keyword(&self, keyword: &str) -> Result<SearchResults, ClientError> {
        self.get(
            "GET search (google keyword)",
            &[("engine", "google"), ("q", keyword), ("google_domain", "google.com")],
        )
        .await
    }

    /// Google Trends interest over time.
    pub async fn trends(&self, query: &str) -> Result<TrendsResults, ClientError> {
        self.get(
            "GET search (google_trends)",
            &[("engine", "google_trends"), ("q", query), ("data_type", "TIMESERIES")],
        )
        .await
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let resp = retry_send(&self.retry, endpoint, || {
            self.http
                .get(self.api_url.clone())
                .query(params)
                .query(&[("api_key", self.api_key.as_str())])
                .send()
        })
        .await
        .map_err(|e| ClientError::Http {
            endpoint: endpoint.to_string(),
            source: e.without_url(),
        })?;
        let resp = check_status(endpoint, resp).await?;

        resp.json().await.map_err(|e| ClientError::Deserialization {
            endpoint: endpoint.to_string(),
            source: e.without_url(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organic_results_become_competitors() {
        let results: SearchResults = serde_json::from_value(serde_json::json!({
            "search_information": {"total_results": 1200},
            "organic_results": [
                {"position": 1, "title": "Acme", "link": "https://acme.io", "snippet": "Tools"},
                {"link": "https://untitled.io"},
                {"position": 3, "title": "C"},
                {"position": 4, "title": "D"},
                {"position": 5, "title": "E"},
                {"position": 6, "title": "F"}
            ]
        }))
        .unwrap();

        let data = results.into_competitor_data();
        assert_eq!(data.total_results, 1200);
        assert_eq!(data.competitors.len(), 5);
        assert_eq!(data.competitors[0].name, "Acme");
        assert_eq!(data.competitors[0].estimated_traffic, "5,000-10,000");
        assert_eq!(data.competitors[1].name, "Competitor 2");
        assert_eq!(data.competitors[1].position, 2);
        assert_eq!(data.competitors[1].description, "");
        assert!(!data.is_mock());
    }

    #[test]
    fn missing_search_information_counts_zero() {
        let results = SearchResults::default();
        assert_eq!(results.total_results(), 0);
        let metrics = results.keyword_metrics();
        assert_eq!(metrics.search_volume, "N/A");
        assert_eq!(metrics.results_count, Some(0));
    }

    #[test]
    fn trends_default_to_empty_arrays() {
        let trends = TrendsResults {
            interest_over_time: Some(serde_json::json!({"timeline_data": []})),
            ..Default::default()
        }
        .into_market_trends();
        assert_eq!(trends.rising_queries, Some(serde_json::json!([])));
        assert!(trends.interest_over_time.is_some());
        assert!(trends.google_ads_cpc_trend.is_none());
    }
}

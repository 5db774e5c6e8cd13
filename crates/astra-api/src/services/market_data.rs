//! # Market Data
//!
//! Competitor listings, trend summaries, and keyword metrics from the
//! search API. When the search client is absent (live data disabled, key
//! missing, or the sample placeholder key) or a call fails, the offline
//! payloads from `astra_core::fallback` are returned instead and the
//! failure is logged.

use std::sync::Arc;

use astra_clients::SerpClient;
use astra_core::fallback;
use astra_core::market::{CompetitorData, KeywordReport, MarketTrends};

use crate::state::AppState;

/// Organic results requested per competitor search.
pub const COMPETITOR_RESULTS: u32 = 10;

/// Keywords looked up per request; the rest are ignored.
pub const MAX_KEYWORDS: usize = 5;

#[derive(Debug, Clone)]
pub struct MarketDataService {
    serp: Option<Arc<SerpClient>>,
}

impl MarketDataService {
    pub fn new(serp: Option<Arc<SerpClient>>) -> Self {
        Self { serp }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.serp.clone())
    }

    pub async fn competitors(&self, business_type: &str, target_market: &str) -> CompetitorData {
        let Some(serp) = &self.serp else {
            return fallback::mock_competitors(business_type, target_market);
        };
        let query = format!("{business_type} {target_market} competitors");
        match serp.search(&query, COMPETITOR_RESULTS).await {
            Ok(results) => results.into_competitor_data(),
            Err(e) => {
                tracing::warn!(error = %e, query = %query, "competitor search failed, using mock data");
                fallback::mock_competitors(business_type, target_market)
            }
        }
    }

    pub async fn trends(&self, industry: &str) -> MarketTrends {
        let Some(serp) = &self.serp else {
            return fallback::mock_trends();
        };
        let query = format!("{industry} market trends 2026");
        match serp.trends(&query).await {
            Ok(results) => results.into_market_trends(),
            Err(e) => {
                tracing::warn!(error = %e, query = %query, "trend lookup failed, using mock data");
                fallback::mock_trends()
            }
        }
    }

    /// Metrics for up to [`MAX_KEYWORDS`] keywords. Any failed lookup
    /// replaces the whole report with mock metrics.
    pub async fn keywords(&self, keywords: &[String]) -> KeywordReport {
        let keywords = &keywords[..keywords.len().min(MAX_KEYWORDS)];
        let Some(serp) = &self.serp else {
            return fallback::mock_keywords(keywords);
        };

        let mut report = KeywordReport::new();
        for keyword in keywords {
            match serp.keyword(keyword).await {
                Ok(results) => {
                    report.insert(keyword.clone(), results.keyword_metrics());
                }
                Err(e) => {
                    tracing::warn!(error = %e, keyword = %keyword, "keyword lookup failed, using mock data");
                    return fallback::mock_keywords(keywords);
                }
            }
        }
        report
    }
}

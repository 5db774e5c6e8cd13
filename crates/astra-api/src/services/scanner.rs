//! # Background Scanner
//!
//! Two fixed-interval tokio tasks:
//!
//! | Task               | Interval                      | Input                  | Output |
//! |--------------------|-------------------------------|------------------------|--------|
//! | market scan        | `SCAN_INTERVAL_MINUTES`       | last 10 analyses       | `market_signals` |
//! | competitor monitor | `COMPETITOR_INTERVAL_MINUTES` | last 5 analyses        | `competitor_snapshots` |
//!
//! A failed pass is logged and the loop waits for the next tick. There is
//! no ordering with foreground requests.

use std::collections::BTreeSet;
use std::time::Duration;

use astra_core::market::{CompetitorSnapshot, MarketSignalRecord};
use astra_core::signals::derive_signals;
use astra_core::AnalysisResult;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::market_data::MarketDataService;
use crate::state::AppState;

/// Analyses considered by one market scan.
pub const MARKET_SCAN_WINDOW: usize = 10;
/// Analyses considered by one competitor pass.
pub const COMPETITOR_WINDOW: usize = 5;
/// Snapshots returned per business by [`competitor_updates`].
pub const COMPETITOR_UPDATES_LIMIT: usize = 5;

/// Handles to the running scanner tasks.
#[derive(Debug)]
pub struct Scanner {
    market: JoinHandle<()>,
    competitors: JoinHandle<()>,
}

impl Scanner {
    /// Spawn both loops. Each runs its first pass immediately.
    pub fn start(state: AppState) -> Self {
        let market_every = minutes(state.config.scan_interval_minutes);
        let competitor_every = minutes(state.config.competitor_interval_minutes);
        tracing::info!(
            market_interval = ?market_every,
            competitor_interval = ?competitor_every,
            "starting background scanner"
        );

        let market_state = state.clone();
        let market = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(market_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = scan_markets(&market_state).await {
                    tracing::error!(error = %e, "market scan failed");
                }
            }
        });

        let competitors = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(competitor_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = monitor_competitors(&state).await {
                    tracing::error!(error = %e, "competitor monitor failed");
                }
            }
        });

        Self {
            market,
            competitors,
        }
    }

    pub fn stop(self) {
        self.market.abort();
        self.competitors.abort();
        tracing::info!("background scanner stopped");
    }
}

fn minutes(n: u64) -> Duration {
    Duration::from_secs(n.max(1) * 60)
}

/// Run one market scan in the background.
pub fn spawn_market_scan(state: AppState) {
    tokio::spawn(async move {
        if let Err(e) = scan_markets(&state).await {
            tracing::error!(error = %e, "on-demand market scan failed");
        }
    });
}

fn recent_analyses(state: &AppState, limit: usize) -> Vec<AnalysisResult> {
    state.analyses.latest(limit, |a| a.created_at)
}

/// Derive and store signals for each distinct market among recent analyses.
///
/// Returns the number of signals stored.
pub async fn scan_markets(state: &AppState) -> Result<usize, AppError> {
    let markets: BTreeSet<(String, String)> = recent_analyses(state, MARKET_SCAN_WINDOW)
        .iter()
        .filter_map(|a| state.businesses.get(&a.business_id))
        .map(|b| (b.business_type, b.target_market))
        .collect();

    let market_data = MarketDataService::from_state(state);
    let mut stored = 0;
    for (business_type, target_market) in &markets {
        let trends = market_data.trends(business_type).await;
        let competitors = market_data.competitors(business_type, target_market).await;
        for signal in derive_signals(business_type, target_market, &trends, &competitors) {
            state.save(signal.into_record(business_type, target_market)).await?;
            stored += 1;
        }
    }

    tracing::info!(markets = markets.len(), signals = stored, "market scan complete");
    Ok(stored)
}

/// Store a fresh competitor snapshot for each recently analyzed business.
///
/// Returns the number of snapshots stored.
pub async fn monitor_competitors(state: &AppState) -> Result<usize, AppError> {
    let market_data = MarketDataService::from_state(state);
    let mut stored = 0;
    for analysis in recent_analyses(state, COMPETITOR_WINDOW) {
        let Some(business) = state.businesses.get(&analysis.business_id) else {
            continue;
        };
        let data = market_data
            .competitors(&business.business_type, &business.target_market)
            .await;
        let snapshot =
            CompetitorSnapshot::new(business.id, &business.business_type, &business.target_market, data);
        state.save(snapshot).await?;
        stored += 1;
    }

    tracing::info!(snapshots = stored, "competitor monitor pass complete");
    Ok(stored)
}

/// Newest stored signals, optionally for one business type.
pub fn latest_signals(
    state: &AppState,
    business_type: Option<&str>,
    limit: usize,
) -> Vec<MarketSignalRecord> {
    let mut signals: Vec<_> = state
        .market_signals
        .list()
        .into_iter()
        .filter(|s| business_type.map_or(true, |bt| s.business_type == bt))
        .collect();
    signals.sort_by_key(|s| std::cmp::Reverse(s.detected_at));
    signals.truncate(limit);
    signals
}

/// Newest competitor snapshots for a business.
pub fn competitor_updates(state: &AppState, business_id: Uuid) -> Vec<CompetitorSnapshot> {
    let mut snapshots: Vec<_> = state
        .competitor_snapshots
        .list()
        .into_iter()
        .filter(|s| s.business_id == business_id)
        .collect();
    snapshots.sort_by_key(|s| std::cmp::Reverse(s.created_at));
    snapshots.truncate(COMPETITOR_UPDATES_LIMIT);
    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;
    use astra_core::fallback;
    use astra_core::{BusinessInput, BusinessProfile};

    async fn seed(state: &AppState, business_type: &str, target_market: &str) -> BusinessProfile {
        let business = BusinessProfile::new(BusinessInput {
            business_type: business_type.into(),
            target_market: target_market.into(),
            monthly_budget: "1000".into(),
            primary_goal: "Grow revenue by 20%".into(),
            additional_info: None,
        });
        state.save(business.clone()).await.unwrap();
        let analysis = AnalysisResult::assemble(
            business.id,
            fallback::offline_analysis("offline"),
            fallback::agent_features(business_type, "Grow revenue"),
            Vec::new(),
            None,
            false,
        );
        state.save(analysis).await.unwrap();
        business
    }

    #[tokio::test]
    async fn market_scan_dedupes_markets_and_stores_signals() {
        let state = AppState::new();
        seed(&state, "SaaS", "India").await;
        seed(&state, "SaaS", "India").await;
        seed(&state, "Bakery", "Pune").await;

        // Mock trends and competitors trigger all four rules per market.
        let stored = scan_markets(&state).await.unwrap();
        assert_eq!(stored, 8);
        assert_eq!(state.market_signals.len(), 8);

        let saas = latest_signals(&state, Some("SaaS"), 10);
        assert_eq!(saas.len(), 4);
        assert!(saas.iter().all(|s| s.target_market == "India"));
        assert_eq!(latest_signals(&state, None, 3).len(), 3);
    }

    #[tokio::test]
    async fn competitor_monitor_snapshots_each_business() {
        let state = AppState::new();
        let a = seed(&state, "SaaS", "India").await;
        let b = seed(&state, "Bakery", "Pune").await;

        assert_eq!(monitor_competitors(&state).await.unwrap(), 2);
        assert_eq!(monitor_competitors(&state).await.unwrap(), 2);

        let updates = competitor_updates(&state, a.id);
        assert_eq!(updates.len(), 2);
        assert!(updates.iter().all(|s| s.business_id == a.id));
        assert_eq!(updates[0].total_results, 45_600_000);
        assert_eq!(competitor_updates(&state, b.id).len(), 2);
        assert!(competitor_updates(&state, Uuid::new_v4()).is_empty());
    }

    #[tokio::test]
    async fn orphaned_analyses_are_skipped() {
        let state = AppState::new();
        let analysis = AnalysisResult::assemble(
            Uuid::new_v4(),
            fallback::offline_analysis("offline"),
            fallback::agent_features("SaaS", "Grow"),
            Vec::new(),
            None,
            false,
        );
        state.save(analysis).await.unwrap();
        assert_eq!(scan_markets(&state).await.unwrap(), 0);
        assert_eq!(monitor_competitors(&state).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn scanner_starts_and_stops() {
        let scanner = Scanner::start(AppState::new());
        scanner.stop();
    }
}

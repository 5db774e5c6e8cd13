//! # Market Signal Rules
//!
//! Turns a trend summary and a competitor listing into the signals the
//! scanner stores. Rules, in emission order:
//!
//! | Condition                          | Type        | Severity |
//! |------------------------------------|-------------|----------|
//! | CPC trend contains `+`             | Market      | warning  |
//! | CPM trend contains `-`             | Market      | info     |
//! | at least one competitor            | Competitive | info     |
//! | rising keywords present (first 3)  | Consumer    | info     |

use chrono::Utc;
use uuid::Uuid;

use crate::market::{CompetitorData, MarketSignalRecord, MarketTrends, Severity, SignalType};

/// A signal before it is bound to a market and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedSignal {
    pub signal_type: SignalType,
    pub severity: Severity,
    pub message: String,
}

impl DerivedSignal {
    pub fn into_record(self, business_type: &str, target_market: &str) -> MarketSignalRecord {
        let now = Utc::now();
        MarketSignalRecord {
            id: Uuid::new_v4(),
            business_type: business_type.to_string(),
            target_market: target_market.to_string(),
            signal_type: self.signal_type,
            severity: self.severity,
            message: self.message,
            detected_at: now,
            created_at: now,
        }
    }
}

pub fn derive_signals(
    business_type: &str,
    target_market: &str,
    trends: &MarketTrends,
    competitors: &CompetitorData,
) -> Vec<DerivedSignal> {
    let mut signals = Vec::new();

    if let Some(cpc) = trends.google_ads_cpc_trend.as_deref().filter(|t| t.contains('+')) {
        signals.push(DerivedSignal {
            signal_type: SignalType::Market,
            severity: Severity::Warning,
            message: format!(
                "Google Ads CPC increased {cpc} for {business_type} - consider adjusting budget"
            ),
        });
    }

    if let Some(cpm) = trends.meta_ads_cpm_trend.as_deref().filter(|t| t.contains('-')) {
        signals.push(DerivedSignal {
            signal_type: SignalType::Market,
            severity: Severity::Info,
            message: format!(
                "Meta Ads CPM decreased {cpm} - good opportunity for paid social campaigns"
            ),
        });
    }

    if let Some(top) = competitors.competitors.first() {
        signals.push(DerivedSignal {
            signal_type: SignalType::Competitive,
            severity: Severity::Info,
            message: format!("Top competitor \"{}\" detected in {target_market}", top.name),
        });
    }

    if !trends.top_rising_keywords.is_empty() {
        let rising: Vec<&str> = trends
            .top_rising_keywords
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        signals.push(DerivedSignal {
            signal_type: SignalType::Consumer,
            severity: Severity::Info,
            message: format!("Rising search interest: {}", rising.join(", ")),
        });
    }

    signals
}

//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! AppState holds:
//! - one in-memory [`Store`] per document collection
//! - the optional upstream clients (LLM, search, ledger)
//! - the optional Postgres pool that every store writes through to
//!
//! Records are create-once. [`AppState::save`] writes the database first
//! and the store second, so a failed write leaves no in-memory record.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use astra_clients::{LedgerClient, LlmClient, SerpClient};
use astra_core::market::CompetitorSnapshot;
use astra_core::user::{SessionRecord, UserRecord};
use astra_core::{AnalysisResult, BusinessProfile, MarketSignalRecord, ProofRecord};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::documents::{self, Collection};
use crate::error::AppError;

// -- Generic In-Memory Store --------------------------------------------------

/// Thread-safe, cloneable in-memory key-value store.
///
/// All operations are synchronous (the RwLock is `parking_lot`, not
/// `tokio::sync`) because the lock is never held across `.await` points.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a record, returning the previous value if the key existed.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// First record matching `pred`, in no particular order.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.data.read().values().find(|v| pred(v)).cloned()
    }

    /// The `limit` records with the largest `key`, largest first.
    pub fn latest(&self, limit: usize, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
        let mut all = self.list();
        all.sort_by_key(|v| std::cmp::Reverse(key(v)));
        all.truncate(limit);
        all
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// -- Documents ----------------------------------------------------------------

/// A record that lives in one collection and one store.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;
    /// Message for a write rejected by a unique index.
    const DUPLICATE: &'static str = "Record already exists";

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn store(state: &AppState) -> &Store<Self>;
}

macro_rules! document {
    ($ty:ty, $collection:expr, $field:ident $(, duplicate = $duplicate:expr)?) => {
        impl Document for $ty {
            const COLLECTION: Collection = $collection;
            $(const DUPLICATE: &'static str = $duplicate;)?

            fn id(&self) -> Uuid {
                self.id
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }

            fn store(state: &AppState) -> &Store<Self> {
                &state.$field
            }
        }
    };
}

document!(BusinessProfile, Collection::Businesses, businesses);
document!(AnalysisResult, Collection::Analyses, analyses);
document!(MarketSignalRecord, Collection::MarketSignals, market_signals);
document!(CompetitorSnapshot, Collection::CompetitorSnapshots, competitor_snapshots);
document!(ProofRecord, Collection::BlockchainProofs, proofs);
document!(UserRecord, Collection::Users, users, duplicate = EMAIL_TAKEN);
document!(SessionRecord, Collection::Sessions, sessions);

// -- Registration Claims ------------------------------------------------------

pub const EMAIL_TAKEN: &str = "Email already registered";

/// Holds an email for one in-flight registration; released on drop.
#[derive(Debug)]
pub struct EmailClaim {
    email: String,
    pending: Arc<Mutex<HashSet<String>>>,
}

impl Drop for EmailClaim {
    fn drop(&mut self) {
        self.pending.lock().remove(&self.email);
    }
}

// -- Application State --------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,

    pub businesses: Store<BusinessProfile>,
    pub analyses: Store<AnalysisResult>,
    pub market_signals: Store<MarketSignalRecord>,
    pub competitor_snapshots: Store<CompetitorSnapshot>,
    pub proofs: Store<ProofRecord>,
    pub users: Store<UserRecord>,
    pub sessions: Store<SessionRecord>,
    /// Emails with a registration between its existence check and its save.
    pending_emails: Arc<Mutex<HashSet<String>>>,

    /// `None` when `GOOGLE_API_KEY` is not set; analysis runs offline.
    pub llm: Option<Arc<LlmClient>>,
    /// `None` when live market data is disabled or unconfigured; mock data is served.
    pub serp: Option<Arc<SerpClient>>,
    /// `None` when the ledger is disabled or unconfigured; proofs go to the database.
    pub ledger: Option<Arc<LedgerClient>>,

    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// State with default config, no upstream clients, and no database.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            businesses: Store::new(),
            analyses: Store::new(),
            market_signals: Store::new(),
            competitor_snapshots: Store::new(),
            proofs: Store::new(),
            users: Store::new(),
            sessions: Store::new(),
            pending_emails: Arc::new(Mutex::new(HashSet::new())),
            llm: None,
            serp: None,
            ledger: None,
            db_pool: None,
        }
    }

    pub fn with_llm(mut self, client: LlmClient) -> Self {
        self.llm = Some(Arc::new(client));
        self
    }

    pub fn with_serp(mut self, client: SerpClient) -> Self {
        self.serp = Some(Arc::new(client));
        self
    }

    pub fn with_ledger(mut self, client: LedgerClient) -> Self {
        self.ledger = Some(Arc::new(client));
        self
    }

    pub fn with_db_pool(mut self, pool: Option<PgPool>) -> Self {
        self.db_pool = pool;
        self
    }

    /// Reserve a normalized email for registration.
    ///
    /// `None` when a user already has it or another registration holds it.
    /// The check and the reservation happen under one lock.
    pub fn claim_email(&self, email: &str) -> Option<EmailClaim> {
        let mut pending = self.pending_emails.lock();
        if pending.contains(email) || self.users.find(|u| u.email == email).is_some() {
            return None;
        }
        pending.insert(email.to_owned());
        Some(EmailClaim {
            email: email.to_owned(),
            pending: Arc::clone(&self.pending_emails),
        })
    }

    /// Persist a record and add it to its store.
    pub async fn save<T: Document>(&self, record: T) -> Result<T, AppError> {
        if let Some(pool) = &self.db_pool {
            let body = serde_json::to_value(&record)?;
            documents::insert(pool, T::COLLECTION, record.id(), record.created_at(), &body)
                .await
                .map_err(|e| match e {
                    sqlx::Error::Database(db) if db.is_unique_violation() => {
                        AppError::BadRequest(T::DUPLICATE.into())
                    }
                    other => AppError::from(other),
                })?;
        }
        T::store(self).insert(record.id(), record.clone());
        Ok(record)
    }

    /// Load all persisted documents into the in-memory stores.
    ///
    /// Called once at startup. Rows that no longer deserialize are skipped
    /// with a warning.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        let businesses = self.hydrate::<BusinessProfile>(pool).await?;
        let analyses = self.hydrate::<AnalysisResult>(pool).await?;
        let signals = self.hydrate::<MarketSignalRecord>(pool).await?;
        let snapshots = self.hydrate::<CompetitorSnapshot>(pool).await?;
        let proofs = self.hydrate::<ProofRecord>(pool).await?;
        let users = self.hydrate::<UserRecord>(pool).await?;
        let sessions = self.hydrate::<SessionRecord>(pool).await?;

        tracing::info!(
            businesses,
            analyses,
            market_signals = signals,
            competitor_snapshots = snapshots,
            blockchain_proofs = proofs,
            users,
            sessions,
            "Hydrated in-memory stores from database"
        );

        Ok(())
    }

    async fn hydrate<T: Document>(&self, pool: &PgPool) -> Result<usize, String> {
        let bodies = documents::load_all(pool, T::COLLECTION)
            .await
            .map_err(|e| format!("failed to load {}: {e}", T::COLLECTION))?;
        let store = T::store(self);
        let mut loaded = 0;
        for body in bodies {
            match serde_json::from_value::<T>(body) {
                Ok(record) => {
                    store.insert(record.id(), record);
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(collection = %T::COLLECTION, error = %e, "skipping undecodable document");
                }
            }
        }
        Ok(loaded)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        at: DateTime<Utc>,
        tag: &'static str,
    }

    #[test]
    fn store_insert_and_get() {
        let store: Store<Row> = Store::new();
        let id = Uuid::new_v4();
        assert!(store.is_empty());
        assert!(store.insert(id, Row { at: Utc::now(), tag: "a" }).is_none());
        assert_eq!(store.get(&id).unwrap().tag, "a");
        assert_eq!(store.len(), 1);
        assert!(store.get(&Uuid::new_v4()).is_none());
    }

    #[test]
    fn latest_sorts_newest_first_and_truncates() {
        let store: Store<Row> = Store::new();
        let now = Utc::now();
        for (offset, tag) in [(3, "old"), (1, "newer"), (0, "newest"), (2, "older")] {
            store.insert(
                Uuid::new_v4(),
                Row {
                    at: now - Duration::minutes(offset),
                    tag,
                },
            );
        }
        let latest = store.latest(2, |r| r.at);
        let tags: Vec<_> = latest.iter().map(|r| r.tag).collect();
        assert_eq!(tags, vec!["newest", "newer"]);
        assert_eq!(store.latest(10, |r| r.at).len(), 4);
    }

    #[test]
    fn clones_share_data() {
        let a: Store<Row> = Store::new();
        let b = a.clone();
        a.insert(Uuid::new_v4(), Row { at: Utc::now(), tag: "x" });
        assert_eq!(b.len(), 1);
        assert!(b.find(|r| r.tag == "x").is_some());
        assert!(b.find(|r| r.tag == "y").is_none());
    }

    #[tokio::test]
    async fn save_without_database_fills_store() {
        let state = AppState::new();
        let profile = BusinessProfile::new(astra_core::BusinessInput {
            business_type: "Bakery".into(),
            target_market: "Pune".into(),
            monthly_budget: "2000".into(),
            primary_goal: "Open a second outlet".into(),
            additional_info: None,
        });
        let saved = state.save(profile.clone()).await.unwrap();
        assert_eq!(saved, profile);
        assert_eq!(state.businesses.get(&profile.id), Some(profile));
    }

    #[test]
    fn email_claim_is_exclusive_until_dropped() {
        let state = AppState::new();
        let first = state.claim_email("dup@example.com");
        assert!(first.is_some());
        assert!(state.claim_email("dup@example.com").is_none());
        assert!(state.claim_email("other@example.com").is_some());
        drop(first);
        assert!(state.claim_email("dup@example.com").is_some());
    }

    #[tokio::test]
    async fn email_claim_refused_for_existing_user() {
        let state = AppState::new();
        state
            .save(UserRecord::new("taken@example.com".into(), None, "hash".into()))
            .await
            .unwrap();
        assert!(state.claim_email("taken@example.com").is_none());
    }

    #[test]
    fn users_report_duplicate_email() {
        assert_eq!(<UserRecord as Document>::DUPLICATE, EMAIL_TAKEN);
        assert_eq!(<BusinessProfile as Document>::DUPLICATE, "Record already exists");
    }

    #[tokio::test]
    async fn hydrate_without_database_is_noop() {
        assert!(AppState::new().hydrate_from_db().await.is_ok());
    }
}

//! Document persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `documents` table.
//! Bodies are opaque JSON here; typing happens in [`crate::state`].

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Names of the document collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Businesses,
    Analyses,
    MarketSignals,
    CompetitorSnapshots,
    BlockchainProofs,
    Users,
    Sessions,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Businesses => "businesses",
            Self::Analyses => "analyses",
            Self::MarketSignals => "market_signals",
            Self::CompetitorSnapshots => "competitor_snapshots",
            Self::BlockchainProofs => "blockchain_proofs",
            Self::Users => "users",
            Self::Sessions => "sessions",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insert a document, replacing the body if the id already exists.
pub async fn insert(
    pool: &PgPool,
    collection: Collection,
    id: Uuid,
    created_at: DateTime<Utc>,
    body: &serde_json::Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO documents (collection, id, created_at, body)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (collection, id) DO UPDATE SET body = EXCLUDED.body",
    )
    .bind(collection.as_str())
    .bind(id)
    .bind(created_at)
    .bind(body)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load every document of a collection, oldest first.
pub async fn load_all(
    pool: &PgPool,
    collection: Collection,
) -> Result<Vec<serde_json::Value>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DocumentRow>(
        "SELECT body FROM documents WHERE collection = $1 ORDER BY created_at",
    )
    .bind(collection.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.body).collect())
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    body: serde_json::Value,
}

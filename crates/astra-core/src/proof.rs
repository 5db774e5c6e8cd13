//! # Analysis Proofs
//!
//! Every analysis is fingerprinted with a SHA-256 digest of its canonical
//! JSON. The fingerprint is either written to an EVM ledger as the calldata
//! of a self-transfer, or recorded in the `blockchain_proofs` collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, ContentDigest};
use crate::error::CanonicalizationError;

/// Network label for proofs stored in the document store.
pub const DATABASE_LEDGER: &str = "AstraMark Intelligence Ledger (Database)";

/// Network label for proofs written to Polygon Amoy.
pub const POLYGON_AMOY: &str = "Polygon Amoy Testnet";

/// Storage label for database-backed proofs.
pub const DATABASE_STORAGE: &str = "database";

/// Proof attached to an analysis document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlockchainProof {
    /// Lowercase hex SHA-256 of the canonical analysis.
    pub hash: String,
    /// `YYYY-MM-DD HH:MM:SS UTC`.
    pub timestamp: String,
    pub network: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    pub verified: bool,
}

impl BlockchainProof {
    /// Proof for a hash recorded in the document store.
    pub fn database(hash: String, timestamp: String, analysis_id: Uuid) -> Self {
        Self {
            hash,
            timestamp,
            network: DATABASE_LEDGER.to_string(),
            tx_hash: None,
            explorer_url: None,
            wallet: None,
            analysis_id: Some(analysis_id),
            storage: Some(DATABASE_STORAGE.to_string()),
            verified: false,
        }
    }

    /// Proof for a hash carried by a submitted ledger transaction.
    pub fn on_chain(
        hash: String,
        timestamp: String,
        tx_hash: String,
        explorer_base: &str,
        wallet: String,
    ) -> Self {
        Self {
            hash,
            timestamp,
            network: POLYGON_AMOY.to_string(),
            explorer_url: Some(format!("{}{}", explorer_base, tx_hash)),
            tx_hash: Some(tx_hash),
            wallet: Some(wallet),
            analysis_id: None,
            storage: None,
            verified: true,
        }
    }
}

/// Row stored in the `blockchain_proofs` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProofRecord {
    pub id: Uuid,
    pub proof_hash: String,
    pub timestamp: String,
    pub analysis_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ProofRecord {
    pub fn new(proof_hash: String, timestamp: String, analysis_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            proof_hash,
            timestamp,
            analysis_id,
            created_at: Utc::now(),
        }
    }
}

/// Format a proof timestamp.
pub fn proof_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Digest of an analysis, computed with its proof slot cleared.
pub fn analysis_digest(analysis: &AnalysisResult) -> Result<ContentDigest, CanonicalizationError> {
    let mut unproven = analysis.clone();
    unproven.blockchain_proof = None;
    let canonical = CanonicalBytes::new(&unproven)?;
    Ok(sha256_digest(&canonical))
}

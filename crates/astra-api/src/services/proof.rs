//! # Analysis Proofs
//!
//! An analysis is fingerprinted with the SHA-256 of its canonical JSON
//! (proof slot cleared). The fingerprint is anchored in one of two places:
//!
//! - **Ledger**: when the ledger client is configured and its node is on
//!   the expected chain, a zero-value self-transaction carries the hex
//!   fingerprint as calldata. The proof records the transaction hash.
//! - **Database**: otherwise, or when the transaction fails, a
//!   [`ProofRecord`] is stored in the `blockchain_proofs` collection.

use astra_clients::ledger::calldata_text;
use astra_core::proof::{analysis_digest, proof_timestamp, BlockchainProof, ProofRecord};
use astra_core::AnalysisResult;
use chrono::Utc;

use crate::error::AppError;
use crate::state::AppState;

/// Fingerprint `analysis` and anchor the fingerprint.
pub async fn timestamp(state: &AppState, analysis: &AnalysisResult) -> Result<BlockchainProof, AppError> {
    let hash = analysis_digest(analysis)?.to_hex();
    let timestamp = proof_timestamp(Utc::now());

    if let Some(ledger) = &state.ledger {
        if ledger.is_connected().await {
            match ledger.send_self_transaction(hash.as_bytes()).await {
                Ok(tx_hash) => {
                    tracing::info!(analysis_id = %analysis.id, tx_hash = %tx_hash, "analysis hash anchored on ledger");
                    return Ok(BlockchainProof::on_chain(
                        hash,
                        timestamp,
                        tx_hash,
                        ledger.explorer_url(),
                        ledger.wallet_address().to_string(),
                    ));
                }
                Err(e) => {
                    tracing::warn!(analysis_id = %analysis.id, error = %e, "ledger anchoring failed, storing proof in database");
                }
            }
        }
    }

    let record = ProofRecord::new(hash.clone(), timestamp.clone(), analysis.id);
    state.save(record).await?;
    Ok(BlockchainProof::database(hash, timestamp, analysis.id))
}

/// Whether the ledger transaction `tx_hash` carries `hash` as calldata.
///
/// False when the ledger is not configured, no transaction is given, or
/// the node cannot be reached.
pub async fn verify(state: &AppState, hash: &str, tx_hash: Option<&str>) -> bool {
    let (Some(ledger), Some(tx_hash)) = (&state.ledger, tx_hash) else {
        return false;
    };
    match ledger.transaction_input(tx_hash).await {
        Ok(Some(input)) => calldata_text(&input).as_deref() == Some(hash),
        Ok(None) => false,
        Err(e) => {
            tracing::warn!(tx_hash = %tx_hash, error = %e, "proof verification lookup failed");
            false
        }
    }
}

/// Whether the stored analysis still hashes to the fingerprint in its proof.
pub fn content_intact(analysis: &AnalysisResult) -> bool {
    let Some(proof) = &analysis.blockchain_proof else {
        return false;
    };
    match analysis_digest(analysis) {
        Ok(digest) => digest.to_hex() == proof.hash,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astra_core::fallback;
    use uuid::Uuid;

    fn analysis() -> AnalysisResult {
        AnalysisResult::assemble(
            Uuid::new_v4(),
            fallback::offline_analysis("offline"),
            fallback::agent_features("SaaS", "Grow signups"),
            Vec::new(),
            None,
            false,
        )
    }

    #[tokio::test]
    async fn without_ledger_proof_is_stored_in_database_collection() {
        let state = AppState::new();
        let analysis = analysis();
        let proof = timestamp(&state, &analysis).await.unwrap();

        assert_eq!(proof.network, astra_core::proof::DATABASE_LEDGER);
        assert_eq!(proof.analysis_id, Some(analysis.id));
        assert!(!proof.verified);
        assert_eq!(proof.hash.len(), 64);
        assert!(proof.timestamp.ends_with(" UTC"));

        let stored = state.proofs.list();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].proof_hash, proof.hash);
        assert_eq!(stored[0].analysis_id, analysis.id);
    }

    #[tokio::test]
    async fn verify_is_false_without_ledger() {
        let state = AppState::new();
        assert!(!verify(&state, "abc", Some("0x01")).await);
        assert!(!verify(&state, "abc", None).await);
    }

    #[tokio::test]
    async fn attached_proof_matches_content_until_edited() {
        let state = AppState::new();
        let mut analysis = analysis();
        assert!(!content_intact(&analysis));

        analysis.blockchain_proof = Some(timestamp(&state, &analysis).await.unwrap());
        assert!(content_intact(&analysis));

        analysis.overview.push_str(" (edited)");
        assert!(!content_intact(&analysis));
    }
}

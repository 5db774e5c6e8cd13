//! # astra-clients -- Typed Rust clients for AstraMark's upstream services
//!
//! - **LLM** via the Gemini `generateContent` API ([`llm`])
//! - **Search** via a serpapi-compatible endpoint ([`serp`])
//! - **Ledger** via EVM JSON-RPC ([`ledger`]), with transactions signed
//!   locally ([`signer`])
//!
//! Each client is built from its own config, loaded with `from_env()` or
//! constructed directly. All requests go through [`retry`]: transport
//! errors, 429 and 5xx responses are retried with exponential backoff.
//!
//! This crate performs no fallback. Callers in the API crate decide what
//! to do when an upstream call fails.

pub mod config;
pub mod error;
pub mod ledger;
pub mod llm;
pub mod retry;
pub mod serp;
pub mod signer;

pub use config::{ConfigError, LedgerConfig, LlmConfig, SerpConfig};
pub use error::ClientError;
pub use ledger::LedgerClient;
pub use llm::LlmClient;
pub use retry::RetryPolicy;
pub use serp::SerpClient;

//! Client configuration.
//!
//! One config struct per upstream service. Each loads from environment
//! variables with production defaults, and can be built directly for tests.
//! Secrets are wrapped in [`Zeroizing`] and redacted from `Debug` output.

use std::time::Duration;

use url::Url;
use zeroize::Zeroizing;

use crate::retry::RetryPolicy;

/// Placeholder key shipped in sample `.env` files; treated as unset.
pub const SERP_PLACEHOLDER_KEY: &str = "YOUR_SERP_API_KEY_HERE";

pub const DEFAULT_LLM_MODELS: [&str; 3] =
    ["gemini-2.0-flash", "gemini-flash-latest", "gemini-pro-latest"];

/// Configuration for the Gemini `generateContent` API.
#[derive(Clone)]
pub struct LlmConfig {
    /// Base URL up to and including the API version, e.g.
    /// `https://generativelanguage.googleapis.com/v1beta/`.
    pub api_url: Url,
    pub api_key: Zeroizing<String>,
    /// Models tried in order.
    pub models: Vec<String>,
    pub timeout_secs: u64,
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("models", &self.models)
            .field("timeout_secs", &self.timeout_secs)
            .field("retry", &self.retry)
            .finish()
    }
}

impl LlmConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `GOOGLE_API_KEY` (required)
    /// - `LLM_API_URL` (default: `https://generativelanguage.googleapis.com/v1beta/`)
    /// - `LLM_MODELS` (comma-separated, default: the three Gemini models)
    /// - `LLM_TIMEOUT_SECS` (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = required("GOOGLE_API_KEY")?;
        let models = std::env::var("LLM_MODELS")
            .ok()
            .map(|raw| split_list(&raw))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_LLM_MODELS.iter().map(|m| m.to_string()).collect());

        Ok(Self {
            api_url: env_url(
                "LLM_API_URL",
                "https://generativelanguage.googleapis.com/v1beta/",
            )?,
            api_key,
            models,
            timeout_secs: env_u64("LLM_TIMEOUT_SECS", 60),
            retry: RetryPolicy::default(),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration for a serpapi-compatible search endpoint.
#[derive(Clone)]
pub struct SerpConfig {
    /// Full search endpoint, e.g. `https://serpapi.com/search`.
    pub api_url: Url,
    pub api_key: Zeroizing<String>,
    pub timeout_secs: u64,
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for SerpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SerpConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SERP_API_KEY` (required; the sample placeholder counts as missing)
    /// - `SERP_API_URL` (default: `https://serpapi.com/search`)
    /// - `SERP_TIMEOUT_SECS` (default: 15)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = required("SERP_API_KEY")?;
        if api_key.as_str() == SERP_PLACEHOLDER_KEY {
            return Err(ConfigError::PlaceholderKey("SERP_API_KEY"));
        }
        Ok(Self {
            api_url: env_url("SERP_API_URL", "https://serpapi.com/search")?,
            api_key,
            timeout_secs: env_u64("SERP_TIMEOUT_SECS", 15),
            retry: RetryPolicy::quick(),
        })
    }
}

/// Configuration for the EVM JSON-RPC ledger.
///
/// Transactions are signed locally with `private_key`; the wallet address is
/// derived from it.
#[derive(Clone)]
pub struct LedgerConfig {
    pub rpc_url: Url,
    /// Hex secp256k1 key, with or without `0x`.
    pub private_key: Zeroizing<String>,
    /// Expected address of `private_key`, checked when the client is built.
    pub wallet_address: Option<String>,
    pub chain_id: u64,
    /// Transaction hashes are appended to this prefix.
    pub explorer_url: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"[REDACTED]")
            .field("wallet_address", &self.wallet_address)
            .field("chain_id", &self.chain_id)
            .field("explorer_url", &self.explorer_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `POLYGON_RPC_URL` (required)
    /// - `WALLET_PRIVATE_KEY` (required)
    /// - `WALLET_ADDRESS` (optional; must match the key when set)
    /// - `CHAIN_ID` (default: 80002, Polygon Amoy)
    /// - `EXPLORER_URL` (default: `https://amoy.polygonscan.com/tx/`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc = required("POLYGON_RPC_URL")?;
        let rpc_url = Url::parse(rpc.as_str())
            .map_err(|e| ConfigError::InvalidUrl("POLYGON_RPC_URL".to_string(), e.to_string()))?;
        let private_key = required("WALLET_PRIVATE_KEY")?;
        let wallet_address = match std::env::var("WALLET_ADDRESS") {
            Ok(addr) if !addr.trim().is_empty() => {
                let addr = addr.trim().to_string();
                validate_address(&addr)?;
                Some(addr)
            }
            _ => None,
        };

        Ok(Self {
            rpc_url,
            private_key,
            wallet_address,
            chain_id: env_u64("CHAIN_ID", 80002),
            explorer_url: std::env::var("EXPLORER_URL")
                .unwrap_or_else(|_| "https://amoy.polygonscan.com/tx/".to_string()),
            timeout_secs: env_u64("LEDGER_TIMEOUT_SECS", 15),
        })
    }
}

/// Check that `addr` is `0x` followed by 40 hex digits.
pub fn validate_address(addr: &str) -> Result<(), ConfigError> {
    let digits = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .ok_or_else(|| ConfigError::InvalidAddress(addr.to_string()))?;
    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidAddress(addr.to_string()));
    }
    Ok(())
}

fn required(var: &'static str) -> Result<Zeroizing<String>, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(Zeroizing::new(v)),
        _ => Err(ConfigError::Missing(var)),
    }
}

fn env_u64(var: &str, default: u64) -> u64 {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("{0} still holds the sample placeholder value")]
    PlaceholderKey(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),
    #[error("WALLET_PRIVATE_KEY is not a valid secp256k1 key")]
    InvalidPrivateKey,
    #[error("WALLET_ADDRESS {configured} does not match the key's address {derived}")]
    WalletMismatch { configured: String, derived: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_url_uses_default_when_var_absent() {
        let url = env_url("ASTRA_NONEXISTENT_VAR_12345", "https://example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn env_url_rejects_invalid_url() {
        std::env::set_var("ASTRA_TEST_BAD_URL", "not a url");
        let result = env_url("ASTRA_TEST_BAD_URL", "https://example.com");
        std::env::remove_var("ASTRA_TEST_BAD_URL");
        assert!(result.is_err());
    }

    #[test]
    fn model_list_splits_and_trims() {
        assert_eq!(split_list(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn addresses_validated() {
        assert!(validate_address("0x52908400098527886E0F7030069857D2E4169EE7").is_ok());
        assert!(validate_address("52908400098527886E0F7030069857D2E4169EE7").is_err());
        assert!(validate_address("0x1234").is_err());
        assert!(validate_address("0xZZ908400098527886E0F7030069857D2E4169EE7").is_err());
    }

    #[test]
    fn debug_redacts_keys() {
        let cfg = LlmConfig {
            api_url: Url::parse("http://127.0.0.1:1/").unwrap(),
            api_key: Zeroizing::new("sekrit-key".into()),
            models: vec!["m".into()],
            timeout_secs: 5,
            retry: RetryPolicy::none(),
        };
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("sekrit-key"));
        assert!(dbg.contains("[REDACTED]"));

        let ledger = LedgerConfig {
            rpc_url: Url::parse("http://127.0.0.1:1/").unwrap(),
            private_key: Zeroizing::new("0xfeedfacefeedface".into()),
            wallet_address: None,
            chain_id: 80002,
            explorer_url: "https://amoy.polygonscan.com/tx/".into(),
            timeout_secs: 5,
        };
        let dbg = format!("{ledger:?}");
        assert!(!dbg.contains("feedface"));
        assert!(dbg.contains("80002"));
    }
}

//! EVM JSON-RPC client for anchoring analysis digests.
//!
//! A digest is anchored by a zero-value transaction from the wallet to
//! itself whose calldata is the UTF-8 bytes of the hex digest. The
//! transaction is signed in process by [`LocalSigner`].
//!
//! | Method                     | Use |
//! |----------------------------|-----|
//! | `eth_chainId`              | Reachability and chain check |
//! | `eth_getTransactionCount`  | Pending nonce of the wallet |
//! | `eth_gasPrice`             | Legacy gas price |
//! | `eth_sendRawTransaction`   | Submit the signed anchoring transaction |
//! | `eth_getTransactionByHash` | Read calldata back for verification |

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{ConfigError, LedgerConfig};
use crate::error::{check_status, ClientError};
use crate::retry::{retry_send, RetryPolicy};
use crate::signer::{LegacyTransaction, LocalSigner};

const SEND_RAW: &str = "eth_sendRawTransaction";

/// Intrinsic gas of a plain transaction.
const BASE_GAS: u64 = 21_000;
const GAS_PER_ZERO_BYTE: u64 = 4;
const GAS_PER_NONZERO_BYTE: u64 = 16;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    #[serde(default)]
    message: String,
}

/// Gas limit for a self-transfer carrying `data`.
pub fn intrinsic_gas(data: &[u8]) -> u64 {
    data.iter().fold(BASE_GAS, |gas, b| {
        gas + if *b == 0 {
            GAS_PER_ZERO_BYTE
        } else {
            GAS_PER_NONZERO_BYTE
        }
    })
}

/// `0x`-prefixed hex encoding.
pub fn to_hex_data(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Decode `0x`-prefixed calldata as UTF-8 text. `None` if either step fails.
pub fn calldata_text(input: &str) -> Option<String> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(digits).ok()?;
    String::from_utf8(bytes).ok()
}

#[derive(Debug)]
pub struct LedgerClient {
    http: reqwest::Client,
    rpc_url: url::Url,
    signer: LocalSigner,
    wallet_address: String,
    chain_id: u64,
    explorer_url: String,
    next_id: AtomicU64,
    retry: RetryPolicy,
}

impl LedgerClient {
    pub fn new(config: LedgerConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        let signer = LocalSigner::from_hex(&config.private_key)?;
        let wallet_address = signer.address_hex();
        if let Some(configured) = &config.wallet_address {
            if !configured.eq_ignore_ascii_case(&wallet_address) {
                return Err(ConfigError::WalletMismatch {
                    configured: configured.clone(),
                    derived: wallet_address,
                }
                .into());
            }
        }
        Ok(Self {
            http,
            rpc_url: config.rpc_url,
            signer,
            wallet_address,
            chain_id: config.chain_id,
            explorer_url: config.explorer_url,
            next_id: AtomicU64::new(1),
            retry: RetryPolicy::quick(),
        })
    }

    pub fn wallet_address(&self) -> &str {
        &self.wallet_address
    }

    pub fn explorer_url(&self) -> &str {
        &self.explorer_url
    }

    /// Chain id reported by the node.
    pub async fn chain_id(&self) -> Result<u64, ClientError> {
        let result = self.call("eth_chainId", serde_json::json!([])).await?;
        parse_quantity("eth_chainId", &result)
    }

    /// Whether the node answers and is on the configured chain.
    pub async fn is_connected(&self) -> bool {
        match self.chain_id().await {
            Ok(id) if id == self.chain_id => true,
            Ok(id) => {
                tracing::warn!(expected = self.chain_id, actual = id, "ledger node is on an unexpected chain");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "ledger node unreachable");
                false
            }
        }
    }

    /// Sign and submit a zero-value transaction from the wallet to itself
    /// carrying `data`. Returns the transaction hash.
    pub async fn send_self_transaction(&self, data: &[u8]) -> Result<String, ClientError> {
        let nonce = self
            .call(
                "eth_getTransactionCount",
                serde_json::json!([self.wallet_address, "pending"]),
            )
            .await?;
        let gas_price = self.call("eth_gasPrice", serde_json::json!([])).await?;

        let tx = LegacyTransaction {
            nonce: parse_quantity("eth_getTransactionCount", &nonce)?,
            gas_price: parse_quantity("eth_gasPrice", &gas_price)?,
            gas_limit: intrinsic_gas(data),
            to: self.signer.address(),
            value: 0,
            data: data.to_vec(),
            chain_id: self.chain_id,
        };
        let raw = self
            .signer
            .sign(&tx)
            .map_err(|e| ClientError::Signing(e.to_string()))?;
        tracing::debug!(nonce = tx.nonce, gas_price = tx.gas_price, gas = tx.gas_limit, "submitting anchor transaction");

        let result = self.call(SEND_RAW, serde_json::json!([to_hex_data(&raw)])).await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ClientError::EmptyResponse {
                endpoint: SEND_RAW.into(),
            })
    }

    /// Calldata of a transaction, or `None` if the node does not know it.
    pub async fn transaction_input(&self, tx_hash: &str) -> Result<Option<String>, ClientError> {
        let result = self
            .call("eth_getTransactionByHash", serde_json::json!([tx_hash]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        Ok(result
            .get("input")
            .or_else(|| result.get("data"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let endpoint = format!("RPC {method}");
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        // Resubmitting a transaction could anchor the digest twice.
        let policy = if method == SEND_RAW {
            RetryPolicy::none()
        } else {
            self.retry
        };
        let resp = retry_send(&policy, &endpoint, || {
            self.http.post(self.rpc_url.clone()).json(&request).send()
        })
        .await
        .map_err(|e| ClientError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;
        let resp = check_status(&endpoint, resp).await?;

        let body: RpcResponse = resp.json().await.map_err(|e| ClientError::Deserialization {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        if let Some(err) = body.error {
            return Err(ClientError::Rpc {
                method: method.to_string(),
                code: err.code,
                message: err.message,
            });
        }
        Ok(body.result.unwrap_or(Value::Null))
    }
}

fn parse_quantity(method: &str, value: &Value) -> Result<u64, ClientError> {
    value
        .as_str()
        .and_then(|s| s.strip_prefix("0x"))
        .and_then(|digits| u64::from_str_radix(digits, 16).ok())
        .ok_or_else(|| ClientError::Rpc {
            method: method.to_string(),
            code: 0,
            message: format!("expected hex quantity, got {value}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_counts_calldata_bytes() {
        assert_eq!(intrinsic_gas(&[]), 21_000);
        assert_eq!(intrinsic_gas(&[0, 1, 2]), 21_000 + 4 + 16 + 16);
        // A 64-char hex digest as text is 64 nonzero bytes.
        assert_eq!(intrinsic_gas("ab".repeat(32).as_bytes()), 21_000 + 64 * 16);
    }

    #[test]
    fn calldata_round_trips_text() {
        let data = to_hex_data(b"abc123");
        assert_eq!(data, "0x616263313233");
        assert_eq!(calldata_text(&data).as_deref(), Some("abc123"));
        assert_eq!(calldata_text("0xzz"), None);
        assert_eq!(calldata_text("0xff"), None);
    }

    #[test]
    fn quantities_parse_from_hex() {
        assert_eq!(
            parse_quantity("eth_chainId", &serde_json::json!("0x13882")).unwrap(),
            80002
        );
        assert!(parse_quantity("eth_chainId", &serde_json::json!(80002)).is_err());
    }
}

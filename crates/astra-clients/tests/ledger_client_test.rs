//! Contract tests for LedgerClient against an EVM JSON-RPC node.

use astra_clients::{ClientError, ConfigError, LedgerClient, LedgerConfig};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zeroize::Zeroizing;

const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";
const WALLET: &str = "0x2c7536e3605d9c16a7a3d7b1898e529396a65c23";

fn config(mock_server: &MockServer, wallet_address: Option<&str>) -> LedgerConfig {
    LedgerConfig {
        rpc_url: mock_server.uri().parse().unwrap(),
        private_key: Zeroizing::new(KEY.into()),
        wallet_address: wallet_address.map(str::to_string),
        chain_id: 80002,
        explorer_url: "https://amoy.polygonscan.com/tx/".into(),
        timeout_secs: 5,
    }
}

fn test_client(mock_server: &MockServer) -> LedgerClient {
    LedgerClient::new(config(mock_server, None)).unwrap()
}

async fn mount_nonce_and_gas_price(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "method": "eth_getTransactionCount",
            "params": [WALLET, "pending"]
        })))
        .respond_with(rpc_result(serde_json::json!("0x5")))
        .mount(mock_server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({"method": "eth_gasPrice"})))
        .respond_with(rpc_result(serde_json::json!("0x3b9aca00")))
        .mount(mock_server)
        .await;
}

#[test]
fn wallet_address_is_derived_from_key() {
    let config = LedgerConfig {
        rpc_url: "http://localhost:8545".parse().unwrap(),
        private_key: Zeroizing::new(KEY.into()),
        wallet_address: Some("0x2C7536E3605D9C16A7A3D7B1898E529396A65C23".into()),
        chain_id: 80002,
        explorer_url: String::new(),
        timeout_secs: 5,
    };
    let client = LedgerClient::new(config).unwrap();
    assert_eq!(client.wallet_address(), WALLET);
}

#[tokio::test]
async fn mismatched_wallet_address_is_rejected() {
    let mock_server = MockServer::start().await;
    let err = LedgerClient::new(config(
        &mock_server,
        Some("0x52908400098527886E0F7030069857D2E4169EE7"),
    ))
    .err()
    .unwrap();
    assert!(matches!(
        err,
        ClientError::Config(ConfigError::WalletMismatch { ref derived, .. }) if derived == WALLET
    ));
}

fn rpc_result(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "jsonrpc": "2.0", "id": 1, "result": result
    }))
}

#[tokio::test]
async fn connected_when_chain_matches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({"method": "eth_chainId"})))
        .respond_with(rpc_result(serde_json::json!("0x13882")))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert_eq!(client.chain_id().await.unwrap(), 80002);
    assert!(client.is_connected().await);
}

#[tokio::test]
async fn wrong_chain_is_not_connected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({"method": "eth_chainId"})))
        .respond_with(rpc_result(serde_json::json!("0x1")))
        .mount(&mock_server)
        .await;

    assert!(!test_client(&mock_server).is_connected().await);
}

#[tokio::test]
async fn self_transaction_is_signed_locally() {
    let mock_server = MockServer::start().await;
    mount_nonce_and_gas_price(&mock_server).await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "method": "eth_sendRawTransaction",
            "params": ["0xf86905843b9aca00825238942c7536e3605d9c16a7a3d7b1898e529396a65c23808361626383027128a00ff85e2aaf9665962850004e0a8f20ef0bd9c5f6ee14b2370f4d5e7559fabb36a05105238cfea77ee0099b8990f471acd54758c1b31473efe1dd0f840191d607dd"]
        })))
        .respond_with(rpc_result(serde_json::json!("0xfeed")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let tx = client.send_self_transaction(b"abc").await.unwrap();
    assert_eq!(tx, "0xfeed");
}

#[tokio::test]
async fn rpc_error_object_is_surfaced() {
    let mock_server = MockServer::start().await;
    mount_nonce_and_gas_price(&mock_server).await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({"method": "eth_sendRawTransaction"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0", "id": 1,
            "error": {"code": -32000, "message": "insufficient funds for gas * price + value"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server)
        .send_self_transaction(b"abc")
        .await
        .unwrap_err();
    match err {
        ClientError::Rpc { method, code, message } => {
            assert_eq!(method, "eth_sendRawTransaction");
            assert_eq!(code, -32000);
            assert!(message.starts_with("insufficient funds"));
        }
        other => panic!("expected Rpc error, got {other:?}"),
    }
}

#[tokio::test]
async fn transaction_input_reads_calldata() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "method": "eth_getTransactionByHash",
            "params": ["0xfeed"]
        })))
        .respond_with(rpc_result(serde_json::json!({"hash": "0xfeed", "input": "0x616263"})))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "method": "eth_getTransactionByHash",
            "params": ["0xmissing"]
        })))
        .respond_with(rpc_result(serde_json::Value::Null))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert_eq!(
        client.transaction_input("0xfeed").await.unwrap().as_deref(),
        Some("0x616263")
    );
    assert_eq!(client.transaction_input("0xmissing").await.unwrap(), None);
}

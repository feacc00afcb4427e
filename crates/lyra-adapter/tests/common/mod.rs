/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for lyra-adapter tests

#![allow(dead_code)]

use std::future::Future;

use lyra_adapter::{Environment, LocalKeySigner, LyraConfig};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;
use wiremock::MockServer;

/// Well-known development key (address 0xf39F...2266)
pub const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_WALLET: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn test_signer() -> LocalKeySigner {
    LocalKeySigner::new(TEST_PRIVATE_KEY).expect("test key")
}

pub fn test_config() -> LyraConfig {
    LyraConfig::preset(Environment::Test)
}

/// Serve one WebSocket connection on an ephemeral port; returns its ws:// URL
pub async fn spawn_ws_server<F, Fut>(handler: F) -> String
where
    F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake");
        handler(ws).await;
    });
    format!("ws://{addr}/ws")
}

/// Minimal `private/order` result echoing the submitted params
pub fn order_result(params: &serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "order": {
            "order_id": "c1b4c3b4-0000-4000-8000-000000000001",
            "subaccount_id": params["subaccount_id"],
            "instrument_name": params["instrument_name"],
            "direction": params["direction"],
            "order_type": params["order_type"],
            "time_in_force": params["time_in_force"],
            "order_status": "open",
            "limit_price": params["limit_price"],
            "amount": params["amount"],
            "filled_amount": "0",
            "average_price": "0",
            "order_fee": "0",
            "max_fee": params["max_fee"],
            "nonce": params["nonce"],
            "signer": params["signer"],
            "signature": params["signature"],
            "signature_expiry_sec": params["signature_expiry_sec"],
            "mmp": params["mmp"],
            "label": "",
            "creation_timestamp": 1700000000000i64,
            "last_update_timestamp": 1700000000000i64
        },
        "trades": []
    })
}

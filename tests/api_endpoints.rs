//! End-to-end HTTP facade tests through the SDK client.

use lc_sdk::{LcClient, SdkError};
use reqwest::StatusCode;
use serde_json::json;
use std::sync::Arc;

use lc_gateway::config::LedgerConfig;
use lc_gateway::lc::LcService;
use lc_gateway::wallet::{IdentityStore, InMemoryWallet};
use lc_gateway::Shutdown;

mod common;
use common::FakeLedger;

async fn gateway(identity: &str) -> (tempfile::TempDir, Arc<FakeLedger>, String, Shutdown) {
    let dir = tempfile::tempdir().unwrap();
    let network = common::write_profile(dir.path(), "buyer");
    let wallet = Arc::new(InMemoryWallet::new());
    wallet.put(common::buyer_user()).await.unwrap();
    let ledger = FakeLedger::new();
    let config = LedgerConfig {
        identity: identity.to_string(),
        ..LedgerConfig::default()
    };
    let client = common::transaction_client(wallet, network, ledger.clone(), config);
    let shutdown = Shutdown::new();
    let url = common::spawn_gateway(LcService::new(Arc::new(client)), &shutdown).await;
    (dir, ledger, url, shutdown)
}

#[tokio::test]
async fn test_submit_and_query_round() {
    let (_dir, ledger, url, shutdown) = gateway("BuyerUser").await;
    let client = LcClient::new(&url);

    let receipt = client
        .request_lc(&json!({ "lcId": "LC1", "buyer": "Tata", "amount": 50000 }))
        .await
        .unwrap();
    assert_eq!(receipt.message, "Transaction has been submitted successfully");
    assert_eq!(receipt.function, "requestLC");

    client.issue_lc(&json!({ "lcId": "LC1" })).await.unwrap();

    let lc = client.get_lc("LC1").await.unwrap();
    assert_eq!(lc["status"], "Issued");
    assert_eq!(lc["amount"], 50000);

    let history = client.get_lc_history("LC1").await.unwrap();
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(ledger.opens(), ledger.closes());

    shutdown.trigger();
}

#[tokio::test]
async fn test_unenrolled_identity_is_forbidden() {
    let (_dir, ledger, url, shutdown) = gateway("Nobody").await;
    let client = LcClient::new(&url);

    let err = client.get_lc("LC1").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    let body = err.api_error().unwrap();
    assert_eq!(body.error, "identity_not_found");
    assert!(body.message.contains("Nobody"));
    assert_eq!(ledger.opens(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_contract_error_is_unprocessable() {
    let (_dir, _ledger, url, shutdown) = gateway("BuyerUser").await;
    let client = LcClient::new(&url);

    let err = client.accept_lc(&json!({ "lcId": "LC404" })).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    let body = err.api_error().unwrap();
    assert_eq!(body.error, "contract_invocation_failed");
    assert_eq!(body.stage.as_deref(), Some("invoke"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_connect_failure_is_bad_gateway() {
    let (_dir, ledger, url, shutdown) = gateway("BuyerUser").await;
    ledger
        .fail_connect
        .store(true, std::sync::atomic::Ordering::SeqCst);
    let client = LcClient::new(&url);

    let err = client.get_lc("LC1").await.unwrap_err();
    assert!(matches!(err, SdkError::Api { .. }));
    assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    assert_eq!(err.api_error().unwrap().stage.as_deref(), Some("connect"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_client_hang_up_still_disconnects() {
    let (_dir, ledger, url, shutdown) = gateway("BuyerUser").await;
    *ledger.invoke_delay.lock().unwrap() = Some(std::time::Duration::from_secs(1));
    let impatient = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(300))
        .build()
        .unwrap();

    let err = impatient
        .post(format!("{}/getLC", url))
        .json(&json!({ "lcId": "LC1" }))
        .send()
        .await
        .unwrap_err();
    assert!(err.is_timeout());

    let watched = ledger.clone();
    assert!(common::eventually(move || watched.closes() == 1).await);
    assert_eq!(ledger.opens(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_bad_bodies_are_rejected() {
    let (_dir, ledger, url, shutdown) = gateway("BuyerUser").await;
    let http = reqwest::Client::new();

    let not_json = http
        .post(format!("{}/requestLC", url))
        .header("content-type", "application/json")
        .body("{oops")
        .send()
        .await
        .unwrap();
    assert_eq!(not_json.status(), StatusCode::BAD_REQUEST);

    let scalar = http
        .post(format!("{}/issueLC", url))
        .json(&json!("LC1"))
        .send()
        .await
        .unwrap();
    assert_eq!(scalar.status(), StatusCode::BAD_REQUEST);

    let missing_id = http
        .post(format!("{}/getLC", url))
        .json(&json!({ "id": "LC1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_id.status(), StatusCode::BAD_REQUEST);

    assert_eq!(ledger.opens(), 0);
    shutdown.trigger();
}

#[tokio::test]
async fn test_array_body_reaches_contract_verbatim() {
    let (_dir, ledger, url, shutdown) = gateway("BuyerUser").await;
    let http = reqwest::Client::new();

    let response = http
        .post(format!("{}/requestLC", url))
        .json(&json!(["LC1", { "amount": 5 }]))
        .send()
        .await
        .unwrap();
    // The toy contract wants an object, so it rejects the call after receiving it.
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let invocation = ledger.invocations().pop().unwrap();
    assert_eq!(invocation.function, "requestLC");
    assert_eq!(invocation.args, vec![r#"["LC1",{"amount":5}]"#.to_string()]);
    assert_eq!(ledger.opens(), ledger.closes());

    shutdown.trigger();
}

#[tokio::test]
async fn test_health_and_request_id() {
    let (_dir, _ledger, url, shutdown) = gateway("BuyerUser").await;
    let http = reqwest::Client::new();

    let response = http.get(format!("{}/health", url)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let echoed = http
        .get(format!("{}/health", url))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(echoed.headers()["x-request-id"], "req-42");

    shutdown.trigger();
}

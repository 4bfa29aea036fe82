//! Integration tests for completion polling over HTTP.
//!
//! The detail endpoint is served by wiremock; the poller drives
//! `WalletClient::get_transaction` until the snapshot is terminal.

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wallet_api_suite::{
    CompletionPoller, Endpoints, HttpClient, PollConfig, SuiteError, TransactionStatus, WalletClient,
};

const TX_ID: &str = "3f1c2b4a-9d8e-4f7a-8b6c-5d4e3f2a1b0c";

// ============================================================================
// TEST HELPERS
// ============================================================================

fn create_client(server: &MockServer) -> WalletClient {
    let http = HttpClient::new(Duration::from_secs(5), 0).expect("client builds");
    WalletClient::new(http, Endpoints::new(&server.uri())).with_token("tok")
}

fn fast_poller(max_attempts: u32) -> CompletionPoller {
    CompletionPoller::new(PollConfig {
        delay: Duration::from_millis(5),
        max_attempts,
        deadline: Duration::from_secs(5),
    })
}

fn detail_path() -> String {
    format!("/wallet/w1/transaction/{}", TX_ID)
}

fn pending() -> serde_json::Value {
    json!({
        "transactionId": TX_ID,
        "status": "pending",
        "createdAt": "2024-01-15T10:30:00Z"
    })
}

fn finished() -> serde_json::Value {
    json!({
        "transactionId": TX_ID,
        "status": "finished",
        "outcome": "approved",
        "createdAt": "2024-01-15T10:30:00Z",
        "updatedAt": "2024-01-15T10:30:02Z"
    })
}

// ============================================================================
// TEST: COMPLETION
// ============================================================================

/// Pending twice, then finished: exactly three GETs.
///
/// Scenario:
/// - First two detail responses say `pending` (higher priority, capped at 2)
/// - Every later response says `finished`
/// - Poller returns the finished snapshot after the third fetch
#[tokio::test]
async fn test_pending_twice_then_finished() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(detail_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending()))
        .up_to_n_times(2)
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(detail_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(finished()))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let tx = fast_poller(10)
        .await_completion(TX_ID, || client.get_transaction("w1", TX_ID))
        .await
        .expect("poll should complete");

    assert_eq!(tx.status, TransactionStatus::Finished);
    assert!(tx.is_approved());
    assert_eq!(tx.updated_at.as_deref(), Some("2024-01-15T10:30:02Z"));

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 3, "poller should fetch exactly 3 times");
}

/// A transaction stuck in `pending` exhausts the attempt budget.
#[tokio::test]
async fn test_stuck_pending_raises_poll_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(detail_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(pending()))
        .expect(3)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let err = fast_poller(3)
        .await_completion(TX_ID, || client.get_transaction("w1", TX_ID))
        .await
        .unwrap_err();

    match err {
        SuiteError::PollTimeout { transaction_id, attempts, .. } => {
            assert_eq!(transaction_id, TX_ID);
            assert_eq!(attempts, 3);
        }
        other => panic!("expected PollTimeout, got {:?}", other),
    }
}

/// A server error during polling propagates and stops the loop.
#[tokio::test]
async fn test_server_error_stops_polling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(detail_path()))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let err = fast_poller(10)
        .await_completion(TX_ID, || client.get_transaction("w1", TX_ID))
        .await
        .unwrap_err();

    assert!(matches!(err, SuiteError::UnexpectedStatus { status: 503, .. }));
}

//! Integration tests for the HTTP layer.
//!
//! Exercises `HttpClient` and `WalletClient` against wiremock mock servers.

use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wallet_api_suite::{
    ApiRequest, Credentials, Endpoints, HistoryQuery, HttpClient, SuiteError, WalletClient,
};

// ============================================================================
// TEST HELPERS
// ============================================================================

fn create_client(server: &MockServer) -> WalletClient {
    let http = HttpClient::new(Duration::from_secs(5), 0).expect("client builds");
    WalletClient::new(http, Endpoints::new(&server.uri()))
}

fn tx_json(id: &str, status: &str) -> serde_json::Value {
    json!({
        "transactionId": id,
        "status": status,
        "type": "credit",
        "currency": "USD",
        "amount": 100.0,
        "createdAt": "2024-01-15T10:30:00Z"
    })
}

// ============================================================================
// TEST: AUTH
// ============================================================================

/// Login posts the credentials and decodes token + user id.
#[tokio::test]
async fn test_login_decodes_token_and_user() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "test@example.com", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": "tok-1", "userId": "user-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let login = client
        .login(&Credentials {
            username: "test@example.com".to_string(),
            password: "pw".to_string(),
        })
        .await
        .expect("login should succeed");

    assert_eq!(login.token, "tok-1");
    assert_eq!(login.user_id, "user-1");
}

/// Rejected credentials surface as `UnexpectedStatus` carrying the code.
#[tokio::test]
async fn test_login_rejection_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid credentials"})))
        .mount(&server)
        .await;

    let err = create_client(&server)
        .login(&Credentials {
            username: "a".to_string(),
            password: "b".to_string(),
        })
        .await
        .unwrap_err();

    match err {
        SuiteError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid credentials"));
        }
        other => panic!("expected UnexpectedStatus, got {:?}", other),
    }
}

/// Bearer token and default headers travel with every request.
#[tokio::test]
async fn test_token_and_default_headers_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/user-1"))
        .and(header("Authorization", "Bearer tok-1"))
        .and(header("Accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"userId": "user-1", "walletId": "wallet-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let headers = BTreeMap::from([("Accept".to_string(), "application/json".to_string())]);
    let client = create_client(&server)
        .with_default_headers(&headers)
        .with_token("tok-1");

    let profile = client.user("user-1").await.expect("profile");
    assert_eq!(profile.wallet_id, "wallet-1");
}

// ============================================================================
// TEST: STATUS HANDLING
// ============================================================================

/// Opting out of status checks hands back the error response.
#[tokio::test]
async fn test_allow_error_status_returns_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wallet/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "wallet not found"})))
        .expect(2)
        .mount(&server)
        .await;

    let client = create_client(&server);

    let response = client
        .get_wallet_response("missing", false)
        .await
        .expect("error status is returned, not raised");
    assert_eq!(response.status, 404);
    assert_eq!(response.body["error"], "wallet not found");
    assert!(!response.is_success());

    let err = client.get_wallet("missing").await.unwrap_err();
    assert!(matches!(err, SuiteError::UnexpectedStatus { status: 404, .. }));
}

/// Non-JSON bodies are kept as strings, empty bodies become null.
#[tokio::test]
async fn test_non_json_and_empty_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/text"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let http = HttpClient::new(Duration::from_secs(5), 0).unwrap();

    let text = http
        .send(ApiRequest::get(format!("{}/text", server.uri())).allow_error_status())
        .await
        .unwrap();
    assert_eq!(text.status, 502);
    assert_eq!(text.body, json!("Bad Gateway"));

    let empty = http
        .send(ApiRequest::get(format!("{}/empty", server.uri())))
        .await
        .unwrap();
    assert_eq!(empty.status, 204);
    assert!(empty.body.is_null());
}

// ============================================================================
// TEST: TRANSACTIONS
// ============================================================================

/// Submit forwards the raw payload; an invalid one can come back as 400.
#[tokio::test]
async fn test_submit_forwards_raw_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/wallet/w1/transaction"))
        .and(body_json(json!({"currency": "USD", "amount": -5, "type": "credit"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "amount out of range"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = create_client(&server)
        .submit_transaction(
            "w1",
            &json!({"currency": "USD", "amount": -5, "type": "credit"}),
            false,
        )
        .await
        .unwrap();
    assert_eq!(response.status, 400);
}

/// Detail fetch decodes the snapshot including echo fields.
#[tokio::test]
async fn test_get_transaction_decodes_snapshot() {
    let server = MockServer::start().await;
    let id = "3f1c2b4a-9d8e-4f7a-8b6c-5d4e3f2a1b0c";

    Mock::given(method("GET"))
        .and(path(format!("/wallet/w1/transaction/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(tx_json(id, "pending")))
        .expect(1)
        .mount(&server)
        .await;

    let tx = create_client(&server).get_transaction("w1", id).await.unwrap();
    assert_eq!(tx.transaction_id, id);
    assert!(!tx.is_terminal());
    assert_eq!(tx.currency.as_deref(), Some("USD"));
    assert_eq!(tx.amount, Some(100.0));
}

/// History query parameters use the service's camelCase names.
#[tokio::test]
async fn test_list_transactions_sends_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wallet/w1/transactions"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "5"))
        .and(query_param("startDate", "2024-01-15T00:00:00.000Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transactions": [],
            "currentPage": 2,
            "totalCount": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = HistoryQuery {
        page: Some(2),
        page_size: Some(5),
        start_date: Some("2024-01-15T00:00:00.000Z".to_string()),
        end_date: None,
    };
    let response = create_client(&server)
        .list_transactions("w1", &query)
        .await
        .unwrap();
    assert_eq!(response.body["totalCount"], 7);
}

/// Connection failures surface as transport errors once retries run out.
#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Grab a free port, then close it again
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let http = HttpClient::new(Duration::from_secs(2), 1).unwrap();
    let err = http
        .send(ApiRequest::get(format!("http://{}/wallet/w1", addr)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "transport");
    println!("✅ Transport failure reported: {}", err);
}

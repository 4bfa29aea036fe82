//! HTTP access to the wallet service.
//!
//! `HttpClient` is the generic request capability: URL, method, headers,
//! query, optional JSON body in; status code plus parsed body out. Non-2xx
//! responses are errors unless the request opts out with
//! [`ApiRequest::allow_error_status`], which negative-path scenarios need.
//! `WalletClient` layers the typed wallet endpoints on top.

use crate::endpoints::Endpoints;
use crate::error::{Result, SuiteError};
use crate::model::{
    Credentials, HistoryQuery, LoginResponse, Transaction, UserProfile, Wallet,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

// ============================================================================
// REQUEST / RESPONSE
// ============================================================================

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Option<Duration>,
    pub fail_on_status: bool,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        ApiRequest {
            method,
            url: url.into(),
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
            timeout: None,
            fail_on_status: true,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, url).body(body)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<'a>(mut self, headers: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Return non-2xx responses instead of failing with `UnexpectedStatus`
    pub fn allow_error_status(mut self) -> Self {
        self.fail_on_status = false;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON; a non-JSON body is kept as a string, an empty one as null
    pub body: Value,
    pub elapsed: Duration,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.body.clone())?)
    }
}

// ============================================================================
// HTTP CLIENT
// ============================================================================

#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    /// Extra attempts for idempotent requests that fail at the transport level
    transport_retries: u32,
}

impl HttpClient {
    pub fn new(timeout: Duration, transport_retries: u32) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpClient {
            http,
            transport_retries,
        })
    }

    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let retries = if request.method == Method::GET {
            self.transport_retries
        } else {
            0
        };
        let mut attempt = 0;

        loop {
            match self.send_once(&request).await {
                Err(SuiteError::Transport(e))
                    if attempt < retries && (e.is_connect() || e.is_timeout()) =>
                {
                    attempt += 1;
                    warn!(
                        "[HTTP] {} {} transport error, retry {}/{}: {}",
                        request.method, request.url, attempt, retries, e
                    );
                    tokio::time::sleep(Duration::from_millis(100 * u64::from(attempt))).await;
                }
                other => return other,
            }
        }
    }

    async fn send_once(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let mut builder = self.http.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let started = Instant::now();
        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let text = resp.text().await?;
        let elapsed = started.elapsed();

        debug!(
            "[HTTP] {} {} -> {} ({}ms)",
            request.method,
            request.url,
            status,
            elapsed.as_millis()
        );

        if request.fail_on_status && !(200..300).contains(&status) {
            return Err(SuiteError::UnexpectedStatus {
                url: request.url.clone(),
                status,
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse {
            status,
            body,
            elapsed,
        })
    }
}

// ============================================================================
// WALLET CLIENT
// ============================================================================

/// Typed wallet endpoints; carries the bearer token once authenticated.
#[derive(Debug, Clone)]
pub struct WalletClient {
    http: HttpClient,
    endpoints: Endpoints,
    default_headers: Vec<(String, String)>,
    token: Option<String>,
}

impl WalletClient {
    pub fn new(http: HttpClient, endpoints: Endpoints) -> Self {
        WalletClient {
            http,
            endpoints,
            default_headers: Vec::new(),
            token: None,
        }
    }

    pub fn with_default_headers<'a>(
        mut self,
        headers: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Self {
        self.default_headers = headers
            .into_iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Attach default headers and, when present, the bearer token
    fn prepare(&self, request: ApiRequest) -> ApiRequest {
        let request = request.headers(self.default_headers.iter().map(|(k, v)| (k, v)));
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.http.send(self.prepare(request)).await
    }

    /// `POST /login`
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let body = serde_json::to_value(credentials)?;
        let response = self.send(ApiRequest::post(self.endpoints.login(), body)).await?;
        expect_status(&response, 200, "login status")?;
        response.json()
    }

    /// `GET /user/{userId}`
    pub async fn user(&self, user_id: &str) -> Result<UserProfile> {
        let response = self.send(ApiRequest::get(self.endpoints.user(user_id))).await?;
        expect_status(&response, 200, "user profile status")?;
        response.json()
    }

    pub async fn get_wallet(&self, wallet_id: &str) -> Result<Wallet> {
        let response = self.get_wallet_response(wallet_id, true).await?;
        expect_status(&response, 200, "wallet status")?;
        response.json()
    }

    /// `GET /wallet/{walletId}`; with `fail_on_status == false` any status comes back
    pub async fn get_wallet_response(&self, wallet_id: &str, fail_on_status: bool) -> Result<ApiResponse> {
        let request = ApiRequest::get(self.endpoints.wallet(wallet_id));
        self.send(with_status_mode(request, fail_on_status)).await
    }

    /// `POST /wallet/{walletId}/transaction` with an arbitrary JSON payload
    pub async fn submit_transaction(
        &self,
        wallet_id: &str,
        payload: &Value,
        fail_on_status: bool,
    ) -> Result<ApiResponse> {
        let request = ApiRequest::post(self.endpoints.submit_transaction(wallet_id), payload.clone());
        self.send(with_status_mode(request, fail_on_status)).await
    }

    pub async fn get_transaction(&self, wallet_id: &str, transaction_id: &str) -> Result<Transaction> {
        let response = self
            .get_transaction_response(wallet_id, transaction_id, true)
            .await?;
        expect_status(&response, 200, "transaction detail status")?;
        response.json()
    }

    /// `GET /wallet/{walletId}/transaction/{transactionId}`
    pub async fn get_transaction_response(
        &self,
        wallet_id: &str,
        transaction_id: &str,
        fail_on_status: bool,
    ) -> Result<ApiResponse> {
        let request = ApiRequest::get(self.endpoints.transaction(wallet_id, transaction_id));
        self.send(with_status_mode(request, fail_on_status)).await
    }

    /// `GET /wallet/{walletId}/transactions`
    pub async fn list_transactions(&self, wallet_id: &str, query: &HistoryQuery) -> Result<ApiResponse> {
        let request = ApiRequest::get(self.endpoints.transactions(wallet_id)).query(query.to_pairs());
        self.send(request).await
    }
}

fn with_status_mode(request: ApiRequest, fail_on_status: bool) -> ApiRequest {
    if fail_on_status {
        request
    } else {
        request.allow_error_status()
    }
}

pub(crate) fn expect_status(response: &ApiResponse, expected: u16, context: &str) -> Result<()> {
    crate::error::ensure(response.status == expected, context, expected, response.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder_defaults() {
        let request = ApiRequest::get("http://h/wallet/1");
        assert_eq!(request.method, Method::GET);
        assert!(request.fail_on_status);
        assert!(request.body.is_none());

        let request = ApiRequest::post("http://h/login", json!({"a": 1}))
            .header("X-Trace", "1")
            .allow_error_status();
        assert_eq!(request.method, Method::POST);
        assert!(!request.fail_on_status);
        assert_eq!(request.headers, vec![("X-Trace".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_prepare_adds_headers_and_token() {
        let http = HttpClient::new(Duration::from_secs(1), 0).unwrap();
        let headers = std::collections::BTreeMap::from([(
            "Content-Type".to_string(),
            "application/json".to_string(),
        )]);
        let client = WalletClient::new(http, Endpoints::new("http://h"))
            .with_default_headers(&headers)
            .with_token("tok");

        let prepared = client.prepare(ApiRequest::get("http://h/x"));
        assert!(prepared
            .headers
            .contains(&("Content-Type".to_string(), "application/json".to_string())));
        assert!(prepared
            .headers
            .contains(&("Authorization".to_string(), "Bearer tok".to_string())));
    }

    #[test]
    fn test_response_decode() {
        let response = ApiResponse {
            status: 200,
            body: json!({"token": "t", "userId": "u"}),
            elapsed: Duration::from_millis(3),
        };
        assert!(response.is_success());
        let login: LoginResponse = response.json().unwrap();
        assert_eq!(login.user_id, "u");

        let bad: Result<Wallet> = response.json();
        assert!(matches!(bad, Err(SuiteError::Decode(_))));
    }
}

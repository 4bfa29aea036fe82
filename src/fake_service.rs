// 🧪 Fake Wallet Service - in-memory stand-in for the real wallet API
//
// Serves the same endpoint shapes the suite consumes. Transactions stay
// `pending` for a configurable number of detail fetches, then settle:
// credits are approved, debits are approved only when the clip balance
// covers them. Balances change at settlement, never before.

use crate::constants::{AMOUNT_DECIMAL_PLACES, MAX_VALID_AMOUNT, SUPPORTED_CURRENCIES};
use crate::generators::{generate_identifier, round_to};
use crate::model::{
    Credentials, CurrencyClip, HistoryQuery, Outcome, Transaction, TransactionPage,
    TransactionStatus, TransactionType, UserProfile, Wallet,
};
use crate::validation::parse_timestamp;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

const DEFAULT_PAGE_SIZE: u32 = 10;

// ============================================================================
// OPTIONS & STATE
// ============================================================================

#[derive(Debug, Clone)]
pub struct FakeWalletOptions {
    pub username: String,
    pub password: String,
    /// Detail fetches answered with `pending` before a transaction settles
    pub pending_polls: u32,
}

impl Default for FakeWalletOptions {
    fn default() -> Self {
        FakeWalletOptions {
            username: "test@example.com".to_string(),
            password: "testPassword123".to_string(),
            pending_polls: 0,
        }
    }
}

#[derive(Debug)]
struct StoredTransaction {
    snapshot: Transaction,
    polls_left: u32,
}

#[derive(Debug, Default)]
struct Clip {
    balance: f64,
    transaction_count: u64,
}

#[derive(Debug)]
struct Ledger {
    options: FakeWalletOptions,
    token: String,
    user_id: String,
    wallet_id: String,
    clips: BTreeMap<String, Clip>,
    /// Creation order
    transactions: Vec<StoredTransaction>,
}

impl Ledger {
    fn new(options: FakeWalletOptions) -> Self {
        Ledger {
            options,
            token: generate_identifier(),
            user_id: generate_identifier(),
            wallet_id: generate_identifier(),
            clips: BTreeMap::new(),
            transactions: Vec::new(),
        }
    }

    fn wallet(&self) -> Wallet {
        Wallet {
            wallet_id: self.wallet_id.clone(),
            currency_clips: self
                .clips
                .iter()
                .map(|(currency, clip)| CurrencyClip {
                    currency: currency.clone(),
                    balance: clip.balance,
                    transaction_count: clip.transaction_count,
                })
                .collect(),
        }
    }

    fn find(&mut self, transaction_id: &str) -> Option<&mut StoredTransaction> {
        self.transactions
            .iter_mut()
            .find(|t| t.snapshot.transaction_id == transaction_id)
    }

    /// Decide the outcome and apply it to the clip
    fn settle(&mut self, index: usize) {
        let snapshot = &self.transactions[index].snapshot;
        let currency = snapshot.currency.clone().unwrap_or_default();
        let amount = snapshot.amount.unwrap_or_default();

        let approved = match snapshot.transaction_type {
            Some(TransactionType::Credit) => true,
            Some(TransactionType::Debit) => self
                .clips
                .get(&currency)
                .map_or(false, |clip| clip.balance >= amount),
            None => false,
        };

        if approved {
            let clip = self.clips.entry(currency).or_default();
            match snapshot.transaction_type {
                Some(TransactionType::Debit) => clip.balance -= amount,
                _ => clip.balance += amount,
            }
            clip.transaction_count += 1;
        }

        let snapshot = &mut self.transactions[index].snapshot;
        snapshot.status = TransactionStatus::Finished;
        snapshot.outcome = Some(if approved {
            Outcome::Approved
        } else {
            Outcome::Denied
        });
        snapshot.updated_at = Some(now());
        debug!(
            "[FAKE] settled {} as {}",
            snapshot.transaction_id,
            snapshot.outcome.map_or("-", |o| o.as_str())
        );
    }
}

#[derive(Clone)]
struct AppState {
    ledger: Arc<Mutex<Ledger>>,
}

impl AppState {
    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn authorized(headers: &HeaderMap, ledger: &Ledger) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map_or(false, |token| token == ledger.token)
}

// ============================================================================
// PAYLOAD VALIDATION
// ============================================================================

struct ValidPayload {
    currency: String,
    amount: f64,
    transaction_type: TransactionType,
}

fn validate_payload(payload: &Value) -> Result<ValidPayload, String> {
    let currency = payload
        .get("currency")
        .and_then(Value::as_str)
        .ok_or("currency is required")?;
    if !SUPPORTED_CURRENCIES.contains(&currency) {
        return Err(format!("unsupported currency {}", currency));
    }

    let amount = payload
        .get("amount")
        .and_then(Value::as_f64)
        .ok_or("amount must be a number")?;
    if !(amount > 0.0 && amount <= MAX_VALID_AMOUNT) {
        return Err(format!("amount {} out of range", amount));
    }
    if round_to(amount, AMOUNT_DECIMAL_PLACES) != amount {
        return Err(format!("amount {} has more than {} decimals", amount, AMOUNT_DECIMAL_PLACES));
    }

    let transaction_type = match payload.get("type").and_then(Value::as_str) {
        Some("credit") => TransactionType::Credit,
        Some("debit") => TransactionType::Debit,
        Some(other) => return Err(format!("invalid type {}", other)),
        None => return Err("type is required".to_string()),
    };

    Ok(ValidPayload {
        currency: currency.to_string(),
        amount,
        transaction_type,
    })
}

// ============================================================================
// HANDLERS
// ============================================================================

/// POST /login
async fn login(State(state): State<AppState>, Json(credentials): Json<Credentials>) -> Response {
    let ledger = state.ledger();
    if credentials.username != ledger.options.username || credentials.password != ledger.options.password {
        return error(StatusCode::UNAUTHORIZED, "invalid credentials");
    }
    Json(json!({ "token": ledger.token, "userId": ledger.user_id })).into_response()
}

/// GET /user/:user_id
async fn get_user(State(state): State<AppState>, headers: HeaderMap, Path(user_id): Path<String>) -> Response {
    let ledger = state.ledger();
    if !authorized(&headers, &ledger) {
        return error(StatusCode::UNAUTHORIZED, "missing or invalid token");
    }
    if user_id != ledger.user_id {
        return error(StatusCode::NOT_FOUND, "user not found");
    }
    Json(UserProfile {
        user_id: Some(ledger.user_id.clone()),
        wallet_id: ledger.wallet_id.clone(),
    })
    .into_response()
}

/// GET /wallet/:wallet_id
async fn get_wallet(State(state): State<AppState>, headers: HeaderMap, Path(wallet_id): Path<String>) -> Response {
    let ledger = state.ledger();
    if !authorized(&headers, &ledger) {
        return error(StatusCode::UNAUTHORIZED, "missing or invalid token");
    }
    if wallet_id != ledger.wallet_id {
        return error(StatusCode::NOT_FOUND, "wallet not found");
    }
    Json(ledger.wallet()).into_response()
}

/// POST /wallet/:wallet_id/transaction
async fn submit_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(wallet_id): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    let mut ledger = state.ledger();
    if !authorized(&headers, &ledger) {
        return error(StatusCode::UNAUTHORIZED, "missing or invalid token");
    }
    if wallet_id != ledger.wallet_id {
        return error(StatusCode::NOT_FOUND, "wallet not found");
    }

    let valid = match validate_payload(&payload) {
        Ok(valid) => valid,
        Err(message) => {
            debug!("[FAKE] rejected payload {}: {}", payload, message);
            return error(StatusCode::BAD_REQUEST, &message);
        }
    };

    let snapshot = Transaction {
        transaction_id: generate_identifier(),
        status: TransactionStatus::Pending,
        outcome: None,
        transaction_type: Some(valid.transaction_type),
        currency: Some(valid.currency),
        amount: Some(valid.amount),
        created_at: now(),
        updated_at: None,
    };
    let polls_left = ledger.options.pending_polls;
    ledger.transactions.push(StoredTransaction {
        snapshot,
        polls_left,
    });
    let index = ledger.transactions.len() - 1;
    if polls_left == 0 {
        ledger.settle(index);
    }

    // Submit responses carry only the lifecycle fields
    let stored = &ledger.transactions[index].snapshot;
    let response = Transaction {
        transaction_type: None,
        currency: None,
        amount: None,
        ..stored.clone()
    };
    (StatusCode::CREATED, Json(response)).into_response()
}

/// GET /wallet/:wallet_id/transaction/:transaction_id
async fn get_transaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((wallet_id, transaction_id)): Path<(String, String)>,
) -> Response {
    let mut ledger = state.ledger();
    if !authorized(&headers, &ledger) {
        return error(StatusCode::UNAUTHORIZED, "missing or invalid token");
    }
    if wallet_id != ledger.wallet_id {
        return error(StatusCode::NOT_FOUND, "wallet not found");
    }

    let Some(index) = ledger
        .transactions
        .iter()
        .position(|t| t.snapshot.transaction_id == transaction_id)
    else {
        return error(StatusCode::NOT_FOUND, "transaction not found");
    };

    let stored = &mut ledger.transactions[index];
    if stored.snapshot.status == TransactionStatus::Pending {
        if stored.polls_left > 0 {
            stored.polls_left -= 1;
        } else {
            ledger.settle(index);
        }
    }

    match ledger.find(&transaction_id) {
        Some(stored) => Json(stored.snapshot.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "transaction not found"),
    }
}

/// GET /wallet/:wallet_id/transactions
async fn list_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(wallet_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let ledger = state.ledger();
    if !authorized(&headers, &ledger) {
        return error(StatusCode::UNAUTHORIZED, "missing or invalid token");
    }
    if wallet_id != ledger.wallet_id {
        return error(StatusCode::NOT_FOUND, "wallet not found");
    }

    let start = query.start_date.as_deref().map(parse_timestamp);
    let end = query.end_date.as_deref().map(parse_timestamp);
    if matches!(start, Some(None)) || matches!(end, Some(None)) {
        return error(StatusCode::BAD_REQUEST, "invalid date range");
    }
    let (start, end) = (start.flatten(), end.flatten());

    let matching: Vec<Transaction> = ledger
        .transactions
        .iter()
        .rev()
        .map(|t| t.snapshot.clone())
        .filter(|tx| {
            let created = parse_timestamp(&tx.created_at);
            start.map_or(true, |s| created.map_or(false, |c| c >= s))
                && end.map_or(true, |e| created.map_or(false, |c| c <= e))
        })
        .collect();

    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
    let total_count = matching.len() as u64;
    let total_pages = (matching.len() as u32).div_ceil(page_size);
    let skip = page_offset(page, page_size);

    Json(TransactionPage {
        transactions: matching.into_iter().skip(skip).take(page_size as usize).collect(),
        current_page: page,
        total_count,
        page_size: Some(page_size),
        total_pages: Some(total_pages),
    })
    .into_response()
}

/// Items before `page`; saturates for pages far past the end
fn page_offset(page: u32, page_size: u32) -> usize {
    let offset = u64::from(page.saturating_sub(1)).saturating_mul(u64::from(page_size));
    usize::try_from(offset).unwrap_or(usize::MAX)
}

// ============================================================================
// SERVER
// ============================================================================

/// Routes relative to the API root
pub fn router(options: FakeWalletOptions) -> Router {
    let state = AppState {
        ledger: Arc::new(Mutex::new(Ledger::new(options))),
    };

    Router::new()
        .route("/login", post(login))
        .route("/user/:user_id", get(get_user))
        .route("/wallet/:wallet_id", get(get_wallet))
        .route("/wallet/:wallet_id/transaction", post(submit_transaction))
        .route(
            "/wallet/:wallet_id/transaction/:transaction_id",
            get(get_transaction),
        )
        .route("/wallet/:wallet_id/transactions", get(list_transactions))
        .with_state(state)
}

/// Handle to a fake service running in the background
#[derive(Debug, Clone)]
pub struct FakeWallet {
    pub addr: SocketAddr,
    pub base_url: String,
}

/// Serve the fake wallet under `/api` on an ephemeral localhost port
pub async fn spawn(options: FakeWalletOptions) -> std::io::Result<FakeWallet> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new().nest("/api", router(options));

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warn!("[FAKE] server stopped: {}", e);
        }
    });

    let base_url = format!("http://{}/api", addr);
    info!("[FAKE] wallet service listening on {}", base_url);
    Ok(FakeWallet { addr, base_url })
}

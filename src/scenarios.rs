// 🎬 Scenario Orchestrator - submit, await completion, assert
//
// One authenticated session per suite run, passed explicitly through
// `SuiteContext`. Scenarios run one after another against the shared wallet
// and treat it as append-only: balances are always read before projecting.
//
// Per transaction: Submitted -> Asserted when the submit response is already
// terminal, Submitted -> Pending -> Asserted otherwise.

use crate::client::{HttpClient, WalletClient};
use crate::config::SuiteConfig;
use crate::constants::BASE_TRANSACTION_FIELDS;
use crate::endpoints::Endpoints;
use crate::error::{ensure, Result, SuiteError};
use crate::fixtures::{Fixtures, InputValidationFixture};
use crate::generators::{date_range, generate_identifier, today_date_range, DateRange};
use crate::model::{
    HistoryQuery, Outcome, Transaction, TransactionPage, TransactionRequest, TransactionStatus,
    Wallet,
};
use crate::poller::CompletionPoller;
use crate::projection::BalanceProjector;
use crate::report::{ScenarioId, ScenarioResult, SuiteReport};
use crate::validation::{
    has_required_fields, is_accepted_submission, is_balance_within_tolerance, is_error_status,
    is_valid_identifier, is_valid_timestamp, missing_fields, parse_timestamp,
    validate_response_time, validate_status_code, StatusCategory,
};
use futures_util::future::join_all;
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const ECHO_AMOUNT_TOLERANCE: f64 = 1e-9;

// ============================================================================
// SESSION & PHASES
// ============================================================================

/// Created once per run by logging in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub wallet_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Submitted,
    Pending,
    Asserted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Submitted => "SUBMITTED",
            Phase::Pending => "PENDING",
            Phase::Asserted => "ASSERTED",
        };
        f.write_str(name)
    }
}

fn enter(phase: Phase, transaction_id: &str) {
    debug!("[SCENARIO] {} -> {}", transaction_id, phase);
}

/// Accepted submit response
#[derive(Debug, Clone)]
pub struct Submission {
    pub status: u16,
    pub body: Value,
    pub transaction: Transaction,
    pub elapsed: Duration,
}

// ============================================================================
// SUITE CONTEXT
// ============================================================================

pub struct SuiteContext {
    client: WalletClient,
    config: SuiteConfig,
    fixtures: Fixtures,
    session: Session,
    poller: CompletionPoller,
}

impl SuiteContext {
    /// Log in, resolve the user's wallet and keep the session for every scenario
    pub async fn establish(config: SuiteConfig, fixtures: Fixtures) -> Result<Self> {
        let http = HttpClient::new(config.request_timeout, config.transport_retries)?;
        let client = WalletClient::new(http, Endpoints::new(&config.base_url))
            .with_default_headers(&fixtures.configuration.default_headers);

        info!("[SCENARIO] Logging in as {}", config.credentials.username);
        let login = client.login(&config.credentials).await?;
        ensure(!login.token.is_empty(), "login token", "non-empty token", "empty")?;

        let client = client.with_token(login.token.clone());
        let profile = client.user(&login.user_id).await?;
        ensure(
            !profile.wallet_id.is_empty(),
            "user wallet id",
            "non-empty wallet id",
            "empty",
        )?;

        let session = Session {
            token: login.token,
            user_id: login.user_id,
            wallet_id: profile.wallet_id,
        };
        info!(
            "[SCENARIO] Session ready: user {} wallet {}",
            session.user_id, session.wallet_id
        );

        Ok(Self::new(client, config, fixtures, session))
    }

    /// Build a context around an already authenticated client
    pub fn new(client: WalletClient, config: SuiteConfig, fixtures: Fixtures, session: Session) -> Self {
        // An abandoned poll must never outlive its scenario
        let mut poll = config.poll;
        poll.deadline = poll.deadline.min(config.scenario_timeout);

        SuiteContext {
            client,
            config,
            fixtures,
            session,
            poller: CompletionPoller::new(poll),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn client(&self) -> &WalletClient {
        &self.client
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    // ========================================================================
    // RUNNER
    // ========================================================================

    /// Run `ids` sequentially; a failure aborts only its own scenario.
    pub async fn run(&self, ids: &[ScenarioId]) -> SuiteReport {
        let mut report = SuiteReport::default();

        for &id in ids {
            info!("[SCENARIO] {} started", id);
            let started = Instant::now();
            let outcome = tokio::time::timeout(self.config.scenario_timeout, self.run_scenario(id)).await;
            let elapsed = started.elapsed();

            let result = match outcome {
                Ok(Ok(message)) => {
                    info!("[SCENARIO] {} passed in {}ms: {}", id, elapsed.as_millis(), message);
                    ScenarioResult::pass(id, message, elapsed)
                }
                Ok(Err(e)) => {
                    warn!("[SCENARIO] {} failed: {}", id, e);
                    ScenarioResult::fail(id, &e, elapsed)
                }
                Err(_) => {
                    let e = SuiteError::ScenarioTimeout {
                        scenario: id.code().to_string(),
                        elapsed,
                    };
                    warn!("[SCENARIO] {}", e);
                    ScenarioResult::fail(id, &e, elapsed)
                }
            };
            report.push(result);
        }

        info!("[SCENARIO] {}", report.summary());
        report
    }

    pub async fn run_scenario(&self, id: ScenarioId) -> Result<String> {
        match id {
            ScenarioId::Credit => self.credit_transaction().await,
            ScenarioId::DebitWithPriorCredit => self.debit_with_prior_credit().await,
            ScenarioId::PendingCompletion => self.pending_completion().await,
            ScenarioId::MultiCurrency => self.multi_currency().await,
            ScenarioId::InputValidation => self.input_validation().await,
            ScenarioId::BalanceConsistency => self.balance_consistency().await,
            ScenarioId::TransactionHistory => self.transaction_history().await,
            ScenarioId::NotFound => self.not_found().await,
        }
    }

    // ========================================================================
    // BUILDING BLOCKS
    // ========================================================================

    /// Submit a request and check the accepted response's shape.
    pub async fn submit(&self, request: &TransactionRequest) -> Result<Submission> {
        let payload = serde_json::to_value(request)?;
        let response = self
            .client
            .submit_transaction(&self.session.wallet_id, &payload, true)
            .await?;

        ensure(
            is_accepted_submission(response.status),
            "submit status",
            "200, 201 or 202",
            response.status,
        )?;
        ensure_fields("submit response", &response.body, BASE_TRANSACTION_FIELDS)?;

        let transaction: Transaction = response.json()?;
        check_snapshot(&transaction)?;
        enter(Phase::Submitted, &transaction.transaction_id);

        Ok(Submission {
            status: response.status,
            body: response.body,
            transaction,
            elapsed: response.elapsed,
        })
    }

    /// Return `transaction` once terminal, polling the detail endpoint if needed.
    pub async fn complete(&self, transaction: Transaction) -> Result<Transaction> {
        if transaction.is_terminal() {
            return Ok(transaction);
        }

        enter(Phase::Pending, &transaction.transaction_id);
        let transaction_id = transaction.transaction_id.as_str();
        self.poller
            .await_completion(transaction_id, || self.fetch_snapshot(transaction_id))
            .await
    }

    /// One detail fetch; every polled snapshot must satisfy the status field rules.
    async fn fetch_snapshot(&self, transaction_id: &str) -> Result<Transaction> {
        let snapshot = self
            .client
            .get_transaction(&self.session.wallet_id, transaction_id)
            .await?;
        check_snapshot(&snapshot)?;
        Ok(snapshot)
    }

    /// Complete every transaction; pending ones are polled concurrently and
    /// joined before anything is returned. Order is preserved.
    pub async fn complete_all(&self, transactions: Vec<Transaction>) -> Result<Vec<Transaction>> {
        let pending: Vec<String> = transactions
            .iter()
            .filter(|tx| !tx.is_terminal())
            .map(|tx| tx.transaction_id.clone())
            .collect();
        for id in &pending {
            enter(Phase::Pending, id);
        }

        let mut polled = self
            .poller
            .await_all(&pending, |id: String| async move { self.fetch_snapshot(&id).await })
            .await
            .into_iter();

        let mut completed = Vec::with_capacity(transactions.len());
        for tx in transactions {
            if tx.is_terminal() {
                completed.push(tx);
                continue;
            }
            match polled.next() {
                Some(result) => completed.push(result?),
                None => {
                    return Err(SuiteError::Precondition(format!(
                        "no poll result for {}",
                        tx.transaction_id
                    )))
                }
            }
        }
        Ok(completed)
    }

    /// Submit, wait for a terminal status and fill in fields the service did not echo.
    pub async fn submit_and_complete(&self, request: &TransactionRequest) -> Result<Transaction> {
        let submission = self.submit(request).await?;
        let completed = self.complete(submission.transaction).await?;
        Ok(with_request_echo(completed, request))
    }

    async fn current_wallet(&self) -> Result<Wallet> {
        self.client.get_wallet(&self.session.wallet_id).await
    }

    // ========================================================================
    // SCENARIOS
    // ========================================================================

    /// TC01: credit submission shape, status pattern and detail echo
    pub async fn credit_transaction(&self) -> Result<String> {
        let fx = &self.fixtures.scenarios.credit_transaction;
        let expected = &fx.expected_response;

        let submission = self.submit(&fx.transaction).await?;
        ensure_fields("credit response", &submission.body, &expected.properties)?;
        ensure(
            validate_response_time(submission.elapsed, self.config.request_timeout),
            "credit submit response time",
            format!("<= {}ms", self.config.request_timeout.as_millis()),
            format!("{}ms", submission.elapsed.as_millis()),
        )?;

        let tx = &submission.transaction;
        ensure(
            expected.statuses.contains(&tx.status),
            "credit status",
            join(&expected.statuses),
            tx.status,
        )?;
        if tx.status == TransactionStatus::Finished {
            ensure_outcome_in("credit outcome", tx, &expected.outcomes)?;
        }

        let fetched = self
            .client
            .get_transaction(&self.session.wallet_id, &tx.transaction_id)
            .await?;
        ensure(
            fetched.transaction_id == tx.transaction_id,
            "credit detail id",
            &tx.transaction_id,
            &fetched.transaction_id,
        )?;
        ensure_echo("credit detail", &fetched, &fx.transaction)?;
        enter(Phase::Asserted, &tx.transaction_id);

        Ok(format!(
            "{} {} credit accepted with status {}",
            fx.transaction.amount, fx.transaction.currency, tx.status
        ))
    }

    /// TC02: debit after a completed credit reaches the expected outcome
    pub async fn debit_with_prior_credit(&self) -> Result<String> {
        let fx = &self.fixtures.scenarios.debit_with_prior_credit;

        let setup = self.submit_and_complete(&fx.setup_transaction).await?;
        ensure(
            setup.outcome == Some(Outcome::Approved),
            "setup credit outcome",
            Outcome::Approved,
            display_outcome(setup.outcome),
        )?;

        let debit = self.submit_and_complete(&fx.main_transaction).await?;
        ensure(
            debit.status == TransactionStatus::Finished,
            "debit status",
            TransactionStatus::Finished,
            debit.status,
        )?;
        ensure(
            debit.outcome == Some(fx.expected_outcome),
            "debit outcome",
            fx.expected_outcome,
            display_outcome(debit.outcome),
        )?;
        enter(Phase::Asserted, &debit.transaction_id);

        Ok(format!(
            "debit {} {} {} after credit {}",
            fx.main_transaction.amount,
            fx.main_transaction.currency,
            fx.expected_outcome,
            setup.transaction_id
        ))
    }

    /// TC03: a pending transaction gains outcome and updatedAt once terminal
    pub async fn pending_completion(&self) -> Result<String> {
        let fx = &self.fixtures.scenarios.pending_completion;
        let expected = &fx.expected_response;

        let submission = self.submit(&fx.transaction).await?;
        let initial_properties: Vec<&String> = expected
            .properties
            .iter()
            .filter(|name| name.as_str() != "updatedAt")
            .collect();
        ensure_fields("pending submit response", &submission.body, &initial_properties)?;

        let was_pending = !submission.transaction.is_terminal();
        let completed = self.complete(submission.transaction).await?;

        if let Some(final_status) = expected.final_status {
            ensure(
                completed.status == final_status,
                "final status",
                final_status,
                completed.status,
            )?;
        }
        ensure_outcome_in("final outcome", &completed, &expected.outcomes)?;
        let updated_at = completed.updated_at.as_deref().unwrap_or_default();
        ensure(
            is_valid_timestamp(updated_at),
            "final updatedAt",
            "ISO-8601 timestamp",
            updated_at,
        )?;

        let detail = self
            .client
            .get_transaction_response(&self.session.wallet_id, &completed.transaction_id, true)
            .await?;
        ensure_fields("completed transaction detail", &detail.body, &expected.properties)?;
        let fetched: Transaction = detail.json()?;
        ensure_echo("completed transaction detail", &fetched, &fx.transaction)?;
        enter(Phase::Asserted, &completed.transaction_id);

        Ok(format!(
            "{} reached {} ({}){}",
            completed.transaction_id,
            completed.status,
            display_outcome(completed.outcome),
            if was_pending { " after polling" } else { "" }
        ))
    }

    /// TC04: one transaction per currency, joined, then clips checked
    pub async fn multi_currency(&self) -> Result<String> {
        let fx = &self.fixtures.scenarios.multi_currency;
        let requests = fx.requests();

        let submissions = join_all(requests.iter().map(|request| self.submit(request))).await;
        let submitted = submissions
            .into_iter()
            .map(|s| s.map(|s| s.transaction))
            .collect::<Result<Vec<_>>>()?;

        let completed: Vec<Transaction> = self
            .complete_all(submitted)
            .await?
            .into_iter()
            .zip(&requests)
            .map(|(tx, request)| with_request_echo(tx, request))
            .collect();

        let response = self
            .client
            .get_wallet_response(&self.session.wallet_id, true)
            .await?;
        let wallet: Wallet = response.json()?;
        ensure(
            wallet.currency_clips.len() >= fx.expected_wallet.min_clips,
            "currency clip count",
            format!(">= {}", fx.expected_wallet.min_clips),
            wallet.currency_clips.len(),
        )?;

        let raw_clips = response
            .body
            .get("currencyClips")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut approved = Vec::new();
        for tx in completed.iter().filter(|tx| tx.is_approved()) {
            let currency = tx.currency.as_deref().unwrap_or_default();
            let context = format!("currency clip {}", currency);
            let clip = wallet
                .clip(currency)
                .ok_or_else(|| SuiteError::assertion(&context, "present", "missing"))?;

            let raw = raw_clips
                .iter()
                .find(|c| c.get("currency").and_then(Value::as_str) == Some(currency));
            let missing = match raw {
                Some(raw) => missing_fields(raw, &fx.expected_wallet.clip_properties),
                None => fx.expected_wallet.clip_properties.clone(),
            };
            ensure(
                missing.is_empty(),
                &format!("{} properties", context),
                join(&fx.expected_wallet.clip_properties),
                format!("missing {}", missing.join(", ")),
            )?;
            ensure(clip.balance > 0.0, &format!("{} balance", context), "> 0", clip.balance)?;
            ensure(
                clip.transaction_count > 0,
                &format!("{} transactionCount", context),
                "> 0",
                clip.transaction_count,
            )?;
            enter(Phase::Asserted, &tx.transaction_id);
            approved.push(currency.to_string());
        }

        Ok(format!(
            "{} clip(s); approved in {}",
            wallet.currency_clips.len(),
            if approved.is_empty() {
                "no currency".to_string()
            } else {
                approved.join(", ")
            }
        ))
    }

    /// TC05: every invalid payload is rejected with an error status
    pub async fn input_validation(&self) -> Result<String> {
        let fx = &self.fixtures.scenarios.input_validation;

        for (name, payload) in &fx.invalid_transactions {
            let response = self
                .client
                .submit_transaction(&self.session.wallet_id, payload, false)
                .await?;
            debug!("[SCENARIO] invalid payload '{}' -> {}", name, response.status);
            ensure(
                is_error_status(response.status, fx.error_status_floor),
                &format!("status for invalid payload '{}'", name),
                format!(">= {}", fx.error_status_floor),
                response.status,
            )?;
        }

        Ok(format!(
            "{} invalid payloads rejected (including {} and {})",
            fx.invalid_transactions.len(),
            InputValidationFixture::ZERO_AMOUNT,
            InputValidationFixture::NEGATIVE_AMOUNT
        ))
    }

    /// TC06: the clip balance follows the projection of approved transactions
    pub async fn balance_consistency(&self) -> Result<String> {
        let fx = &self.fixtures.scenarios.balance_consistency;

        let initial_balance = self.current_wallet().await?.balance_of(&fx.currency);
        debug!("[SCENARIO] initial {} balance {}", fx.currency, initial_balance);

        // Submitted in order, then awaited together
        let mut submitted = Vec::with_capacity(fx.transactions.len());
        for request in &fx.transactions {
            submitted.push(self.submit(request).await?.transaction);
        }
        let completed: Vec<Transaction> = self
            .complete_all(submitted)
            .await?
            .into_iter()
            .zip(&fx.transactions)
            .map(|(tx, request)| with_request_echo(tx, request))
            .collect();

        let actual_balance = self.current_wallet().await?.balance_of(&fx.currency);
        let report = BalanceProjector::with_tolerance(fx.tolerance).reconcile(
            &fx.currency,
            initial_balance,
            &completed,
            actual_balance,
        )?;
        info!("[SCENARIO] {}", report.summary());

        ensure(
            report.is_balanced(),
            &format!("{} balance (tolerance {})", fx.currency, fx.tolerance),
            report.projected_balance,
            report.actual_balance,
        )?;
        ensure(
            actual_balance >= fx.min_balance,
            &format!("{} minimum balance", fx.currency),
            format!(">= {}", fx.min_balance),
            actual_balance,
        )?;
        for tx in &completed {
            enter(Phase::Asserted, &tx.transaction_id);
        }

        Ok(report.summary())
    }

    /// TC07: paginated history and today's date window
    pub async fn transaction_history(&self) -> Result<String> {
        let fx = &self.fixtures.scenarios.transaction_history;
        let created = self.submit_and_complete(&fx.transaction).await?;

        let response = self
            .client
            .list_transactions(&self.session.wallet_id, &fx.pagination.to_query())
            .await?;
        ensure(
            validate_status_code(response.status, StatusCategory::Success),
            "history status",
            "2xx",
            response.status,
        )?;
        let missing = missing_fields(&response.body, &fx.expected_properties);
        ensure(
            missing.is_empty(),
            "history page properties",
            join(&fx.expected_properties),
            format!("missing {}", missing.join(", ")),
        )?;

        let page: TransactionPage = response.json()?;
        ensure(
            page.current_page == fx.pagination.page,
            "history currentPage",
            fx.pagination.page,
            page.current_page,
        )?;
        ensure(page.total_count > 0, "history totalCount", "> 0", page.total_count)?;

        let today = today_date_range();
        let filtered = self.history_within(&today).await?;

        // Today's window sits inside the last week, so the week can only hold more
        let week = date_range(7, 1);
        let weekly = self.history_within(&week).await?;
        ensure(
            weekly.total_count >= filtered.total_count,
            "history totalCount over the last week",
            format!(">= {} (today)", filtered.total_count),
            weekly.total_count,
        )?;
        enter(Phase::Asserted, &created.transaction_id);

        Ok(format!(
            "page {} of {} transaction(s); {} created today, {} this week",
            page.current_page,
            page.total_count,
            filtered.transactions.len(),
            weekly.total_count
        ))
    }

    /// First history page filtered to `range`, every entry checked against it
    async fn history_within(&self, range: &DateRange) -> Result<TransactionPage> {
        let (start_date, end_date) = range.to_iso();
        let query = HistoryQuery {
            start_date: Some(start_date),
            end_date: Some(end_date),
            ..Default::default()
        };
        let page: TransactionPage = self
            .client
            .list_transactions(&self.session.wallet_id, &query)
            .await?
            .json()?;

        for tx in &page.transactions {
            let context = format!("createdAt of {}", tx.transaction_id);
            let instant = parse_timestamp(&tx.created_at)
                .ok_or_else(|| SuiteError::assertion(&context, "ISO-8601 timestamp", &tx.created_at))?;
            ensure(
                range.contains(instant),
                &context,
                format!("within {} .. {}", range.start, range.end),
                &tx.created_at,
            )?;
        }
        Ok(page)
    }

    /// TC08: never-issued wallet and transaction ids yield error statuses
    pub async fn not_found(&self) -> Result<String> {
        let floor = self.fixtures.scenarios.error_handling.error_status_floor;

        let unknown_wallet = generate_identifier();
        let response = self.client.get_wallet_response(&unknown_wallet, false).await?;
        ensure(
            is_error_status(response.status, floor),
            "status for unknown wallet",
            format!(">= {}", floor),
            response.status,
        )?;
        let wallet_status = response.status;

        let unknown_transaction = generate_identifier();
        let response = self
            .client
            .get_transaction_response(&self.session.wallet_id, &unknown_transaction, false)
            .await?;
        ensure(
            is_error_status(response.status, floor),
            "status for unknown transaction",
            format!(">= {}", floor),
            response.status,
        )?;

        Ok(format!(
            "unknown wallet -> {}, unknown transaction -> {}",
            wallet_status, response.status
        ))
    }
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

/// Identifier and timestamp format plus the pending/terminal field invariant
fn check_snapshot(tx: &Transaction) -> Result<()> {
    ensure(
        is_valid_identifier(&tx.transaction_id),
        "transactionId format",
        "UUID",
        &tx.transaction_id,
    )?;
    ensure(
        is_valid_timestamp(&tx.created_at),
        "createdAt format",
        "ISO-8601 timestamp",
        &tx.created_at,
    )?;

    match tx.status {
        TransactionStatus::Pending => {
            ensure(
                tx.outcome.is_none(),
                "outcome while pending",
                "absent",
                display_outcome(tx.outcome),
            )?;
            ensure(
                tx.updated_at.is_none(),
                "updatedAt while pending",
                "absent",
                tx.updated_at.as_deref().unwrap_or_default(),
            )
        }
        TransactionStatus::Finished => {
            ensure(tx.outcome.is_some(), "outcome once finished", "present", "absent")?;
            ensure(tx.updated_at.is_some(), "updatedAt once finished", "present", "absent")
        }
        TransactionStatus::Failed => Ok(()),
    }
}

fn ensure_fields(context: &str, body: &Value, required: &[impl AsRef<str>]) -> Result<()> {
    if has_required_fields(body, required) {
        return Ok(());
    }

    let mut missing = missing_fields(body, BASE_TRANSACTION_FIELDS);
    for name in missing_fields(body, required) {
        if !missing.contains(&name) {
            missing.push(name);
        }
    }
    Err(SuiteError::assertion(
        format!("{} fields", context),
        "all required fields",
        format!("missing {}", missing.join(", ")),
    ))
}

fn ensure_outcome_in(context: &str, tx: &Transaction, allowed: &[Outcome]) -> Result<()> {
    ensure(
        tx.outcome.map_or(false, |o| allowed.contains(&o)),
        context,
        join(allowed),
        display_outcome(tx.outcome),
    )
}

/// Detail responses must echo what was submitted
fn ensure_echo(context: &str, tx: &Transaction, request: &TransactionRequest) -> Result<()> {
    ensure(
        tx.currency.as_deref() == Some(request.currency.as_str()),
        &format!("{} currency", context),
        &request.currency,
        tx.currency.as_deref().unwrap_or("<absent>"),
    )?;
    ensure(
        tx.amount
            .map_or(false, |a| is_balance_within_tolerance(a, request.amount, ECHO_AMOUNT_TOLERANCE)),
        &format!("{} amount", context),
        request.amount,
        tx.amount.map_or_else(|| "<absent>".to_string(), |a| a.to_string()),
    )?;
    ensure(
        tx.transaction_type == Some(request.transaction_type),
        &format!("{} type", context),
        request.transaction_type,
        tx.transaction_type.map_or("<absent>", |t| t.as_str()),
    )
}

/// Submit responses may omit currency, amount and type; take them from the request
pub fn with_request_echo(mut tx: Transaction, request: &TransactionRequest) -> Transaction {
    tx.currency.get_or_insert_with(|| request.currency.clone());
    tx.amount.get_or_insert(request.amount);
    tx.transaction_type.get_or_insert(request.transaction_type);
    tx
}

fn display_outcome(outcome: Option<Outcome>) -> &'static str {
    outcome.map_or("<absent>", |o| o.as_str())
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

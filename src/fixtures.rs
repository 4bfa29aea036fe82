// 🧾 Fixtures - typed scenario inputs, validated at load time
//
// A malformed fixture fails here with a message naming the field, never
// later as a confusing assertion mismatch.

use crate::constants::{DEFAULT_ERROR_STATUS_FLOOR, MAX_VALID_AMOUNT, MIN_VALID_AMOUNT};
use crate::error::{Result, SuiteError};
use crate::model::{HistoryQuery, Outcome, TransactionRequest, TransactionStatus, TransactionType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

const BUILTIN_FIXTURES: &str = include_str!("../fixtures/wallet.json");

// ============================================================================
// SUITE SETTINGS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FixtureSettings {
    #[serde(default)]
    pub default_headers: BTreeMap<String, String>,
    pub timeouts: Timeouts,
    pub retry_config: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Timeouts {
    pub api_response_ms: u64,
    pub transaction_completion_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RetryConfig {
    pub retry_delay_ms: u64,
    pub max_attempts: u32,
}

// ============================================================================
// SCENARIO INPUTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExpectedTransactionShape {
    /// Properties beyond transactionId/status/createdAt
    #[serde(default)]
    pub properties: Vec<String>,
    #[serde(default)]
    pub statuses: Vec<TransactionStatus>,
    #[serde(default)]
    pub final_status: Option<TransactionStatus>,
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreditFixture {
    pub transaction: TransactionRequest,
    pub expected_response: ExpectedTransactionShape,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DebitFixture {
    pub setup_transaction: TransactionRequest,
    pub main_transaction: TransactionRequest,
    pub expected_outcome: Outcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PendingFixture {
    pub transaction: TransactionRequest,
    pub expected_response: ExpectedTransactionShape,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransactionTemplate {
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExpectedWallet {
    pub min_clips: usize,
    pub clip_properties: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MultiCurrencyFixture {
    pub currencies: Vec<String>,
    pub template: TransactionTemplate,
    pub expected_wallet: ExpectedWallet,
}

impl MultiCurrencyFixture {
    pub fn requests(&self) -> Vec<TransactionRequest> {
        self.currencies
            .iter()
            .map(|currency| {
                TransactionRequest::new(currency, self.template.amount, self.template.transaction_type)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InputValidationFixture {
    /// Raw payloads; they are deliberately not valid requests
    pub invalid_transactions: BTreeMap<String, Value>,
    #[serde(default = "default_error_floor")]
    pub error_status_floor: u16,
}

impl InputValidationFixture {
    pub const ZERO_AMOUNT: &'static str = "zeroAmount";
    pub const NEGATIVE_AMOUNT: &'static str = "negativeAmount";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BalanceFixture {
    pub currency: String,
    pub transactions: Vec<TransactionRequest>,
    pub tolerance: f64,
    pub min_balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Pagination {
    pub page: u32,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl Pagination {
    pub fn to_query(&self) -> HistoryQuery {
        HistoryQuery {
            page: Some(self.page),
            page_size: self.page_size,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistoryFixture {
    pub transaction: TransactionRequest,
    pub pagination: Pagination,
    pub expected_properties: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ErrorHandlingFixture {
    #[serde(default = "default_error_floor")]
    pub error_status_floor: u16,
}

fn default_error_floor() -> u16 {
    DEFAULT_ERROR_STATUS_FLOOR
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScenarioFixtures {
    pub credit_transaction: CreditFixture,
    pub debit_with_prior_credit: DebitFixture,
    pub pending_completion: PendingFixture,
    pub multi_currency: MultiCurrencyFixture,
    pub input_validation: InputValidationFixture,
    pub balance_consistency: BalanceFixture,
    pub transaction_history: HistoryFixture,
    pub error_handling: ErrorHandlingFixture,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Fixtures {
    pub configuration: FixtureSettings,
    pub scenarios: ScenarioFixtures,
}

// ============================================================================
// LOADING
// ============================================================================

impl Fixtures {
    /// Fixture set shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_FIXTURES)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SuiteError::Fixture(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let fixtures: Fixtures = serde_json::from_str(raw)
            .map_err(|e| SuiteError::Fixture(format!("malformed fixture JSON: {}", e)))?;
        fixtures.validate()?;
        Ok(fixtures)
    }

    pub fn validate(&self) -> Result<()> {
        let settings = &self.configuration;
        if settings.retry_config.max_attempts == 0 {
            return fixture_error("configuration.retryConfig.maxAttempts must be at least 1");
        }
        if settings.timeouts.transaction_completion_ms == 0 {
            return fixture_error("configuration.timeouts.transactionCompletionMs must be positive");
        }

        let s = &self.scenarios;
        check_request("creditTransaction.transaction", &s.credit_transaction.transaction)?;
        check_shape(
            "creditTransaction.expectedResponse",
            &s.credit_transaction.expected_response,
        )?;
        if s.credit_transaction.expected_response.statuses.is_empty() {
            return fixture_error("creditTransaction.expectedResponse.statuses must not be empty");
        }

        check_request(
            "debitWithPriorCredit.setupTransaction",
            &s.debit_with_prior_credit.setup_transaction,
        )?;
        check_request(
            "debitWithPriorCredit.mainTransaction",
            &s.debit_with_prior_credit.main_transaction,
        )?;
        let debit = &s.debit_with_prior_credit;
        if debit.setup_transaction.transaction_type != TransactionType::Credit
            || debit.main_transaction.transaction_type != TransactionType::Debit
        {
            return fixture_error("debitWithPriorCredit needs a credit setup and a debit main transaction");
        }
        if debit.setup_transaction.currency != debit.main_transaction.currency {
            return fixture_error("debitWithPriorCredit transactions must share a currency");
        }

        check_request("pendingCompletion.transaction", &s.pending_completion.transaction)?;
        check_shape(
            "pendingCompletion.expectedResponse",
            &s.pending_completion.expected_response,
        )?;
        if s.pending_completion.expected_response.final_status.is_none() {
            return fixture_error("pendingCompletion.expectedResponse.finalStatus is required");
        }

        let multi = &s.multi_currency;
        if multi.currencies.is_empty() {
            return fixture_error("multiCurrency.currencies must not be empty");
        }
        let unique: HashSet<&String> = multi.currencies.iter().collect();
        if unique.len() != multi.currencies.len() {
            return fixture_error("multiCurrency.currencies must not repeat");
        }
        for (i, request) in multi.requests().iter().enumerate() {
            check_request(&format!("multiCurrency.currencies[{}]", i), request)?;
        }
        if multi.expected_wallet.clip_properties.is_empty() {
            return fixture_error("multiCurrency.expectedWallet.clipProperties must not be empty");
        }

        let input = &s.input_validation;
        for key in [InputValidationFixture::ZERO_AMOUNT, InputValidationFixture::NEGATIVE_AMOUNT] {
            if !input.invalid_transactions.contains_key(key) {
                return fixture_error(&format!("inputValidation.invalidTransactions.{} is required", key));
            }
        }
        check_floor("inputValidation.errorStatusFloor", input.error_status_floor)?;

        let balance = &s.balance_consistency;
        check_currency("balanceConsistency.currency", &balance.currency)?;
        if balance.transactions.is_empty() {
            return fixture_error("balanceConsistency.transactions must not be empty");
        }
        for (i, request) in balance.transactions.iter().enumerate() {
            let field = format!("balanceConsistency.transactions[{}]", i);
            check_request(&field, request)?;
            if request.currency != balance.currency {
                return fixture_error(&format!("{} must use {}", field, balance.currency));
            }
        }
        if !(balance.tolerance >= 0.0) {
            return fixture_error("balanceConsistency.tolerance must be non-negative");
        }

        let history = &s.transaction_history;
        check_request("transactionHistory.transaction", &history.transaction)?;
        if history.pagination.page == 0 {
            return fixture_error("transactionHistory.pagination.page starts at 1");
        }

        check_floor("errorHandling.errorStatusFloor", s.error_handling.error_status_floor)?;
        Ok(())
    }
}

fn fixture_error<T>(message: &str) -> Result<T> {
    Err(SuiteError::Fixture(message.to_string()))
}

fn check_currency(field: &str, currency: &str) -> Result<()> {
    let well_formed = currency.len() == 3 && currency.chars().all(|c| c.is_ascii_uppercase());
    if well_formed {
        Ok(())
    } else {
        fixture_error(&format!("{}: '{}' is not a currency code", field, currency))
    }
}

fn check_request(field: &str, request: &TransactionRequest) -> Result<()> {
    check_currency(&format!("{}.currency", field), &request.currency)?;
    if !(MIN_VALID_AMOUNT..=MAX_VALID_AMOUNT).contains(&request.amount) {
        return fixture_error(&format!(
            "{}.amount {} is outside {}..={}",
            field, request.amount, MIN_VALID_AMOUNT, MAX_VALID_AMOUNT
        ));
    }
    Ok(())
}

fn check_shape(field: &str, shape: &ExpectedTransactionShape) -> Result<()> {
    if shape.outcomes.is_empty() {
        return fixture_error(&format!("{}.outcomes must not be empty", field));
    }
    Ok(())
}

fn check_floor(field: &str, floor: u16) -> Result<()> {
    if (400..600).contains(&floor) {
        Ok(())
    } else {
        fixture_error(&format!("{} must be an error status (400-599), got {}", field, floor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_fixtures_load() {
        let fixtures = Fixtures::builtin().unwrap();
        let s = &fixtures.scenarios;

        assert_eq!(s.multi_currency.requests().len(), 3);
        assert_eq!(s.balance_consistency.currency, "USD");
        assert_eq!(s.debit_with_prior_credit.expected_outcome, Outcome::Approved);
        assert_eq!(
            s.pending_completion.expected_response.final_status,
            Some(TransactionStatus::Finished)
        );
        assert!(s
            .input_validation
            .invalid_transactions
            .contains_key(InputValidationFixture::ZERO_AMOUNT));
        assert_eq!(
            fixtures.configuration.default_headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        println!("✅ Built-in fixtures validated");
    }

    fn builtin_value() -> Value {
        serde_json::from_str(BUILTIN_FIXTURES).unwrap()
    }

    fn load_value(value: &Value) -> Result<Fixtures> {
        Fixtures::from_json(&value.to_string())
    }

    #[test]
    fn test_unknown_field_fails_fast() {
        let mut value = builtin_value();
        value["scenarios"]["errorHandling"]["minStatus"] = Value::from(400);
        let err = load_value(&value).unwrap_err();
        assert!(matches!(err, SuiteError::Fixture(_)));
        assert!(err.to_string().contains("minStatus"));
    }

    #[test]
    fn test_non_positive_template_amount_rejected() {
        let mut value = builtin_value();
        value["scenarios"]["creditTransaction"]["transaction"]["amount"] = Value::from(0);
        let err = load_value(&value).unwrap_err();
        assert!(err.to_string().contains("creditTransaction.transaction.amount"));
    }

    #[test]
    fn test_unknown_outcome_rejected() {
        let mut value = builtin_value();
        value["scenarios"]["debitWithPriorCredit"]["expectedOutcome"] = Value::from("maybe");
        assert!(load_value(&value).is_err());
    }

    #[test]
    fn test_missing_zero_amount_payload_rejected() {
        let mut value = builtin_value();
        value["scenarios"]["inputValidation"]["invalidTransactions"]
            .as_object_mut()
            .unwrap()
            .remove("zeroAmount");
        let err = load_value(&value).unwrap_err();
        assert!(err.to_string().contains("zeroAmount"));
    }

    #[test]
    fn test_error_floor_must_be_error_status() {
        let mut value = builtin_value();
        value["scenarios"]["errorHandling"]["errorStatusFloor"] = Value::from(200);
        assert!(load_value(&value).is_err());
    }

    #[test]
    fn test_balance_transactions_must_share_currency() {
        let mut value = builtin_value();
        value["scenarios"]["balanceConsistency"]["transactions"][1]["currency"] = Value::from("EUR");
        let err = load_value(&value).unwrap_err();
        assert!(err.to_string().contains("balanceConsistency.transactions[1]"));
    }

    #[test]
    fn test_error_floor_defaults_to_400() {
        let mut value = builtin_value();
        value["scenarios"]["errorHandling"]
            .as_object_mut()
            .unwrap()
            .remove("errorStatusFloor");
        let fixtures = load_value(&value).unwrap();
        assert_eq!(
            fixtures.scenarios.error_handling.error_status_floor,
            DEFAULT_ERROR_STATUS_FLOOR
        );
    }

    #[test]
    fn test_repeated_currencies_rejected() {
        let mut value = builtin_value();
        value["scenarios"]["multiCurrency"]["currencies"] = serde_json::json!(["USD", "USD"]);
        assert!(load_value(&value).is_err());
    }
}

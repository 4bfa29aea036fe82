// 📋 Suite Report - per-scenario pass/fail with timing

use crate::error::SuiteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ============================================================================
// SCENARIO IDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScenarioId {
    #[serde(rename = "TC01")]
    Credit,
    #[serde(rename = "TC02")]
    DebitWithPriorCredit,
    #[serde(rename = "TC03")]
    PendingCompletion,
    #[serde(rename = "TC04")]
    MultiCurrency,
    #[serde(rename = "TC05")]
    InputValidation,
    #[serde(rename = "TC06")]
    BalanceConsistency,
    #[serde(rename = "TC07")]
    TransactionHistory,
    #[serde(rename = "TC08")]
    NotFound,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 8] = [
        ScenarioId::Credit,
        ScenarioId::DebitWithPriorCredit,
        ScenarioId::PendingCompletion,
        ScenarioId::MultiCurrency,
        ScenarioId::InputValidation,
        ScenarioId::BalanceConsistency,
        ScenarioId::TransactionHistory,
        ScenarioId::NotFound,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ScenarioId::Credit => "TC01",
            ScenarioId::DebitWithPriorCredit => "TC02",
            ScenarioId::PendingCompletion => "TC03",
            ScenarioId::MultiCurrency => "TC04",
            ScenarioId::InputValidation => "TC05",
            ScenarioId::BalanceConsistency => "TC06",
            ScenarioId::TransactionHistory => "TC07",
            ScenarioId::NotFound => "TC08",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ScenarioId::Credit => "Credit transaction",
            ScenarioId::DebitWithPriorCredit => "Debit with prior credit",
            ScenarioId::PendingCompletion => "Pending transaction completion",
            ScenarioId::MultiCurrency => "Multi-currency wallet",
            ScenarioId::InputValidation => "Input validation",
            ScenarioId::BalanceConsistency => "Balance consistency",
            ScenarioId::TransactionHistory => "Transaction history",
            ScenarioId::NotFound => "Not-found handling",
        }
    }

    /// Accepts `TC04`, `tc4` or `4`
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix("TC")
            .or_else(|| trimmed.strip_prefix("tc"))
            .unwrap_or(trimmed);
        let n: usize = digits.parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.title())
    }
}

// ============================================================================
// RESULTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub id: ScenarioId,
    pub passed: bool,
    pub message: String,
    /// `SuiteError::kind` of the failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    pub duration_ms: u64,
}

impl ScenarioResult {
    pub fn pass(id: ScenarioId, message: impl Into<String>, duration: Duration) -> Self {
        ScenarioResult {
            id,
            passed: true,
            message: message.into(),
            error_kind: None,
            duration_ms: duration.as_millis() as u64,
        }
    }

    pub fn fail(id: ScenarioId, error: &SuiteError, duration: Duration) -> Self {
        ScenarioResult {
            id,
            passed: false,
            message: error.to_string(),
            error_kind: Some(error.kind().to_string()),
            duration_ms: duration.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteReport {
    pub results: Vec<ScenarioResult>,
}

impl SuiteReport {
    pub fn push(&mut self, result: ScenarioResult) {
        self.results.push(result);
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.results.iter().map(|r| r.duration_ms).sum()
    }

    pub fn get(&self, id: ScenarioId) -> Option<&ScenarioResult> {
        self.results.iter().find(|r| r.id == id)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} scenarios: {} passed, {} failed ({}ms)",
            self.results.len(),
            self.passed_count(),
            self.failed_count(),
            self.total_duration_ms()
        )
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            let mark = if result.passed { "✅" } else { "❌" };
            writeln!(
                f,
                "{} {} ({}ms) {}",
                mark, result.id, result.duration_ms, result.message
            )?;
        }
        write!(f, "{}", self.summary())
    }
}

// 🚨 Suite Errors - one taxonomy for every scenario failure
//
// Assertion failures, transport failures, poll exhaustion and precondition
// violations stay distinct so a report can tell "the service is wrong" apart
// from "the network is down" and "the transaction never finished".

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SuiteError {
    /// An observed value violates a contract
    #[error("assertion failed ({context}): expected {expected}, got {actual}")]
    Assertion {
        context: String,
        expected: String,
        actual: String,
    },

    /// Network-level failure reported by the HTTP client
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response on a request that required success
    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// Response body did not match the expected model
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Transaction still not terminal after the poll budget ran out
    #[error(
        "transaction {transaction_id} still pending after {attempts} attempts ({}ms)",
        elapsed.as_millis()
    )]
    PollTimeout {
        transaction_id: String,
        attempts: u32,
        elapsed: Duration,
    },

    /// Whole scenario exceeded its time bound
    #[error("scenario {scenario} exceeded {}ms", elapsed.as_millis())]
    ScenarioTimeout { scenario: String, elapsed: Duration },

    /// Caller handed a component input it must never receive
    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("invalid fixture: {0}")]
    Fixture(String),
}

impl SuiteError {
    pub fn assertion(
        context: impl Into<String>,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        SuiteError::Assertion {
            context: context.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn is_poll_timeout(&self) -> bool {
        matches!(self, SuiteError::PollTimeout { .. })
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, SuiteError::Assertion { .. })
    }

    /// Short category label used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            SuiteError::Assertion { .. } => "assertion",
            SuiteError::Transport(_) => "transport",
            SuiteError::UnexpectedStatus { .. } => "unexpected_status",
            SuiteError::Decode(_) => "decode",
            SuiteError::PollTimeout { .. } => "poll_timeout",
            SuiteError::ScenarioTimeout { .. } => "scenario_timeout",
            SuiteError::Precondition(_) => "precondition",
            SuiteError::Fixture(_) => "fixture",
        }
    }
}

pub type Result<T> = std::result::Result<T, SuiteError>;

/// Fail with an `Assertion` error unless `condition` holds.
pub fn ensure(
    condition: bool,
    context: &str,
    expected: impl std::fmt::Display,
    actual: impl std::fmt::Display,
) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(SuiteError::assertion(context, expected, actual))
    }
}

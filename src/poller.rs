// ⏳ Completion Poller - wait for a transaction to leave `pending`
//
// Two states: Awaiting -> Done. Every loop is bounded twice, by an attempt
// budget and by a wall-clock deadline, and exhausting either one raises
// `SuiteError::PollTimeout`. Fetch errors propagate untouched; retrying the
// transport is the HTTP client's business, not the poller's.

use crate::error::{Result, SuiteError};
use crate::model::Transaction;
use futures_util::future::join_all;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

// ============================================================================
// POLL CONFIG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause between two fetches
    pub delay: Duration,
    /// Maximum number of fetches, including the first one
    pub max_attempts: u32,
    /// Upper bound on the whole loop
    pub deadline: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            delay: Duration::from_millis(1000),
            max_attempts: 30,
            deadline: Duration::from_millis(30_000),
        }
    }
}

// ============================================================================
// COMPLETION POLLER
// ============================================================================

#[derive(Debug, Clone)]
pub struct CompletionPoller {
    config: PollConfig,
}

impl CompletionPoller {
    pub fn new(config: PollConfig) -> Self {
        CompletionPoller { config }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Fetch `transaction_id` until its status is terminal.
    ///
    /// `fetch` returns the current snapshot; it is called once per attempt.
    pub async fn await_completion<F, Fut>(&self, transaction_id: &str, mut fetch: F) -> Result<Transaction>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Transaction>>,
    {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        let polling = async {
            loop {
                attempts += 1;

                let snapshot = fetch().await?;
                if snapshot.transaction_id != transaction_id {
                    return Err(SuiteError::assertion(
                        "polled transaction id",
                        transaction_id,
                        &snapshot.transaction_id,
                    ));
                }

                if snapshot.is_terminal() {
                    debug!(
                        "[POLL] {} reached '{}' after {} attempt(s)",
                        transaction_id, snapshot.status, attempts
                    );
                    return Ok(snapshot);
                }

                if attempts >= self.config.max_attempts {
                    return Err(SuiteError::PollTimeout {
                        transaction_id: transaction_id.to_string(),
                        attempts,
                        elapsed: started.elapsed(),
                    });
                }

                debug!(
                    "[POLL] {} still '{}' (attempt {}/{}), retrying in {}ms",
                    transaction_id,
                    snapshot.status,
                    attempts,
                    self.config.max_attempts,
                    self.config.delay.as_millis()
                );
                tokio::time::sleep(self.config.delay).await;
            }
        };

        let outcome = tokio::time::timeout(self.config.deadline, polling).await;
        match outcome {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "[POLL] {} hit the {}ms deadline after {} attempt(s)",
                    transaction_id,
                    self.config.deadline.as_millis(),
                    attempts
                );
                Err(SuiteError::PollTimeout {
                    transaction_id: transaction_id.to_string(),
                    attempts,
                    elapsed: started.elapsed(),
                })
            }
        }
    }

    /// Poll every id concurrently and wait for all of them.
    ///
    /// Each loop is independent; results come back in the order of `ids`.
    pub async fn await_all<F, Fut>(&self, ids: &[String], fetch: F) -> Vec<Result<Transaction>>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<Transaction>>,
    {
        if ids.is_empty() {
            return Vec::new();
        }

        info!("[POLL] Awaiting {} transaction(s)", ids.len());
        let fetch = &fetch;
        let loops = ids
            .iter()
            .map(|id| self.await_completion(id, move || fetch(id.clone())));

        join_all(loops).await
    }
}

impl Default for CompletionPoller {
    fn default() -> Self {
        Self::new(PollConfig::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================

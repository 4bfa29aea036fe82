// ⚖️ Balance Projector - replay completed transactions onto a starting balance
//
// Following the formula:
//   initial_balance + approved_credits - approved_debits = expected_balance
//
// Denied transactions never move the balance. Only terminal transactions may
// be projected; callers guard with `ensure_terminal` first.

use crate::error::{Result, SuiteError};
use crate::model::{Transaction, TransactionType};
use serde::{Deserialize, Serialize};

// ============================================================================
// PROJECTION
// ============================================================================

/// Order-dependent fold: approved credits add, approved debits subtract,
/// everything else leaves the accumulator unchanged.
pub fn project_balance(initial_balance: f64, transactions: &[Transaction]) -> f64 {
    transactions.iter().fold(initial_balance, |balance, tx| {
        if !tx.is_approved() {
            return balance;
        }
        match (tx.transaction_type, tx.amount) {
            (Some(TransactionType::Credit), Some(amount)) => balance + amount,
            (Some(TransactionType::Debit), Some(amount)) => balance - amount,
            _ => balance,
        }
    })
}

/// Reject any non-terminal transaction before it reaches the projector
pub fn ensure_terminal(transactions: &[Transaction]) -> Result<()> {
    match transactions.iter().find(|tx| !tx.is_terminal()) {
        Some(tx) => Err(SuiteError::Precondition(format!(
            "transaction {} is still {} and cannot be projected",
            tx.transaction_id, tx.status
        ))),
        None => Ok(()),
    }
}

// ============================================================================
// RECONCILIATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReconciliationResult {
    /// Service balance matches the projection within tolerance
    Balanced { expected_balance: f64, actual_balance: f64 },

    /// Service balance is off by more than the tolerance
    Discrepancy {
        expected_balance: f64,
        actual_balance: f64,
        difference: f64,
        tolerance: f64,
    },
}

impl ReconciliationResult {
    pub fn is_balanced(&self) -> bool {
        matches!(self, ReconciliationResult::Balanced { .. })
    }

    pub fn difference(&self) -> f64 {
        match self {
            ReconciliationResult::Balanced { .. } => 0.0,
            ReconciliationResult::Discrepancy { difference, .. } => *difference,
        }
    }
}

// ============================================================================
// BALANCE REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceReport {
    pub currency: String,
    pub initial_balance: f64,
    pub approved_credits: f64,
    pub approved_debits: f64,
    pub denied_count: usize,
    pub projected_balance: f64,
    pub actual_balance: f64,
    pub result: ReconciliationResult,
}

impl BalanceReport {
    pub fn is_balanced(&self) -> bool {
        self.result.is_balanced()
    }

    pub fn summary(&self) -> String {
        format!(
            "Balance {}: initial {:.4}, +{:.4} credits, -{:.4} debits ({} denied), projected {:.4}, actual {:.4}, difference {:.4}",
            self.currency,
            self.initial_balance,
            self.approved_credits,
            self.approved_debits,
            self.denied_count,
            self.projected_balance,
            self.actual_balance,
            self.result.difference()
        )
    }
}

// ============================================================================
// BALANCE PROJECTOR
// ============================================================================

pub struct BalanceProjector {
    /// Tolerance for floating-point comparisons
    pub tolerance: f64,
}

impl BalanceProjector {
    pub fn new() -> Self {
        BalanceProjector {
            tolerance: crate::constants::DEFAULT_BALANCE_TOLERANCE,
        }
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        BalanceProjector { tolerance }
    }

    /// Project `transactions` onto `initial_balance` and compare against the
    /// balance the service reports for `currency`.
    ///
    /// Transactions in other currencies are ignored.
    pub fn reconcile(
        &self,
        currency: &str,
        initial_balance: f64,
        transactions: &[Transaction],
        actual_balance: f64,
    ) -> Result<BalanceReport> {
        ensure_terminal(transactions)?;

        let relevant: Vec<Transaction> = transactions
            .iter()
            .filter(|tx| tx.currency.as_deref().map_or(true, |c| c == currency))
            .cloned()
            .collect();

        let approved_credits = self.sum_approved(&relevant, TransactionType::Credit);
        let approved_debits = self.sum_approved(&relevant, TransactionType::Debit);
        let denied_count = relevant.iter().filter(|tx| !tx.is_approved()).count();

        let projected_balance = project_balance(initial_balance, &relevant);
        let difference = (actual_balance - projected_balance).abs();

        let result = if difference <= self.tolerance {
            ReconciliationResult::Balanced {
                expected_balance: projected_balance,
                actual_balance,
            }
        } else {
            ReconciliationResult::Discrepancy {
                expected_balance: projected_balance,
                actual_balance,
                difference,
                tolerance: self.tolerance,
            }
        };

        Ok(BalanceReport {
            currency: currency.to_string(),
            initial_balance,
            approved_credits,
            approved_debits,
            denied_count,
            projected_balance,
            actual_balance,
            result,
        })
    }

    fn sum_approved(&self, transactions: &[Transaction], kind: TransactionType) -> f64 {
        transactions
            .iter()
            .filter(|tx| tx.is_approved() && tx.transaction_type == Some(kind))
            .filter_map(|tx| tx.amount)
            .sum()
    }
}

impl Default for BalanceProjector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Outcome, TransactionStatus};

    fn finished(kind: TransactionType, amount: f64, outcome: Outcome) -> Transaction {
        Transaction {
            transaction_id: uuid::Uuid::new_v4().to_string(),
            status: TransactionStatus::Finished,
            outcome: Some(outcome),
            transaction_type: Some(kind),
            currency: Some("USD".to_string()),
            amount: Some(amount),
            created_at: "2024-01-15T10:30:00Z".to_string(),
            updated_at: Some("2024-01-15T10:30:01Z".to_string()),
        }
    }

    #[test]
    fn test_credit_then_debit_projects_sixty() {
        let credit = finished(TransactionType::Credit, 100.0, Outcome::Approved);
        let debit = finished(TransactionType::Debit, 40.0, Outcome::Approved);

        assert_eq!(project_balance(0.0, &[credit, debit]), 60.0);
        println!("✅ 0 + 100 - 40 = 60");
    }

    #[test]
    fn test_denied_entries_never_affect_result() {
        let approved = vec![
            finished(TransactionType::Credit, 250.0, Outcome::Approved),
            finished(TransactionType::Debit, 75.5, Outcome::Approved),
            finished(TransactionType::Credit, 10.25, Outcome::Approved),
        ];
        let denied = finished(TransactionType::Debit, 999.0, Outcome::Denied);
        let expected = project_balance(20.0, &approved);

        for position in 0..=approved.len() {
            let mut sequence = approved.clone();
            sequence.insert(position, denied.clone());
            assert_eq!(project_balance(20.0, &sequence), expected);
        }
        assert_eq!(expected, 20.0 + 250.0 - 75.5 + 10.25);
    }

    #[test]
    fn test_empty_sequence_returns_initial() {
        assert_eq!(project_balance(42.5, &[]), 42.5);
    }

    #[test]
    fn test_ensure_terminal_rejects_pending() {
        let mut pending = finished(TransactionType::Credit, 5.0, Outcome::Approved);
        pending.status = TransactionStatus::Pending;
        pending.outcome = None;

        let err = ensure_terminal(&[pending.clone()]).unwrap_err();
        assert!(matches!(err, SuiteError::Precondition(_)));
        assert!(err.to_string().contains(&pending.transaction_id));

        let projector = BalanceProjector::new();
        assert!(projector.reconcile("USD", 0.0, &[pending], 5.0).is_err());
    }

    #[test]
    fn test_reconcile_balanced() {
        let projector = BalanceProjector::new();
        let transactions = vec![
            finished(TransactionType::Credit, 100.0, Outcome::Approved),
            finished(TransactionType::Debit, 40.0, Outcome::Approved),
            finished(TransactionType::Debit, 500.0, Outcome::Denied),
        ];

        let report = projector
            .reconcile("USD", 10.0, &transactions, 70.00001)
            .unwrap();

        assert!(report.is_balanced());
        assert_eq!(report.approved_credits, 100.0);
        assert_eq!(report.approved_debits, 40.0);
        assert_eq!(report.denied_count, 1);
        assert_eq!(report.projected_balance, 70.0);

        println!("✅ {}", report.summary());
    }

    #[test]
    fn test_reconcile_discrepancy() {
        let projector = BalanceProjector::with_tolerance(0.01);
        let transactions = vec![finished(TransactionType::Credit, 100.0, Outcome::Approved)];

        let report = projector.reconcile("USD", 0.0, &transactions, 95.0).unwrap();

        assert!(!report.is_balanced());
        assert!((report.result.difference() - 5.0).abs() < 1e-9);
        assert!(matches!(report.result, ReconciliationResult::Discrepancy { .. }));
    }

    #[test]
    fn test_reconcile_ignores_other_currencies() {
        let projector = BalanceProjector::new();
        let mut eur = finished(TransactionType::Credit, 30.0, Outcome::Approved);
        eur.currency = Some("EUR".to_string());
        let usd = finished(TransactionType::Credit, 12.0, Outcome::Approved);

        let report = projector.reconcile("USD", 0.0, &[eur, usd], 12.0).unwrap();
        assert!(report.is_balanced());
        assert_eq!(report.approved_credits, 12.0);
    }
}

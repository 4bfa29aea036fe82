// Wallet API Suite - Core Library
// End-to-end checks for a wallet/transaction service: bounded completion
// polling, balance projection and response-shape validation

pub mod error;
pub mod model;
pub mod constants;
pub mod validation;     // Shape Layer - identifiers, timestamps, status codes
pub mod generators;
pub mod projection;     // Balance projection + reconciliation
pub mod poller;         // Bounded completion polling
pub mod endpoints;
pub mod client;
pub mod config;
pub mod fixtures;
pub mod report;
pub mod scenarios;      // Scenario orchestrator (TC01-TC08)

#[cfg(feature = "server")]
pub mod fake_service;

// Re-export commonly used types
pub use error::{Result, SuiteError};
pub use model::{
    Credentials, CurrencyClip, HistoryQuery, LoginResponse, Outcome,
    Transaction, TransactionPage, TransactionRequest, TransactionStatus,
    TransactionType, UserProfile, Wallet,
};
pub use validation::{
    has_required_fields, is_valid_identifier, is_valid_timestamp,
    StatusCategory,
};
pub use projection::{
    project_balance, BalanceProjector, BalanceReport, ReconciliationResult,
};
pub use poller::{CompletionPoller, PollConfig};
pub use endpoints::Endpoints;
pub use client::{ApiRequest, ApiResponse, HttpClient, WalletClient};
pub use config::{Environment, SuiteConfig};
pub use fixtures::Fixtures;
pub use report::{ScenarioId, ScenarioResult, SuiteReport};
pub use scenarios::{Session, SuiteContext};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 📌 Test Constants - literal values shared by fixtures, generators and scenarios

pub const SUPPORTED_CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "CAD", "JPY", "AUD", "CHF"];
pub const UNSUPPORTED_CURRENCIES: &[&str] = &["INVALID", "XXX", "123", "ABC"];

pub const VALID_TRANSACTION_TYPES: &[&str] = &["credit", "debit"];
pub const INVALID_TRANSACTION_TYPES: &[&str] = &["invalid", "transfer", "withdraw", "deposit"];

pub const MIN_VALID_AMOUNT: f64 = 0.01;
pub const MAX_VALID_AMOUNT: f64 = 999_999.99;
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Codes a transaction submission may return when accepted
pub const ACCEPTED_SUBMIT_STATUSES: &[u16] = &[200, 201, 202];

/// Lowest status code counted as an error response
pub const DEFAULT_ERROR_STATUS_FLOOR: u16 = 400;

pub const DEFAULT_BALANCE_TOLERANCE: f64 = 0.0001;

/// Fields every transaction representation carries
pub const BASE_TRANSACTION_FIELDS: &[&str] = &["transactionId", "status", "createdAt"];

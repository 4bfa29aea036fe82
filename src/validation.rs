// 📐 Shape Layer - Response Validation
// Pure predicates over identifiers, timestamps, response shapes and status codes

use crate::constants::{ACCEPTED_SUBMIT_STATUSES, BASE_TRANSACTION_FIELDS};
use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;

static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("identifier pattern compiles")
});

static TIMESTAMP_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("timestamp pattern compiles")
});

// ============================================================================
// IDENTIFIERS & TIMESTAMPS
// ============================================================================

/// Canonical 8-4-4-4-12 UUID text with version 1-5 and RFC 4122 variant.
pub fn is_valid_identifier(s: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(s)
}

/// Parse a service timestamp into a UTC instant.
///
/// Accepts RFC 3339 (`2024-01-15T10:30:00Z`, `...+02:00`) and naive
/// date-times with optional fractional seconds, which are read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if !TIMESTAMP_PREFIX.is_match(s) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Prefix must look like `YYYY-MM-DDTHH:MM:SS` AND the whole string must parse.
/// `2024-13-01T00:00:00` matches the prefix but is rejected.
pub fn is_valid_timestamp(s: &str) -> bool {
    parse_timestamp(s).is_some()
}

// ============================================================================
// RESPONSE SHAPE
// ============================================================================

/// True iff `entity` is an object holding `transactionId`, `status`,
/// `createdAt` and every name in `required`. Values are not inspected.
pub fn has_required_fields(entity: &Value, required: &[impl AsRef<str>]) -> bool {
    let Some(object) = entity.as_object() else {
        return false;
    };

    BASE_TRANSACTION_FIELDS
        .iter()
        .copied()
        .chain(required.iter().map(|name| name.as_ref()))
        .all(|name| object.contains_key(name))
}

/// Names from `required` the object lacks (for assertion messages)
pub fn missing_fields(entity: &Value, required: &[impl AsRef<str>]) -> Vec<String> {
    let object = entity.as_object();
    required
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| object.map_or(true, |o| !o.contains_key(*name)))
        .map(str::to_string)
        .collect()
}

// ============================================================================
// STATUS CODES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    /// 200, 201, 202, 204
    Success,
    /// 400..500
    ClientError,
    /// 500..600
    ServerError,
}

pub fn validate_status_code(status: u16, category: StatusCategory) -> bool {
    match category {
        StatusCategory::Success => matches!(status, 200 | 201 | 202 | 204),
        StatusCategory::ClientError => (400..500).contains(&status),
        StatusCategory::ServerError => (500..600).contains(&status),
    }
}

pub fn is_accepted_submission(status: u16) -> bool {
    ACCEPTED_SUBMIT_STATUSES.contains(&status)
}

pub fn is_error_status(status: u16, floor: u16) -> bool {
    status >= floor
}

pub fn validate_response_time(elapsed: Duration, max_acceptable: Duration) -> bool {
    elapsed <= max_acceptable
}

// ============================================================================
// BALANCES
// ============================================================================

pub fn is_balance_within_tolerance(actual: f64, expected: f64, tolerance: f64) -> bool {
    (actual - expected).abs() <= tolerance
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_identifiers_are_valid() {
        for _ in 0..100 {
            let id = uuid::Uuid::new_v4().to_string();
            assert!(is_valid_identifier(&id), "generated id rejected: {}", id);
        }
        assert!(is_valid_identifier("3F1C2B4A-9D8E-4F7A-8B6C-5D4E3F2A1B0C"));
        println!("✅ Generated identifiers validate");
    }

    #[test]
    fn test_identifier_without_version_or_variant_is_rejected() {
        // version nibble 0
        assert!(!is_valid_identifier("3f1c2b4a-9d8e-0f7a-8b6c-5d4e3f2a1b0c"));
        // variant nibble c
        assert!(!is_valid_identifier("3f1c2b4a-9d8e-4f7a-cb6c-5d4e3f2a1b0c"));
        // no hyphens
        assert!(!is_valid_identifier("3f1c2b4a9d8e4f7a8b6c5d4e3f2a1b0c"));
        assert!(!is_valid_identifier("not-a-uuid"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn test_timestamp_validation() {
        assert!(is_valid_timestamp("2024-01-15T10:30:00"));
        assert!(is_valid_timestamp("2024-01-15T10:30:00Z"));
        assert!(is_valid_timestamp("2024-01-15T10:30:00.123Z"));
        assert!(is_valid_timestamp("2024-01-15T10:30:00+02:00"));

        // prefix matches, parse fails
        assert!(!is_valid_timestamp("2024-13-01T00:00:00"));
        assert!(!is_valid_timestamp("2024-02-30T00:00:00"));
        // prefix does not match
        assert!(!is_valid_timestamp("15/01/2024 10:30"));
        assert!(!is_valid_timestamp("2024-01-15"));
    }

    #[test]
    fn test_parse_timestamp_offsets_to_utc() {
        let parsed = parse_timestamp("2024-01-15T12:30:00+02:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-15T10:30:00+00:00");
    }

    #[test]
    fn test_has_required_fields() {
        let tx = json!({
            "transactionId": "x",
            "status": "pending",
            "createdAt": "2024-01-15T10:30:00Z",
            "currency": null
        });

        assert!(has_required_fields(&tx, &[] as &[&str]));
        assert!(has_required_fields(&tx, &["currency"]));
        assert!(!has_required_fields(&tx, &["currency", "amount"]));
        assert!(!has_required_fields(&json!({"status": "pending"}), &[] as &[&str]));
        assert!(!has_required_fields(&json!([1, 2]), &[] as &[&str]));

        assert_eq!(missing_fields(&tx, &["amount", "currency"]), vec!["amount".to_string()]);
    }

    #[test]
    fn test_status_categories() {
        assert!(validate_status_code(204, StatusCategory::Success));
        assert!(!validate_status_code(203, StatusCategory::Success));
        assert!(validate_status_code(404, StatusCategory::ClientError));
        assert!(!validate_status_code(500, StatusCategory::ClientError));
        assert!(validate_status_code(503, StatusCategory::ServerError));

        assert!(is_accepted_submission(202));
        assert!(!is_accepted_submission(204));
        assert!(is_error_status(400, 400));
        assert!(!is_error_status(399, 400));
    }

    #[test]
    fn test_tolerance_and_response_time() {
        assert!(is_balance_within_tolerance(60.00005, 60.0, 0.0001));
        assert!(!is_balance_within_tolerance(60.01, 60.0, 0.0001));
        assert!(validate_response_time(
            Duration::from_millis(200),
            Duration::from_secs(5)
        ));
        assert!(!validate_response_time(
            Duration::from_secs(6),
            Duration::from_secs(5)
        ));
    }
}

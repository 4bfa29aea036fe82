// 🎲 Data Generators - identifiers, amounts, requests and date windows

use crate::model::{TransactionRequest, TransactionType};
use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

const GENERATED_CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "CAD"];

/// Random v4 identifier, used for resources the service never issued
pub fn generate_identifier() -> String {
    Uuid::new_v4().to_string()
}

/// Random amount in `[min, max)` rounded to `decimals` places
pub fn generate_random_amount(min: f64, max: f64, decimals: u32) -> f64 {
    let raw = if max > min {
        rand::thread_rng().gen_range(min..max)
    } else {
        min
    };
    round_to(raw, decimals)
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Random credit/debit request in one of the common currencies.
/// Override fields with struct update syntax where a scenario needs fixed values.
pub fn generate_transaction_request() -> TransactionRequest {
    let mut rng = rand::thread_rng();
    let currency = GENERATED_CURRENCIES
        .choose(&mut rng)
        .copied()
        .unwrap_or("USD");
    let transaction_type = if rng.gen_bool(0.5) {
        TransactionType::Credit
    } else {
        TransactionType::Debit
    };

    TransactionRequest::new(currency, generate_random_amount(1.0, 1000.0, 2), transaction_type)
}

// ============================================================================
// DATE RANGES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// ISO strings for the `startDate` / `endDate` query parameters
    pub fn to_iso(&self) -> (String, String) {
        (
            self.start.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            self.end.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        )
    }
}

/// Local midnight through 23:59:59.999 today, expressed in UTC
pub fn today_date_range() -> DateRange {
    let today = Local::now().date_naive();
    let start_naive = today.and_time(NaiveTime::MIN);
    let end_naive = today.and_time(
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN),
    );

    // DST gaps fall back to the earliest valid instant
    let start = Local
        .from_local_datetime(&start_naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| start_naive.and_utc());
    let end = Local
        .from_local_datetime(&end_naive)
        .latest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| end_naive.and_utc());

    DateRange { start, end }
}

/// From `days_ago` days before now until `days_from_now` days after now
pub fn date_range(days_ago: i64, days_from_now: i64) -> DateRange {
    let now = Utc::now();
    DateRange {
        start: now - Duration::days(days_ago),
        end: now + Duration::days(days_from_now),
    }
}

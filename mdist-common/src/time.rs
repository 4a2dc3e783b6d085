//! Timestamp utilities

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current calendar date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Earliest release date accepted when submitting on `today`
pub fn earliest_release_date(today: NaiveDate, min_lead_days: u32) -> NaiveDate {
    today + Duration::days(i64::from(min_lead_days))
}

/// Parse an RFC 3339 timestamp stored as TEXT
pub fn parse_timestamp(value: &str) -> crate::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| crate::Error::Internal(format!("Failed to parse timestamp {}: {}", value, e)))
}

/// Parse an ISO 8601 calendar date (YYYY-MM-DD) stored as TEXT
pub fn parse_date(value: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| crate::Error::Internal(format!("Failed to parse date {}: {}", value, e)))
}

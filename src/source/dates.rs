use chrono::{DateTime, NaiveDate, Utc};

/// Parse a signal date from RFC 3339, `YYYY-MM-DD`, or `MM/DD/YYYY`.
///
/// Timestamps keep only their UTC calendar date. Returns `None` when parsing fails.
pub fn parse_signal_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Some(timestamp) = parse_timestamp(raw) {
        return Some(timestamp.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%m/%d/%Y") {
        return Some(date);
    }
    None
}

/// Parse an RFC 3339 timestamp (e.g. `2025-03-02T14:05:00.000Z`) into UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

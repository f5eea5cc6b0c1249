use chrono::{DateTime, Duration, SubsecRound, Utc};

/// Format used for timestamps persisted as text. Fixed width, so lexical
/// order matches chronological order.
pub const STORAGE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Current instant truncated to the precision the store keeps.
pub fn now_truncated() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn to_storage_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(STORAGE_TIMESTAMP_FORMAT).to_string()
}

pub fn parse_storage_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

/// `now - lookback`, saturating at the earliest representable instant.
pub fn cutoff_before(now: DateTime<Utc>, lookback: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(lookback)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

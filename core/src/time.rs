//! Time related utils.

use chrono::Utc;

/// DateTime is the UTC timestamp type used across docsign.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a new DateTime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Seconds elapsed since the unix epoch, the unit of the `exp` and `iat` claims.
#[inline]
pub fn unix_seconds(time: DateTime) -> i64 {
    time.timestamp()
}

/// Parse a unix timestamp in seconds back into a DateTime.
pub fn from_unix_seconds(secs: i64) -> Option<DateTime> {
    DateTime::from_timestamp(secs, 0)
}

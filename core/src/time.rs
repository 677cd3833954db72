//! Time related utils.

use crate::Error;
use chrono::SecondsFormat;
use chrono::Timelike;
use chrono::Utc;

/// DateTime in UTC used across sasgen.
pub type DateTime = chrono::DateTime<Utc>;

/// Return the current time in UTC.
pub fn now() -> DateTime {
    Utc::now()
}

/// Drop the sub-second part of a time, keeping whole seconds.
///
/// Signed token expiries carry second precision only.
pub fn truncate_seconds(t: DateTime) -> DateTime {
    // SAFETY: zero nanoseconds is always in range
    t.with_nanosecond(0).expect("in bounds")
}

/// Format time into RFC 3339 with second precision: `2022-03-01T08:12:34Z`
pub fn format_rfc3339(t: DateTime) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse time from RFC 3339.
///
/// All of them are valid time:
///
/// - `2022-03-01T08:12:34Z`
/// - `2022-03-01T08:12:34.123Z`
/// - `2022-03-01T08:12:34+00:00`
pub fn parse_rfc3339(s: &str) -> crate::Result<DateTime> {
    let t = chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| Error::unexpected("parsing rfc3339 time failed").with_source(e))?;
    Ok(t.with_timezone(&Utc))
}

/// Format time into http date: `Sun, 06 Nov 1994 08:49:37 GMT`
///
/// ## Note
///
/// HTTP date is slightly different from RFC 2822: timezone is fixed to `GMT`.
pub fn format_http_date(t: DateTime) -> String {
    t.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

//! Time related utils.
//!
//! Every formatter here is a pure function of its input instant: there is no
//! process-wide formatter, locale or time zone involved. All output is UTC.

use crate::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{TimeZone, Utc};

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Date-only stamp used in credential scopes: "20220313"
pub const DATE: &str = "%Y%m%d";

/// Basic ISO 8601 timestamp used in `x-amz-date`: "20220313T072004Z"
pub const ISO8601: &str = "%Y%m%dT%H%M%SZ";

/// Create a new DateTime from now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format `time` as a UTC string in `pattern`.
///
/// `pattern` uses strftime syntax. An invalid pattern yields an empty string
/// instead of panicking.
pub fn format(time: DateTime, pattern: &str) -> String {
    let items = StrftimeItems::new(pattern).collect::<Vec<_>>();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return String::new();
    }

    time.format_with_items(items.into_iter()).to_string()
}

/// Format time into date: "20220301"
pub fn format_date(t: DateTime) -> String {
    format(t, DATE)
}

/// Format time into ISO 8601: "20220313T072004Z"
pub fn format_iso8601(t: DateTime) -> String {
    format(t, ISO8601)
}

/// Parse a RFC 3339 string into time.
pub fn parse_rfc3339(s: &str) -> Result<DateTime> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|v| v.with_timezone(&Utc))
        .map_err(|e| Error::unexpected(format!("parse '{s}' into rfc3339 failed")).with_source(e))
}

/// Convert epoch seconds (possibly fractional) into time.
pub fn from_epoch_seconds(secs: f64) -> Result<DateTime> {
    if !secs.is_finite() {
        return Err(Error::unexpected(format!(
            "epoch seconds {secs} is not a finite number"
        )));
    }

    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    Utc.timestamp_opt(whole as i64, nanos.min(999_999_999))
        .single()
        .ok_or_else(|| Error::unexpected(format!("epoch seconds {secs} is out of range")))
}

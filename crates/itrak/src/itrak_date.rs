//! Reconstructs observation timestamps from the feed's `time` and `date`
//! fields.
//!
//! iTRAK drops leading zeros from the hour, so `time:93015` means 09:30:15 and
//! `time:0` means midnight. The time is padded back to `HHMMSS` before parsing.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::Result;
use crate::error::Error;

/// Width of a complete `time:HHMMSS` field.
pub const TIME_WIDTH: usize = 11;

const TIME_LABEL: &str = "time:";
const DATE_LABEL: &str = "date:";
const FORMAT: &str = "date:%m%d%Y time:%H%M%S";

/// Left-pad the digits of a `time:` field with zeros up to [`TIME_WIDTH`].
///
/// Fields already at or beyond the full width are returned unchanged.
///
/// # Errors
///
/// Returns `Error::InvalidTimestamp` if `field` lacks the `time:` label.
pub fn pad_time(field: &str) -> Result<String> {
    let Some(digits) = field.strip_prefix(TIME_LABEL) else {
        return Err(Error::InvalidTimestamp(format!("missing time label: {field}")));
    };
    let width = TIME_WIDTH - TIME_LABEL.len();
    Ok(format!("{TIME_LABEL}{digits:0>width$}"))
}

/// Parse label-prefixed `time:` and `date:` fields into a UTC timestamp.
///
/// # Errors
///
/// Returns `Error::InvalidTimestamp` if either field is malformed or names an
/// impossible date or time.
pub fn timestamp(time: &str, date: &str) -> Result<DateTime<Utc>> {
    if !date.starts_with(DATE_LABEL) {
        return Err(Error::InvalidTimestamp(format!("missing date label: {date}")));
    }
    let combined = format!("{date} {}", pad_time(time)?);
    let naive = NaiveDateTime::parse_from_str(&combined, FORMAT)
        .map_err(|e| Error::InvalidTimestamp(format!("{combined}: {e}")))?;
    Ok(naive.and_utc())
}

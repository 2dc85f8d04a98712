use tracing::warn;

/// Marks the end of each vehicle record in the feed.
pub const DELIMITER: &str = "eof";

/// Split a feed payload into vehicle records.
///
/// The text after the final delimiter is never a record and is discarded.
#[must_use]
pub fn split_records(payload: &str) -> Vec<&str> {
    let mut records: Vec<&str> = payload.split(DELIMITER).collect();
    records.pop();

    if records.len() <= 1 {
        warn!(records = records.len(), "found no vehicles delineated by '{DELIMITER}'");
    }
    records
}

use chrono::NaiveDate;

use crate::constants::{DATED_COLUMN_DATE_FORMAT, DATED_COLUMN_PREFIX};

/// Name of the shares-held column for a snapshot ingested on `date`.
///
/// The first ingestion of a day gets `Shares Held (YYYY-MM-DD)`. Later ones
/// on the same day are suffixed (`Shares Held (YYYY-MM-DD #2)`, `#3`, ...)
/// so an earlier column is never overwritten.
pub fn dated_column_name(existing: &[String], date: NaiveDate) -> String {
    let day = date.format(DATED_COLUMN_DATE_FORMAT).to_string();
    let base = format!("{}{})", DATED_COLUMN_PREFIX, day);
    if !existing.iter().any(|c| *c == base) {
        return base;
    }

    (2u32..)
        .map(|n| format!("{}{} #{})", DATED_COLUMN_PREFIX, day, n))
        .find(|candidate| !existing.iter().any(|c| c == candidate))
        .unwrap_or(base)
}

pub fn is_dated_column(name: &str) -> bool {
    name.starts_with(DATED_COLUMN_PREFIX) && name.ends_with(')')
}

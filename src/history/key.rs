use chrono::NaiveDate;

use crate::date::{format_date, parse_date};

const SEPARATOR: char = '_';

/// Lower-case and join whitespace-separated words with `_`.
fn normalize_segment(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Identity of a competition in the history ledger: `date_location_discipline`.
///
/// Capitalization and spacing differences in location or discipline map to
/// the same key.
pub fn history_key(date: NaiveDate, location: &str, discipline: &str) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        format_date(date),
        normalize_segment(location),
        normalize_segment(discipline),
        sep = SEPARATOR
    )
}

/// Date embedded at the front of a history key, if it parses.
pub fn key_date(key: &str) -> Option<NaiveDate> {
    let date_part = key.split(SEPARATOR).next()?;
    parse_date(date_part).ok()
}

//! Competition dates are written `DD/MM/YYYY` everywhere: on the
//! registration site, in history keys and in configuration.

use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `#[serde(with = "crate::date::dd_mm_yyyy")]` for `NaiveDate` fields.
pub mod dd_mm_yyyy {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(|e| {
            serde::de::Error::custom(format!("invalid date '{}', expected DD/MM/YYYY: {}", raw, e))
        })
    }
}

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Regional committee identifier.
///
/// Declaration order is the fixed iteration order used wherever a
/// deterministic ordering over committees is needed (candidate lists,
/// tie-breaks, summaries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommitteeCode {
    Eq,
    Cne,
    Sa,
    Mb,
    Ap,
    Da,
    Ors,
    Apex,
    Mv,
    Mj,
    Pe,
    If,
    Ca,
    Au,
}

impl CommitteeCode {
    pub const ALL: [CommitteeCode; 14] = [
        CommitteeCode::Eq,
        CommitteeCode::Cne,
        CommitteeCode::Sa,
        CommitteeCode::Mb,
        CommitteeCode::Ap,
        CommitteeCode::Da,
        CommitteeCode::Ors,
        CommitteeCode::Apex,
        CommitteeCode::Mv,
        CommitteeCode::Mj,
        CommitteeCode::Pe,
        CommitteeCode::If,
        CommitteeCode::Ca,
        CommitteeCode::Au,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitteeCode::Eq => "EQ",
            CommitteeCode::Cne => "CNE",
            CommitteeCode::Sa => "SA",
            CommitteeCode::Mb => "MB",
            CommitteeCode::Ap => "AP",
            CommitteeCode::Da => "DA",
            CommitteeCode::Ors => "ORS",
            CommitteeCode::Apex => "APEX",
            CommitteeCode::Mv => "MV",
            CommitteeCode::Mj => "MJ",
            CommitteeCode::Pe => "PE",
            CommitteeCode::If => "IF",
            CommitteeCode::Ca => "CA",
            CommitteeCode::Au => "AU",
        }
    }
}

impl fmt::Display for CommitteeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitteeCode {
    type Err = ValidationError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        CommitteeCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::UnknownCommittee {
                code: trimmed.to_string(),
            })
    }
}

impl Serialize for CommitteeCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CommitteeCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

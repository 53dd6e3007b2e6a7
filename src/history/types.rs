use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::key::key_date;
use crate::assign::Run;
use crate::committee::CommitteeCode;

/// Committee that traced each run of one competition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAssignments {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manche1: Option<CommitteeCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manche2: Option<CommitteeCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manche3: Option<CommitteeCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manche4: Option<CommitteeCode>,
}

impl RunAssignments {
    pub fn get(&self, run: Run) -> Option<CommitteeCode> {
        match run {
            Run::First => self.manche1,
            Run::Second => self.manche2,
            Run::Third => self.manche3,
            Run::Fourth => self.manche4,
        }
    }

    pub fn set(&mut self, run: Run, committee: Option<CommitteeCode>) {
        match run {
            Run::First => self.manche1 = committee,
            Run::Second => self.manche2 = committee,
            Run::Third => self.manche3 = committee,
            Run::Fourth => self.manche4 = committee,
        }
    }

    /// True if the committee won one of the drawn runs (2 or 4).
    pub fn drew(&self, committee: CommitteeCode) -> bool {
        Run::DRAWN
            .iter()
            .any(|run| self.get(*run) == Some(committee))
    }

    /// Number of drawn runs the committee won in this competition.
    pub fn drawn_count(&self, committee: CommitteeCode) -> u32 {
        Run::DRAWN
            .iter()
            .filter(|run| self.get(**run) == Some(committee))
            .count() as u32
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub traceurs: RunAssignments,
}

/// Inclusive date window bounding which history records count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Season {
    #[serde(with = "crate::date::dd_mm_yyyy")]
    pub start: NaiveDate,
    #[serde(with = "crate::date::dd_mm_yyyy")]
    pub end: NaiveDate,
}

impl Season {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Ledger statistics for one committee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommitteeHistory {
    pub committee: CommitteeCode,
    pub occurrences: u32,
    pub competitions_since_last_trace: u32,
}

/// Season-long assignment history, always ordered by competition date.
///
/// Records whose key carries no parseable date sort after all others.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStore {
    records: Vec<(String, HistoryRecord)>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&HistoryRecord> {
        self.records
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, record)| record)
    }

    /// Records in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HistoryRecord)> {
        self.records.iter().map(|(k, record)| (k.as_str(), record))
    }

    /// Insert or replace the record under `key`, then restore date order.
    pub fn upsert(&mut self, key: String, assignments: RunAssignments) {
        let record = HistoryRecord {
            traceurs: assignments,
        };
        match self.records.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = record,
            None => self.records.push((key, record)),
        }
        self.sort();
    }

    fn sort(&mut self) {
        self.records
            .sort_by_key(|(key, _)| key_date(key).unwrap_or(NaiveDate::MAX));
    }

    /// Number of drawn runs the committee has traced across the ledger.
    pub fn occurrences(&self, committee: CommitteeCode) -> u32 {
        self.records
            .iter()
            .map(|(_, record)| record.traceurs.drawn_count(committee))
            .sum()
    }

    /// Competitions recorded after the committee's most recent drawn trace.
    /// A committee that never traced gets the full ledger length.
    pub fn competitions_since_last_trace(&self, committee: CommitteeCode) -> u32 {
        let total = self.records.len();
        let since = match self
            .records
            .iter()
            .rposition(|(_, record)| record.traceurs.drew(committee))
        {
            Some(last) => total - last - 1,
            None => total,
        };
        since as u32
    }

    pub fn committee_history(&self, committee: CommitteeCode) -> CommitteeHistory {
        CommitteeHistory {
            committee,
            occurrences: self.occurrences(committee),
            competitions_since_last_trace: self.competitions_since_last_trace(committee),
        }
    }

    /// Statistics for every known committee, in declaration order.
    pub fn summary(&self) -> Vec<CommitteeHistory> {
        CommitteeCode::ALL
            .iter()
            .map(|code| self.committee_history(*code))
            .collect()
    }

    /// Copy of the ledger without the record under `key`.
    pub fn without(&self, key: &str) -> HistoryStore {
        HistoryStore {
            records: self
                .records
                .iter()
                .filter(|(k, _)| k != key)
                .cloned()
                .collect(),
        }
    }

    /// Copy of the ledger restricted to competitions held inside `season`.
    pub fn within_season(&self, season: &Season) -> HistoryStore {
        HistoryStore {
            records: self
                .records
                .iter()
                .filter(|(k, _)| key_date(k).is_some_and(|date| season.contains(date)))
                .cloned()
                .collect(),
        }
    }
}

impl FromIterator<(String, HistoryRecord)> for HistoryStore {
    fn from_iter<T: IntoIterator<Item = (String, HistoryRecord)>>(iter: T) -> Self {
        let mut store = HistoryStore {
            records: iter.into_iter().collect(),
        };
        store.sort();
        store
    }
}

impl Serialize for HistoryStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for (key, record) in &self.records {
            map.serialize_entry(key, record)?;
        }
        map.end()
    }
}

// Same-day competitions keep their file order, so entries are read in
// sequence rather than through a sorted map.
struct HistoryStoreVisitor;

impl<'de> Visitor<'de> for HistoryStoreVisitor {
    type Value = HistoryStore;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of competition keys to history records")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut records: Vec<(String, HistoryRecord)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, record)) = access.next_entry::<String, HistoryRecord>()? {
            match records.iter_mut().find(|(k, _)| *k == key) {
                Some((_, existing)) => *existing = record,
                None => records.push((key, record)),
            }
        }
        let mut store = HistoryStore { records };
        store.sort();
        Ok(store)
    }
}

impl<'de> Deserialize<'de> for HistoryStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(HistoryStoreVisitor)
    }
}

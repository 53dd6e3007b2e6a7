use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::committee::CommitteeCode;
use crate::history::{history_key, RunAssignments};
use crate::scoring::ScoreBreakdown;

/// One of the four timed runs (manches) of a competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Run {
    First,
    Second,
    Third,
    Fourth,
}

impl Run {
    pub const ALL: [Run; 4] = [Run::First, Run::Second, Run::Third, Run::Fourth];

    /// Runs decided by the weighted draw.
    pub const DRAWN: [Run; 2] = [Run::Second, Run::Fourth];

    pub fn number(&self) -> u8 {
        match self {
            Run::First => 1,
            Run::Second => 2,
            Run::Third => 3,
            Run::Fourth => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Run> {
        Run::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn is_drawn(&self) -> bool {
        Run::DRAWN.contains(self)
    }

    /// The other drawn run, for drawn runs.
    pub fn sibling(&self) -> Option<Run> {
        match self {
            Run::Second => Some(Run::Fourth),
            Run::Fourth => Some(Run::Second),
            _ => None,
        }
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run {}", self.number())
    }
}

impl FromStr for Run {
    type Err = String;

    /// Accepts `2`, `run2` or `manche2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let digits = lower
            .strip_prefix("manche")
            .or_else(|| lower.strip_prefix("run"))
            .unwrap_or(lower.as_str())
            .trim();
        digits
            .parse::<u8>()
            .ok()
            .and_then(Run::from_number)
            .ok_or_else(|| format!("Invalid run '{}': expected 1, 2, 3 or 4", s))
    }
}

/// A committee's standing in one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeEntry {
    pub committee: CommitteeCode,
    pub count: u32,
    pub occurrences: u32,
    pub competitions_since_last_trace: u32,
    /// Final weighted score; absent for runs given to the organizer
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    pub is_picked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunResult {
    /// Run given to the organizing committee without scoring.
    Fixed(CommitteeEntry),
    /// Scored candidates in committee order, exactly one picked.
    Drawn(Vec<CommitteeEntry>),
}

impl RunResult {
    pub fn entries(&self) -> &[CommitteeEntry] {
        match self {
            RunResult::Fixed(entry) => std::slice::from_ref(entry),
            RunResult::Drawn(entries) => entries,
        }
    }

    pub fn picked(&self) -> Option<&CommitteeEntry> {
        self.entries().iter().find(|entry| entry.is_picked)
    }

    pub fn candidate(&self, committee: CommitteeCode) -> Option<&CommitteeEntry> {
        self.entries()
            .iter()
            .find(|entry| entry.committee == committee)
    }
}

impl Serialize for RunResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries().serialize(serializer)
    }
}

/// Metadata identifying one competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    #[serde(with = "crate::date::dd_mm_yyyy")]
    pub date: NaiveDate,
    pub location: String,
    pub discipline: String,
    pub competition_code: String,
    pub organizer: CommitteeCode,
}

impl Competition {
    pub fn history_key(&self) -> String {
        history_key(self.date, &self.location, &self.discipline)
    }
}

/// The four run results of one competition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitionResultSet {
    #[serde(flatten)]
    pub competition: Competition,
    pub manche1: RunResult,
    pub manche2: RunResult,
    pub manche3: RunResult,
    pub manche4: RunResult,
}

impl CompetitionResultSet {
    pub fn run(&self, run: Run) -> &RunResult {
        match run {
            Run::First => &self.manche1,
            Run::Second => &self.manche2,
            Run::Third => &self.manche3,
            Run::Fourth => &self.manche4,
        }
    }

    pub(crate) fn run_mut(&mut self, run: Run) -> &mut RunResult {
        match run {
            Run::First => &mut self.manche1,
            Run::Second => &mut self.manche2,
            Run::Third => &mut self.manche3,
            Run::Fourth => &mut self.manche4,
        }
    }

    pub fn picked(&self, run: Run) -> Option<CommitteeCode> {
        self.run(run).picked().map(|entry| entry.committee)
    }

    /// Picked committee of every run, as recorded in the history ledger.
    pub fn assignments(&self) -> RunAssignments {
        let mut assignments = RunAssignments::default();
        for run in Run::ALL {
            assignments.set(run, self.picked(run));
        }
        assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(committee: CommitteeCode, is_picked: bool) -> CommitteeEntry {
        CommitteeEntry {
            committee,
            count: 1,
            occurrences: 0,
            competitions_since_last_trace: 0,
            percentage: None,
            breakdown: None,
            is_picked,
        }
    }

    #[test]
    fn test_run_numbers() {
        for run in Run::ALL {
            assert_eq!(Run::from_number(run.number()), Some(run));
        }
        assert_eq!(Run::from_number(0), None);
        assert_eq!(Run::from_number(5), None);
    }

    #[test]
    fn test_drawn_runs() {
        assert!(!Run::First.is_drawn());
        assert!(Run::Second.is_drawn());
        assert!(!Run::Third.is_drawn());
        assert!(Run::Fourth.is_drawn());
        assert_eq!(Run::Second.sibling(), Some(Run::Fourth));
        assert_eq!(Run::Third.sibling(), None);
    }

    #[test]
    fn test_parse_run() {
        assert_eq!("2".parse::<Run>().unwrap(), Run::Second);
        assert_eq!("manche4".parse::<Run>().unwrap(), Run::Fourth);
        assert_eq!("Run 3".parse::<Run>().unwrap(), Run::Third);
        assert!("5".parse::<Run>().is_err());
        assert!("deux".parse::<Run>().is_err());
    }

    #[test]
    fn test_run_display() {
        assert_eq!(Run::Fourth.to_string(), "run 4");
    }

    #[test]
    fn test_run_result_picked() {
        let fixed = RunResult::Fixed(entry(CommitteeCode::Sa, true));
        assert_eq!(fixed.picked().unwrap().committee, CommitteeCode::Sa);
        assert_eq!(fixed.entries().len(), 1);

        let drawn = RunResult::Drawn(vec![
            entry(CommitteeCode::Eq, false),
            entry(CommitteeCode::Mb, true),
        ]);
        assert_eq!(drawn.picked().unwrap().committee, CommitteeCode::Mb);
        assert!(drawn.candidate(CommitteeCode::Eq).is_some());
        assert!(drawn.candidate(CommitteeCode::Ca).is_none());
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let json = serde_json::to_value(entry(CommitteeCode::Mj, true)).unwrap();
        assert_eq!(json["committee"], "MJ");
        assert_eq!(json["isPicked"], true);
        assert_eq!(json["competitionsSinceLastTrace"], 0);
        assert!(json["percentage"].is_null());
        assert!(json.get("breakdown").is_none());
    }
}

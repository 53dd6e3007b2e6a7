use serde::{Deserialize, Serialize};

use super::types::{Competition, CompetitionResultSet, CommitteeEntry, Run, RunResult};
use crate::committee::{tally, CommitteeCode, CommitteeCount, TallyConfig};
use crate::error::{Result, SchedulingError};
use crate::history::{HistoryStore, Season};
use crate::scoring::{calculate_score, CommitteeStats, ScoringConfig};

/// Eligibility rules for the drawn runs.
///
/// Example YAML:
/// ```yaml
/// draw:
///   organizer_eligible: true
///   exclusive: false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrawPolicy {
    /// Whether the organizer, which already traces runs 1 and 3, may also
    /// be drawn for runs 2 and 4
    pub organizer_eligible: bool,

    /// Whether the run 2 winner is removed from the run 4 draw
    pub exclusive: bool,
}

impl Default for DrawPolicy {
    fn default() -> Self {
        Self {
            organizer_eligible: true,
            exclusive: false,
        }
    }
}

/// Builds the per-run proposal for a competition.
#[derive(Debug, Clone, Default)]
pub struct RunAssigner {
    scoring: ScoringConfig,
    policy: DrawPolicy,
    season: Option<Season>,
}

impl RunAssigner {
    pub fn new(scoring: ScoringConfig, policy: DrawPolicy) -> Self {
        Self {
            scoring,
            policy,
            season: None,
        }
    }

    /// Only count history inside `season`.
    pub fn with_season(mut self, season: Option<Season>) -> Self {
        self.season = season;
        self
    }

    /// Score the drawn runs and fix the organizer runs.
    ///
    /// Statistics come from `history` as it stood before this competition:
    /// any record already stored under the competition's own key is ignored.
    pub fn propose(
        &self,
        competition: Competition,
        counts: &CommitteeCount,
        history: &HistoryStore,
    ) -> Result<Proposal, SchedulingError> {
        let mut ledger = history.without(&competition.history_key());
        if let Some(season) = &self.season {
            ledger = ledger.within_season(season);
        }

        let organizer = competition.organizer;
        let mut excluded = Vec::new();
        if !self.policy.organizer_eligible {
            excluded.push(organizer);
        }

        let manche2 = self.draw(Run::Second, counts, &ledger, &excluded)?;
        if self.policy.exclusive {
            if let Some(winner) = manche2.iter().find(|entry| entry.is_picked) {
                excluded.push(winner.committee);
            }
        }
        let manche4 = self.draw(Run::Fourth, counts, &ledger, &excluded)?;

        let fixed = self.fixed_entry(organizer, counts, &ledger);
        let result = CompetitionResultSet {
            competition,
            manche1: RunResult::Fixed(fixed.clone()),
            manche2: RunResult::Drawn(manche2),
            manche3: RunResult::Fixed(fixed),
            manche4: RunResult::Drawn(manche4),
        };

        Ok(Proposal {
            result,
            policy: self.policy,
        })
    }

    /// Tally raw registrations (one committee code per competitor) and
    /// propose from the resulting counts.
    pub fn propose_from_registrations<I, S>(
        &self,
        competition: Competition,
        raw_codes: I,
        tally_config: &TallyConfig,
        history: &HistoryStore,
    ) -> Result<Proposal>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let counts = tally(raw_codes, tally_config)?;
        Ok(self.propose(competition, &counts, history)?)
    }

    fn fixed_entry(
        &self,
        organizer: CommitteeCode,
        counts: &CommitteeCount,
        ledger: &HistoryStore,
    ) -> CommitteeEntry {
        let history = ledger.committee_history(organizer);
        CommitteeEntry {
            committee: organizer,
            count: counts.get(&organizer).copied().unwrap_or(0),
            occurrences: history.occurrences,
            competitions_since_last_trace: history.competitions_since_last_trace,
            percentage: None,
            breakdown: None,
            is_picked: true,
        }
    }

    /// Score every eligible committee; the strictly highest score wins and
    /// ties go to the committee declared first.
    fn draw(
        &self,
        run: Run,
        counts: &CommitteeCount,
        ledger: &HistoryStore,
        excluded: &[CommitteeCode],
    ) -> Result<Vec<CommitteeEntry>, SchedulingError> {
        let candidates: Vec<(CommitteeCode, u32)> = counts
            .iter()
            .filter(|(code, _)| !excluded.contains(code))
            .map(|(code, count)| (*code, *count))
            .collect();

        if candidates.is_empty() {
            return Err(SchedulingError::EmptyCandidates { run });
        }

        let total = candidates
            .iter()
            .fold(0u32, |total, (_, count)| total.saturating_add(*count));
        if total == 0 {
            return Err(SchedulingError::ZeroTotal { run });
        }

        let mut entries: Vec<CommitteeEntry> = candidates
            .into_iter()
            .map(|(committee, count)| {
                let history = ledger.committee_history(committee);
                let stats = CommitteeStats {
                    count,
                    occurrences: history.occurrences,
                    competitions_since_last_trace: history.competitions_since_last_trace,
                };
                let result = calculate_score(&stats, total, &self.scoring);
                tracing::debug!(
                    %run,
                    %committee,
                    count,
                    occurrences = stats.occurrences,
                    since = stats.competitions_since_last_trace,
                    score = result.score,
                    "scored candidate"
                );
                CommitteeEntry {
                    committee,
                    count,
                    occurrences: stats.occurrences,
                    competitions_since_last_trace: stats.competitions_since_last_trace,
                    percentage: Some(result.score),
                    breakdown: Some(result.breakdown),
                    is_picked: false,
                }
            })
            .collect();

        let mut winner = 0;
        for (i, entry) in entries.iter().enumerate().skip(1) {
            if entry.percentage > entries[winner].percentage {
                winner = i;
            }
        }
        entries[winner].is_picked = true;

        tracing::info!(
            %run,
            committee = %entries[winner].committee,
            candidates = entries.len(),
            "drew trace committee"
        );
        Ok(entries)
    }
}

/// A proposed assignment awaiting confirmation.
///
/// Overrides may be applied any number of times; `confirm` consumes the
/// proposal so a competition is recorded exactly once.
#[derive(Debug, Clone)]
pub struct Proposal {
    result: CompetitionResultSet,
    policy: DrawPolicy,
}

impl Proposal {
    pub fn result(&self) -> &CompetitionResultSet {
        &self.result
    }

    /// Give a drawn run to another scored candidate. Scores are left as
    /// computed so the proposal still explains the algorithm's choice.
    ///
    /// Candidate pools are fixed at proposal time. Under an exclusive policy
    /// run 4 was scored without run 2's original winner, so overriding run 2
    /// does not make that committee a run 4 candidate; re-propose instead.
    pub fn override_run(
        &mut self,
        run: Run,
        committee: CommitteeCode,
    ) -> Result<&CompetitionResultSet, SchedulingError> {
        let sibling = run.sibling().ok_or(SchedulingError::NotDrawn { run })?;

        if self.result.run(run).candidate(committee).is_none() {
            return Err(SchedulingError::NotACandidate { run, committee });
        }

        if self.policy.exclusive && self.result.picked(sibling) == Some(committee) {
            return Err(SchedulingError::AlreadyPicked { run, committee });
        }

        if let RunResult::Drawn(entries) = self.result.run_mut(run) {
            for entry in entries.iter_mut() {
                entry.is_picked = entry.committee == committee;
            }
        }

        tracing::info!(%run, %committee, "overrode trace committee");
        Ok(&self.result)
    }

    /// Record the proposal in the ledger and hand back the final result.
    pub fn confirm(self, mut history: HistoryStore) -> (CompetitionResultSet, HistoryStore) {
        let key = self.result.competition.history_key();
        history.upsert(key.clone(), self.result.assignments());
        tracing::info!(%key, records = history.len(), "confirmed competition");
        (self.result, history)
    }

    pub fn into_result(self) -> CompetitionResultSet {
        self.result
    }
}

use thiserror::Error;

use crate::assign::Run;
use crate::committee::CommitteeCode;

/// Raised while turning raw registrations into committee counts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown committee code '{code}'")]
    UnknownCommittee { code: String },
}

/// Raised while building or amending the per-run assignment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("{run}: no eligible committee to draw from")]
    EmptyCandidates { run: Run },

    #[error("{run}: candidate counts sum to zero, cannot normalize")]
    ZeroTotal { run: Run },

    #[error("{run} is assigned to the organizer and cannot be overridden")]
    NotDrawn { run: Run },

    #[error("{run}: committee {committee} is not a candidate")]
    NotACandidate { run: Run, committee: CommitteeCode },

    #[error("{run}: committee {committee} already traces the other drawn run")]
    AlreadyPicked { run: Run, committee: CommitteeCode },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

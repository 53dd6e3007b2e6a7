pub mod engine;
pub mod types;

pub use engine::{DrawPolicy, Proposal, RunAssigner};
pub use types::{Competition, CompetitionResultSet, CommitteeEntry, Run, RunResult};

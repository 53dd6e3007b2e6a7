pub mod code;
pub mod tally;

pub use code::CommitteeCode;
pub use tally::{count_competitors, tally, validate_tally, CommitteeCount, TallyConfig};

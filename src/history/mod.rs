pub mod key;
pub mod storage;
pub mod types;

pub use key::{history_key, key_date};
pub use storage::{get_history_path, load_history, save_history};
pub use types::{CommitteeHistory, HistoryRecord, HistoryStore, RunAssignments, Season};

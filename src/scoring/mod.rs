pub mod config;
pub mod engine;
pub mod validation;

pub use config::ScoringConfig;
pub use engine::{
    base_percentage, calculate_score, occurrence_weight, recency_weight, CommitteeStats,
    ScoreBreakdown, ScoreResult,
};
pub use validation::validate_scoring;

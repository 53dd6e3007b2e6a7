use serde::{Deserialize, Serialize};

/// Weighting knobs for the trace draw.
///
/// Every field is optional in YAML; missing fields take the default below.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   base_percentage_weight: 1
///   occurrence_weight_enabled: true
///   occurrence_divider: 1.5
///   competitions_since_last_trace_weight_enabled: true
///   competitions_since_last_trace_power: 1.5
///   competitions_since_last_trace_min: 1
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Linear multiplier on the competitor share (1 = unchanged)
    pub base_percentage_weight: f64,

    /// When false the occurrence multiplier is always 1
    pub occurrence_weight_enabled: bool,

    /// Occurrence multiplier is 1 / (occurrences * divider), or 1 before any trace
    /// Example: divider 2 -> 1 occurrence = 0.5, 2 occurrences = 0.25
    pub occurrence_divider: f64,

    /// When false the recency multiplier is always 1
    pub competitions_since_last_trace_weight_enabled: bool,

    /// Recency multiplier is max(min, competitions since last trace) ^ power
    /// Example: power 2 -> 3 competitions = 9, 4 competitions = 16
    pub competitions_since_last_trace_power: f64,

    /// Floor below which waiting earns no extra weight
    pub competitions_since_last_trace_min: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_percentage_weight: 1.0,
            occurrence_weight_enabled: true,
            occurrence_divider: 1.5,
            competitions_since_last_trace_weight_enabled: true,
            competitions_since_last_trace_power: 1.5,
            competitions_since_last_trace_min: 1.0,
        }
    }
}

impl ScoringConfig {
    /// Knobs reducing the draw to pure proportional share.
    pub fn proportional_only() -> Self {
        Self {
            occurrence_weight_enabled: false,
            competitions_since_last_trace_weight_enabled: false,
            ..Self::default()
        }
    }
}

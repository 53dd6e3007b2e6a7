use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;

/// History-derived inputs for one committee in one drawn run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitteeStats {
    pub count: u32,
    pub occurrences: u32,
    pub competitions_since_last_trace: u32,
}

/// The three multiplicands of a final score, kept for explanation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_percentage: f64,
    pub occurrence_weight: f64,
    pub recency_weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Weighted share of the run's competitors, in percent.
///
/// `total` must be positive; callers reject zero-total runs beforehand.
pub fn base_percentage(count: u32, total: u32, config: &ScoringConfig) -> f64 {
    debug_assert!(total > 0, "base percentage needs a positive total");
    100.0 * count as f64 / total as f64 * config.base_percentage_weight
}

/// Penalty for trace duty already done: `1 / (occurrences * divider)`.
/// A committee that has not traced yet is not penalized at all.
pub fn occurrence_weight(occurrences: u32, config: &ScoringConfig) -> f64 {
    if !config.occurrence_weight_enabled || occurrences == 0 {
        return 1.0;
    }
    1.0 / (occurrences as f64 * config.occurrence_divider)
}

/// Bonus for waiting. Floors at `min ^ power` for recent tracers.
pub fn recency_weight(competitions_since_last_trace: u32, config: &ScoringConfig) -> f64 {
    if !config.competitions_since_last_trace_weight_enabled {
        return 1.0;
    }
    (competitions_since_last_trace as f64)
        .max(config.competitions_since_last_trace_min)
        .powf(config.competitions_since_last_trace_power)
}

/// Final weighted score of one committee for one drawn run.
pub fn calculate_score(stats: &CommitteeStats, total: u32, config: &ScoringConfig) -> ScoreResult {
    let breakdown = ScoreBreakdown {
        base_percentage: base_percentage(stats.count, total, config),
        occurrence_weight: occurrence_weight(stats.occurrences, config),
        recency_weight: recency_weight(stats.competitions_since_last_trace, config),
    };

    ScoreResult {
        score: breakdown.base_percentage * breakdown.occurrence_weight * breakdown.recency_weight,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(count: u32, occurrences: u32, since: u32) -> CommitteeStats {
        CommitteeStats {
            count,
            occurrences,
            competitions_since_last_trace: since,
        }
    }

    #[test]
    fn test_base_percentage_share() {
        let config = ScoringConfig::default();
        assert_eq!(base_percentage(25, 100, &config), 25.0);
        assert_eq!(base_percentage(0, 100, &config), 0.0);
    }

    #[test]
    fn test_base_percentage_weight_doubles() {
        let config = ScoringConfig {
            base_percentage_weight: 2.0,
            ..ScoringConfig::default()
        };
        assert_eq!(base_percentage(10, 100, &config), 20.0);
        assert_eq!(base_percentage(20, 100, &config), 40.0);
    }

    #[test]
    fn test_base_percentages_sum_to_weighted_hundred() {
        let counts = [3u32, 7, 11, 0, 29];
        let total: u32 = counts.iter().sum();
        for weight in [1.0, 2.0, 0.5] {
            let config = ScoringConfig {
                base_percentage_weight: weight,
                ..ScoringConfig::default()
            };
            let sum: f64 = counts
                .iter()
                .map(|c| base_percentage(*c, total, &config))
                .sum();
            assert!((sum - 100.0 * weight).abs() < 1e-9);
        }
    }

    #[test]
    fn test_occurrence_weight_values() {
        let config = ScoringConfig {
            occurrence_divider: 2.0,
            ..ScoringConfig::default()
        };
        assert_eq!(occurrence_weight(1, &config), 0.5);
        assert_eq!(occurrence_weight(2, &config), 0.25);
        assert_eq!(occurrence_weight(0, &config), 1.0);
    }

    #[test]
    fn test_occurrence_weight_never_traced_beats_three() {
        let config = ScoringConfig::default();
        assert!(occurrence_weight(0, &config) >= occurrence_weight(3, &config));
        assert!(occurrence_weight(2, &config) > occurrence_weight(3, &config));
    }

    #[test]
    fn test_occurrence_weight_strictly_decreasing_once_traced() {
        let config = ScoringConfig::default();
        let weights: Vec<f64> = (1..6).map(|n| occurrence_weight(n, &config)).collect();
        assert!(weights.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_occurrence_weight_disabled() {
        let config = ScoringConfig {
            occurrence_weight_enabled: false,
            ..ScoringConfig::default()
        };
        assert_eq!(occurrence_weight(5, &config), 1.0);
    }

    #[test]
    fn test_recency_weight_power() {
        let config = ScoringConfig {
            competitions_since_last_trace_power: 2.0,
            competitions_since_last_trace_min: 1.0,
            ..ScoringConfig::default()
        };
        assert_eq!(recency_weight(2, &config), 4.0);
        assert_eq!(recency_weight(3, &config), 9.0);
        assert_eq!(recency_weight(4, &config), 16.0);
    }

    #[test]
    fn test_recency_weight_floors_at_min() {
        let config = ScoringConfig {
            competitions_since_last_trace_power: 2.0,
            competitions_since_last_trace_min: 3.0,
            ..ScoringConfig::default()
        };
        assert_eq!(recency_weight(0, &config), 9.0);
        assert_eq!(recency_weight(2, &config), 9.0);
        assert_eq!(recency_weight(4, &config), 16.0);
    }

    #[test]
    fn test_recency_weight_disabled() {
        let config = ScoringConfig {
            competitions_since_last_trace_weight_enabled: false,
            ..ScoringConfig::default()
        };
        assert_eq!(recency_weight(12, &config), 1.0);
    }

    #[test]
    fn test_full_score_matches_breakdown() {
        let config = ScoringConfig::default();
        // A: 10 of 30, never traced, 4 competitions waiting
        let result = calculate_score(&stats(10, 0, 4), 30, &config);

        assert!((result.breakdown.base_percentage - 33.333).abs() < 0.01);
        assert_eq!(result.breakdown.occurrence_weight, 1.0);
        assert!((result.breakdown.recency_weight - 8.0).abs() < 1e-9);
        assert!((result.score - 266.667).abs() < 0.01);
    }

    #[test]
    fn test_proportional_only_score_is_share() {
        let config = ScoringConfig::proportional_only();
        let result = calculate_score(&stats(15, 7, 9), 60, &config);
        assert_eq!(result.score, 25.0);
    }

    #[test]
    fn test_score_is_reproducible() {
        let config = ScoringConfig::default();
        let input = stats(13, 2, 5);
        let first = calculate_score(&input, 41, &config);
        let second = calculate_score(&input, 41, &config);
        assert_eq!(first, second);
        assert_eq!(first.score.to_bits(), second.score.to_bits());
    }
}

use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !config.base_percentage_weight.is_finite() || config.base_percentage_weight < 0.0 {
        errors.push("scoring.base_percentage_weight: must be a non-negative number".to_string());
    }

    if !config.occurrence_divider.is_finite() || config.occurrence_divider <= 0.0 {
        errors.push(format!(
            "scoring.occurrence_divider: must be positive, got {}",
            config.occurrence_divider
        ));
    }

    // Waiting longer must strictly raise the multiplier
    if !config.competitions_since_last_trace_power.is_finite()
        || config.competitions_since_last_trace_power <= 0.0
    {
        errors.push(format!(
            "scoring.competitions_since_last_trace_power: must be positive, got {}",
            config.competitions_since_last_trace_power
        ));
    }

    if !config.competitions_since_last_trace_min.is_finite()
        || config.competitions_since_last_trace_min < 0.0
    {
        errors.push(
            "scoring.competitions_since_last_trace_min: must be a non-negative number".to_string(),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

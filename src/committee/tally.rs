use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::code::CommitteeCode;
use crate::error::ValidationError;

/// Per-committee competitor counts, iterated in committee declaration order.
pub type CommitteeCount = BTreeMap<CommitteeCode, u32>;

/// Eligibility adjustments applied on top of the raw registrations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TallyConfig {
    /// Committees that never trace, whatever their count
    #[serde(default)]
    pub excluded: Vec<CommitteeCode>,

    /// Baseline count added to a committee even when it fields nobody
    #[serde(default)]
    pub synthetic_quotas: BTreeMap<CommitteeCode, u32>,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            excluded: vec![CommitteeCode::If, CommitteeCode::Au],
            synthetic_quotas: BTreeMap::from([
                (CommitteeCode::Apex, 6),
                (CommitteeCode::Ors, 15),
            ]),
        }
    }
}

/// Count how many competitors each committee fields.
pub fn count_competitors(codes: &[CommitteeCode]) -> CommitteeCount {
    let mut counts = CommitteeCount::new();
    for code in codes {
        *counts.entry(*code).or_insert(0) += 1;
    }
    counts
}

/// Turn one raw committee code per competitor into adjusted counts.
///
/// Excluded committees are dropped, then synthetic quotas are added to
/// whatever real count is present. A synthetic quota of zero still makes the
/// committee a candidate.
pub fn tally<I, S>(raw_codes: I, config: &TallyConfig) -> Result<CommitteeCount, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let codes = raw_codes
        .into_iter()
        .map(|raw| raw.as_ref().parse::<CommitteeCode>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut counts = count_competitors(&codes);
    counts.retain(|code, _| !config.excluded.contains(code));

    for (code, quota) in &config.synthetic_quotas {
        let count = counts.entry(*code).or_insert(0);
        *count = count.saturating_add(*quota);
    }

    tracing::debug!(
        competitors = codes.len(),
        committees = counts.len(),
        "tallied registrations"
    );
    Ok(counts)
}

/// Validate eligibility configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_tally(config: &TallyConfig) -> Result<(), Vec<String>> {
    let errors: Vec<String> = config
        .synthetic_quotas
        .keys()
        .filter(|code| config.excluded.contains(code))
        .map(|code| {
            format!(
                "synthetic_quotas.{}: committee is also listed in excluded",
                code
            )
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

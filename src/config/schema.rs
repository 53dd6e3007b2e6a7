use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::assign::DrawPolicy;
use crate::committee::{CommitteeCode, TallyConfig};
use crate::history::Season;
use crate::scoring::ScoringConfig;

/// Configuration file contents. Every section is optional; missing
/// sections fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Committees that never trace
    #[serde(default)]
    pub excluded: Option<Vec<CommitteeCode>>,

    /// Baseline competitor counts for virtual committees
    #[serde(default)]
    pub synthetic_quotas: Option<BTreeMap<CommitteeCode, u32>>,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    #[serde(default)]
    pub draw: Option<DrawPolicy>,

    /// When set, only competitions inside the season feed the statistics
    #[serde(default)]
    pub season: Option<Season>,

    /// History ledger location, `~/` is expanded
    #[serde(default)]
    pub history_path: Option<String>,
}

impl Config {
    pub fn tally_config(&self) -> TallyConfig {
        let defaults = TallyConfig::default();
        TallyConfig {
            excluded: self.excluded.clone().unwrap_or(defaults.excluded),
            synthetic_quotas: self
                .synthetic_quotas
                .clone()
                .unwrap_or(defaults.synthetic_quotas),
        }
    }

    pub fn effective_scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn draw_policy(&self) -> DrawPolicy {
        self.draw.unwrap_or_default()
    }

    pub fn history_path(&self) -> Result<PathBuf> {
        match self.history_path.as_deref() {
            Some(path) => super::expand_home(path),
            None => crate::history::get_history_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tally_config(), TallyConfig::default());
        assert_eq!(config.effective_scoring(), ScoringConfig::default());
        assert_eq!(config.draw_policy(), DrawPolicy::default());
        assert!(config.season.is_none());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
excluded: [IF, AU, CA]
synthetic_quotas:
  APEX: 6
  ORS: 15
scoring:
  base_percentage_weight: 2
  occurrence_divider: 3
draw:
  organizer_eligible: false
  exclusive: true
season:
  start: 15/10/2025
  end: 30/04/2026
history_path: /tmp/history.json
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();

        let tally = config.tally_config();
        assert_eq!(tally.excluded.len(), 3);
        assert_eq!(tally.synthetic_quotas.get(&CommitteeCode::Ors), Some(&15));

        let scoring = config.effective_scoring();
        assert_eq!(scoring.base_percentage_weight, 2.0);
        assert_eq!(scoring.occurrence_divider, 3.0);
        assert!(scoring.occurrence_weight_enabled);

        let draw = config.draw_policy();
        assert!(!draw.organizer_eligible);
        assert!(draw.exclusive);

        let season = config.season.unwrap();
        assert_eq!(season.start.to_string(), "2025-10-15");
        assert_eq!(season.end.to_string(), "2026-04-30");

        assert_eq!(
            config.history_path().unwrap(),
            PathBuf::from("/tmp/history.json")
        );
    }

    #[test]
    fn test_partial_draw_section() {
        let yaml = "draw:\n  exclusive: true\n";
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let draw = config.draw_policy();
        assert!(draw.organizer_eligible);
        assert!(draw.exclusive);
    }

    #[test]
    fn test_empty_excluded_list_overrides_default() {
        let config: Config = serde_saphyr::from_str("excluded: []\n").unwrap();
        assert!(config.tally_config().excluded.is_empty());
        assert_eq!(
            config.tally_config().synthetic_quotas,
            TallyConfig::default().synthetic_quotas
        );
    }

    #[test]
    fn test_unknown_committee_rejected() {
        let yaml = "excluded: [IF, XYZ]\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let yaml = "scorring: {}\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_bad_season_date_rejected() {
        let yaml = "season:\n  start: 2025-10-15\n  end: 30/04/2026\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }
}

use attest_types::DriftThresholds;
use chrono::Duration;
use serde::Deserialize;

/// Tunable engine parameters.
///
/// Thresholds and windows are configuration, not constants: deployments
/// load them alongside the reason code catalog.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub drift: DriftThresholds,
    /// Two accepted entries for one subject within this many seconds of
    /// each other count as a duplicate pattern.
    pub duplicate_window_secs: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            drift: DriftThresholds::default(),
            duplicate_window_secs: 86_400,
        }
    }
}

impl EngineConfig {
    pub fn duplicate_window(&self) -> Duration {
        Duration::seconds(self.duplicate_window_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_tunables() {
        let config = EngineConfig::default();
        assert_eq!(config.drift.medium_secs, 60);
        assert_eq!(config.drift.high_secs, 300);
        assert_eq!(config.drift.block_secs, 600);
        assert_eq!(config.duplicate_window(), Duration::hours(24));
    }

    #[test]
    fn partial_config_files_fill_in_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"duplicate_window_secs": 3600}"#).unwrap();
        assert_eq!(config.duplicate_window_secs, 3600);
        assert_eq!(config.drift.block_secs, 600);
    }
}

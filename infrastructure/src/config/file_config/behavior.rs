//! Behavior configuration from TOML (`[behavior]` section)

use debate_application::BehaviorConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw behavior configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Timeout in seconds for one generator call; unset disables it
    pub timeout_seconds: Option<u64>,
    /// Automatic retries for transient generator failures
    pub max_retries: u32,
    /// Backoff before the first retry, doubled for each later one
    pub retry_backoff_ms: u64,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        let defaults = BehaviorConfig::default();
        Self {
            timeout_seconds: defaults.timeout.map(|t| t.as_secs()),
            max_retries: defaults.max_retries,
            retry_backoff_ms: defaults.retry_backoff.as_millis() as u64,
        }
    }
}

impl FileBehaviorConfig {
    pub fn to_behavior_config(&self) -> BehaviorConfig {
        BehaviorConfig::from_timeout_seconds(self.timeout_seconds)
            .with_max_retries(self.max_retries)
            .with_retry_backoff(Duration::from_millis(self.retry_backoff_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_application_defaults() {
        assert_eq!(
            FileBehaviorConfig::default().to_behavior_config(),
            BehaviorConfig::default()
        );
    }
}

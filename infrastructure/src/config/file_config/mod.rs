//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; conversion into application types
//! happens at the edges (`to_behavior_config`, `resolve_api_key`).

mod behavior;
mod generator;
mod logging;
mod output;
mod repl;
mod session;

pub use behavior::FileBehaviorConfig;
pub use generator::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, FileGeneratorConfig};
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;
pub use session::FileSessionConfig;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Expand a leading `~/` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("behavior.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("generator.model cannot be empty")]
    EmptyModelName,

    #[error("generator.{field} = {value} is out of range ({range})")]
    OutOfRange {
        field: &'static str,
        value: f32,
        range: &'static str,
    },

    #[error("generator.max_output_tokens cannot be 0")]
    InvalidMaxOutputTokens,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Response generator settings
    pub generator: FileGeneratorConfig,
    /// Timeouts and retries
    pub behavior: FileBehaviorConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Conversation log settings
    pub logging: FileLoggingConfig,
    /// Saved session settings
    pub session: FileSessionConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.behavior.timeout_seconds == Some(0) {
            issues.push(ConfigValidationError::InvalidTimeout);
        }

        let generator = &self.generator;
        if generator.model.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyModelName);
        }
        if !(0.0..=2.0).contains(&generator.temperature) {
            issues.push(ConfigValidationError::OutOfRange {
                field: "temperature",
                value: generator.temperature,
                range: "0.0..=2.0",
            });
        }
        if !(0.0..=1.0).contains(&generator.top_p) {
            issues.push(ConfigValidationError::OutOfRange {
                field: "top_p",
                value: generator.top_p,
                range: "0.0..=1.0",
            });
        }
        if generator.top_k == 0 {
            issues.push(ConfigValidationError::OutOfRange {
                field: "top_k",
                value: 0.0,
                range: "1 or more",
            });
        }
        if generator.max_output_tokens == 0 {
            issues.push(ConfigValidationError::InvalidMaxOutputTokens);
        }

        issues
    }
}

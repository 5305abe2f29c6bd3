//! Configuration file loading for debate-practice
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DEBATE_` prefixed environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./debate.toml` or `./.debate.toml`
//! 4. Global: `~/.config/debate-practice/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL,
    FileBehaviorConfig, FileConfig, FileGeneratorConfig, FileLoggingConfig, FileOutputConfig,
    FileReplConfig, FileSessionConfig, expand_home,
};
pub use loader::ConfigLoader;

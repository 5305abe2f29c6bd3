//! Session persistence configuration from TOML (`[session]` section)

use serde::{Deserialize, Serialize};

/// Raw session configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Where the last topic/format/persona choice is saved
    pub store_path: Option<String>,
}

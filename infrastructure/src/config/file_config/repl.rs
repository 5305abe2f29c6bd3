//! Debate prompt configuration from TOML (`[repl]` section)

use super::expand_home;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw debate prompt configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Show the "thinking" spinner while the opponent replies
    pub show_progress: bool,
    /// Argument history file; `~/` is expanded
    pub history_file: Option<String>,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            history_file: None,
        }
    }
}

impl FileReplConfig {
    /// Where argument history is kept
    ///
    /// Falls back to `<data_dir>/debate-practice/history.txt`.
    pub fn history_path(&self) -> Option<PathBuf> {
        match self.history_file.as_deref() {
            Some(path) => Some(expand_home(path)),
            None => dirs::data_dir().map(|d| d.join("debate-practice").join("history.txt")),
        }
    }
}

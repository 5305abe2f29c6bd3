//! JSON file store for the last session configuration.

use debate_application::{ConfigStoreError, SessionConfigStore};
use debate_domain::StoredSessionConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Stores the topic/format/persona blob as pretty-printed JSON
pub struct FileSessionConfigStore {
    path: PathBuf,
}

impl FileSessionConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/debate-practice/session.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("debate-practice").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionConfigStore for FileSessionConfigStore {
    fn save(&self, config: &StoredSessionConfig) -> Result<(), ConfigStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| ConfigStoreError::Format(e.to_string()))?;
        fs::write(&self.path, json)?;
        debug!("Saved session config to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<StoredSessionConfig>, ConfigStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| ConfigStoreError::Format(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> StoredSessionConfig {
        StoredSessionConfig {
            topic: "Should AI development be regulated?".to_string(),
            format_id: "rapid".to_string(),
            personality_id: "nietzsche".to_string(),
        }
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionConfigStore::new(dir.path().join("session.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_directories_and_restores() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionConfigStore::new(dir.path().join("nested").join("session.json"));
        store.save(&stored()).unwrap();
        assert_eq!(store.load().unwrap(), Some(stored()));

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"formatId\""));
        assert!(raw.contains("\"personalityId\""));
    }

    #[test]
    fn test_malformed_file_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        let store = FileSessionConfigStore::new(path);
        assert!(matches!(store.load(), Err(ConfigStoreError::Format(_))));
    }
}

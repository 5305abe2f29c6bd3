//! Port for persisting the last session configuration.

use debate_domain::StoredSessionConfig;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigStoreError {
    #[error("Config store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored config is malformed: {0}")]
    Format(String),
}

/// Saves and restores the topic/format/persona blob
pub trait SessionConfigStore: Send + Sync {
    fn save(&self, config: &StoredSessionConfig) -> Result<(), ConfigStoreError>;

    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<StoredSessionConfig>, ConfigStoreError>;
}

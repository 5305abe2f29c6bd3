//! Infrastructure layer for debate-practice
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod generator;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBehaviorConfig, FileConfig, FileGeneratorConfig,
    FileLoggingConfig, FileOutputConfig, FileReplConfig, FileSessionConfig, expand_home,
};
pub use generator::{CannedResponseGenerator, GeminiResponseGenerator, GenerationConfig};
pub use logging::JsonlConversationLogger;
pub use store::FileSessionConfigStore;

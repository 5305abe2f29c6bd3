//! Presentation layer for debate-practice
//!
//! This crate contains CLI definitions, the setup wizard, the debate REPL,
//! output formatters and progress reporters.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;
pub mod repl;
pub mod wizard;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use config::{OutputConfig, ReplConfig};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{SimpleProgress, ThinkingReporter};
pub use repl::debate::DebateRepl;
pub use wizard::setup::{SUGGESTED_TOPICS, SetupWizard};

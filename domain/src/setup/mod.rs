//! Debate setup.
//!
//! - [`configurator::SessionConfigurator`] — the three-choice wizard
//! - [`config::SessionConfig`] — its immutable output
//! - [`config::StoredSessionConfig`] — the persisted key-value blob

pub mod config;
pub mod configurator;

pub use config::{SessionConfig, StoredSessionConfig};
pub use configurator::{SessionConfigurator, SetupStep};

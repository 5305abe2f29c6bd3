//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod config_store;
pub mod conversation_logger;
pub mod response_generator;
pub mod session_notifier;

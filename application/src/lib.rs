//! Application layer for debate-practice
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    config_store::{ConfigStoreError, SessionConfigStore},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    response_generator::{GeneratorError, ResponseGenerator},
    session_notifier::{NoSessionNotifier, SessionNotifier},
};
pub use use_cases::round_timer::spawn_round_timer;
pub use use_cases::run_debate::{RunDebateError, RunDebateUseCase, SharedSession};

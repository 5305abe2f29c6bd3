//! Domain layer for debate-practice
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Setup
//!
//! The [`SessionConfigurator`] walks through three choices (topic, format,
//! persona) drawn from the read-only [`FormatCatalog`] and [`PersonaCatalog`]
//! and produces an immutable [`SessionConfig`].
//!
//! ## Session
//!
//! The [`DebateSession`] owns the transcript and drives the exchange:
//!
//! ```text
//! Opening -> AwaitingUser -> AwaitingAgent -> AwaitingUser | Concluded
//!                   any non-terminal phase -> Ended
//! ```
//!
//! Replies from the response generator come back through tickets, so a
//! reply that arrives after the session moved on is discarded.

pub mod catalog;
pub mod core;
pub mod prompt;
pub mod scoring;
pub mod session;
pub mod setup;

// Re-export commonly used types
pub use catalog::{
    format::{DebateFormat, FormatCatalog},
    persona::{Persona, PersonaCatalog},
};
pub use core::{error::DomainError, topic::Topic};
pub use prompt::DebatePrompt;
pub use scoring::{
    metrics::{MetricDeltas, PerformanceMetrics},
    report::{Category, CategoryScore, DebateReport, FeedbackKind, FeedbackPoint},
    strategy::{DeltaRanges, RandomDeltaScoring, ScoringStrategy},
};
pub use session::{
    engine::DebateSession,
    entities::{Speaker, Turn, TurnId},
    timer::RoundTimer,
    value_objects::{
        FailureKind, GenerationFailure, GenerationRequest, PendingReply, ReplyOutcome,
        ReplyTicket, SessionId, SessionPhase, TimerEvent, TurnRejection,
    },
};
pub use setup::{SessionConfig, SessionConfigurator, SetupStep, StoredSessionConfig};

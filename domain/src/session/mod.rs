//! Debate session domain.
//!
//! - [`engine::DebateSession`] — the turn-taking state machine
//! - [`entities::Turn`] — a single message in the transcript
//! - [`value_objects`] — phases, reply tickets, requests and outcomes
//! - [`timer::RoundTimer`] — the optional per-round countdown

pub mod engine;
pub mod entities;
pub mod timer;
pub mod value_objects;

//! Session value objects: phases, tickets, requests and outcomes

use super::entities::Turn;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identity of one debate session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Engine phase
///
/// ```text
/// Opening -> AwaitingUser -> AwaitingAgent -> AwaitingUser | Concluded
///                   any non-terminal phase -> Ended
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Opening,
    AwaitingUser,
    AwaitingAgent,
    Concluded,
    Ended,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Concluded | SessionPhase::Ended)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Opening => "opening",
            SessionPhase::AwaitingUser => "awaiting_user",
            SessionPhase::AwaitingAgent => "awaiting_agent",
            SessionPhase::Concluded => "concluded",
            SessionPhase::Ended => "ended",
        }
    }
}

/// Identity of one outstanding reply request
///
/// A reply is only applied if its ticket still matches the session and the
/// latest exchange; anything else is a stale completion and gets dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyTicket {
    pub session_id: SessionId,
    pub exchange: u64,
}

/// What the response generator gets to produce the next agent turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    pub persona_name: String,
    pub style_descriptor: String,
    pub behavioral_prompt: String,
    /// Full ordered transcript, including the user turn being answered
    pub transcript: Vec<Turn>,
    pub round: u32,
    pub round_count: u32,
}

impl GenerationRequest {
    /// Rounds left after the one being answered
    pub fn rounds_remaining(&self) -> u32 {
        self.round_count.saturating_sub(self.round)
    }

    pub fn is_final_round(&self) -> bool {
        self.round >= self.round_count
    }
}

/// A reply the caller must fetch and hand back through
/// [`DebateSession::resolve_reply`](super::engine::DebateSession::resolve_reply)
#[derive(Debug, Clone)]
pub struct PendingReply {
    pub ticket: ReplyTicket,
    pub request: GenerationRequest,
}

/// Why the generator could not produce a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Missing or rejected credentials
    Credentials,
    /// Network or service hiccup
    Transient,
    /// The generator refused to answer
    Blocked,
    /// The generator answered with nothing
    Empty,
}

/// A failed reply, as the engine records it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GenerationFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl GenerationFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(FailureKind::Empty, "The opponent returned an empty reply")
    }

    /// Whether retrying the same request automatically can help
    pub fn is_retryable(&self) -> bool {
        self.kind == FailureKind::Transient
    }

    /// What the user should do about it
    pub fn hint(&self) -> &'static str {
        match self.kind {
            FailureKind::Credentials => "Fix your API key configuration and restart.",
            FailureKind::Transient => "The service is unavailable right now. Try again.",
            FailureKind::Blocked => {
                "The reply was blocked by content filters. Rephrase your argument."
            }
            FailureKind::Empty => "The opponent had nothing to say. Submit your argument again.",
        }
    }
}

/// Result of handing a reply back to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// Agent turn appended
    Applied { turn: Turn, concluded: bool },
    /// Reply failed; the user turn is kept. Retryable failures keep the
    /// exchange open, the rest hand the floor back to the user.
    Failed(GenerationFailure),
    /// Stale ticket; nothing changed
    Discarded,
}

/// Why a user action was refused
///
/// Every rejection leaves the session exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TurnRejection {
    #[error("A turn needs some text")]
    InvalidTurnSubmission,

    #[error("Still waiting for the opponent's reply")]
    SessionBusy,

    #[error("The debate has concluded")]
    SessionConcluded,

    #[error("The debate has ended")]
    SessionEnded,

    #[error("There is no failed reply to retry")]
    NothingToRetry,

    #[error("That failure cannot be retried; submit your argument again")]
    RetryNotOffered,
}

/// Events produced by the round countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Expired { round: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_phases() {
        assert!(SessionPhase::Concluded.is_terminal());
        assert!(SessionPhase::Ended.is_terminal());
        assert!(!SessionPhase::AwaitingAgent.is_terminal());
        assert!(!SessionPhase::Opening.is_terminal());
    }

    #[test]
    fn test_only_transient_failures_are_retryable() {
        assert!(GenerationFailure::new(FailureKind::Transient, "503").is_retryable());
        assert!(!GenerationFailure::new(FailureKind::Credentials, "401").is_retryable());
        assert!(!GenerationFailure::new(FailureKind::Blocked, "safety").is_retryable());
        assert!(!GenerationFailure::empty().is_retryable());
    }

    #[test]
    fn test_rounds_remaining() {
        let request = GenerationRequest {
            topic: "X".to_string(),
            persona_name: "Socrates".to_string(),
            style_descriptor: String::new(),
            behavioral_prompt: String::new(),
            transcript: vec![],
            round: 3,
            round_count: 5,
        };
        assert_eq!(request.rounds_remaining(), 2);
        assert!(!request.is_final_round());
    }
}

//! Session domain entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who said a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Agent,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Agent => "agent",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Turn identifier, unique within a session and increasing with creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnId(u64);

impl TurnId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TurnId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single message in the transcript (Entity)
///
/// Turns are never edited. A user turn left unanswered by a refused reply
/// is superseded by the user's next turn, which gets a fresh id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub id: TurnId,
    pub speaker: Speaker,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Turn {
    pub fn new(id: TurnId, speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            id,
            speaker,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.speaker == Speaker::User
    }

    pub fn is_agent(&self) -> bool {
        self.speaker == Speaker::Agent
    }
}

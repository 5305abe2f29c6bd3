//! Debate formats and the format catalog

use crate::core::error::DomainError;
use serde::Serialize;
use std::sync::Arc;

/// A debate format (Value Object)
///
/// `seconds_per_round == 0` means the format is untimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebateFormat {
    pub id: String,
    pub name: String,
    pub description: String,
    pub round_count: u32,
    pub seconds_per_round: u32,
}

impl DebateFormat {
    /// Create a new format
    ///
    /// # Panics
    /// Panics if `round_count` is zero. Formats are static table entries,
    /// so a zero here is a bug in the table itself.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        round_count: u32,
        seconds_per_round: u32,
    ) -> Self {
        assert!(round_count > 0, "a debate format needs at least one round");
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            round_count,
            seconds_per_round,
        }
    }

    /// Whether each round runs against a countdown
    pub fn is_timed(&self) -> bool {
        self.seconds_per_round > 0
    }

    /// Short human summary, e.g. "5 rounds, 180 seconds per round"
    pub fn summary(&self) -> String {
        if self.is_timed() {
            format!(
                "{} rounds, {} seconds per round",
                self.round_count, self.seconds_per_round
            )
        } else {
            format!("{} rounds, untimed", self.round_count)
        }
    }
}

/// Read-only table of the available formats, keyed by id
#[derive(Debug, Clone)]
pub struct FormatCatalog {
    formats: Arc<[DebateFormat]>,
}

impl FormatCatalog {
    pub fn new(formats: Vec<DebateFormat>) -> Self {
        Self {
            formats: formats.into(),
        }
    }

    /// The formats shipped with the application
    pub fn builtin() -> Self {
        Self::new(vec![
            DebateFormat::new(
                "classical",
                "Classical Debate",
                "Structured format with formal opening and closing statements, and multiple rounds of rebuttals.",
                5,
                180,
            ),
            DebateFormat::new(
                "socratic",
                "Socratic Dialog",
                "A question-based approach where the AI will primarily ask questions to help clarify your position.",
                8,
                0,
            ),
            DebateFormat::new(
                "casual",
                "Casual Discussion",
                "Free-flowing conversation format with less structure but still focused on the topic.",
                6,
                0,
            ),
            DebateFormat::new(
                "rapid",
                "Rapid Fire",
                "Quick exchanges with short time limits, testing your ability to think and respond quickly.",
                10,
                60,
            ),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&DebateFormat> {
        self.formats.iter().find(|f| f.id == id)
    }

    /// Look up a format, failing with [`DomainError::UnknownFormat`]
    pub fn require(&self, id: &str) -> Result<&DebateFormat, DomainError> {
        self.get(id)
            .ok_or_else(|| DomainError::UnknownFormat(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DebateFormat> {
        self.formats.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.formats.iter().map(|f| f.id.as_str()).collect()
    }
}

impl Default for FormatCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

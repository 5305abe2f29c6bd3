//! Finalized session configuration and its persisted form

use crate::catalog::format::{DebateFormat, FormatCatalog};
use crate::catalog::persona::{Persona, PersonaCatalog};
use crate::core::error::DomainError;
use crate::core::topic::Topic;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Everything the engine needs to run a debate
///
/// Produced by [`SessionConfigurator::finalize`](super::SessionConfigurator::finalize)
/// and moved into the engine; there are no setters.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    topic: Topic,
    format: DebateFormat,
    persona: Arc<Persona>,
}

impl SessionConfig {
    pub(crate) fn new(topic: Topic, format: DebateFormat, persona: Arc<Persona>) -> Self {
        Self {
            topic,
            format,
            persona,
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn format(&self) -> &DebateFormat {
        &self.format
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Flatten into the key-value blob that crosses the setup/debate boundary
    pub fn to_stored(&self) -> StoredSessionConfig {
        StoredSessionConfig {
            topic: self.topic.as_str().to_string(),
            format_id: self.format.id.clone(),
            personality_id: self.persona.id.clone(),
        }
    }

    /// Rebuild a config from its stored blob
    pub fn from_stored(
        stored: &StoredSessionConfig,
        formats: &FormatCatalog,
        personas: &PersonaCatalog,
    ) -> Result<Self, DomainError> {
        let topic = Topic::try_new(stored.topic.as_str())
            .ok_or_else(|| DomainError::InvalidTopic(stored.topic.clone()))?;
        let format = formats.require(&stored.format_id)?.clone();
        let persona = personas.require(&stored.personality_id)?;
        Ok(Self::new(topic, format, persona))
    }
}

/// Persisted form of a [`SessionConfig`]
///
/// Field names match the JSON blob the setup flow has always written
/// (`topic`, `formatId`, `personalityId`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredSessionConfig {
    pub topic: String,
    pub format_id: String,
    pub personality_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionConfig {
        let formats = FormatCatalog::builtin();
        let personas = PersonaCatalog::builtin();
        SessionConfig::new(
            Topic::try_new("Should college education be free for all citizens?").unwrap(),
            formats.require("rapid").unwrap().clone(),
            personas.require("shakespeare").unwrap(),
        )
    }

    #[test]
    fn test_stored_round_trip() {
        let config = sample();
        let stored = config.to_stored();
        let json = serde_json::to_string(&stored).unwrap();
        let parsed: StoredSessionConfig = serde_json::from_str(&json).unwrap();
        let restored = SessionConfig::from_stored(
            &parsed,
            &FormatCatalog::builtin(),
            &PersonaCatalog::builtin(),
        )
        .unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_stored_uses_camel_case_keys() {
        let value = serde_json::to_value(sample().to_stored()).unwrap();
        assert_eq!(value["formatId"], "rapid");
        assert_eq!(value["personalityId"], "shakespeare");
        assert_eq!(
            value["topic"],
            "Should college education be free for all citizens?"
        );
    }

    #[test]
    fn test_from_stored_rejects_unknown_ids() {
        let stored = StoredSessionConfig {
            topic: "X".to_string(),
            format_id: "classical".to_string(),
            personality_id: "comedian".to_string(),
        };
        let err = SessionConfig::from_stored(
            &stored,
            &FormatCatalog::builtin(),
            &PersonaCatalog::builtin(),
        )
        .unwrap_err();
        assert_eq!(err, DomainError::UnknownPersona("comedian".to_string()));
    }

    #[test]
    fn test_from_stored_rejects_blank_topic() {
        let stored = StoredSessionConfig {
            topic: "  ".to_string(),
            format_id: "classical".to_string(),
            personality_id: "socrates".to_string(),
        };
        assert!(matches!(
            SessionConfig::from_stored(
                &stored,
                &FormatCatalog::builtin(),
                &PersonaCatalog::builtin()
            ),
            Err(DomainError::InvalidTopic(_))
        ));
    }
}

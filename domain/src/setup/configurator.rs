//! Session configurator: the topic → format → persona wizard

use super::config::{SessionConfig, StoredSessionConfig};
use crate::catalog::format::{DebateFormat, FormatCatalog};
use crate::catalog::persona::{Persona, PersonaCatalog};
use crate::core::error::DomainError;
use crate::core::topic::Topic;
use std::sync::Arc;

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SetupStep {
    Topic,
    Format,
    Persona,
    Review,
}

impl SetupStep {
    /// 1-based position, for "Step 2 of 4" displays
    pub fn number(&self) -> usize {
        match self {
            SetupStep::Topic => 1,
            SetupStep::Format => 2,
            SetupStep::Persona => 3,
            SetupStep::Review => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SetupStep::Topic => "Choose Topic",
            SetupStep::Format => "Select Format",
            SetupStep::Persona => "Pick Personality",
            SetupStep::Review => "Review & Start",
        }
    }

    pub const COUNT: usize = 4;
}

/// Collects topic, format and persona into a [`SessionConfig`]
///
/// Never talks to the response generator.
#[derive(Debug, Clone)]
pub struct SessionConfigurator {
    formats: FormatCatalog,
    personas: PersonaCatalog,
    topic: Option<Topic>,
    format: Option<DebateFormat>,
    persona: Option<Arc<Persona>>,
    step: SetupStep,
}

impl SessionConfigurator {
    pub fn new(formats: FormatCatalog, personas: PersonaCatalog) -> Self {
        Self {
            formats,
            personas,
            topic: None,
            format: None,
            persona: None,
            step: SetupStep::Topic,
        }
    }

    /// Pre-fill from a stored blob; fields that don't resolve are left unset
    pub fn from_stored(
        formats: FormatCatalog,
        personas: PersonaCatalog,
        stored: &StoredSessionConfig,
    ) -> Self {
        let mut configurator = Self::new(formats, personas);
        configurator.topic = Topic::try_new(&stored.topic);
        configurator.format = configurator.formats.get(&stored.format_id).cloned();
        configurator.persona = configurator.personas.get(&stored.personality_id);
        configurator.step = configurator.next_open_step();
        configurator
    }

    pub fn step(&self) -> SetupStep {
        self.step
    }

    pub fn formats(&self) -> &FormatCatalog {
        &self.formats
    }

    pub fn personas(&self) -> &PersonaCatalog {
        &self.personas
    }

    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    pub fn format(&self) -> Option<&DebateFormat> {
        self.format.as_ref()
    }

    pub fn persona(&self) -> Option<&Persona> {
        self.persona.as_deref()
    }

    /// Set the topic. Blank text is ignored and the wizard stays put.
    ///
    /// Returns whether the topic was accepted.
    pub fn set_topic(&mut self, text: &str) -> bool {
        match Topic::try_new(text) {
            Some(topic) => {
                self.topic = Some(topic);
                if self.step == SetupStep::Topic {
                    self.step = self.next_open_step();
                }
                true
            }
            None => false,
        }
    }

    /// Select a format from the catalog
    pub fn select_format(&mut self, format_id: &str) -> Result<(), DomainError> {
        let format = self.formats.require(format_id)?.clone();
        self.format = Some(format);
        self.step = self.next_open_step();
        Ok(())
    }

    /// Select a persona from the catalog
    pub fn select_persona(&mut self, persona_id: &str) -> Result<(), DomainError> {
        let persona = self.personas.require(persona_id)?;
        self.persona = Some(persona);
        self.step = self.next_open_step();
        Ok(())
    }

    /// Go back to an earlier step. Jumping forward is ignored.
    pub fn revisit(&mut self, step: SetupStep) {
        if step < self.step {
            self.step = step;
        }
    }

    /// Assemble the final configuration
    pub fn finalize(&self) -> Result<SessionConfig, DomainError> {
        match (&self.topic, &self.format, &self.persona) {
            (Some(topic), Some(format), Some(persona)) => Ok(SessionConfig::new(
                topic.clone(),
                format.clone(),
                Arc::clone(persona),
            )),
            _ => Err(DomainError::IncompleteConfiguration {
                missing: self.missing(),
            }),
        }
    }

    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.topic.is_none() {
            missing.push("topic");
        }
        if self.format.is_none() {
            missing.push("format");
        }
        if self.persona.is_none() {
            missing.push("persona");
        }
        missing
    }

    fn next_open_step(&self) -> SetupStep {
        if self.topic.is_none() {
            SetupStep::Topic
        } else if self.format.is_none() {
            SetupStep::Format
        } else if self.persona.is_none() {
            SetupStep::Persona
        } else {
            SetupStep::Review
        }
    }
}

impl Default for SessionConfigurator {
    fn default() -> Self {
        Self::new(FormatCatalog::builtin(), PersonaCatalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_walkthrough() {
        let mut configurator = SessionConfigurator::default();
        assert_eq!(configurator.step(), SetupStep::Topic);

        assert!(configurator.set_topic("Is democracy the best form of government?"));
        assert_eq!(configurator.step(), SetupStep::Format);

        configurator.select_format("socratic").unwrap();
        assert_eq!(configurator.step(), SetupStep::Persona);

        configurator.select_persona("socrates").unwrap();
        assert_eq!(configurator.step(), SetupStep::Review);

        let config = configurator.finalize().unwrap();
        assert_eq!(config.format().round_count, 8);
        assert_eq!(config.persona().display_name, "Socrates");
    }

    #[test]
    fn test_blank_topic_is_a_noop_gate() {
        let mut configurator = SessionConfigurator::default();
        assert!(!configurator.set_topic("   "));
        assert_eq!(configurator.step(), SetupStep::Topic);
        assert!(configurator.topic().is_none());
    }

    #[test]
    fn test_unknown_ids_fail_fast() {
        let mut configurator = SessionConfigurator::default();
        configurator.set_topic("X");
        assert_eq!(
            configurator.select_format("lincoln-douglas"),
            Err(DomainError::UnknownFormat("lincoln-douglas".to_string()))
        );
        assert_eq!(configurator.step(), SetupStep::Format);
        assert!(configurator.select_persona("hal9000").is_err());
        assert!(configurator.persona().is_none());
    }

    #[test]
    fn test_finalize_incomplete() {
        let mut configurator = SessionConfigurator::default();
        configurator.set_topic("X");
        assert_eq!(
            configurator.finalize().unwrap_err(),
            DomainError::IncompleteConfiguration {
                missing: vec!["format", "persona"]
            }
        );
    }

    #[test]
    fn test_revisit_only_goes_back() {
        let mut configurator = SessionConfigurator::default();
        configurator.set_topic("X");
        configurator.select_format("casual").unwrap();
        configurator.revisit(SetupStep::Review);
        assert_eq!(configurator.step(), SetupStep::Persona);

        configurator.revisit(SetupStep::Topic);
        assert_eq!(configurator.step(), SetupStep::Topic);

        // Changing the topic from an earlier step keeps the other choices
        configurator.set_topic("Y");
        configurator.select_persona("aristotle").unwrap();
        assert_eq!(configurator.step(), SetupStep::Review);
        assert_eq!(configurator.finalize().unwrap().topic().as_str(), "Y");
    }

    #[test]
    fn test_from_stored_prefills() {
        let stored = StoredSessionConfig {
            topic: "X".to_string(),
            format_id: "rapid".to_string(),
            personality_id: "unknown".to_string(),
        };
        let configurator = SessionConfigurator::from_stored(
            FormatCatalog::builtin(),
            PersonaCatalog::builtin(),
            &stored,
        );
        assert_eq!(configurator.step(), SetupStep::Persona);
        assert_eq!(configurator.format().unwrap().id, "rapid");
    }

    #[test]
    fn test_from_stored_keeps_later_choices_without_topic() {
        let stored = StoredSessionConfig {
            topic: "  ".to_string(),
            format_id: String::new(),
            personality_id: "aristotle".to_string(),
        };
        let configurator = SessionConfigurator::from_stored(
            FormatCatalog::builtin(),
            PersonaCatalog::builtin(),
            &stored,
        );
        assert_eq!(configurator.step(), SetupStep::Topic);
        assert!(configurator.format().is_none());
        assert_eq!(configurator.persona().unwrap().id, "aristotle");
    }
}

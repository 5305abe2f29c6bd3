//! Personas the agent can adopt, and the persona catalog
//!
//! Each persona is a declarative record: everything the engine and the
//! prompt builder need is a field here, so adding a persona never means
//! adding a `match` arm somewhere else.

use crate::core::error::DomainError;
use crate::core::topic::Topic;
use serde::Serialize;
use std::sync::Arc;

/// A rhetorical identity for the agent (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Persona {
    pub id: String,
    pub display_name: String,
    /// Short style descriptor, e.g. "Question-based, philosophical, probing"
    pub style_descriptor: String,
    /// Greeting template; `{name}` and `{topic}` are interpolated
    pub opening_template: String,
    /// Instructions that keep the generator in character
    pub behavioral_prompt: String,
    pub quote: String,
    /// Name of the debate approach, e.g. "Socratic Method"
    pub approach: String,
    pub specialty: String,
    /// One-glyph avatar used by text front ends
    pub symbol: String,
}

impl Persona {
    /// Render the opening greeting for a topic
    pub fn greeting(&self, topic: &Topic) -> String {
        self.opening_template
            .replace("{name}", &self.display_name)
            .replace("{topic}", topic.as_str())
    }
}

/// Read-only table of the available personas, keyed by id
#[derive(Debug, Clone)]
pub struct PersonaCatalog {
    personas: Arc<[Arc<Persona>]>,
}

impl PersonaCatalog {
    pub fn new(personas: Vec<Persona>) -> Self {
        Self {
            personas: personas.into_iter().map(Arc::new).collect(),
        }
    }

    /// The personas shipped with the application
    pub fn builtin() -> Self {
        Self::new(vec![
            Persona {
                id: "socrates".to_string(),
                display_name: "Socrates".to_string(),
                style_descriptor: "Question-based, philosophical, probing".to_string(),
                opening_template: "Greetings! I am {name}, and I shall help you examine your beliefs on \"{topic}\". Remember, the unexamined argument is not worth making. Let us begin our dialectic journey.".to_string(),
                behavioral_prompt: "- Use the Socratic method\n- Ask probing questions\n- Reference philosophical concepts\n- Speak in a dialectical manner".to_string(),
                quote: "The unexamined life is not worth living.".to_string(),
                approach: "Socratic Method".to_string(),
                specialty: "Critical Questioning".to_string(),
                symbol: "Σ".to_string(),
            },
            Persona {
                id: "sunTzu".to_string(),
                display_name: "Sun Tzu".to_string(),
                style_descriptor: "Strategic, metaphorical, calculated".to_string(),
                opening_template: "I am {name}. We meet on the field of \"{topic}\". Every battle is won before it is fought; show me the ground you intend to hold.".to_string(),
                behavioral_prompt: "- Use military and strategic terminology\n- Reference The Art of War\n- Speak with authority and wisdom\n- Use analogies related to warfare and strategy".to_string(),
                quote: "Know thy enemy and know thyself; in a hundred battles, you will never be defeated.".to_string(),
                approach: "Strategic Rhetoric".to_string(),
                specialty: "Strategic Positioning".to_string(),
                symbol: "孫".to_string(),
            },
            Persona {
                id: "shakespeare".to_string(),
                display_name: "Shakespeare".to_string(),
                style_descriptor: "Poetic, passionate, dramatic".to_string(),
                opening_template: "Good morrow! I am {name}, and the stage is set for \"{topic}\". Speak thy piece, and let the play begin.".to_string(),
                behavioral_prompt: "- Speak with eloquence and dramatic flair\n- Use poetic language and rhetorical devices\n- Reference your plays and sonnets\n- Let passion carry the argument".to_string(),
                quote: "To be, or not to be, that is the question.".to_string(),
                approach: "Dramatic Rhetoric".to_string(),
                specialty: "Persuasive Eloquence".to_string(),
                symbol: "W".to_string(),
            },
            Persona {
                id: "aristotle".to_string(),
                display_name: "Aristotle".to_string(),
                style_descriptor: "Logical, systematic, precise".to_string(),
                opening_template: "I am {name}. Let us reason about \"{topic}\" from first principles, defining our terms before we draw conclusions.".to_string(),
                behavioral_prompt: "- Use logical reasoning\n- Reference your works and theories\n- Speak with systematic precision\n- Use syllogistic arguments".to_string(),
                quote: "Excellence is never an accident. It is the result of high intention, sincere effort, and intelligent execution.".to_string(),
                approach: "Syllogistic Reasoning".to_string(),
                specialty: "Logical Analysis".to_string(),
                symbol: "A".to_string(),
            },
            Persona {
                id: "nietzsche".to_string(),
                display_name: "Nietzsche".to_string(),
                style_descriptor: "Aphoristic, intense, iconoclastic".to_string(),
                opening_template: "I am {name}. You wish to debate \"{topic}\"? Then be ready to see your cherished values overturned.".to_string(),
                behavioral_prompt: "- Use an aphoristic style\n- Reference your philosophical concepts\n- Speak with intensity and depth\n- Challenge conventional wisdom".to_string(),
                quote: "He who has a why to live can bear almost any how.".to_string(),
                approach: "Aphoristic Critique".to_string(),
                specialty: "Psychological Insight".to_string(),
                symbol: "N".to_string(),
            },
        ])
    }

    pub fn get(&self, id: &str) -> Option<Arc<Persona>> {
        self.personas.iter().find(|p| p.id == id).cloned()
    }

    /// Look up a persona, failing with [`DomainError::UnknownPersona`]
    pub fn require(&self, id: &str) -> Result<Arc<Persona>, DomainError> {
        self.get(id)
            .ok_or_else(|| DomainError::UnknownPersona(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter().map(|p| p.as_ref())
    }

    pub fn ids(&self) -> Vec<&str> {
        self.personas.iter().map(|p| p.id.as_str()).collect()
    }
}

impl Default for PersonaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_personas() {
        let catalog = PersonaCatalog::builtin();
        assert_eq!(
            catalog.ids(),
            vec!["socrates", "sunTzu", "shakespeare", "aristotle", "nietzsche"]
        );
        let sun_tzu = catalog.require("sunTzu").unwrap();
        assert_eq!(sun_tzu.display_name, "Sun Tzu");
        assert_eq!(sun_tzu.approach, "Strategic Rhetoric");
    }

    #[test]
    fn test_every_template_names_the_persona_and_topic() {
        let topic = Topic::try_new("Does social media do more harm than good?").unwrap();
        for persona in PersonaCatalog::builtin().iter() {
            let greeting = persona.greeting(&topic);
            assert!(greeting.contains(&persona.display_name), "{}", persona.id);
            assert!(greeting.contains(topic.as_str()), "{}", persona.id);
            assert!(!greeting.contains('{'), "{}", persona.id);
        }
    }

    #[test]
    fn test_socrates_greeting() {
        let socrates = PersonaCatalog::builtin().require("socrates").unwrap();
        let topic = Topic::try_new("X").unwrap();
        assert_eq!(
            socrates.greeting(&topic),
            "Greetings! I am Socrates, and I shall help you examine your beliefs on \"X\". Remember, the unexamined argument is not worth making. Let us begin our dialectic journey."
        );
    }

    #[test]
    fn test_unknown_persona() {
        let err = PersonaCatalog::builtin().require("plato").unwrap_err();
        assert_eq!(err, DomainError::UnknownPersona("plato".to_string()));
    }
}

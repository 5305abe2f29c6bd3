//! Topic value object

use serde::{Deserialize, Serialize};

/// The proposition under debate (Value Object)
///
/// Always non-empty after trimming. Construction goes through
/// [`Topic::try_new`], which is the gate the configurator uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic {
    content: String,
}

impl Topic {
    /// Try to create a topic, returning None if the text is blank
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                content: trimmed.to_string(),
            })
        }
    }

    /// Get the topic text
    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Topic {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Topic::try_new(value).ok_or_else(|| "topic cannot be empty".to_string())
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_is_trimmed() {
        let topic = Topic::try_new("  Is democracy the best form of government?  ").unwrap();
        assert_eq!(topic.as_str(), "Is democracy the best form of government?");
    }

    #[test]
    fn test_try_new_blank() {
        assert!(Topic::try_new("").is_none());
        assert!(Topic::try_new(" \n\t ").is_none());
    }

    #[test]
    fn test_deserialize_rejects_blank() {
        assert!(serde_json::from_str::<Topic>("\"   \"").is_err());
        let topic: Topic = serde_json::from_str("\"X\"").unwrap();
        assert_eq!(topic.as_str(), "X");
    }
}

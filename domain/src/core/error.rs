//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are configuration errors: the format and persona tables are closed
/// and known at build time, so hitting one of these means the caller passed
/// an id that never came from the catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown debate format: {0}")]
    UnknownFormat(String),

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Incomplete configuration, missing: {}", .missing.join(", "))]
    IncompleteConfiguration { missing: Vec<&'static str> },
}

impl DomainError {
    /// Check if this error was raised by a lookup into a closed catalog
    pub fn is_unknown_id(&self) -> bool {
        matches!(
            self,
            DomainError::UnknownFormat(_) | DomainError::UnknownPersona(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_configuration_display() {
        let error = DomainError::IncompleteConfiguration {
            missing: vec!["format", "persona"],
        };
        assert_eq!(
            error.to_string(),
            "Incomplete configuration, missing: format, persona"
        );
    }

    #[test]
    fn test_is_unknown_id_check() {
        assert!(DomainError::UnknownFormat("x".to_string()).is_unknown_id());
        assert!(DomainError::UnknownPersona("x".to_string()).is_unknown_id());
        assert!(!DomainError::InvalidTopic("".to_string()).is_unknown_id());
        assert!(
            !DomainError::IncompleteConfiguration { missing: vec![] }.is_unknown_id()
        );
    }
}

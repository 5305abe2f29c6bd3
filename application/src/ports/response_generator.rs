//! Response generator port
//!
//! Defines the interface for producing the agent's next turn.

use async_trait::async_trait;
use debate_domain::{FailureKind, GenerationFailure, GenerationRequest};
use thiserror::Error;

/// Errors that can occur while generating a reply
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("No API key configured (set {0})")]
    MissingCredentials(String),

    #[error("API key rejected: {0}")]
    InvalidCredentials(String),

    #[error("Service unavailable: {0}")]
    Transient(String),

    #[error("Reply blocked: {0}")]
    Blocked(String),

    #[error("Empty reply")]
    Empty,

    #[error("Generator error: {0}")]
    Other(String),
}

impl GeneratorError {
    /// Whether calling again with the same request can succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, GeneratorError::Transient(_))
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            GeneratorError::MissingCredentials(_) | GeneratorError::InvalidCredentials(_) => {
                FailureKind::Credentials
            }
            GeneratorError::Transient(_) | GeneratorError::Other(_) => FailureKind::Transient,
            GeneratorError::Blocked(_) => FailureKind::Blocked,
            GeneratorError::Empty => FailureKind::Empty,
        }
    }
}

impl From<GeneratorError> for GenerationFailure {
    fn from(err: GeneratorError) -> Self {
        GenerationFailure::new(err.kind(), err.to_string())
    }
}

/// Produces the agent's reply for a request
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Short name for logs and status output
    fn name(&self) -> &str;

    /// Generate the agent's next turn
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError>;
}

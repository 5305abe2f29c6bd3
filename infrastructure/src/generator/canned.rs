//! Offline response generator with canned replies

use async_trait::async_trait;
use debate_application::{GeneratorError, ResponseGenerator};
use debate_domain::GenerationRequest;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

/// The stock replies used when no API is available
pub const CANNED_REPLIES: [&str; 5] = [
    "That's an interesting perspective. Have you considered the implications if everyone were to follow that reasoning?",
    "I appreciate your argument, but I wonder if you've thought about the opposing viewpoint? What would someone who disagrees say?",
    "Let's examine your premises more carefully. How did you arrive at that conclusion?",
    "Your point has merit, but I'm curious: how would this work in practice rather than just in theory?",
    "That's a compelling argument. Now, if we were to take it to its logical conclusion, what would the world look like?",
];

/// Picks one canned reply at random, after an optional simulated delay
pub struct CannedResponseGenerator {
    replies: Vec<String>,
    delay: Duration,
    rng: Mutex<StdRng>,
}

impl CannedResponseGenerator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Reproducible reply order
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            replies: CANNED_REPLIES.iter().map(|r| r.to_string()).collect(),
            delay: Duration::ZERO,
            rng: Mutex::new(rng),
        }
    }

    /// Wait this long before answering, like a thinking opponent
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_replies(mut self, replies: Vec<String>) -> Self {
        self.replies = replies;
        self
    }
}

impl Default for CannedResponseGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseGenerator for CannedResponseGenerator {
    fn name(&self) -> &str {
        "offline"
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String, GeneratorError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.replies.is_empty() {
            return Err(GeneratorError::Empty);
        }
        let index = self
            .rng
            .lock()
            .map_err(|_| GeneratorError::Other("reply picker unavailable".to_string()))?
            .random_range(0..self.replies.len());
        Ok(self.replies[index].clone())
    }
}

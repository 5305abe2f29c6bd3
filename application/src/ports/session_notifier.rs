//! Session notification port
//!
//! Defines the interface for reporting what happens around an exchange
//! while the front end waits.

use crate::ports::response_generator::GeneratorError;

/// Callback for session progress
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain text, etc.)
pub trait SessionNotifier: Send + Sync {
    /// Called when a reply request is sent
    fn on_thinking_start(&self, _persona: &str) {}

    /// Called when the request finished, successfully or not
    fn on_thinking_end(&self) {}

    /// Called before an automatic retry of a transient failure
    fn on_retry(&self, _attempt: u32, _max_retries: u32, _error: &GeneratorError) {}

    /// Called once per second while the round countdown runs
    fn on_tick(&self, _remaining_seconds: u32) {}

    /// Called when the round countdown reaches zero
    fn on_time_expired(&self, round: u32);
}

/// No-op notifier for when progress reporting is not needed
pub struct NoSessionNotifier;

impl SessionNotifier for NoSessionNotifier {
    fn on_time_expired(&self, _round: u32) {}
}

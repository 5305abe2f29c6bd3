//! Run Debate use case.
//!
//! Drives one [`DebateSession`] against a [`ResponseGenerator`]:
//! submit a user turn, wait for the reply (bounded by the behavior timeout,
//! with automatic retries for transient failures), then hand the reply back
//! to the session under the ticket it was issued with.
//!
//! The session lives behind an async mutex shared with the round timer.
//! The lock is never held while the generator runs, so `end()` and the
//! timer keep working while a reply is outstanding; a reply that comes back
//! after the session moved on is discarded by the ticket check.
//!
//! Credential failures are fatal: the session is ended on the spot, since
//! the key is fixed for the lifetime of the generator.

use crate::config::BehaviorConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::response_generator::{GeneratorError, ResponseGenerator};
use crate::ports::session_notifier::{NoSessionNotifier, SessionNotifier};
use debate_domain::{
    DebateReport, DebateSession, FailureKind, GenerationFailure, GenerationRequest, PendingReply,
    ReplyOutcome, ReplyTicket, Turn, TurnRejection,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// A session shared between the use case, the round timer and the front end
pub type SharedSession = Arc<Mutex<DebateSession>>;

/// Errors that can occur during a debate exchange
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunDebateError {
    #[error(transparent)]
    Rejected(#[from] TurnRejection),
}

/// Use case for running a debate
pub struct RunDebateUseCase {
    session: SharedSession,
    generator: Arc<dyn ResponseGenerator>,
    notifier: Arc<dyn SessionNotifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
    behavior: BehaviorConfig,
}

impl Clone for RunDebateUseCase {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            generator: self.generator.clone(),
            notifier: self.notifier.clone(),
            conversation_logger: self.conversation_logger.clone(),
            behavior: self.behavior.clone(),
        }
    }
}

impl RunDebateUseCase {
    pub fn new(session: DebateSession, generator: Arc<dyn ResponseGenerator>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            generator,
            notifier: Arc::new(NoSessionNotifier),
            conversation_logger: Arc::new(NoConversationLogger),
            behavior: BehaviorConfig::default(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn SessionNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    /// Handle to the session, for the round timer and status display
    pub fn session(&self) -> SharedSession {
        self.session.clone()
    }

    /// Log the start of the debate and return the opening greeting
    pub async fn begin(&self) -> Option<Turn> {
        let session = self.session.lock().await;
        let config = session.config();
        info!(
            "Starting debate {} on \"{}\" against {} ({}, {} rounds)",
            session.id(),
            config.topic(),
            config.persona().display_name,
            config.format().name,
            config.format().round_count
        );
        self.conversation_logger.log(ConversationEvent::new(
            "session_started",
            json!({
                "session_id": session.id().to_string(),
                "generator": self.generator.name(),
                "config": config.to_stored(),
            }),
        ));
        session.transcript().first().cloned()
    }

    /// Submit a user turn and wait for the agent's reply
    pub async fn submit(&self, text: &str) -> Result<ReplyOutcome, RunDebateError> {
        let pending = {
            let mut session = self.session.lock().await;
            let pending = session.submit_user_turn(text)?;
            if let Some(turn) = session.transcript().last() {
                self.log_turn("user_turn", pending.request.round, turn);
            }
            pending
        };
        Ok(self.exchange(pending).await)
    }

    /// Ask again for the reply to the last user turn after a failure
    pub async fn retry(&self) -> Result<ReplyOutcome, RunDebateError> {
        let pending = self.session.lock().await.retry_reply()?;
        info!("Retrying reply for round {}", pending.request.round);
        Ok(self.exchange(pending).await)
    }

    /// End the debate. Returns whether this call ended it.
    pub async fn end(&self) -> bool {
        let mut session = self.session.lock().await;
        self.end_locked(&mut session, "user")
    }

    pub async fn report(&self) -> DebateReport {
        self.session.lock().await.report()
    }

    // ==================== Internals ====================

    async fn exchange(&self, pending: PendingReply) -> ReplyOutcome {
        let PendingReply { ticket, request } = pending;

        self.notifier.on_thinking_start(&request.persona_name);
        let reply = self.generate_with_retry(&ticket, &request).await;
        self.notifier.on_thinking_end();

        let outcome = {
            let mut session = self.session.lock().await;
            session.resolve_reply(ticket, reply.map_err(GenerationFailure::from))
        };

        match &outcome {
            ReplyOutcome::Applied { turn, concluded } => {
                debug!("Reply applied for round {}", request.round);
                self.log_turn("agent_turn", request.round, turn);
                if *concluded {
                    info!("Debate concluded after {} rounds", request.round_count);
                }
            }
            ReplyOutcome::Failed(failure) => {
                warn!("Reply failed ({:?}): {}", failure.kind, failure.message);
                self.conversation_logger.log(ConversationEvent::new(
                    "reply_failed",
                    json!({
                        "round": request.round,
                        "kind": failure.kind,
                        "message": failure.message,
                    }),
                ));
                if failure.kind == FailureKind::Credentials {
                    let mut session = self.session.lock().await;
                    self.end_locked(&mut session, "credentials");
                }
            }
            ReplyOutcome::Discarded => {
                debug!("Discarded stale reply for exchange {}", ticket.exchange);
                self.conversation_logger.log(ConversationEvent::new(
                    "reply_discarded",
                    json!({ "round": request.round, "exchange": ticket.exchange }),
                ));
            }
        }

        outcome
    }

    async fn generate_with_retry(
        &self,
        ticket: &ReplyTicket,
        request: &GenerationRequest,
    ) -> Result<String, GeneratorError> {
        let max_retries = self.behavior.max_retries;
        let mut attempt = 0;
        loop {
            match self.generate_once(request).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_transient() && attempt < max_retries => {
                    if !self.session.lock().await.is_current(ticket) {
                        return Err(err);
                    }
                    let delay = self.behavior.backoff_for(attempt);
                    attempt += 1;
                    warn!(
                        "{} failed ({}), retry {}/{} in {:?}",
                        self.generator.name(),
                        err,
                        attempt,
                        max_retries,
                        delay
                    );
                    self.notifier.on_retry(attempt, max_retries, &err);
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn generate_once(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        match self.behavior.timeout {
            Some(limit) => tokio::time::timeout(limit, self.generator.generate(request))
                .await
                .map_err(|_| {
                    GeneratorError::Transient(format!("no reply within {}s", limit.as_secs()))
                })?,
            None => self.generator.generate(request).await,
        }
    }

    fn end_locked(&self, session: &mut DebateSession, reason: &str) -> bool {
        let ended = session.end_session();
        if ended {
            info!("Debate {} ended ({})", session.id(), reason);
            self.conversation_logger.log(ConversationEvent::new(
                "session_ended",
                json!({
                    "session_id": session.id().to_string(),
                    "reason": reason,
                    "rounds_completed": session.rounds_completed(),
                    "metrics": session.metrics(),
                }),
            ));
        }
        ended
    }

    fn log_turn(&self, event_type: &'static str, round: u32, turn: &Turn) {
        self.conversation_logger.log(ConversationEvent::new(
            event_type,
            json!({
                "round": round,
                "turn_id": turn.id.value(),
                "speaker": turn.speaker,
                "text": turn.text,
            }),
        ));
    }
}

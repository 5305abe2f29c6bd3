//! Debate session engine
//!
//! [`DebateSession`] is a synchronous state machine. It never talks to the
//! response generator itself: [`submit_user_turn`](DebateSession::submit_user_turn)
//! hands back a [`PendingReply`] and the caller feeds the generator's answer
//! into [`resolve_reply`](DebateSession::resolve_reply) together with the
//! ticket it was issued. That split is what makes stale completions (a reply
//! arriving after the session ended or after a retry) detectable.
//!
//! A failed reply either keeps the exchange open for
//! [`retry_reply`](DebateSession::retry_reply) (transient failures) or hands
//! the floor back to the user with their turn left unanswered. The next
//! submission then supersedes that turn, so speakers keep alternating.

use super::entities::{Speaker, Turn, TurnId};
use super::timer::RoundTimer;
use super::value_objects::{
    GenerationFailure, GenerationRequest, PendingReply, ReplyOutcome, ReplyTicket, SessionId,
    SessionPhase, TimerEvent, TurnRejection,
};
use crate::scoring::metrics::PerformanceMetrics;
use crate::scoring::report::DebateReport;
use crate::scoring::strategy::{RandomDeltaScoring, ScoringStrategy};
use crate::setup::config::SessionConfig;

/// One debate, from greeting to conclusion
pub struct DebateSession {
    id: SessionId,
    config: SessionConfig,
    phase: SessionPhase,
    transcript: Vec<Turn>,
    next_turn_id: u64,
    /// 1-based; reaches `round_count + 1` once the final exchange completes
    round: u32,
    awaiting_agent_response: bool,
    exchange: u64,
    metrics: PerformanceMetrics,
    timer: Option<RoundTimer>,
    last_failure: Option<GenerationFailure>,
    scoring: Box<dyn ScoringStrategy>,
}

impl DebateSession {
    /// Start a session with the default heuristic scoring
    pub fn start(config: SessionConfig) -> Self {
        Self::start_with_scoring(config, Box::new(RandomDeltaScoring::new()))
    }

    /// Start a session, synthesizing the persona's greeting
    pub fn start_with_scoring(config: SessionConfig, scoring: Box<dyn ScoringStrategy>) -> Self {
        let timer = RoundTimer::for_round(config.format().seconds_per_round);
        let mut session = Self {
            id: SessionId::new(),
            config,
            phase: SessionPhase::Opening,
            transcript: Vec::new(),
            next_turn_id: 1,
            round: 1,
            awaiting_agent_response: false,
            exchange: 0,
            metrics: PerformanceMetrics::default(),
            timer,
            last_failure: None,
            scoring,
        };

        let greeting = session.config.persona().greeting(session.config.topic());
        session.append(Speaker::Agent, greeting);
        session.phase = SessionPhase::AwaitingUser;
        session
    }

    /// Replace the starting metrics (before the first exchange)
    pub fn with_initial_metrics(mut self, metrics: PerformanceMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Round being played, never above the format's round count
    pub fn current_round(&self) -> u32 {
        self.round.min(self.round_count())
    }

    pub fn rounds_completed(&self) -> u32 {
        self.round - 1
    }

    pub fn round_count(&self) -> u32 {
        self.config.format().round_count
    }

    pub fn awaiting_agent_response(&self) -> bool {
        self.awaiting_agent_response
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    /// Seconds left in the current round, only for timed formats
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.timer.as_ref().map(RoundTimer::remaining)
    }

    /// The most recent failed reply, until the exchange moves on
    pub fn last_failure(&self) -> Option<&GenerationFailure> {
        self.last_failure.as_ref()
    }

    /// The user turn left without a reply by a failure that offered no retry
    ///
    /// The next [`submit_user_turn`](Self::submit_user_turn) replaces it.
    pub fn unanswered_turn(&self) -> Option<&Turn> {
        if self.phase != SessionPhase::AwaitingUser {
            return None;
        }
        self.transcript.last().filter(|turn| turn.is_user())
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Whether a ticket still refers to the outstanding request
    pub fn is_current(&self, ticket: &ReplyTicket) -> bool {
        ticket.session_id == self.id
            && ticket.exchange == self.exchange
            && self.phase == SessionPhase::AwaitingAgent
            && self.awaiting_agent_response
    }

    pub fn report(&self) -> DebateReport {
        DebateReport::build(
            self.config.topic().as_str(),
            self.config.persona().display_name.as_str(),
            self.rounds_completed(),
            self.round_count(),
            &self.metrics,
        )
    }

    // ==================== Operations ====================

    /// Append a user turn and issue a request for the agent's reply
    pub fn submit_user_turn(&mut self, text: &str) -> Result<PendingReply, TurnRejection> {
        match self.phase {
            SessionPhase::AwaitingUser => {}
            SessionPhase::AwaitingAgent => return Err(TurnRejection::SessionBusy),
            SessionPhase::Concluded => return Err(TurnRejection::SessionConcluded),
            SessionPhase::Ended => return Err(TurnRejection::SessionEnded),
            SessionPhase::Opening => return Err(TurnRejection::InvalidTurnSubmission),
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(TurnRejection::InvalidTurnSubmission);
        }

        if self.unanswered_turn().is_some() {
            self.transcript.pop();
        }
        self.last_failure = None;
        self.append(Speaker::User, text);
        self.phase = SessionPhase::AwaitingAgent;
        Ok(self.issue_request())
    }

    /// Apply the generator's answer for `ticket`
    pub fn resolve_reply(
        &mut self,
        ticket: ReplyTicket,
        reply: Result<String, GenerationFailure>,
    ) -> ReplyOutcome {
        if !self.is_current(&ticket) {
            return ReplyOutcome::Discarded;
        }

        let text = match reply {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => return self.fail(GenerationFailure::empty()),
            Err(failure) => return self.fail(failure),
        };

        let turn = self.append(Speaker::Agent, text.trim()).clone();
        self.awaiting_agent_response = false;
        self.last_failure = None;
        self.metrics = self.scoring.score(&self.metrics, &turn);

        self.round += 1;
        let concluded = self.round > self.round_count();
        if concluded {
            self.phase = SessionPhase::Concluded;
        } else {
            self.phase = SessionPhase::AwaitingUser;
            if let Some(timer) = self.timer.as_mut() {
                timer.reset();
            }
        }

        ReplyOutcome::Applied { turn, concluded }
    }

    /// Re-request the reply to the preserved user turn after a transient failure
    ///
    /// Issues a fresh ticket; any older ticket becomes stale. Failures that
    /// offer no retry (credentials, blocked, empty) are refused with
    /// [`TurnRejection::RetryNotOffered`].
    pub fn retry_reply(&mut self) -> Result<PendingReply, TurnRejection> {
        match self.phase {
            SessionPhase::AwaitingAgent if self.awaiting_agent_response => {
                Err(TurnRejection::SessionBusy)
            }
            SessionPhase::AwaitingAgent => {
                self.last_failure = None;
                Ok(self.issue_request())
            }
            SessionPhase::Concluded => Err(TurnRejection::SessionConcluded),
            SessionPhase::Ended => Err(TurnRejection::SessionEnded),
            SessionPhase::AwaitingUser if self.unanswered_turn().is_some() => {
                Err(TurnRejection::RetryNotOffered)
            }
            SessionPhase::Opening | SessionPhase::AwaitingUser => {
                Err(TurnRejection::NothingToRetry)
            }
        }
    }

    /// End the debate. Idempotent; returns whether this call ended it.
    pub fn end_session(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = SessionPhase::Ended;
        self.awaiting_agent_response = false;
        true
    }

    /// Advance the round countdown by one second
    ///
    /// The countdown only runs while waiting for the user; it is paused while
    /// a reply is outstanding, so expiry never overlaps a pending request.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.phase != SessionPhase::AwaitingUser {
            return None;
        }
        let round = self.current_round();
        let timer = self.timer.as_mut()?;
        timer.tick().then_some(TimerEvent::Expired { round })
    }

    // ==================== Internals ====================

    fn append(&mut self, speaker: Speaker, text: impl Into<String>) -> &Turn {
        if let Some(last) = self.transcript.last() {
            debug_assert_ne!(last.speaker, speaker, "turns must alternate");
        }
        let id = TurnId::new(self.next_turn_id);
        self.next_turn_id += 1;
        self.transcript.push(Turn::new(id, speaker, text));
        &self.transcript[self.transcript.len() - 1]
    }

    fn issue_request(&mut self) -> PendingReply {
        self.exchange += 1;
        self.awaiting_agent_response = true;

        let persona = self.config.persona();
        PendingReply {
            ticket: ReplyTicket {
                session_id: self.id,
                exchange: self.exchange,
            },
            request: GenerationRequest {
                topic: self.config.topic().as_str().to_string(),
                persona_name: persona.display_name.clone(),
                style_descriptor: persona.style_descriptor.clone(),
                behavioral_prompt: persona.behavioral_prompt.clone(),
                transcript: self.transcript.clone(),
                round: self.current_round(),
                round_count: self.round_count(),
            },
        }
    }

    fn fail(&mut self, failure: GenerationFailure) -> ReplyOutcome {
        self.awaiting_agent_response = false;
        if !failure.is_retryable() {
            self.phase = SessionPhase::AwaitingUser;
        }
        self.last_failure = Some(failure.clone());
        ReplyOutcome::Failed(failure)
    }
}

impl std::fmt::Debug for DebateSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebateSession")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("turns", &self.transcript.len())
            .field("awaiting_agent_response", &self.awaiting_agent_response)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::format::DebateFormat;
    use crate::scoring::metrics::MetricDeltas;
    use crate::session::value_objects::FailureKind;
    use crate::setup::configurator::SessionConfigurator;
    use std::sync::Arc;

    fn config(format: &str, persona: &str, topic: &str) -> SessionConfig {
        let mut configurator = SessionConfigurator::default();
        assert!(configurator.set_topic(topic));
        configurator.select_format(format).unwrap();
        configurator.select_persona(persona).unwrap();
        configurator.finalize().unwrap()
    }

    fn two_round_config() -> SessionConfig {
        let base = config("socratic", "socrates", "X");
        SessionConfig::new(
            base.topic().clone(),
            DebateFormat::new("two", "Two", "", 2, 0),
            Arc::new(base.persona().clone()),
        )
    }

    fn session(config: SessionConfig) -> DebateSession {
        DebateSession::start_with_scoring(config, Box::new(RandomDeltaScoring::seeded(1)))
    }

    fn speakers(session: &DebateSession) -> Vec<Speaker> {
        session.transcript().iter().map(|t| t.speaker).collect()
    }

    #[test]
    fn test_start_opens_with_single_agent_greeting() {
        for persona in ["socrates", "sunTzu", "shakespeare", "aristotle", "nietzsche"] {
            let s = session(config("classical", persona, "Is democracy the best form of government?"));
            assert_eq!(s.transcript().len(), 1);
            assert_eq!(s.transcript()[0].speaker, Speaker::Agent);
            assert_eq!(s.phase(), SessionPhase::AwaitingUser);
            assert_eq!(s.current_round(), 1);
            assert!(!s.awaiting_agent_response());
        }
    }

    #[test]
    fn test_two_round_scenario() {
        let mut s = session(two_round_config());
        assert!(s.transcript()[0].text.starts_with("Greetings! I am Socrates"));

        let pending = s.submit_user_turn("A1").unwrap();
        assert_eq!(s.phase(), SessionPhase::AwaitingAgent);
        assert_eq!(speakers(&s), vec![Speaker::Agent, Speaker::User]);
        assert_eq!(pending.request.round, 1);
        assert_eq!(pending.request.round_count, 2);
        assert_eq!(pending.request.transcript.len(), 2);

        let outcome = s.resolve_reply(pending.ticket, Ok("R1".to_string()));
        assert!(matches!(outcome, ReplyOutcome::Applied { concluded: false, .. }));
        let texts: Vec<&str> = s.transcript().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(&texts[1..], &["A1", "R1"]);
        assert_eq!(s.current_round(), 2);
        assert_eq!(s.phase(), SessionPhase::AwaitingUser);

        let pending = s.submit_user_turn("A2").unwrap();
        let outcome = s.resolve_reply(pending.ticket, Ok("R2".to_string()));
        assert!(matches!(outcome, ReplyOutcome::Applied { concluded: true, .. }));
        assert_eq!(s.phase(), SessionPhase::Concluded);
        assert_eq!(s.rounds_completed(), 2);
        assert_eq!(s.current_round(), 2);

        let before = s.transcript().len();
        assert_eq!(s.submit_user_turn("A3").unwrap_err(), TurnRejection::SessionConcluded);
        assert_eq!(s.transcript().len(), before);
    }

    #[test]
    fn test_transcript_length_and_alternation() {
        let mut s = session(config("rapid", "sunTzu", "X"));
        for n in 1..=10u32 {
            let pending = s.submit_user_turn(&format!("argument {n}")).unwrap();
            s.resolve_reply(pending.ticket, Ok(format!("reply {n}")));
            assert_eq!(s.transcript().len(), 1 + 2 * n as usize);
            assert!(s.current_round() <= s.round_count());
        }
        for (i, turn) in s.transcript().iter().enumerate() {
            let expected = if i % 2 == 0 { Speaker::Agent } else { Speaker::User };
            assert_eq!(turn.speaker, expected);
        }
        let ids: Vec<u64> = s.transcript().iter().map(|t| t.id.value()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(s.phase(), SessionPhase::Concluded);
    }

    #[test]
    fn test_blank_submission_is_rejected_without_change() {
        let mut s = session(config("casual", "aristotle", "X"));
        assert_eq!(
            s.submit_user_turn("  \n").unwrap_err(),
            TurnRejection::InvalidTurnSubmission
        );
        assert_eq!(s.transcript().len(), 1);
        assert_eq!(s.phase(), SessionPhase::AwaitingUser);
    }

    #[test]
    fn test_submission_while_busy_is_rejected() {
        let mut s = session(config("casual", "aristotle", "X"));
        s.submit_user_turn("first").unwrap();
        assert!(s.awaiting_agent_response());
        assert_eq!(s.submit_user_turn("second").unwrap_err(), TurnRejection::SessionBusy);
        assert_eq!(s.transcript().len(), 2);
    }

    #[test]
    fn test_end_session_is_idempotent_and_discards_late_reply() {
        let mut s = session(config("casual", "nietzsche", "X"));
        let pending = s.submit_user_turn("my case").unwrap();
        let metrics = *s.metrics();

        assert!(s.end_session());
        assert!(!s.end_session());
        assert_eq!(s.phase(), SessionPhase::Ended);

        let outcome = s.resolve_reply(pending.ticket, Ok("too late".to_string()));
        assert_eq!(outcome, ReplyOutcome::Discarded);
        assert_eq!(s.transcript().len(), 2);
        assert_eq!(*s.metrics(), metrics);
        assert_eq!(s.submit_user_turn("more").unwrap_err(), TurnRejection::SessionEnded);
    }

    #[test]
    fn test_end_session_from_every_phase() {
        let mut fresh = session(config("casual", "socrates", "X"));
        assert!(fresh.end_session());

        let mut concluded = session(two_round_config());
        for _ in 0..2 {
            let p = concluded.submit_user_turn("a").unwrap();
            concluded.resolve_reply(p.ticket, Ok("r".to_string()));
        }
        assert!(!concluded.end_session());
        assert_eq!(concluded.phase(), SessionPhase::Concluded);
    }

    #[test]
    fn test_failure_keeps_user_turn_and_allows_retry() {
        let mut s = session(config("casual", "socrates", "X"));
        let pending = s.submit_user_turn("my point").unwrap();

        let failure = GenerationFailure::new(FailureKind::Transient, "503");
        let outcome = s.resolve_reply(pending.ticket, Err(failure.clone()));
        assert_eq!(outcome, ReplyOutcome::Failed(failure.clone()));
        assert_eq!(s.phase(), SessionPhase::AwaitingAgent);
        assert!(!s.awaiting_agent_response());
        assert_eq!(s.last_failure(), Some(&failure));
        assert_eq!(s.transcript().last().unwrap().text, "my point");

        // Still one exchange at a time
        assert_eq!(s.submit_user_turn("again").unwrap_err(), TurnRejection::SessionBusy);

        let retry = s.retry_reply().unwrap();
        assert_eq!(retry.request.transcript.last().unwrap().text, "my point");
        assert_eq!(s.retry_reply().unwrap_err(), TurnRejection::SessionBusy);

        // The first ticket is superseded
        assert_eq!(
            s.resolve_reply(pending.ticket, Ok("stale".to_string())),
            ReplyOutcome::Discarded
        );
        assert!(matches!(
            s.resolve_reply(retry.ticket, Ok("fresh".to_string())),
            ReplyOutcome::Applied { .. }
        ));
        assert_eq!(s.transcript().len(), 3);
        assert!(s.last_failure().is_none());
    }

    #[test]
    fn test_blank_reply_is_an_empty_failure() {
        let mut s = session(config("casual", "socrates", "X"));
        let pending = s.submit_user_turn("my point").unwrap();
        match s.resolve_reply(pending.ticket, Ok("   ".to_string())) {
            ReplyOutcome::Failed(f) => assert_eq!(f.kind, FailureKind::Empty),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(s.transcript().len(), 2);
        assert_eq!(s.phase(), SessionPhase::AwaitingUser);
    }

    #[test]
    fn test_non_retryable_failures_hand_the_floor_back() {
        for kind in [FailureKind::Credentials, FailureKind::Blocked, FailureKind::Empty] {
            let mut s = session(config("casual", "socrates", "X"));
            let pending = s.submit_user_turn("my point").unwrap();
            let failure = GenerationFailure::new(kind, "refused");
            let outcome = s.resolve_reply(pending.ticket, Err(failure.clone()));

            assert_eq!(outcome, ReplyOutcome::Failed(failure.clone()), "{kind:?}");
            assert_eq!(s.phase(), SessionPhase::AwaitingUser, "{kind:?}");
            assert!(!s.awaiting_agent_response());
            assert_eq!(s.last_failure(), Some(&failure));
            assert_eq!(s.unanswered_turn().map(|t| t.text.as_str()), Some("my point"));
            assert_eq!(
                s.retry_reply().unwrap_err(),
                TurnRejection::RetryNotOffered,
                "{kind:?}"
            );
            assert_eq!(s.transcript().len(), 2);
        }
    }

    #[test]
    fn test_rephrase_after_blocked_reply_supersedes_unanswered_turn() {
        let mut s = session(config("casual", "socrates", "X"));
        let pending = s.submit_user_turn("blunt point").unwrap();
        s.resolve_reply(
            pending.ticket,
            Err(GenerationFailure::new(FailureKind::Blocked, "SAFETY")),
        );
        let blocked_id = s.transcript()[1].id;

        let pending = s.submit_user_turn("rephrased").unwrap();
        assert_eq!(s.phase(), SessionPhase::AwaitingAgent);
        assert!(s.last_failure().is_none());
        assert_eq!(speakers(&s), vec![Speaker::Agent, Speaker::User]);
        assert_eq!(s.transcript()[1].text, "rephrased");
        assert!(s.transcript()[1].id > blocked_id);
        assert_eq!(pending.request.transcript.last().unwrap().text, "rephrased");
        assert_eq!(pending.request.round, 1);

        s.resolve_reply(pending.ticket, Ok("answer".to_string()));
        assert_eq!(s.transcript().len(), 3);
        assert_eq!(s.rounds_completed(), 1);
        assert!(s.unanswered_turn().is_none());
    }

    #[test]
    fn test_timer_resumes_after_reply_is_refused() {
        let mut s = session(config("rapid", "socrates", "X"));
        s.tick();
        let pending = s.submit_user_turn("a").unwrap();
        s.resolve_reply(pending.ticket, Err(GenerationFailure::empty()));
        s.tick();
        assert_eq!(s.remaining_seconds(), Some(58));
    }

    #[test]
    fn test_retry_without_failure() {
        let mut s = session(config("casual", "socrates", "X"));
        assert_eq!(s.retry_reply().unwrap_err(), TurnRejection::NothingToRetry);
    }

    #[test]
    fn test_ticket_from_another_session_is_discarded() {
        let mut a = session(config("casual", "socrates", "X"));
        let mut b = session(config("casual", "socrates", "X"));
        let pa = a.submit_user_turn("a").unwrap();
        b.submit_user_turn("b").unwrap();
        assert_eq!(b.resolve_reply(pa.ticket, Ok("r".to_string())), ReplyOutcome::Discarded);
        assert_eq!(b.transcript().len(), 2);
    }

    #[test]
    fn test_metrics_use_the_injected_strategy() {
        let strategy = |prior: &PerformanceMetrics, turn: &Turn| {
            assert!(turn.is_agent());
            prior.apply(MetricDeltas {
                logic: 50,
                rhetoric: -50,
                evidence: 1,
            })
        };
        let mut s = DebateSession::start_with_scoring(
            config("rapid", "socrates", "X"),
            Box::new(strategy),
        )
        .with_initial_metrics(PerformanceMetrics::new(60, 60, 60));

        for _ in 0..3 {
            let p = s.submit_user_turn("a").unwrap();
            s.resolve_reply(p.ticket, Ok("r".to_string()));
        }
        assert_eq!(*s.metrics(), PerformanceMetrics::new(100, 0, 63));
    }

    #[test]
    fn test_metrics_stay_in_bounds_with_default_scoring() {
        let mut s = session(config("rapid", "socrates", "X"));
        while !s.is_terminal() {
            let p = s.submit_user_turn("a").unwrap();
            s.resolve_reply(p.ticket, Ok("r".to_string()));
            let m = s.metrics();
            assert!(m.logic() <= 100 && m.rhetoric() <= 100 && m.evidence() <= 100);
        }
    }

    #[test]
    fn test_timer_counts_down_only_while_awaiting_user() {
        let mut s = session(config("rapid", "socrates", "X"));
        assert_eq!(s.remaining_seconds(), Some(60));
        for _ in 0..10 {
            assert!(s.tick().is_none());
        }
        assert_eq!(s.remaining_seconds(), Some(50));

        let pending = s.submit_user_turn("a").unwrap();
        for _ in 0..100 {
            assert!(s.tick().is_none());
        }
        assert_eq!(s.remaining_seconds(), Some(50));

        s.resolve_reply(pending.ticket, Ok("r".to_string()));
        assert_eq!(s.remaining_seconds(), Some(60));

        let mut events = Vec::new();
        for _ in 0..70 {
            events.extend(s.tick());
        }
        assert_eq!(events, vec![TimerEvent::Expired { round: 2 }]);
    }

    #[test]
    fn test_untimed_format_never_ticks() {
        let mut s = session(config("socratic", "socrates", "X"));
        assert_eq!(s.remaining_seconds(), None);
        assert!(s.tick().is_none());
    }

    #[test]
    fn test_report_reflects_progress() {
        let mut s = session(two_round_config());
        let p = s.submit_user_turn("a").unwrap();
        s.resolve_reply(p.ticket, Ok("r".to_string()));
        let report = s.report();
        assert_eq!(report.rounds_completed, 1);
        assert_eq!(report.round_count, 2);
        assert_eq!(report.opponent, "Socrates");
        assert_eq!(report.topic, "X");
    }
}

//! Round countdown task.
//!
//! Ticks the shared session once per second. The session decides whether
//! the countdown is running (only while the user is expected to answer),
//! so this task only forwards what the session reports.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::session_notifier::SessionNotifier;
use crate::use_cases::run_debate::SharedSession;
use debate_domain::TimerEvent;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Spawn the countdown for a timed debate
///
/// The task stops when `cancel` fires or the session reaches a terminal
/// phase. Untimed sessions never report ticks or expiry.
pub fn spawn_round_timer(
    session: SharedSession,
    notifier: Arc<dyn SessionNotifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        interval.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Round timer cancelled");
                    break;
                }
                _ = interval.tick() => {}
            }

            let mut guard = session.lock().await;
            if guard.is_terminal() {
                debug!("Round timer stopping: session {}", guard.phase().as_str());
                break;
            }
            let before = guard.remaining_seconds();
            let event = guard.tick();
            let after = guard.remaining_seconds();
            drop(guard);

            if let Some(seconds) = after.filter(|_| after != before) {
                notifier.on_tick(seconds);
            }
            if let Some(TimerEvent::Expired { round }) = event {
                info!("Time expired in round {}", round);
                conversation_logger.log(ConversationEvent::new(
                    "time_expired",
                    json!({ "round": round }),
                ));
                notifier.on_time_expired(round);
            }
        }
    })
}

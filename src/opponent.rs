//! Deferred computer opponent: the move fires after a thinking delay.
//!
//! The delay is presentation flavor, not a correctness requirement;
//! what matters is that a scheduled move applies at most once per AI
//! turn and that a cancelled or stale schedule never touches the
//! board. Staleness is detected by capturing the move count at
//! schedule time and re-checking it, along with the session state,
//! when the delay elapses.

use crate::session::{GameSession, SessionState};
use rand::Rng;
use rand::rngs::SmallRng;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

/// Schedules the computer opponent's reply on a shared session after
/// the session's configured thinking delay.
///
/// Must be used within a Tokio runtime. Dropping the handle cancels a
/// pending move.
#[derive(Debug)]
pub struct DeferredOpponent<R = SmallRng> {
    session: Arc<Mutex<GameSession<R>>>,
    pending: Option<JoinHandle<()>>,
}

impl<R: Rng + Send + 'static> DeferredOpponent<R> {
    /// Creates a deferred opponent driving the given session.
    pub fn new(session: Arc<Mutex<GameSession<R>>>) -> Self {
        Self {
            session,
            pending: None,
        }
    }

    /// Schedules the opponent's move after the configured delay.
    ///
    /// Replaces any previously pending schedule. When the delay
    /// elapses, the move is applied only if the session is still
    /// awaiting the opponent and no move landed in between; otherwise
    /// the computation is discarded.
    #[instrument(skip(self))]
    pub fn schedule(&mut self) {
        self.cancel();

        let (epoch, delay) = {
            let session = self.session.lock().unwrap();
            if session.state() != SessionState::AwaitingAi {
                warn!(state = ?session.state(), "not awaiting the opponent; nothing scheduled");
                return;
            }
            (session.history().len(), session.config().think_delay)
        };

        debug!(epoch, ?delay, "scheduling deferred move");
        let session = Arc::clone(&self.session);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut session = session.lock().unwrap();
            if session.state() != SessionState::AwaitingAi || session.history().len() != epoch {
                debug!(epoch, state = ?session.state(), "discarding stale deferred move");
                return;
            }
            if let Err(error) = session.request_ai_move() {
                warn!(%error, "deferred move rejected");
            }
        }));
    }

    /// Cancels a pending move without applying it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            debug!("cancelling pending deferred move");
            handle.abort();
        }
    }

    /// Checks if a move is currently scheduled and not yet applied.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<R> Drop for DeferredOpponent<R> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

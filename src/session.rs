//! Game session: the state machine driving one game from empty board
//! to terminal outcome.
//!
//! A session is the single writer of its board. Turn order is enforced
//! by the state machine, not by locking: exactly one move is accepted
//! per turn, alternating between the player and the computer opponent.

use crate::rules::{self, MoveError};
use crate::selector;
use crate::types::{Board, Cell, Difficulty, Mark, Move, Outcome};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

/// Configuration for a game session, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Difficulty of the computer opponent.
    pub difficulty: Difficulty,
    /// The mark the human player uses; the opponent takes the other.
    pub player_mark: Mark,
    /// Grid size. Present for configurability at the interface, but
    /// win checking is hard-coded to 3x3: only 3 is accepted.
    pub grid_size: usize,
    /// Simulated thinking time before a deferred opponent move fires.
    pub think_delay: Duration,
}

impl SessionConfig {
    /// Creates a configuration with the given difficulty and defaults:
    /// player is X, 3x3 grid, one second of thinking time.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            player_mark: Mark::X,
            grid_size: 3,
            think_delay: Duration::from_secs(1),
        }
    }

    /// Returns the mark the computer opponent plays.
    pub fn ai_mark(&self) -> Mark {
        self.player_mark.opponent()
    }
}

/// Error raised by invalid session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    /// Only the 3x3 grid is supported.
    #[display("unsupported grid size {}: only 3x3 is supported", requested)]
    UnsupportedGridSize {
        /// The grid size that was requested.
        requested: usize,
    },
}

/// State of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Waiting for the player to move.
    AwaitingPlayer,
    /// Waiting for the computer opponent to move.
    AwaitingAi,
    /// Terminal: the player won.
    PlayerWon,
    /// Terminal: the computer opponent won.
    AiWon,
    /// Terminal: the board filled with no winner.
    Draw,
}

impl SessionState {
    /// Checks if the state is terminal: no further moves are accepted.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::PlayerWon | SessionState::AiWon | SessionState::Draw
        )
    }
}

/// Outcome of a session from the driver's point of view.
///
/// Derived on demand from the board and the session's symbol
/// assignment, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// The game continues.
    Ongoing,
    /// The player holds a winning line.
    PlayerWin,
    /// The computer opponent holds a winning line.
    AiWin,
    /// Full board, no winner.
    Draw,
}

/// Notifications sent to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The session is set up and awaiting the first player move.
    Started,
    /// A move was accepted and applied.
    MoveMade(Move),
    /// The session reached a terminal outcome.
    OutcomeDecided(SessionOutcome),
}

/// Errors surfaced by session operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum SessionError {
    /// A move was rejected; the board and state are unchanged.
    #[display("invalid move: {}", _0)]
    #[from]
    InvalidMove(MoveError),

    /// An operation was invoked in a state that forbids it. This is a
    /// driver bug, not a recoverable game event.
    #[display("operation not allowed in session state {:?}", state)]
    InvalidState {
        /// The state the session was in.
        state: SessionState,
    },
}

impl std::error::Error for SessionError {}

/// One game session: board, turn state, and the computer opponent's
/// move selection.
///
/// Generic over the random source so drivers and tests can inject a
/// seeded generator; defaults to an OS-seeded [`SmallRng`].
#[derive(Debug)]
pub struct GameSession<R = SmallRng> {
    config: SessionConfig,
    board: Board,
    state: SessionState,
    history: Vec<Move>,
    rng: R,
    event_tx: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl GameSession<SmallRng> {
    /// Creates a new session with an OS-seeded random source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedGridSize`] for any grid size
    /// other than 3.
    #[instrument]
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, SmallRng::from_os_rng())
    }
}

impl<R: Rng> GameSession<R> {
    /// Creates a new session with an injected random source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedGridSize`] for any grid size
    /// other than 3.
    #[instrument(skip(rng))]
    pub fn with_rng(config: SessionConfig, rng: R) -> Result<Self, ConfigError> {
        if config.grid_size != 3 {
            warn!(requested = config.grid_size, "rejecting grid size");
            return Err(ConfigError::UnsupportedGridSize {
                requested: config.grid_size,
            });
        }

        info!(
            difficulty = ?config.difficulty,
            player_mark = ?config.player_mark,
            "starting session"
        );
        Ok(Self {
            config,
            board: Board::new(),
            state: SessionState::AwaitingPlayer,
            history: Vec::new(),
            rng,
            event_tx: None,
        })
    }

    /// Attaches an event sender, announcing the session to the
    /// subscriber with [`SessionEvent::Started`].
    pub fn with_event_sender(mut self, event_tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        let _ = event_tx.send(SessionEvent::Started);
        self.event_tx = Some(event_tx);
        self
    }

    /// Submits a player move at (row, col).
    ///
    /// On success the move is applied, the state machine advances, and
    /// the outcome after the move is returned. A rejected move leaves
    /// board and state untouched; rejection is idempotent.
    ///
    /// # Errors
    ///
    /// [`MoveError::OutOfRange`] for coordinates outside `[0, 2]`,
    /// [`MoveError::Occupied`] for a non-empty target cell,
    /// [`MoveError::NotPlayersTurn`] while the opponent is to move,
    /// [`MoveError::GameOver`] once the session is terminal.
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn submit_player_move(
        &mut self,
        row: usize,
        col: usize,
    ) -> Result<SessionOutcome, MoveError> {
        match self.state {
            SessionState::AwaitingPlayer => {}
            SessionState::AwaitingAi => {
                warn!("player move submitted out of turn");
                return Err(MoveError::NotPlayersTurn);
            }
            _ => {
                warn!("player move submitted after game over");
                return Err(MoveError::GameOver);
            }
        }

        let cell = Cell::new(row, col).ok_or(MoveError::OutOfRange { row, col })?;
        rules::apply(&mut self.board, cell, self.config.player_mark)?;

        self.record(Move::new(self.config.player_mark, cell));
        self.advance(
            self.config.player_mark,
            SessionState::AwaitingAi,
            SessionState::PlayerWon,
        );
        Ok(self.outcome())
    }

    /// Selects and applies the computer opponent's move, returning the
    /// move made.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidState`] unless the session is awaiting
    /// the opponent's move.
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn request_ai_move(&mut self) -> Result<Move, SessionError> {
        if self.state != SessionState::AwaitingAi {
            warn!("AI move requested out of turn");
            return Err(SessionError::InvalidState { state: self.state });
        }

        let ai = self.config.ai_mark();
        let cell = selector::select_move(
            &self.board,
            self.config.player_mark,
            ai,
            self.config.difficulty,
            &mut self.rng,
        )
        .expect("awaiting-ai state implies at least one empty cell");

        rules::apply(&mut self.board, cell, ai)?;

        let mv = Move::new(ai, cell);
        self.record(mv);
        self.advance(ai, SessionState::AwaitingPlayer, SessionState::AiWon);
        Ok(mv)
    }

    /// Derives the session outcome from the board.
    pub fn outcome(&self) -> SessionOutcome {
        match rules::outcome(&self.board) {
            Outcome::Ongoing => SessionOutcome::Ongoing,
            Outcome::Won(mark) if mark == self.config.player_mark => SessionOutcome::PlayerWin,
            Outcome::Won(_) => SessionOutcome::AiWin,
            Outcome::Draw => SessionOutcome::Draw,
        }
    }

    /// Returns the current state machine state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns the moves accepted so far, in order.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Checks if the session reached a terminal outcome.
    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    fn record(&mut self, mv: Move) {
        info!(%mv, "move accepted");
        self.history.push(mv);
        self.emit(SessionEvent::MoveMade(mv));
    }

    /// Advances the state machine after `mover` placed a mark: win
    /// check for the mover, then draw check, then hand the turn over.
    fn advance(&mut self, mover: Mark, next: SessionState, won: SessionState) {
        if rules::check_win(&self.board, mover) {
            self.state = won;
        } else if self.board.is_full() {
            self.state = SessionState::Draw;
        } else {
            self.state = next;
            return;
        }

        let outcome = self.outcome();
        info!(?outcome, "outcome decided");
        self.emit(SessionEvent::OutcomeDecided(outcome));
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(tx) = &self.event_tx {
            // A dropped receiver is not an error; the session plays on.
            let _ = tx.send(event);
        }
    }
}

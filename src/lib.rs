//! Tic-tac-toe rules core with a two-tier heuristic computer opponent.
//!
//! This crate is the rules-and-decision core of a 3x3 tic-tac-toe
//! game. Rendering, click capture, and animation timing are external
//! collaborators: they call into the session interface and consume its
//! event notifications.
//!
//! # Architecture
//!
//! - **Types**: board storage, marks, cells, moves
//! - **Rules**: pure functions for move application and win/draw detection
//! - **Selector**: the prioritized heuristic cascade picking the
//!   opponent's move (win-now, block-now on hard, corners/center
//!   tie-break, random fallback)
//! - **Session**: the turn state machine and driver-facing interface
//! - **Opponent**: the deferred, cancellable "thinking time" reply
//!
//! # Example
//!
//! ```
//! use tictactoe_engine::{Difficulty, GameSession, SessionConfig, SessionState};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = GameSession::new(SessionConfig::new(Difficulty::Hard))?;
//!
//! session.submit_player_move(1, 1)?;
//! assert_eq!(session.state(), SessionState::AwaitingAi);
//!
//! let reply = session.request_ai_move()?;
//! assert_ne!((reply.cell.row(), reply.cell.col()), (1, 1));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod opponent;
mod selector;
mod session;
mod types;

pub mod rules;

// Crate-level exports - Domain types
pub use types::{Board, Cell, Difficulty, Mark, Move, Outcome, Square};

// Crate-level exports - Rule errors
pub use rules::MoveError;

// Crate-level exports - Move selection
pub use selector::select_move;

// Crate-level exports - Session management
pub use session::{
    ConfigError, GameSession, SessionConfig, SessionError, SessionEvent, SessionOutcome,
    SessionState,
};

// Crate-level exports - Deferred opponent
pub use opponent::DeferredOpponent;

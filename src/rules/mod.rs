//! Game rules: pure functions over board state.
//!
//! Rules are separated from board storage so move application, win
//! detection, and draw detection can be exercised independently of
//! any session driving them.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{check_win, winner};

use crate::types::{Board, Cell, Mark, Outcome, Square};
use tracing::instrument;

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The target cell is already occupied.
    #[display("cell {} is already occupied", _0)]
    Occupied(Cell),

    /// The coordinates are outside the 3x3 grid.
    #[display("coordinates ({}, {}) are outside the 3x3 grid", row, col)]
    OutOfRange {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The move was submitted out of turn.
    #[display("it is not the player's turn")]
    NotPlayersTurn,

    /// The game is already over.
    #[display("the game is already over")]
    GameOver,
}

impl std::error::Error for MoveError {}

/// Applies a move, placing `mark` at `cell`.
///
/// No other cells change. Out-of-range coordinates cannot reach this
/// function: constructing a [`Cell`] already validates them.
///
/// # Errors
///
/// Returns [`MoveError::Occupied`] if the target cell is non-empty.
#[instrument]
pub fn apply(board: &mut Board, cell: Cell, mark: Mark) -> Result<(), MoveError> {
    if !board.is_empty(cell) {
        return Err(MoveError::Occupied(cell));
    }
    board.set(cell, Square::Occupied(mark));
    Ok(())
}

/// Derives the outcome of a board.
///
/// Side-agnostic: reports which mark (if any) holds a winning line,
/// else a draw if the board is full, else ongoing. Never stored;
/// recomputed from board state on demand.
#[instrument]
pub fn outcome(board: &Board) -> Outcome {
    if let Some(mark) = winner(board) {
        Outcome::Won(mark)
    } else if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    }
}

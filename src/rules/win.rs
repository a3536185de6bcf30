//! Win detection logic.

use crate::types::{Board, Mark, Square};
use tracing::instrument;

/// The 8 winning lines as row-major board indices.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // Rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // Columns
    [0, 4, 8], [2, 4, 6],            // Diagonals
];

/// Checks if the given mark holds a winning line.
///
/// Returns true iff any of the 3 rows, 3 columns, or 2 diagonals is
/// entirely `mark`. The scan short-circuits, but the result does not
/// depend on evaluation order.
#[instrument]
pub fn check_win(board: &Board, mark: Mark) -> bool {
    let squares = board.squares();
    LINES
        .iter()
        .any(|line| line.iter().all(|&i| squares[i] == Square::Occupied(mark)))
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(mark)` if either mark has three in a row, `None` otherwise.
#[instrument]
pub fn winner(board: &Board) -> Option<Mark> {
    let squares = board.squares();
    for [a, b, c] in LINES {
        let sq = squares[a];
        if sq != Square::Empty && sq == squares[b] && sq == squares[c] {
            return match sq {
                Square::Occupied(mark) => Some(mark),
                Square::Empty => None,
            };
        }
    }

    None
}

//! Heuristic move selection for the computer opponent.
//!
//! Both difficulty levels share a prioritized fallback cascade; hard
//! mode inserts a blocking tier. The first tier yielding a candidate
//! wins, and tiers never mix:
//!
//! 1. Win-now: take an immediately winning cell (both difficulties).
//! 2. Block-now: deny the player an immediately winning cell (hard only).
//! 3. Positional: a coin flip prefers corners or the center, with the
//!    corners shuffled to stay unpredictable.
//! 4. Random fallback over all remaining empty cells.

use crate::rules::win::check_win;
use crate::types::{Board, Cell, Difficulty, Mark, Square};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, instrument};

/// Selects the next move for the computer side.
///
/// The random source is injected so drivers can seed deterministic
/// selection in tests. Returns `None` only when the board has no empty
/// cell; callers are expected to uphold the not-full precondition.
/// The input board is never mutated: hypothetical placements in the
/// win/block tiers happen on a scratch copy.
#[instrument(skip(rng))]
pub fn select_move<R: Rng>(
    board: &Board,
    player: Mark,
    ai: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Cell> {
    if let Some(cell) = winning_cell(board, ai) {
        debug!(%cell, "taking winning cell");
        return Some(cell);
    }

    if difficulty == Difficulty::Hard {
        if let Some(cell) = winning_cell(board, player) {
            debug!(%cell, "blocking player win");
            return Some(cell);
        }
    }

    if let Some(cell) = positional_pick(board, rng) {
        debug!(%cell, "positional pick");
        return Some(cell);
    }

    let cell = random_fallback(board, rng);
    if let Some(cell) = cell {
        debug!(%cell, "random fallback");
    }
    cell
}

/// Finds a cell where placing `mark` wins immediately.
///
/// Row-major scan with first-match return: when several winning cells
/// exist, the earliest (row, col) is chosen. Each candidate placement
/// is reverted before the next is tried.
fn winning_cell(board: &Board, mark: Mark) -> Option<Cell> {
    let mut scratch = board.clone();
    for cell in Cell::ALL {
        if !scratch.is_empty(cell) {
            continue;
        }
        scratch.set(cell, Square::Occupied(mark));
        let wins = check_win(&scratch, mark);
        scratch.set(cell, Square::Empty);
        if wins {
            return Some(cell);
        }
    }
    None
}

/// Picks a corner or the center, coin-flipping which group to prefer.
///
/// The corners are shuffled uniformly so repeated games do not open
/// identically. Draw order is fixed (coin flip, then shuffle) so a
/// seeded source replays the same choice.
fn positional_pick<R: Rng>(board: &Board, rng: &mut R) -> Option<Cell> {
    let prefer_corners = rng.random_bool(0.5);

    let mut corners = Cell::CORNERS;
    corners.shuffle(rng);

    let corner = corners.into_iter().find(|&cell| board.is_empty(cell));
    let center = board.is_empty(Cell::CENTER).then_some(Cell::CENTER);

    if prefer_corners {
        corner.or(center)
    } else {
        center.or(corner)
    }
}

/// Uniformly random choice among all remaining empty cells.
fn random_fallback<R: Rng>(board: &Board, rng: &mut R) -> Option<Cell> {
    let mut open = board.empty_cells();
    open.shuffle(rng);
    open.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn occupy(board: &mut Board, cells: &[(usize, usize)], mark: Mark) {
        for &(row, col) in cells {
            board.set(Cell::new(row, col).unwrap(), Square::Occupied(mark));
        }
    }

    #[test]
    fn test_winning_cell_none_on_empty_board() {
        let board = Board::new();
        assert_eq!(winning_cell(&board, Mark::X), None);
    }

    #[test]
    fn test_winning_cell_completes_the_line() {
        let mut board = Board::new();
        occupy(&mut board, &[(1, 0), (1, 1)], Mark::O);
        assert_eq!(winning_cell(&board, Mark::O), Cell::new(1, 2));
        assert_eq!(winning_cell(&board, Mark::X), None);
    }

    #[test]
    fn test_winning_cell_prefers_earliest_in_row_major_order() {
        // O can complete the top row at (0, 2) or the left column at
        // (2, 0); the scan must land on (0, 2) first.
        let mut board = Board::new();
        occupy(&mut board, &[(0, 0), (0, 1), (1, 0)], Mark::O);
        occupy(&mut board, &[(1, 1), (2, 2)], Mark::X);
        assert_eq!(winning_cell(&board, Mark::O), Cell::new(0, 2));
    }

    #[test]
    fn test_winning_cell_does_not_mutate() {
        let mut board = Board::new();
        occupy(&mut board, &[(0, 0), (0, 1)], Mark::X);
        let before = board.clone();
        let _ = winning_cell(&board, Mark::X);
        assert_eq!(board, before);
    }

    #[test]
    fn test_positional_pick_never_picks_an_edge() {
        let board = Board::new();
        for seed in 0..64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let cell = positional_pick(&board, &mut rng).unwrap();
            let is_corner = Cell::CORNERS.contains(&cell);
            assert!(is_corner || cell == Cell::CENTER, "picked edge {cell}");
        }
    }

    #[test]
    fn test_positional_pick_forced_center() {
        let mut board = Board::new();
        for corner in Cell::CORNERS {
            board.set(corner, Square::Occupied(Mark::X));
        }
        for seed in 0..16 {
            let mut rng = SmallRng::seed_from_u64(seed);
            assert_eq!(positional_pick(&board, &mut rng), Some(Cell::CENTER));
        }
    }

    #[test]
    fn test_positional_pick_forced_corner() {
        let mut board = Board::new();
        board.set(Cell::CENTER, Square::Occupied(Mark::X));
        for corner in &Cell::CORNERS[..3] {
            board.set(*corner, Square::Occupied(Mark::O));
        }
        let last = Cell::CORNERS[3];
        for seed in 0..16 {
            let mut rng = SmallRng::seed_from_u64(seed);
            assert_eq!(positional_pick(&board, &mut rng), Some(last));
        }
    }

    #[test]
    fn test_positional_pick_exhausted() {
        let mut board = Board::new();
        board.set(Cell::CENTER, Square::Occupied(Mark::X));
        for corner in Cell::CORNERS {
            board.set(corner, Square::Occupied(Mark::O));
        }
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(positional_pick(&board, &mut rng), None);
    }

    #[test]
    fn test_random_fallback_returns_empty_cell() {
        let mut board = Board::new();
        occupy(&mut board, &[(0, 0), (1, 1), (2, 2)], Mark::X);
        for seed in 0..32 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let cell = random_fallback(&board, &mut rng).unwrap();
            assert!(board.is_empty(cell));
        }
    }

    #[test]
    fn test_random_fallback_none_on_full_board() {
        let mut board = Board::new();
        for cell in Cell::ALL {
            board.set(cell, Square::Occupied(Mark::X));
        }
        let mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(random_fallback(&board, &mut rng), None);
    }
}

//! Game rules for tic-tac-toe.
//!
//! Pure functions over a board snapshot. Nothing here mutates state;
//! the reducer in [`crate::state`] consults these after every write.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::check_winner;

use super::types::{Board, GameStatus};
use tracing::instrument;

/// Derives the game status from a board.
///
/// A completed line wins even when the board is also full.
#[instrument(skip(board))]
pub fn status(board: &Board) -> GameStatus {
    if let Some(winner) = check_winner(board) {
        GameStatus::Won(winner)
    } else if is_full(board) {
        GameStatus::Draw
    } else {
        GameStatus::InProgress
    }
}

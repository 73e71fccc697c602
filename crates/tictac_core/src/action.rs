//! Actions fed to the reducer and the effects it reports back.

use super::{Mark, Position};
use serde::{Deserialize, Serialize};

/// Input to [`GameState::reduce`](crate::GameState::reduce).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// A player places the active mark at a position.
    Place(Position),
    /// Raise the pending flag ahead of a delayed computer move.
    BeginAutoMove,
    /// Timer fired: clear the pending flag and play the chosen square, if any.
    CompleteAutoMove(Option<Position>),
    /// Start over with an empty board, keeping the opponent setting.
    Restart,
    /// Switch between single-player (`Some(mark)`) and two-player (`None`), then restart.
    SetOpponent(Option<Mark>),
}

/// Side effects a transition asks the caller to carry out or observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    /// The board was written or reset.
    BoardChanged,
    /// It is now the computer's turn; a delayed move should be scheduled.
    AutoMoveRequested,
    /// The pending flag was raised; arm the timer.
    AutoMovePending,
    /// The pending flag was cleared.
    AutoMoveSettled,
    /// The action was ignored; state is unchanged.
    Rejected(MoveError),
}

/// Reason an action was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum MoveError {
    /// The square at the position is already occupied.
    #[display("Square {} is already occupied", _0)]
    SquareOccupied(Position),

    /// The game already has a winner or is drawn.
    #[display("Game is already over")]
    GameOver,

    /// The computer's move is pending.
    #[display("Waiting for the computer to move")]
    AutoMovePending,

    /// A completion arrived with nothing pending.
    #[display("No computer move is pending")]
    NoAutoMovePending,

    /// Raw cell index outside 0-8.
    #[display("Cell index {} is out of bounds (must be 0-8)", _0)]
    OutOfBounds(usize),
}

impl std::error::Error for MoveError {}

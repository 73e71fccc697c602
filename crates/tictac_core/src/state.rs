//! Game state and its reducer.
//!
//! [`GameState::reduce`] is a pure transition: it never mutates the input,
//! and a rejected action yields a state equal to the one it was given.

use super::action::{Action, Effect, MoveError};
use super::rules;
use super::{Board, GameStatus, Mark, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The board.
    board: Board,
    /// Mark that plays next.
    to_move: Mark,
    /// A delayed computer move is pending.
    pending_auto_move: bool,
    /// Mark played by the computer; `None` in two-player mode.
    opponent: Option<Mark>,
}

/// Result of [`GameState::reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The next state.
    pub state: GameState,
    /// Effects produced, in order.
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: &GameState, err: MoveError) -> Self {
        debug!(error = %err, "Action rejected");
        Self {
            state: state.clone(),
            effects: vec![Effect::Rejected(err)],
        }
    }

    /// Returns the rejection reason, if the action was ignored.
    pub fn rejection(&self) -> Option<MoveError> {
        self.effects.iter().find_map(|e| match e {
            Effect::Rejected(err) => Some(*err),
            _ => None,
        })
    }
}

impl GameState {
    /// Creates a new game with X to move.
    pub fn new(opponent: Option<Mark>) -> Self {
        Self {
            board: Board::new(),
            to_move: Mark::X,
            pending_auto_move: false,
            opponent,
        }
    }

    /// Creates a game from an existing board, nothing pending.
    pub fn from_board(board: Board, to_move: Mark, opponent: Option<Mark>) -> Self {
        Self {
            board,
            to_move,
            pending_auto_move: false,
            opponent,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark that plays next.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Returns true while a computer move is pending.
    pub fn is_pending(&self) -> bool {
        self.pending_auto_move
    }

    /// Returns the computer's mark, if single-player.
    pub fn opponent(&self) -> Option<Mark> {
        self.opponent
    }

    /// Derives the current status from the board.
    pub fn status(&self) -> GameStatus {
        rules::status(&self.board)
    }

    /// Returns true when the computer should play next.
    pub fn is_opponent_turn(&self) -> bool {
        self.opponent == Some(self.to_move) && !self.status().is_over()
    }

    /// Applies an action, returning the next state and its effects.
    #[instrument(skip(self), fields(to_move = %self.to_move, pending = self.pending_auto_move))]
    pub fn reduce(&self, action: Action) -> Transition {
        match action {
            Action::Place(pos) => {
                if self.pending_auto_move {
                    return Transition::unchanged(self, MoveError::AutoMovePending);
                }
                self.place(pos, Vec::new())
            }
            Action::BeginAutoMove => {
                if self.pending_auto_move {
                    return Transition::unchanged(self, MoveError::AutoMovePending);
                }
                let mut state = self.clone();
                state.pending_auto_move = true;
                Transition {
                    state,
                    effects: vec![Effect::AutoMovePending],
                }
            }
            Action::CompleteAutoMove(choice) => {
                if !self.pending_auto_move {
                    return Transition::unchanged(self, MoveError::NoAutoMovePending);
                }
                let mut settled = self.clone();
                settled.pending_auto_move = false;
                let effects = vec![Effect::AutoMoveSettled];
                match choice {
                    Some(pos) => settled.place(pos, effects),
                    None => Transition {
                        state: settled,
                        effects,
                    },
                }
            }
            Action::Restart => Self::fresh(self.opponent),
            Action::SetOpponent(opponent) => Self::fresh(opponent),
        }
    }

    /// Writes the active mark at `pos`, carrying `effects` already produced.
    ///
    /// Occupied and game-over checks reject without touching `self`, but keep
    /// whatever `effects` were passed in ahead of the rejection.
    fn place(&self, pos: Position, mut effects: Vec<Effect>) -> Transition {
        let err = if self.status().is_over() {
            Some(MoveError::GameOver)
        } else if !self.board.is_empty(pos) {
            Some(MoveError::SquareOccupied(pos))
        } else {
            None
        };
        if let Some(err) = err {
            debug!(error = %err, position = %pos, "Placement rejected");
            effects.push(Effect::Rejected(err));
            return Transition {
                state: self.clone(),
                effects,
            };
        }

        let mut state = self.clone();
        state.board.set(pos, Square::Occupied(self.to_move));
        state.to_move = self.to_move.opponent();
        effects.push(Effect::BoardChanged);
        debug!(
            position = %pos,
            mark = %self.to_move,
            filled = state.board.filled(),
            status = ?state.status(),
            "Mark placed"
        );

        if state.is_opponent_turn() {
            effects.push(Effect::AutoMoveRequested);
        }
        Transition { state, effects }
    }

    fn fresh(opponent: Option<Mark>) -> Transition {
        let state = Self::new(opponent);
        let mut effects = vec![Effect::BoardChanged];
        if state.is_opponent_turn() {
            effects.push(Effect::AutoMoveRequested);
        }
        Transition { state, effects }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(None)
    }
}

//! Tic-tac-toe game logic with an optional random computer opponent.
//!
//! # Architecture
//!
//! - **Rules**: pure win/draw evaluation over a board snapshot
//! - **State**: [`GameState`] plus a reducer returning the next state and effects
//! - **Random**: seedable source for the computer's uniform move choice
//! - **Schedule**: cancellable one-shot timers for the computer's delayed move
//! - **Session**: owns one game and reacts to reducer effects
//!
//! # Example
//!
//! ```
//! use tictac_core::{ManualScheduler, Mark, SeededRandom, Session};
//! use std::time::Duration;
//!
//! let timers = ManualScheduler::new();
//! let mut session = Session::new(
//!     Some(Mark::O),
//!     Box::new(SeededRandom::new(7)),
//!     Box::new(timers.clone()),
//!     Duration::from_millis(500),
//! );
//!
//! session.apply_move(4).unwrap();
//! assert!(session.state().is_pending());
//!
//! for ticket in timers.take_due() {
//!     session.fire(ticket);
//! }
//! assert_eq!(session.status_line(), "Next player: X");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod position;
mod random;
pub mod rules;
mod schedule;
mod session;
mod state;
mod types;

pub use action::{Action, Effect, MoveError};
pub use position::Position;
pub use random::{RandomSource, SeededRandom, choose_empty};
pub use schedule::{AutoMoveTicket, ManualScheduler, Scheduler, TokioScheduler};
pub use session::{DEFAULT_THINK_DELAY, Session};
pub use state::{GameState, Transition};
pub use types::{Board, GameStatus, Mark, Square};

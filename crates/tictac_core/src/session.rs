//! A running game: state, random source and timer wired together.

use super::action::{Action, Effect, MoveError};
use super::random::{RandomSource, choose_empty};
use super::schedule::{AutoMoveTicket, Scheduler};
use super::state::GameState;
use super::{GameStatus, Mark, Position};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Default pause before the computer moves.
pub const DEFAULT_THINK_DELAY: Duration = Duration::from_millis(500);

struct Armed {
    ticket: AutoMoveTicket,
    cancel: CancellationToken,
}

/// Owns one game and drives the computer opponent.
///
/// All mutation goes through [`GameState::reduce`]; the session only
/// reacts to the effects it reports.
pub struct Session {
    state: GameState,
    rng: Box<dyn RandomSource>,
    scheduler: Box<dyn Scheduler>,
    delay: Duration,
    next_ticket: u64,
    armed: Option<Armed>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("delay", &self.delay)
            .field("armed", &self.armed.as_ref().map(|a| a.ticket))
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Starts a new game.
    ///
    /// If the computer plays X its first move is scheduled right away.
    #[instrument(skip(rng, scheduler))]
    pub fn new(
        opponent: Option<Mark>,
        rng: Box<dyn RandomSource>,
        scheduler: Box<dyn Scheduler>,
        delay: Duration,
    ) -> Self {
        Self::with_state(GameState::new(opponent), rng, scheduler, delay)
    }

    /// Resumes from an existing state.
    ///
    /// Schedules the computer's move if it is already its turn.
    pub fn with_state(
        state: GameState,
        rng: Box<dyn RandomSource>,
        scheduler: Box<dyn Scheduler>,
        delay: Duration,
    ) -> Self {
        let mut session = Self {
            state,
            rng,
            scheduler,
            delay,
            next_ticket: 0,
            armed: None,
        };
        // a saved pending flag has no timer behind it
        if session.state.is_pending() {
            debug!("Clearing pending auto move from resumed state");
            session.state = session.state.reduce(Action::CompleteAutoMove(None)).state;
        }
        if session.state.is_opponent_turn() {
            session.schedule_auto_move();
        }
        info!(opponent = ?session.state.opponent(), "Session started");
        session
    }

    /// Returns the current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the derived status.
    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    /// Returns the think delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs the reducer, stores the result and follows up on its effects.
    #[instrument(skip(self))]
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::BeginAutoMove => return self.arm(),
            Action::CompleteAutoMove(_) | Action::Restart | Action::SetOpponent(_) => {
                self.disarm()
            }
            Action::Place(_) => {}
        }
        let transition = self.state.reduce(action);
        self.state = transition.state;
        for effect in &transition.effects {
            match effect {
                Effect::AutoMoveRequested => self.schedule_auto_move(),
                Effect::Rejected(err) => debug!(error = %err, ?action, "Ignored"),
                _ => {}
            }
        }
        if transition.effects.contains(&Effect::BoardChanged)
            && let Some(winner) = self.state.status().winner()
        {
            info!(%winner, board = %self.state.board().display(), "Game won");
        }
        transition.effects
    }

    /// Places the active mark at a raw cell index (0-8).
    ///
    /// Returns the rejection reason when the move is ignored.
    pub fn apply_move(&mut self, index: usize) -> Result<(), MoveError> {
        let Some(pos) = Position::from_index(index) else {
            debug!(index, "Cell index out of bounds");
            return Err(MoveError::OutOfBounds(index));
        };
        self.place(pos)
    }

    /// Places the active mark at `pos`.
    pub fn place(&mut self, pos: Position) -> Result<(), MoveError> {
        let effects = self.dispatch(Action::Place(pos));
        match rejection(&effects) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Raises the pending flag and arms the timer for a computer move.
    ///
    /// Does nothing if a move is already pending.
    #[instrument(skip(self))]
    pub fn schedule_auto_move(&mut self) {
        self.arm();
    }

    fn arm(&mut self) -> Vec<Effect> {
        let transition = self.state.reduce(Action::BeginAutoMove);
        if let Some(err) = transition.rejection() {
            debug!(error = %err, "Auto move not scheduled");
            return transition.effects;
        }
        self.state = transition.state;
        self.disarm();

        self.next_ticket += 1;
        let ticket = AutoMoveTicket(self.next_ticket);
        let cancel = CancellationToken::new();
        self.scheduler.schedule(ticket, self.delay, cancel.clone());
        debug!(%ticket, delay_ms = self.delay.as_millis() as u64, "Auto move armed");
        self.armed = Some(Armed { ticket, cancel });
        transition.effects
    }

    /// Timer callback: plays a uniformly random empty square.
    ///
    /// Tickets other than the one currently armed are ignored.
    #[instrument(skip(self))]
    pub fn fire(&mut self, ticket: AutoMoveTicket) -> Vec<Effect> {
        match &self.armed {
            Some(armed) if armed.ticket == ticket => {}
            _ => {
                debug!(%ticket, "Stale auto move ticket");
                return Vec::new();
            }
        }
        self.armed = None;
        let choice = choose_empty(self.state.board(), self.rng.as_mut());
        self.dispatch(Action::CompleteAutoMove(choice))
    }

    /// Starts over, keeping the opponent setting.
    pub fn restart(&mut self) {
        info!("Restarting game");
        self.dispatch(Action::Restart);
    }

    /// Switches mode and starts over.
    pub fn set_opponent(&mut self, opponent: Option<Mark>) {
        info!(?opponent, "Switching opponent");
        self.dispatch(Action::SetOpponent(opponent));
    }

    /// Cancels any armed timer.
    pub fn disarm(&mut self) {
        if let Some(armed) = self.armed.take() {
            debug!(ticket = %armed.ticket, "Cancelling auto move");
            armed.cancel.cancel();
        }
    }

    /// Text for the status line.
    pub fn status_line(&self) -> String {
        match self.status() {
            GameStatus::Won(mark) => format!("Winner: {mark}"),
            GameStatus::Draw => "Draw".to_string(),
            GameStatus::InProgress => format!("Next player: {}", self.state.to_move()),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.disarm();
    }
}

fn rejection(effects: &[Effect]) -> Option<MoveError> {
    effects.iter().find_map(|e| match e {
        Effect::Rejected(err) => Some(*err),
        _ => None,
    })
}

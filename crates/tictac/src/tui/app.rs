//! Application state and input handling.

use super::input::{Command, command_for};
use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use tictac_core::{AutoMoveTicket, Mark, Position, Session};
use tracing::{debug, info};

/// Main application state.
pub struct App {
    session: Session,
    cursor: Position,
    computer_mark: Mark,
    cell_areas: [Rect; 9],
    quit: bool,
}

impl App {
    /// Creates a new application around a running session.
    ///
    /// `computer_mark` is used when single-player mode is toggled back on.
    pub fn new(session: Session, computer_mark: Mark) -> Self {
        Self {
            session,
            cursor: Position::Center,
            computer_mark,
            cell_areas: [Rect::default(); 9],
            quit: false,
        }
    }

    /// Gets the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Square under the keyboard cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// True once the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Status line, with a thinking hint while the computer's move is pending.
    pub fn status_message(&self) -> String {
        let line = self.session.status_line();
        if self.session.state().is_pending() {
            format!("{line} (computer is thinking...)")
        } else {
            line
        }
    }

    /// Mode label for the title bar.
    pub fn mode_label(&self) -> &'static str {
        match self.session.state().opponent() {
            Some(_) => "vs Computer",
            None => "Two players",
        }
    }

    /// Remembers where each square was drawn, for mouse hits.
    pub fn set_cell_areas(&mut self, areas: [Rect; 9]) {
        self.cell_areas = areas;
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyCode) {
        let Some(command) = command_for(key, self.cursor) else {
            return;
        };
        debug!(?command, "Key command");
        match command {
            Command::Place(pos) => self.place(pos),
            Command::PlaceAtCursor => self.place(self.cursor),
            Command::Cursor(pos) => self.cursor = pos,
            Command::Restart => self.session.restart(),
            Command::ToggleMode => {
                let next = match self.session.state().opponent() {
                    Some(_) => None,
                    None => Some(self.computer_mark),
                };
                self.session.set_opponent(next);
            }
            Command::Quit => {
                info!("User quit");
                self.session.disarm();
                self.quit = true;
            }
        }
    }

    /// Handles a left click at terminal coordinates.
    pub fn handle_click(&mut self, column: u16, row: u16) {
        let hit = Position::ALL
            .into_iter()
            .zip(self.cell_areas)
            .find(|(_, area)| contains(*area, column, row));
        if let Some((pos, _)) = hit {
            self.cursor = pos;
            self.place(pos);
        }
    }

    /// Timer callback from the scheduler.
    pub fn on_ticket(&mut self, ticket: AutoMoveTicket) {
        self.session.fire(ticket);
    }

    fn place(&mut self, pos: Position) {
        // ignored moves leave the board as it was
        if let Err(err) = self.session.place(pos) {
            debug!(error = %err, position = %pos, "Move ignored");
        }
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tictac_core::{ManualScheduler, SeededRandom, Square};

    fn app(opponent: Option<Mark>, timers: &ManualScheduler) -> App {
        let session = Session::new(
            opponent,
            Box::new(SeededRandom::new(3)),
            Box::new(timers.clone()),
            Duration::from_millis(500),
        );
        App::new(session, Mark::O)
    }

    fn grid() -> [Rect; 9] {
        let mut areas = [Rect::default(); 9];
        for (i, area) in areas.iter_mut().enumerate() {
            *area = Rect::new((i % 3) as u16 * 10, (i / 3) as u16 * 4, 10, 4);
        }
        areas
    }

    #[test]
    fn test_digit_key_places_mark() {
        let timers = ManualScheduler::new();
        let mut app = app(None, &timers);
        app.handle_key(KeyCode::Char('5'));
        assert_eq!(
            app.session().state().board().get(Position::Center),
            Square::Occupied(Mark::X)
        );
        assert_eq!(app.status_message(), "Next player: O");
    }

    #[test]
    fn test_click_hits_cell() {
        let timers = ManualScheduler::new();
        let mut app = app(None, &timers);
        app.set_cell_areas(grid());
        app.handle_click(25, 9);
        assert_eq!(app.cursor(), Position::BottomRight);
        assert_eq!(
            app.session().state().board().get(Position::BottomRight),
            Square::Occupied(Mark::X)
        );
    }

    #[test]
    fn test_click_outside_grid_ignored() {
        let timers = ManualScheduler::new();
        let mut app = app(None, &timers);
        app.set_cell_areas(grid());
        app.handle_click(80, 40);
        assert_eq!(app.session().state().board().filled(), 0);
    }

    #[test]
    fn test_thinking_hint_and_reply() {
        let timers = ManualScheduler::new();
        let mut app = app(Some(Mark::O), &timers);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.status_message(), "Next player: O (computer is thinking...)");

        app.handle_key(KeyCode::Char('1'));
        assert!(app.session().state().board().is_empty(Position::TopLeft));

        for ticket in timers.take_due() {
            app.on_ticket(ticket);
        }
        assert_eq!(app.session().state().board().filled(), 2);
        assert_eq!(app.status_message(), "Next player: X");
    }

    #[test]
    fn test_toggle_mode_round_trip() {
        let timers = ManualScheduler::new();
        let mut app = app(Some(Mark::O), &timers);
        assert_eq!(app.mode_label(), "vs Computer");
        app.handle_key(KeyCode::Char('m'));
        assert_eq!(app.mode_label(), "Two players");
        app.handle_key(KeyCode::Char('m'));
        assert_eq!(app.session().state().opponent(), Some(Mark::O));
    }

    #[test]
    fn test_quit_cancels_timer() {
        let timers = ManualScheduler::new();
        let mut app = app(Some(Mark::O), &timers);
        app.handle_key(KeyCode::Char('5'));
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit());
        assert!(timers.take_due().is_empty());
    }
}

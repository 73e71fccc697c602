//! Keyboard mapping and cursor movement.

use crossterm::event::KeyCode;
use tictac_core::Position;

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Place at a specific square.
    Place(Position),
    /// Place at the cursor.
    PlaceAtCursor,
    /// Move the cursor.
    Cursor(Position),
    /// Start a new game.
    Restart,
    /// Switch between single-player and two-player.
    ToggleMode,
    /// Leave the app.
    Quit,
}

/// Maps a key to a command given the current cursor.
pub fn command_for(key: KeyCode, cursor: Position) -> Option<Command> {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('r') => Some(Command::Restart),
        KeyCode::Char('m') => Some(Command::ToggleMode),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::PlaceAtCursor),
        KeyCode::Char(c) => c
            .to_digit(10)
            .filter(|d| (1..=9).contains(d))
            .and_then(|d| Position::from_index(d as usize - 1))
            .map(Command::Place),
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            Some(Command::Cursor(move_cursor(cursor, key)))
        }
        _ => None,
    }
}

/// Moves cursor based on arrow keys, stopping at the board edge.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());
    let (row, col) = match key {
        KeyCode::Up => (row.saturating_sub(1), col),
        KeyCode::Down => ((row + 1).min(2), col),
        KeyCode::Left => (row, col.saturating_sub(1)),
        KeyCode::Right => (row, (col + 1).min(2)),
        _ => (row, col),
    };
    Position::from_index(row * 3 + col).unwrap_or(cursor)
}

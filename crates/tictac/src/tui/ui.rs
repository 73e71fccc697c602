//! Stateless UI rendering for tic-tac-toe.

use super::app::App;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tictac_core::{Board, Mark, Position, Square};

const CELL_WIDTH: u16 = 9;
const CELL_HEIGHT: u16 = 3;

/// Draws the whole screen and returns the area of each square.
pub fn draw(frame: &mut Frame, app: &App) -> [Rect; 9] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Status
            Constraint::Length(3), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new(format!("Tic Tac Toe - {}", app.mode_label()))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let areas = draw_board(frame, chunks[1], app.session().state().board(), app.cursor());

    let status = Paragraph::new(app.status_message())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new("Click or 1-9 | Arrows + Enter | R: Restart | M: Mode | Q: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[3]);

    areas
}

fn draw_board(frame: &mut Frame, area: Rect, board: &Board, cursor: Position) -> [Rect; 9] {
    let board_area = center_rect(area, CELL_WIDTH * 3 + 2, CELL_HEIGHT * 3 + 2);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CELL_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(CELL_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(CELL_HEIGHT),
        ])
        .split(board_area);

    let mut areas = [Rect::default(); 9];
    for row in 0..3 {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(CELL_WIDTH),
                Constraint::Length(1),
                Constraint::Length(CELL_WIDTH),
                Constraint::Length(1),
                Constraint::Length(CELL_WIDTH),
            ])
            .split(rows[row * 2]);

        for col in 0..3 {
            let index = row * 3 + col;
            areas[index] = cols[col * 2];
            if let Some(pos) = Position::from_index(index) {
                draw_cell(frame, cols[col * 2], board.get(pos), pos == cursor, index);
            }
            if col < 2 {
                draw_separator_vertical(frame, cols[col * 2 + 1]);
            }
        }
        if row < 2 {
            draw_separator(frame, rows[row * 2 + 1]);
        }
    }
    areas
}

fn draw_cell(frame: &mut Frame, area: Rect, square: Square, highlighted: bool, index: usize) {
    let (symbol, base_style) = match square {
        Square::Empty => ((index + 1).to_string(), Style::default().fg(Color::DarkGray)),
        Square::Occupied(Mark::X) => (
            "X".to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Square::Occupied(Mark::O) => (
            "O".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    let style = if highlighted {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    // middle line of the cell
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(format!(" {symbol} "), style)),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("─".repeat(area.width as usize))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new(vec![Line::from("│"); area.height as usize])
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::App;
    use ratatui::{Terminal, backend::TestBackend};
    use std::time::Duration;
    use tictac_core::{ManualScheduler, SeededRandom, Session};

    fn render(app: &App) -> (String, [Rect; 9]) {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).expect("test terminal");
        let mut areas = [Rect::default(); 9];
        terminal.draw(|f| areas = draw(f, app)).expect("draw");
        let buffer = terminal.backend().buffer();
        let text = buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        (text, areas)
    }

    #[test]
    fn test_renders_status_and_cells() {
        let session = Session::new(
            None,
            Box::new(SeededRandom::new(1)),
            Box::new(ManualScheduler::new()),
            Duration::ZERO,
        );
        let mut app = App::new(session, Mark::O);
        app.handle_key(crossterm::event::KeyCode::Char('1'));

        let (text, areas) = render(&app);
        assert!(text.contains("Next player: O"));
        assert!(text.contains("Two players"));
        assert!(text.contains(" X "));

        // cells laid out left to right, top to bottom, without overlap
        assert!(areas.iter().all(|a| a.width == CELL_WIDTH && a.height == CELL_HEIGHT));
        assert!(areas[0].x < areas[1].x && areas[1].x < areas[2].x);
        assert!(areas[0].y < areas[3].y && areas[3].y < areas[6].y);
    }
}

//! Terminal UI: a clickable 3x3 grid with a status line.

mod app;
mod input;
mod ui;

use crate::config::GameConfig;
use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io::{self, Stdout};
use std::time::Duration;
use tictac_core::{AutoMoveTicket, SeededRandom, Session, TokioScheduler};
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// How long to wait for terminal input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Runs the game until the user quits.
#[instrument(skip_all)]
pub async fn run(config: &GameConfig) -> Result<()> {
    let rng = match config.seed() {
        Some(seed) => SeededRandom::new(*seed),
        None => SeededRandom::from_entropy(),
    };
    let (scheduler, mut tickets) = TokioScheduler::channel();
    let session = Session::new(
        config.opponent(),
        Box::new(rng),
        Box::new(scheduler),
        config.think_delay(),
    );
    let mut app = App::new(session, config.first_player().computer_mark());

    let mut terminal = setup_terminal().context("Failed to initialise terminal")?;
    info!("Terminal ready");

    let res = run_app(&mut terminal, &mut app, &mut tickets).await;

    restore_terminal(&mut terminal).context("Failed to restore terminal")?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(
    terminal: &mut Tui,
    app: &mut App,
    tickets: &mut mpsc::UnboundedReceiver<AutoMoveTicket>,
) -> Result<()> {
    loop {
        let mut areas = [Rect::default(); 9];
        terminal.draw(|f| areas = ui::draw(f, app))?;
        app.set_cell_areas(areas);

        // Timer callbacks from the computer opponent
        while let Ok(ticket) = tickets.try_recv() {
            app.on_ticket(ticket);
        }

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key.code),
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => app.handle_click(column, row),
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

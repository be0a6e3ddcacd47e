//! Terminal UI for Quantum Gomoku

mod canvas;
mod input;
mod ui;

pub use canvas::{Glyph, Status, TerminalCanvas};
pub use input::{layout_mapper, translate};

use crate::config::ClientConfig;
use crate::driver::{Flow, SessionDriver, SessionEvent};
use crate::service::HttpGameService;
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

type Screen = Terminal<CrosstermBackend<Stdout>>;

/// Run the TUI client
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create("quantum_gomoku.log")?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(crate::DEFAULT_LOG_FILTER)),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(server_url = %config.server_url(), "Starting Quantum Gomoku TUI");

    let service = Arc::new(HttpGameService::new(config.server_url().clone()));
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mapper = layout_mapper();

    // Connect before taking over the terminal so failures print normally.
    let driver = SessionDriver::start(
        service.clone(),
        mapper,
        TerminalCanvas::new(mapper),
        event_tx.clone(),
        config.request_timeout(),
    )
    .await
    .inspect_err(|e| error!(error = %e, "Failed to start game"))?;
    let poller = Arc::clone(&service).spawn_event_poller(event_tx, config.poll_interval());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let res = run_game(&mut terminal, driver, event_rx).await;

    poller.abort();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

/// Redraws, then waits for either terminal input or a session event.
#[instrument(skip_all)]
async fn run_game(
    terminal: &mut Screen,
    mut driver: SessionDriver<TerminalCanvas>,
    mut inbox: mpsc::UnboundedReceiver<SessionEvent>,
) -> Result<()> {
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    input::spawn_reader(input_tx);

    loop {
        terminal.draw(|f| ui::draw(f, driver.session().renderer()))?;

        let event = tokio::select! {
            Some(event) = inbox.recv() => event,
            Some(raw) = input_rx.recv() => {
                let session = driver.session();
                match translate(raw, session.mapper(), session.board().size()) {
                    Some(event) => event,
                    // Resizes and unbound keys only need a redraw.
                    None => continue,
                }
            }
            else => break,
        };

        if driver.handle(event) == Flow::Quit {
            info!("User quit");
            break;
        }
    }
    Ok(())
}

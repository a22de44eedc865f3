use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use usethrow::{AppConfig, Chain};

mod app;
mod event;
mod input;
mod screens;
mod theme;
mod ui;
pub mod widgets;

pub use app::App;
pub use event::EventHandler;

const LOG_FILE: &str = "usethrow-cli.log";

/// Redraw and liveness-check cadence; fine enough for the spinner
const TICK_RATE: Duration = Duration::from_millis(250);

/// Run the TUI application
pub async fn run_tui(chain: Option<Chain>) -> Result<()> {
    init_logging()?;

    let config = AppConfig::init().context("Failed to load configuration")?;
    let chain = chain.unwrap_or(config.network.default_chain);
    let mut app = App::new(config, chain)?;
    info!("TUI starting on {}", chain);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // The burner never outlives the session
    app.lifecycle.clear_burner();
    info!("TUI exited");

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut event_handler = EventHandler::new(TICK_RATE);
    app.set_sender(event_handler.sender());

    loop {
        // Draw the current state
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events
        if let Some(event) = event_handler.next().await {
            if !app.handle_event(event) {
                break; // Exit on quit
            }
        }
    }

    Ok(())
}

/// stdout belongs to the terminal UI, so logs go to a file in the temp dir
fn init_logging() -> Result<()> {
    let path = std::env::temp_dir().join(LOG_FILE);
    let file = File::create(&path).with_context(|| format!("Cannot create {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "usethrow=info,usethrow_cli=info".into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

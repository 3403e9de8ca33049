mod api;
mod app;
mod config;
mod logging;
mod selector;
mod ui;

use crate::api::client::LocationClient;
use crate::api::manager::FetchManager;
use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::state::AppState;
use anyhow::{Context, Result};
use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let cfg = config::load_config()?;
    let log_path = logging::init(&cfg.logging)?;
    tracing::info!(
        base_url = cfg.api.base_url(),
        dialect = ?cfg.api.dialect,
        fallback = ?cfg.fallback.policy,
        log = ?log_path,
        "starting cityselect"
    );

    let client = LocationClient::new(&cfg.api).context("Failed to build HTTP client")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, cfg, client).await;

    restore_terminal()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "exiting with error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
    client: LocationClient,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let tick_rate = Duration::from_millis(cfg.ui.tick_rate_ms.max(16));
    let mut state = AppState::new(cfg);
    tracing::debug!(dialect = ?client.dialect(), "fetch manager ready");
    let mut fetches = FetchManager::new(client, event_tx.clone());

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if term_tx.send(AppEvent::Terminal(event)).is_err() {
                break;
            }
        }
    });

    // Spawn tick task (spinner animation)
    let tick_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_rate);
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    // Country list is fetched once on startup
    let actions = handler::start(&mut state);
    dispatch(&mut state, &mut fetches, actions);

    terminal.draw(|f| ui::render(f, &state))?;

    // Main event loop
    loop {
        let event = event_rx.recv().await;
        let Some(event) = event else { break };

        let actions = handler::handle_event(&mut state, event);
        dispatch(&mut state, &mut fetches, actions);

        if state.should_quit {
            tracing::debug!(pending = fetches.in_flight(), "cancelling fetches");
            fetches.cancel_all();
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, &state))?;
            state.dirty = false;
        }
    }

    tracing::info!("shutting down");
    Ok(())
}

fn dispatch(state: &mut AppState, fetches: &mut FetchManager, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::Fetch(ticket) => fetches.spawn(ticket),
            Action::CancelFrom(level) => fetches.cancel_from(level),
            Action::Quit => state.should_quit = true,
        }
    }
}

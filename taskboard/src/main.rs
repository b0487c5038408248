//! `taskboard`: terminal task board.
//!
//! Launches the TUI against a task API. Configuration via CLI flags,
//! environment variables, or config file (`~/.config/taskboard/config.toml`).
//!
//! ```bash
//! # Local backend on the default port
//! cargo run --bin taskboard
//!
//! # Another backend, straight to the board
//! cargo run --bin taskboard -- --api-url https://tasks.example.com --view board
//!
//! # Or via environment variables
//! TASKBOARD_API_URL=http://10.0.0.5:8000 TASKBOARD_LOG=debug cargo run
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use taskboard::api::http::HttpTaskApi;
use taskboard::app::App;
use taskboard::config::{CliArgs, ClientConfig};
use taskboard::net::{self, BoardCommand, BoardEvent};
use taskboard::store::TaskStore;
use taskboard::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // CLI args > env > config file > defaults.
    let config = ClientConfig::load(&cli).unwrap_or_else(|e| {
        eprintln!("taskboard: {e}; using defaults");
        ClientConfig::default()
    });

    // Logs go to a file, never stdout: ratatui owns the terminal.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(api_url = %config.api_url, collision = %config.collision, "taskboard starting");

    let api = HttpTaskApi::new(&config.api_url)
        .map(Arc::new)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, api, &config).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    tracing::info!("taskboard exiting");
    result
}

/// Sends `tracing` output to a file; the terminal belongs to the board.
///
/// `RUST_LOG` overrides `level`. Logging stays off if the path has no file
/// name. Keep the returned guard alive until exit so buffered lines are
/// flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let log_path = file_path.map_or_else(
        || std::env::temp_dir().join("taskboard.log"),
        Path::to_path_buf,
    );
    let (dir, name) = (log_path.parent()?, log_path.file_name()?);

    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    api: Arc<HttpTaskApi>,
    config: &ClientConfig,
) -> io::Result<()> {
    let store = TaskStore::new();
    let mut app = App::new(store.clone(), config.collision.strategy())
        .with_view(config.start_view)
        .with_api_label(api.base_url().as_str())
        .with_recent_limit(config.recent_tasks)
        .with_timestamp_format(config.timestamp_format.clone());

    let (cmd_tx, mut evt_rx) = net::spawn_net(api, store, config.to_net_config());
    dispatch(&mut app, &cmd_tx, BoardCommand::Refresh);

    loop {
        // Step 1: Draw the UI frame and remember its size for hit-testing.
        terminal.draw(|frame| {
            app.set_viewport(frame.area());
            ui::draw(frame, &app);
        })?;

        // Step 2: Drain all pending BoardEvents (non-blocking).
        drain_board_events(&mut app, &mut evt_rx, &cmd_tx);

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)? {
            let command = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key_event(key),
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                _ => None,
            };
            if let Some(command) = command {
                dispatch(&mut app, &cmd_tx, command);
            }
        }

        if app.should_quit {
            let _ = cmd_tx.try_send(BoardCommand::Shutdown);
            return Ok(());
        }
    }
}

/// Hand a command to the worker; a full or closed channel abandons it.
fn dispatch(app: &mut App, tx: &mpsc::Sender<BoardCommand>, command: BoardCommand) {
    match tx.try_send(command) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(command)) => {
            tracing::warn!(?command, "board worker busy; command dropped");
            app.abandon_command(command, "network busy");
        }
        Err(mpsc::error::TrySendError::Closed(command)) => {
            tracing::error!(?command, "board worker stopped");
            app.abandon_command(command, "network disconnected");
        }
    }
}

/// Drain all pending `BoardEvent`s, forwarding any follow-up command.
fn drain_board_events(
    app: &mut App,
    rx: &mut mpsc::Receiver<BoardEvent>,
    tx: &mpsc::Sender<BoardCommand>,
) {
    while let Ok(event) = rx.try_recv() {
        if let Some(command) = app.apply_event(event) {
            dispatch(app, tx, command);
        }
    }
}

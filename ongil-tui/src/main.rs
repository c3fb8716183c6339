//! ongil: terminal front end.
//!
//! Screens:
//! 1. Place - "lat,lng" of the candidate site
//! 2. Category - business category sheet
//! 3. Conditions - price and rent range sheets plus four choice sheets
//! 4. Report - the server's analysis
//! 5. Community - board, post detail, search, compose

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ongil_services::community::CommunityStore;
use ongil_services::{seed, ApiClient, AppConfig};
use ongil_tui::app::AppState;
use ongil_tui::worker::{self, WorkerCommand};
use ongil_tui::{input, persistence, ui};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stderr(),
            DisableMouseCapture,
            DisableFocusChange,
            LeaveAlternateScreen
        );
        default_hook(info);
    }));

    let config = AppConfig::load(None).context("loading configuration")?;
    init_logging(&config)?;
    info!(api = %config.api.base_url, data = %config.data_dir().display(), "starting");

    let mut store = CommunityStore::open(config.community_path());
    match seed::seed_if_empty(&mut store, Utc::now()) {
        Ok(0) => {}
        Ok(_) => {
            if let Err(e) = store.save() {
                warn!(error = %e, "could not save seeded community store");
            }
        }
        Err(e) => warn!(error = %e, "seeding failed"),
    }

    let session_path = config.session_path();
    let session = persistence::load(&session_path);

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let client = ApiClient::new(&config.api)?;
    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx, Arc::new(client))?;

    let mut app = AppState::new(cmd_tx.clone(), resp_rx, store);
    persistence::apply(&mut app, session);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    if let Err(e) = persistence::save(&session_path, &persistence::extract(&app)) {
        warn!(error = %e, "could not save session");
    }
    if let Err(e) = app.store.save() {
        warn!(error = %e, "could not save community store");
    }

    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    info!("bye");
    result
}

/// The TUI owns stdout, so logs go to a file.
fn init_logging(config: &AppConfig) -> Result<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_worker_response(resp);
        }

        // 3. Wait up to one tick for input, then drain everything queued so a
        //    burst of drag events costs one slider update.
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        if event::poll(Duration::from_millis(50))? {
            loop {
                match event::read()? {
                    Event::Key(key) => input::handle_key(app, key),
                    Event::Mouse(mouse) => input::handle_mouse(app, mouse, area),
                    Event::FocusLost => input::handle_focus_lost(app),
                    _ => {}
                }
                if !app.running || !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        // 4. Frame boundary
        app.on_frame();

        // 5. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

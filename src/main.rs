//! TRexT - terminal HTTP client
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async HTTP execution

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{
        self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use trext::config::{self, Config};
use trext::constants::{APP_NAME, APP_VERSION, LOG_FILE};
use trext::messages::ui_events::key_to_ui_event;
use trext::messages::{FocusTarget, NetworkCommand, NetworkResponse, Page, RenderState, UiEvent};
use trext::network::{build_client, NetworkActor};
use trext::storage;
use trext::{AppActor, AppState};

/// Terminal cleanup guard
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let _log_guard = init_logging();

    let state = match init() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Initialization failed");
            eprintln!("Error initializing trext: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run(state).await {
        tracing::error!(error = %e, "Application error");
        eprintln!("Error running trext: {:#}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Log to a file next to the config; the terminal is in raw mode
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = config::app_dir().unwrap_or_else(|_| std::env::temp_dir());
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(&dir)
        .ok()?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    Some(guard)
}

fn init() -> anyhow::Result<AppState> {
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Falling back to default config");
        Config::default()
    });
    let store = storage::open_default().context("failed to open the request store")?;
    tracing::info!(version = APP_VERSION, theme = %config.theme, "Starting {}", APP_NAME);
    Ok(AppState::new(config, store))
}

async fn run(state: AppState) -> anyhow::Result<()> {
    let client = build_client(&state.config);

    // Terminal setup
    enable_raw_mode()?;
    let mut guard = TerminalGuard {
        keyboard_enhanced: false,
    };
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Lets terminals that support it report Ctrl+Enter
    if matches!(supports_keyboard_enhancement(), Ok(true)) {
        guard.keyboard_enhanced = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )
        .is_ok();
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(client, net_resp_tx);
    let network_handle = tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    let app_handle = tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    let result = run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await;

    // ui_tx is gone by now, so the App actor winds down and releases the store
    app_handle.await?;
    network_handle.await?;
    result
}

/// Run the synchronous UI rendering loop until the App actor stops
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            let ui_event = match event::read()? {
                Event::Key(key) => key_to_ui_event(key),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };
            if let Some(ui_event) = ui_event {
                let _ = ui_tx.send(ui_event);
            }
        }

        // Check for state updates (non-blocking)
        loop {
            match render_rx.try_recv() {
                Ok(state) => current_state = state,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }
    }
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let theme = &state.theme;
    let area = f.area();
    f.render_widget(Block::default().style(theme.base()), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Panels
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Fill(1), Constraint::Fill(2), Constraint::Fill(2)])
        .split(rows[0]);

    state
        .collections
        .render(f, columns[0], state.focus == FocusTarget::Collections, theme);
    state.request_panel.render(f, columns[1], state.focus, theme);
    state
        .response_view
        .render(f, columns[2], state.focus == FocusTarget::Response, theme);
    state.help_bar.render(f, rows[1], theme);

    if state.page == Page::Save {
        state.save_dialog.render(f, area, theme);
    }
}

//! Fortuna CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`fortuna_engine`] (game state) and [`fortuna_tui`] (rendering),
//! providing RAII-based terminal management with guaranteed cleanup.
//!
//! ```text
//! main() -> TerminalSession::enter() -> run_app() -> App + TUI
//! ```
//!
//! # Event Loop
//!
//! A fixed 16ms (~60 FPS) render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`fortuna_tui::InputPump`])
//! 3. Advance wheel, overlays and pending server calls (`app.tick(now)`)
//! 4. Render frame

use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Stdout, Write, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};
use tokio::time::{MissedTickBehavior, interval};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use fortuna_engine::{App, AppSettings, FortunaConfig};
use fortuna_tui::{InputPump, draw, handle_events};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let mut failures = Vec::new();
    let sink = log_paths().into_iter().find_map(|path| match open_log(&path) {
        Ok(file) => Some((path, file)),
        Err(err) => {
            failures.push(format!("{}: {err}", path.display()));
            None
        }
    });

    // Without a log file, drop output rather than write over the TUI.
    let Some((path, file)) = sink else {
        tracing_subscriber::registry().with(filter).init();
        return;
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(filter)
        .init();
    tracing::info!(path = %path.display(), "logging to file");
    for failure in failures {
        tracing::warn!("skipped log file {failure}");
    }
}

fn open_log(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// `~/.fortuna/logs/fortuna.log`, then `./.fortuna/logs/fortuna.log`.
fn log_paths() -> Vec<PathBuf> {
    let home_dir = FortunaConfig::path()
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf);
    home_dir
        .into_iter()
        .chain([PathBuf::from(".fortuna")])
        .map(|dir| dir.join("logs").join("fortuna.log"))
        .collect()
}

/// Raw mode, bracketed paste and the alternate screen for as long as this
/// lives. Dropping it restores the terminal, including on panic unwinds.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let setup = execute!(stdout(), EnableBracketedPaste, EnterAlternateScreen)
            .map_err(anyhow::Error::from)
            .and_then(|()| Terminal::new(CrosstermBackend::new(stdout())).map_err(Into::into));
        match setup {
            Ok(mut terminal) => {
                let _ = terminal.hide_cursor();
                Ok(Self { terminal })
            }
            Err(err) => {
                restore_terminal(&mut stdout());
                Err(err)
            }
        }
    }
}

fn restore_terminal(out: &mut impl Write) {
    let _ = disable_raw_mode();
    let _ = execute!(out, LeaveAlternateScreen, DisableBracketedPaste);
    let _ = out.flush();
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore_terminal(self.terminal.backend_mut());
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = match FortunaConfig::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Ignoring config: {err}");
            None
        }
    };
    let settings = AppSettings::resolve(config.as_ref());
    let mut app = App::new(settings)?;

    let result = {
        let mut session = TerminalSession::enter()?;
        run_app(&mut session.terminal, &mut app).await
    };

    app.teardown();
    if let Err(err) = &result {
        eprintln!("Error: {err:?}");
    }
    result
}

const FRAME_DURATION: Duration = Duration::from_millis(16);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        match handle_events(app, &mut input) {
            Ok(true) => break Ok(()),
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        app.tick(Instant::now());

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }
    };

    input.shutdown().await;
    result
}

//! Terminal User Interface (TUI) for tracklog.
//!
//! A single screen with tracking, history and edit views. Built with
//! ratatui and crossterm.

mod app;
mod event;
mod ui;

pub use app::{App, ClipboardSink, Osc52Clipboard, Tab};

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::info;

use crate::cli::args::TuiArgs;
use crate::config::{Config, Paths};
use crate::core::{Clock, SystemClock};
use crate::error::TrackerError;

/// Run the TUI application.
///
/// # Errors
///
/// Returns an error if the TUI fails to initialize or run.
pub fn run(args: &TuiArgs, config: &Config, paths: &Paths) -> Result<(), TrackerError> {
    let mut app = App::new(SystemClock, Osc52Clipboard, config, config.export_dir(paths));
    if let Some(name) = &args.name {
        app.tracker.set_name(name.as_str());
    }
    if let Some(owner) = &args.owner {
        app.tracker.set_owner(owner.as_str());
    }

    enable_raw_mode()
        .map_err(|e| TrackerError::Terminal(format!("Failed to enable raw mode: {e}")))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| TrackerError::Terminal(format!("Failed to setup terminal: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .map_err(|e| TrackerError::Terminal(format!("Failed to create terminal: {e}")))?;

    info!("tui started");
    let result = run_app(&mut terminal, &mut app);
    app.shutdown();
    info!(sessions = app.tracker.history().len(), "tui closed");

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Run the main application loop.
fn run_app<B: Backend, C: Clock, K: ClipboardSink>(
    terminal: &mut Terminal<B>,
    app: &mut App<C, K>,
) -> Result<(), TrackerError> {
    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| TrackerError::Terminal(format!("Failed to draw: {e}")))?;

        let timeout = app.poll_timeout();
        if let Some(action) = event::handle_events(app, timeout)? {
            let result = match action {
                event::Action::Quit => break,
                event::Action::CommitInput => app.commit_input(),
                event::Action::CopyCurrent => app.copy_current(),
                event::Action::CopyHistory => app.copy_history(),
                event::Action::DownloadCurrent => app.download_current(),
                event::Action::DownloadHistory => app.download_history(),
            };
            app.report(result);
        }

        app.on_tick();
    }

    Ok(())
}

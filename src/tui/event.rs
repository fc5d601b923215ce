//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::Clock;
use crate::error::TrackerError;
use crate::tui::app::{App, ClipboardSink, InputTarget, Tab};

/// Action to take after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,
    /// Save the text being edited.
    CommitInput,
    /// Copy the current session.
    CopyCurrent,
    /// Copy all history.
    CopyHistory,
    /// Download the current session.
    DownloadCurrent,
    /// Download all history.
    DownloadHistory,
}

const HELP: &str =
    "s:start p:pause r:resume x:stop | n/o:name/owner | c/C:copy d/D:download | Tab:view t:theme q:quit";

/// Wait up to `timeout` for a terminal event and handle it.
///
/// Returns an action to take, or None if no action is needed.
///
/// # Errors
///
/// Returns an error if event polling fails.
pub fn handle_events<C: Clock, K: ClipboardSink>(
    app: &mut App<C, K>,
    timeout: Duration,
) -> Result<Option<Action>, TrackerError> {
    if !event::poll(timeout)
        .map_err(|e| TrackerError::Terminal(format!("Event poll failed: {e}")))?
    {
        return Ok(None);
    }

    match event::read().map_err(|e| TrackerError::Terminal(format!("Event read failed: {e}")))? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(handle_key(app, key)),
        _ => Ok(None),
    }
}

/// Apply a single key press.
pub fn handle_key<C: Clock, K: ClipboardSink>(
    app: &mut App<C, K>,
    key: KeyEvent,
) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if app.input.is_some() {
        return handle_input_key(app, key);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Action::Quit),

        // Session controls
        KeyCode::Char('s') => app.start(),
        KeyCode::Char('p') => app.pause(),
        KeyCode::Char('r') => app.resume(),
        KeyCode::Char('x') => app.stop(),

        // Labels: draft on the tracking view, selected record on the edit view
        KeyCode::Char('n') => match app.tab {
            Tab::Edit => app.begin_entry_input(false),
            _ => app.begin_input(InputTarget::Name),
        },
        KeyCode::Char('o') => match app.tab {
            Tab::Edit => app.begin_entry_input(true),
            _ => app.begin_input(InputTarget::Owner),
        },

        // Export
        KeyCode::Char('c') => return Some(Action::CopyCurrent),
        KeyCode::Char('C') => return Some(Action::CopyHistory),
        KeyCode::Char('d') => return Some(Action::DownloadCurrent),
        KeyCode::Char('D') => return Some(Action::DownloadHistory),

        // Views
        KeyCode::Tab => app.next_tab(),
        KeyCode::Char('1') => app.set_tab(Tab::Tracking),
        KeyCode::Char('2') => app.set_tab(Tab::History),
        KeyCode::Char('3') => app.set_tab(Tab::Edit),
        KeyCode::Char('t') => app.toggle_theme(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),

        KeyCode::Char('?') => app.status = Some(HELP.to_string()),

        _ => {}
    }

    None
}

fn handle_input_key<C: Clock, K: ClipboardSink>(
    app: &mut App<C, K>,
    key: KeyEvent,
) -> Option<Action> {
    match key.code {
        KeyCode::Enter => return Some(Action::CommitInput),
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) => app.input_char(c),
        _ => {}
    }
    None
}

//! Application state for the TUI.

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::config::{Config, Theme};
use crate::core::Clock;
use crate::error::TrackerError;
use crate::tracking::export::{self, osc52_sequence};
use crate::tracking::{format_hms, Session, SessionEdit, SessionId, SessionTracker, TickOutcome, TickSchedule};

/// Somewhere to put copied exports.
#[cfg_attr(test, mockall::automock)]
pub trait ClipboardSink {
    /// Place `payload` on the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload could not be delivered.
    fn copy(&mut self, payload: &str) -> Result<(), TrackerError>;
}

/// Clipboard delivered through the terminal's OSC 52 escape sequence.
#[derive(Debug, Default)]
pub struct Osc52Clipboard;

impl ClipboardSink for Osc52Clipboard {
    fn copy(&mut self, payload: &str) -> Result<(), TrackerError> {
        let mut stdout = io::stdout();
        stdout
            .write_all(osc52_sequence(payload).as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|e| TrackerError::Export(format!("Failed to reach clipboard: {e}")))
    }
}

/// The three views of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Current session and controls.
    Tracking,
    /// Completed sessions.
    History,
    /// Completed sessions, editable.
    Edit,
}

impl Tab {
    /// All tabs, in display order.
    pub const ALL: [Self; 3] = [Self::Tracking, Self::History, Self::Edit];

    /// Get display name.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Tracking => "Tracking",
            Self::History => "History",
            Self::Edit => "Edit Records",
        }
    }

    /// Position in [`Tab::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Tracking => 0,
            Self::History => 1,
            Self::Edit => 2,
        }
    }

    /// The tab to the right, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Tracking => Self::History,
            Self::History => Self::Edit,
            Self::Edit => Self::Tracking,
        }
    }
}

/// Which text field is being typed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    /// Name for the next session.
    Name,
    /// Owner for the next session.
    Owner,
    /// Name of a history entry.
    EntryName(SessionId),
    /// Owner of a history entry.
    EntryOwner(SessionId),
}

impl InputTarget {
    /// Field label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name | Self::EntryName(_) => "Name",
            Self::Owner | Self::EntryOwner(_) => "Owner",
        }
    }
}

/// An in-progress text edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    /// Field being edited.
    pub target: InputTarget,
    /// Text typed so far.
    pub buffer: String,
}

/// Application state.
pub struct App<C: Clock, K: ClipboardSink> {
    /// The session tracker; the TUI loop is its only writer.
    pub tracker: SessionTracker<C>,
    clipboard: K,
    /// Current view.
    pub tab: Tab,
    /// Current color theme.
    pub theme: Theme,
    /// Selected history index (History and Edit views).
    pub selected: usize,
    /// Active text input, if any.
    pub input: Option<Input>,
    /// Status message to display.
    pub status: Option<String>,
    export_dir: PathBuf,
    schedule: TickSchedule,
    heartbeat: Option<Duration>,
    last_heartbeat: Option<DateTime<Utc>>,
}

impl<C: Clock, K: ClipboardSink> App<C, K> {
    /// Create a new app instance.
    pub fn new(clock: C, clipboard: K, config: &Config, export_dir: PathBuf) -> Self {
        let mut tracker = SessionTracker::with_options(clock, config.tracker.options());
        if let Some(name) = &config.tracker.default_name {
            tracker.set_name(name.as_str());
        }
        if let Some(owner) = &config.tracker.default_owner {
            tracker.set_owner(owner.as_str());
        }

        Self {
            tracker,
            clipboard,
            tab: Tab::Tracking,
            theme: config.ui.theme,
            selected: 0,
            input: None,
            status: Some("Press ? for help".to_string()),
            export_dir,
            schedule: TickSchedule::new(config.tracker.tick_interval()),
            heartbeat: config.tracker.heartbeat(),
            last_heartbeat: None,
        }
    }

    /// Start a session with the entered labels.
    pub fn start(&mut self) {
        if self.tracker.start(None, None).is_applied() {
            self.schedule.reset();
            self.last_heartbeat = Some(self.tracker.clock().now());
            self.status = Some(format!("Tracking \"{}\"", self.tracker.current().name));
        }
    }

    /// Pause the live session.
    pub fn pause(&mut self) {
        if self.tracker.pause().is_applied() {
            self.status = Some(format!(
                "Paused at {}",
                format_hms(self.tracker.current().total_time)
            ));
        }
    }

    /// Resume the paused session.
    pub fn resume(&mut self) {
        if self.tracker.resume().is_applied() {
            self.schedule.reset();
            self.status = Some("Resumed".to_string());
        }
    }

    /// Stop the live session.
    pub fn stop(&mut self) {
        if self.tracker.stop().is_applied() {
            let session = self.tracker.current();
            self.status = Some(format!(
                "Saved \"{}\" ({})",
                session.name,
                format_hms(session.total_time)
            ));
        }
    }

    /// Advance the tick schedule; called once per loop iteration.
    pub fn on_tick(&mut self) {
        let now = self.tracker.clock().now();
        let reset_due = self.tracker.reset_at().is_some_and(|at| at <= now);
        if !self.schedule.poll(now) && !reset_due {
            return;
        }

        if self.tracker.tick() == TickOutcome::Reset {
            self.status = Some("Ready for the next session".to_string());
        }
        self.log_heartbeat(now);
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self) -> std::time::Duration {
        let now = self.tracker.clock().now();
        let until_tick = self.schedule.time_until_due(now);
        let until_reset = self
            .tracker
            .reset_at()
            .map_or(until_tick, |at| (at - now).max(Duration::zero()));
        until_tick
            .min(until_reset)
            .to_std()
            .unwrap_or_default()
            .clamp(std::time::Duration::from_millis(10), std::time::Duration::from_millis(250))
    }

    fn log_heartbeat(&mut self, now: DateTime<Utc>) {
        let Some(interval) = self.heartbeat else {
            return;
        };
        if !self.tracker.is_tracking() {
            return;
        }
        let due = self.last_heartbeat.map_or(true, |last| now - last >= interval);
        if due {
            self.last_heartbeat = Some(now);
            let session = self.tracker.current();
            info!(
                session_id = session.id,
                status = %session.status,
                elapsed = %format_hms(self.tracker.live_elapsed()),
                "tracking heartbeat"
            );
        }
    }

    /// Flip between light and dark themes.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Switch to the next tab.
    pub fn next_tab(&mut self) {
        self.set_tab(self.tab.next());
    }

    /// Switch to a specific tab.
    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.clamp_selection();
    }

    /// The history entry under the cursor.
    pub fn selected_session(&self) -> Option<&Session> {
        self.tracker.history().get(self.selected)
    }

    /// Move selection up.
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection down.
    pub fn select_next(&mut self) {
        let len = self.tracker.history().len();
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.tracker.history().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Start typing into a field, pre-filled with its current value.
    pub fn begin_input(&mut self, target: InputTarget) {
        let current = match target {
            InputTarget::Name => self.tracker.name().unwrap_or_default().to_string(),
            InputTarget::Owner => self.tracker.owner().unwrap_or_default().to_string(),
            InputTarget::EntryName(id) | InputTarget::EntryOwner(id) => {
                let Some(session) = self.tracker.history().iter().find(|s| s.id == Some(id))
                else {
                    return;
                };
                let value = if matches!(target, InputTarget::EntryName(_)) {
                    &session.name
                } else {
                    &session.owner
                };
                value.clone()
            }
        };
        self.input = Some(Input {
            target,
            buffer: current,
        });
        self.status = Some(format!("Editing {} (Enter to save, Esc to cancel)", target.label()));
    }

    /// Edit the selected history entry's name or owner.
    pub fn begin_entry_input(&mut self, owner: bool) {
        let Some(id) = self.selected_session().and_then(|s| s.id) else {
            self.status = Some("No record selected".to_string());
            return;
        };
        let target = if owner {
            InputTarget::EntryOwner(id)
        } else {
            InputTarget::EntryName(id)
        };
        self.begin_input(target);
    }

    /// Append a character to the active input.
    pub fn input_char(&mut self, c: char) {
        if let Some(input) = &mut self.input {
            input.buffer.push(c);
        }
    }

    /// Delete the last character of the active input.
    pub fn input_backspace(&mut self) {
        if let Some(input) = &mut self.input {
            input.buffer.pop();
        }
    }

    /// Discard the active input.
    pub fn cancel_input(&mut self) {
        self.input = None;
        self.status = None;
    }

    /// Apply the active input to its field.
    ///
    /// # Errors
    ///
    /// Returns an error if amending a history entry fails.
    pub fn commit_input(&mut self) -> Result<(), TrackerError> {
        let Some(Input { target, buffer }) = self.input.take() else {
            return Ok(());
        };

        match target {
            InputTarget::Name => self.tracker.set_name(buffer),
            InputTarget::Owner => self.tracker.set_owner(buffer),
            InputTarget::EntryName(id) => {
                let edit = SessionEdit {
                    name: Some(buffer),
                    ..SessionEdit::default()
                };
                self.tracker.amend(id, &edit)?;
            }
            InputTarget::EntryOwner(id) => {
                let edit = SessionEdit {
                    owner: Some(buffer),
                    ..SessionEdit::default()
                };
                self.tracker.amend(id, &edit)?;
            }
        }
        self.status = Some(format!("{} saved", target.label()));
        Ok(())
    }

    /// Copy the current session to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the clipboard fails.
    pub fn copy_current(&mut self) -> Result<(), TrackerError> {
        let payload = export::session_to_json(self.tracker.current())?;
        self.clipboard.copy(&payload)?;
        info!(bytes = payload.len(), "current session copied");
        self.status = Some("Current session copied to clipboard".to_string());
        Ok(())
    }

    /// Copy the whole history to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the clipboard fails.
    pub fn copy_history(&mut self) -> Result<(), TrackerError> {
        let payload = export::history_to_json(self.tracker.history())?;
        self.clipboard.copy(&payload)?;
        info!(bytes = payload.len(), "history copied");
        self.status = Some("All history copied to clipboard".to_string());
        Ok(())
    }

    /// Download the current session into the export directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn download_current(&mut self) -> Result<(), TrackerError> {
        let path = export::download_session(&self.export_dir, self.tracker.current())?;
        self.status = Some(format!("Saved {}", path.display()));
        Ok(())
    }

    /// Download the whole history into the export directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn download_history(&mut self) -> Result<(), TrackerError> {
        let path = export::download_history(&self.export_dir, self.tracker.history())?;
        self.status = Some(format!("Saved {}", path.display()));
        Ok(())
    }

    /// Show a failed action in the status bar instead of exiting.
    pub fn report(&mut self, result: Result<(), TrackerError>) {
        if let Err(e) = result {
            warn!(error = %e, "action failed");
            self.status = Some(e.to_string());
        }
    }

    /// Cancel time-driven work before the app goes away.
    pub fn shutdown(&mut self) {
        self.tracker.cancel_pending_reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::tracking::SessionStatus;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 10, 1, 14, 0, 0).unwrap())
    }

    fn app_with(
        clipboard: MockClipboardSink,
        dir: &TempDir,
    ) -> App<ManualClock, MockClipboardSink> {
        App::new(
            clock(),
            clipboard,
            &Config::default(),
            dir.path().to_path_buf(),
        )
    }

    fn app(dir: &TempDir) -> App<ManualClock, MockClipboardSink> {
        app_with(MockClipboardSink::new(), dir)
    }

    #[test]
    fn test_tick_updates_display_once_per_interval() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.start();

        app.tracker.clock().advance(Duration::milliseconds(1_000));
        app.on_tick();
        assert_eq!(app.tracker.current().total_time, Duration::seconds(1));

        app.tracker.clock().advance(Duration::milliseconds(400));
        app.on_tick();
        assert_eq!(app.tracker.current().total_time, Duration::seconds(1));

        app.tracker.clock().advance(Duration::milliseconds(600));
        app.on_tick();
        assert_eq!(app.tracker.current().total_time, Duration::seconds(2));
    }

    #[test]
    fn test_reset_shows_ready_status() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.start();
        app.tracker.clock().advance(Duration::seconds(5));
        app.stop();
        assert_eq!(app.tracker.current().status, SessionStatus::Completed);

        app.tracker.clock().advance(Duration::seconds(3));
        app.on_tick();
        assert_eq!(app.tracker.current().status, SessionStatus::Ready);
        assert_eq!(app.status.as_deref(), Some("Ready for the next session"));
    }

    #[test]
    fn test_reset_not_held_back_by_slow_tick() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.tracker.tick_interval_ms = 10_000;
        let mut app = App::new(
            clock(),
            MockClipboardSink::new(),
            &config,
            dir.path().to_path_buf(),
        );
        app.start();
        app.on_tick();
        app.tracker.clock().advance(Duration::seconds(1));
        app.stop();

        app.tracker.clock().advance(Duration::milliseconds(2_500));
        app.on_tick();
        assert_eq!(app.tracker.current().status, SessionStatus::Ready);
    }

    #[test]
    fn test_poll_timeout_wakes_for_reset() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.tracker.tick_interval_ms = 10_000;
        let mut app = App::new(
            clock(),
            MockClipboardSink::new(),
            &config,
            dir.path().to_path_buf(),
        );
        app.start();
        app.on_tick();
        app.stop();
        app.tracker.clock().advance(Duration::seconds(2));

        assert_eq!(app.poll_timeout(), std::time::Duration::from_millis(10));
    }

    #[test]
    fn test_name_input_feeds_next_session() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);

        app.begin_input(InputTarget::Name);
        for c in "Plan".chars() {
            app.input_char(c);
        }
        app.input_char('x');
        app.input_backspace();
        app.commit_input().unwrap();
        app.start();

        assert_eq!(app.tracker.current().name, "Plan");
        assert!(app.input.is_none());
    }

    #[test]
    fn test_cancel_input_keeps_old_value() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.tracker.set_owner("Ops");

        app.begin_input(InputTarget::Owner);
        app.input_char('!');
        app.cancel_input();

        assert_eq!(app.tracker.owner(), Some("Ops"));
    }

    #[test]
    fn test_edit_record_name() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.start();
        app.stop();
        app.set_tab(Tab::Edit);

        app.begin_entry_input(false);
        let input = app.input.as_mut().unwrap();
        assert_eq!(input.buffer, "N/A");
        input.buffer = "Renamed".to_string();
        app.commit_input().unwrap();

        assert_eq!(app.tracker.history()[0].name, "Renamed");
    }

    #[test]
    fn test_copy_current_uses_clipboard() {
        let dir = TempDir::new().unwrap();
        let mut clipboard = MockClipboardSink::new();
        clipboard
            .expect_copy()
            .withf(|payload: &str| payload.contains("\"status\": \"Active\""))
            .times(1)
            .returning(|_| Ok(()));

        let mut app = app_with(clipboard, &dir);
        app.start();
        app.copy_current().unwrap();
        assert_eq!(
            app.status.as_deref(),
            Some("Current session copied to clipboard")
        );
    }

    #[test]
    fn test_copy_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut clipboard = MockClipboardSink::new();
        clipboard
            .expect_copy()
            .returning(|_| Err(TrackerError::Export("no terminal".to_string())));

        let mut app = app_with(clipboard, &dir);
        let result = app.copy_history();
        app.report(result);
        assert_eq!(app.status.as_deref(), Some("Export failed: no terminal"));
    }

    #[test]
    fn test_download_history_writes_file() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.start();
        app.stop();
        app.download_history().unwrap();

        assert!(dir.path().join("tracking-history.json").exists());
    }

    #[test]
    fn test_selection_bounds() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.select_next();
        assert_eq!(app.selected, 0);

        for _ in 0..2 {
            app.start();
            app.stop();
        }
        app.select_next();
        app.select_next();
        assert_eq!(app.selected, 1);
        app.select_previous();
        app.select_previous();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_tabs_cycle() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.next_tab();
        assert_eq!(app.tab, Tab::History);
        app.next_tab();
        assert_eq!(app.tab, Tab::Edit);
        app.next_tab();
        assert_eq!(app.tab, Tab::Tracking);
    }

    #[test]
    fn test_poll_timeout_bounded() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let timeout = app.poll_timeout();
        assert!(timeout >= std::time::Duration::from_millis(10));
        assert!(timeout <= std::time::Duration::from_millis(250));
    }

    #[test]
    fn test_shutdown_cancels_reset() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir);
        app.start();
        app.stop();
        app.shutdown();
        assert!(app.tracker.reset_at().is_none());
    }
}

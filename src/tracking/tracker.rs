//! The session tracker.
//!
//! Owns the current session, the completed-session history and the
//! tracking/paused flags. It is the single writer for all of them: callers
//! drive it from one thread (the TUI loop or the script runner), so no
//! locking is involved.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use super::edit::SessionEdit;
use super::elapsed::{elapsed, PauseAccounting};
use super::session::{Session, SessionId, SessionStatus};
use crate::core::{Clock, SystemClock};
use crate::error::TrackerError;

/// Result of a lifecycle operation.
///
/// Operations whose precondition does not hold are no-ops, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The transition happened.
    Applied,
    /// The precondition did not hold; nothing changed.
    NotApplicable,
}

impl Outcome {
    /// Check if the transition happened.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The live session's total was recomputed.
    Refreshed,
    /// A pending post-stop reset fired; `current` is a Ready placeholder again.
    Reset,
    /// Nothing to do (not tracking, or paused).
    Idle,
}

/// Tunables for a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerOptions {
    /// How long a completed session stays in the live slot after `stop`.
    pub reset_delay: Duration,
    /// How pause intervals are discounted.
    pub pause_accounting: PauseAccounting,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            reset_delay: Duration::seconds(2),
            pause_accounting: PauseAccounting::Reference,
        }
    }
}

/// Tracks one session at a time plus the history of completed sessions.
#[derive(Debug)]
pub struct SessionTracker<C: Clock = SystemClock> {
    clock: C,
    options: TrackerOptions,
    current: Session,
    history: Vec<Session>,
    is_tracking: bool,
    is_paused: bool,
    /// Last-entered labels, reused for the next start and the placeholder.
    name: Option<String>,
    owner: Option<String>,
    reset_at: Option<DateTime<Utc>>,
    last_id: SessionId,
}

impl<C: Clock> SessionTracker<C> {
    /// Create a tracker with default options.
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self::with_options(clock, TrackerOptions::default())
    }

    /// Create a tracker with explicit options.
    #[must_use]
    pub fn with_options(clock: C, options: TrackerOptions) -> Self {
        Self {
            clock,
            options,
            current: Session::default(),
            history: Vec::new(),
            is_tracking: false,
            is_paused: false,
            name: None,
            owner: None,
            reset_at: None,
            last_id: 0,
        }
    }

    /// The clock this tracker reads.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// The tracker's options.
    pub const fn options(&self) -> &TrackerOptions {
        &self.options
    }

    /// The session in the live slot.
    pub const fn current(&self) -> &Session {
        &self.current
    }

    /// Completed sessions, newest first.
    pub fn history(&self) -> &[Session] {
        &self.history
    }

    /// Whether a session is active or paused.
    pub const fn is_tracking(&self) -> bool {
        self.is_tracking
    }

    /// Whether the live session is paused.
    pub const fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Last-entered session name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Last-entered owner.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// When the pending post-stop reset will fire, if one is scheduled.
    pub const fn reset_at(&self) -> Option<DateTime<Utc>> {
        self.reset_at
    }

    /// Set the name used for the next session and the Ready placeholder.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = non_blank(name.into());
    }

    /// Set the owner used for the next session and the Ready placeholder.
    pub fn set_owner(&mut self, owner: impl Into<String>) {
        self.owner = non_blank(owner.into());
    }

    /// Start a new session.
    ///
    /// `Some` labels replace the last-entered ones; `None` reuses them. Blank
    /// labels are recorded as `N/A`. Cancels a pending post-stop reset.
    pub fn start(&mut self, name: Option<&str>, owner: Option<&str>) -> Outcome {
        if self.is_tracking {
            debug!("start ignored: already tracking");
            return Outcome::NotApplicable;
        }

        if let Some(name) = name {
            self.set_name(name);
        }
        if let Some(owner) = owner {
            self.set_owner(owner);
        }

        let now = self.clock.now();
        let id = self.next_id(now);
        self.reset_at = None;
        self.current = Session::started(id, self.name.as_deref(), self.owner.as_deref(), now);
        self.is_tracking = true;
        self.is_paused = false;

        info!(session_id = id, name = %self.current.name, owner = %self.current.owner, "session started");
        Outcome::Applied
    }

    /// Pause the live session.
    pub fn pause(&mut self) -> Outcome {
        if !self.is_tracking || self.is_paused {
            debug!("pause ignored: not tracking or already paused");
            return Outcome::NotApplicable;
        }

        let now = self.clock.now();
        self.current.total_time = self.elapsed_at(now);
        self.current.pause_time = Some(now);
        self.current.status = SessionStatus::Paused;
        self.is_paused = true;

        info!(session_id = self.current.id, total = %super::format_hms(self.current.total_time), "session paused");
        Outcome::Applied
    }

    /// Resume a paused session.
    pub fn resume(&mut self) -> Outcome {
        if !self.is_tracking || !self.is_paused {
            debug!("resume ignored: not paused");
            return Outcome::NotApplicable;
        }

        let now = self.clock.now();
        if self.options.pause_accounting == PauseAccounting::Cumulative {
            if let Some(paused_at) = self.current.pause_time {
                let gap = now.signed_duration_since(paused_at).max(Duration::zero());
                self.current.paused_total = self.current.paused_total + gap;
            }
        }
        self.current.resume_time = Some(now);
        self.current.status = SessionStatus::Active;
        self.is_paused = false;

        info!(session_id = self.current.id, "session resumed");
        Outcome::Applied
    }

    /// Stop the live session and record it in history.
    ///
    /// The completed session stays in the live slot until the reset delay
    /// has passed; the next [`tick`](Self::tick) after that swaps in a Ready
    /// placeholder.
    pub fn stop(&mut self) -> Outcome {
        if !self.is_tracking {
            debug!("stop ignored: not tracking");
            return Outcome::NotApplicable;
        }

        let now = self.clock.now();
        self.current.stop_time = Some(now);
        self.current.status = SessionStatus::Completed;
        self.current.total_time = self.elapsed_at(now);

        self.history.insert(0, self.current.clone());
        self.is_tracking = false;
        self.is_paused = false;
        self.reset_at = Some(now + self.options.reset_delay);

        info!(
            session_id = self.current.id,
            total = %super::format_hms(self.current.total_time),
            history_len = self.history.len(),
            "session stopped"
        );
        Outcome::Applied
    }

    /// Advance time-driven state.
    ///
    /// Fires a due post-stop reset, otherwise refreshes the live total while
    /// tracking and not paused.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now();

        if let Some(reset_at) = self.reset_at {
            if now >= reset_at {
                self.reset_at = None;
                self.current = Session::placeholder(self.name.as_deref(), self.owner.as_deref());
                debug!("live slot reset to Ready");
                return TickOutcome::Reset;
            }
        }

        if self.is_tracking && !self.is_paused {
            self.current.total_time = self.elapsed_at(now);
            TickOutcome::Refreshed
        } else {
            TickOutcome::Idle
        }
    }

    /// Drop a scheduled post-stop reset (used on teardown).
    pub fn cancel_pending_reset(&mut self) {
        if self.reset_at.take().is_some() {
            debug!("pending reset cancelled");
        }
    }

    /// Elapsed time of the live session right now, without mutating it.
    pub fn live_elapsed(&self) -> Duration {
        self.elapsed_at(self.clock.now())
    }

    /// Replace a history entry with an edited copy.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::NotFound` if no history entry has `id`, or
    /// `TrackerError::InvalidEdit` if the edit leaves the timestamps
    /// inconsistent. History is untouched on error.
    pub fn amend(&mut self, id: SessionId, edit: &SessionEdit) -> Result<&Session, TrackerError> {
        let index = self
            .history
            .iter()
            .position(|s| s.id == Some(id))
            .ok_or_else(|| TrackerError::NotFound(format!("session {id}")))?;

        let now = self.clock.now();
        let updated = edit.apply(&self.history[index], self.options.pause_accounting, now)?;
        info!(session_id = id, fields = %edit.describe(), "history entry amended");
        self.history[index] = updated;
        Ok(&self.history[index])
    }

    fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        elapsed(&self.current, now, self.options.pause_accounting)
    }

    fn next_id(&mut self, now: DateTime<Utc>) -> SessionId {
        let millis = SessionId::try_from(now.timestamp_millis()).unwrap_or(0);
        self.last_id = millis.max(self.last_id + 1);
        self.last_id
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

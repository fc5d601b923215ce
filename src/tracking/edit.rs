//! Editing completed sessions.
//!
//! A [`SessionEdit`] is a field delta applied to one history entry. The
//! result is validated so the entry stays internally consistent, and its
//! total is recomputed with the same accounting the tracker uses.

use chrono::{DateTime, Duration, Utc};

use super::elapsed::{elapsed, PauseAccounting};
use super::session::{label_or_na, Session};
use crate::error::TrackerError;

/// Field changes for a history entry. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionEdit {
    /// New name (blank becomes `N/A`).
    pub name: Option<String>,
    /// New owner (blank becomes `N/A`).
    pub owner: Option<String>,
    /// New start time.
    pub start_time: Option<DateTime<Utc>>,
    /// New stop time.
    pub stop_time: Option<DateTime<Utc>>,
    /// New pause time; `Some(None)` clears it.
    pub pause_time: Option<Option<DateTime<Utc>>>,
    /// New resume time; `Some(None)` clears it.
    pub resume_time: Option<Option<DateTime<Utc>>>,
}

impl SessionEdit {
    /// Check if the edit changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Parse a list of `field=value` assignments.
    ///
    /// Fields: `name`, `owner`, `start`, `stop`, `pause`, `resume`.
    /// Timestamps are RFC 3339; `pause`/`resume` accept `none` to clear.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidArgument` for unknown fields, missing
    /// `=`, or unparseable timestamps.
    pub fn from_assignments<'a>(
        assignments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, TrackerError> {
        let mut edit = Self::default();
        for assignment in assignments {
            let (field, value) = assignment.split_once('=').ok_or_else(|| {
                TrackerError::InvalidArgument(format!("expected field=value, got '{assignment}'"))
            })?;
            match field.trim().to_lowercase().as_str() {
                "name" => edit.name = Some(value.to_string()),
                "owner" => edit.owner = Some(value.to_string()),
                "start" | "starttime" => edit.start_time = Some(parse_timestamp(value)?),
                "stop" | "stoptime" => edit.stop_time = Some(parse_timestamp(value)?),
                "pause" | "pausetime" => edit.pause_time = Some(parse_optional_timestamp(value)?),
                "resume" | "resumetime" => {
                    edit.resume_time = Some(parse_optional_timestamp(value)?);
                }
                other => {
                    return Err(TrackerError::InvalidArgument(format!(
                        "unknown field '{other}'"
                    )))
                }
            }
        }
        Ok(edit)
    }

    /// Short list of the fields this edit touches, for logging.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.owner.is_some() {
            fields.push("owner");
        }
        if self.start_time.is_some() {
            fields.push("startTime");
        }
        if self.stop_time.is_some() {
            fields.push("stopTime");
        }
        if self.pause_time.is_some() {
            fields.push("pauseTime");
        }
        if self.resume_time.is_some() {
            fields.push("resumeTime");
        }
        fields.join(",")
    }

    /// Produce the edited copy of `session`.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::InvalidEdit` if the edited timestamps are
    /// inconsistent or the session is not completed.
    pub fn apply(
        &self,
        session: &Session,
        mode: PauseAccounting,
        now: DateTime<Utc>,
    ) -> Result<Session, TrackerError> {
        let mut updated = session.clone();

        if let Some(name) = &self.name {
            updated.name = label_or_na(Some(name));
        }
        if let Some(owner) = &self.owner {
            updated.owner = label_or_na(Some(owner));
        }
        if let Some(start) = self.start_time {
            updated.start_time = Some(start);
        }
        if let Some(stop) = self.stop_time {
            updated.stop_time = Some(stop);
        }
        if let Some(pause) = self.pause_time {
            updated.pause_time = pause;
        }
        if let Some(resume) = self.resume_time {
            updated.resume_time = resume;
        }

        let pause_edited = self.pause_time.is_some() || self.resume_time.is_some();
        validate(&updated, pause_edited)?;

        if pause_edited {
            updated.paused_total = match (updated.pause_time, updated.resume_time) {
                (Some(p), Some(r)) if r >= p => r - p,
                _ => Duration::zero(),
            };
        }
        updated.total_time = elapsed(&updated, now, mode);
        Ok(updated)
    }
}

/// Check timestamp ordering on a completed session.
///
/// A second pause keeps the earlier `resumeTime`, so `resumeTime < pauseTime`
/// is a normal tracker record. Ordering against `pauseTime` is only enforced
/// when the edit sets either of them.
fn validate(session: &Session, pause_edited: bool) -> Result<(), TrackerError> {
    if let Some(reason) = session.invariant_violation() {
        return Err(TrackerError::InvalidEdit(reason.to_string()));
    }
    let (Some(start), Some(stop)) = (session.start_time, session.stop_time) else {
        return Err(TrackerError::InvalidEdit(
            "only completed sessions can be edited".to_string(),
        ));
    };

    if let Some(pause) = session.pause_time {
        if pause < start || pause > stop {
            return Err(TrackerError::InvalidEdit(
                "pauseTime must fall between startTime and stopTime".to_string(),
            ));
        }
    }
    if let Some(resume) = session.resume_time {
        let Some(pause) = session.pause_time else {
            return Err(TrackerError::InvalidEdit(
                "resumeTime requires a pauseTime".to_string(),
            ));
        };
        if resume < start || resume > stop {
            return Err(TrackerError::InvalidEdit(
                "resumeTime must fall between startTime and stopTime".to_string(),
            ));
        }
        if pause_edited && resume < pause {
            return Err(TrackerError::InvalidEdit(
                "resumeTime must not precede pauseTime".to_string(),
            ));
        }
    }
    Ok(())
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TrackerError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| TrackerError::InvalidArgument(format!("invalid timestamp '{value}': {e}")))
}

fn parse_optional_timestamp(value: &str) -> Result<Option<DateTime<Utc>>, TrackerError> {
    match value.trim().to_lowercase().as_str() {
        "" | "none" | "null" | "n/a" => Ok(None),
        _ => parse_timestamp(value).map(Some),
    }
}

//! The tracked session record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::elapsed::hms_serde;
use crate::core::NOT_AVAILABLE;

/// Unique session identifier (epoch milliseconds at creation, kept monotonic).
pub type SessionId = u64;

/// Lifecycle status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Placeholder; nothing is being tracked.
    #[default]
    Ready,
    /// Time is being counted.
    Active,
    /// Tracking, but the clock is on hold.
    Paused,
    /// Stopped and recorded in history.
    Completed,
}

impl SessionStatus {
    /// Get display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Active => "Active",
            Self::Paused => "Paused",
            Self::Completed => "Completed",
        }
    }

    /// Whether a session in this status is still being tracked.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Active | Self::Paused)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One tracked interval of activity.
///
/// The serialized shape (camelCase field names, ISO-8601 timestamps,
/// `totalTime` as `HH:MM:SS`) is the export format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Assigned at start; `None` on the Ready placeholder.
    pub id: Option<SessionId>,
    /// Free-text label.
    pub name: String,
    /// Free-text owner.
    pub owner: String,
    /// Set once, when tracking starts.
    pub start_time: Option<DateTime<Utc>>,
    /// Set once, when the session completes.
    pub stop_time: Option<DateTime<Utc>>,
    /// Most recent transition into Paused.
    pub pause_time: Option<DateTime<Utc>>,
    /// Most recent transition out of Paused.
    pub resume_time: Option<DateTime<Utc>>,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Elapsed time, refreshed on every tick and frozen at stop.
    #[serde(with = "hms_serde")]
    pub total_time: Duration,
    /// Closed pause gaps, only maintained under cumulative pause accounting.
    #[serde(skip, default = "Duration::zero")]
    pub(crate) paused_total: Duration,
}

impl Session {
    /// A fresh Ready placeholder carrying the given labels.
    #[must_use]
    pub fn placeholder(name: Option<&str>, owner: Option<&str>) -> Self {
        Self {
            id: None,
            name: label_or_na(name),
            owner: label_or_na(owner),
            start_time: None,
            stop_time: None,
            pause_time: None,
            resume_time: None,
            status: SessionStatus::Ready,
            total_time: Duration::zero(),
            paused_total: Duration::zero(),
        }
    }

    /// A newly started, Active session.
    #[must_use]
    pub fn started(
        id: SessionId,
        name: Option<&str>,
        owner: Option<&str>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            start_time: Some(now),
            status: SessionStatus::Active,
            ..Self::placeholder(name, owner)
        }
    }

    /// Check if the session is live (active or paused).
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.status.is_live()
    }

    /// Check the timestamp/status invariants.
    ///
    /// Returns a description of the first violation found.
    #[must_use]
    pub fn invariant_violation(&self) -> Option<&'static str> {
        let started = self.status != SessionStatus::Ready;
        if self.start_time.is_some() != started {
            return Some("startTime must be set exactly when status is not Ready");
        }
        let completed = self.status == SessionStatus::Completed;
        if self.stop_time.is_some() != completed {
            return Some("stopTime must be set exactly when status is Completed");
        }
        if let (Some(start), Some(stop)) = (self.start_time, self.stop_time) {
            if stop < start {
                return Some("stopTime must not precede startTime");
            }
        }
        None
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::placeholder(None, None)
    }
}

/// Normalize a free-text label: blank or missing becomes `N/A`.
#[must_use]
pub fn label_or_na(label: Option<&str>) -> String {
    match label.map(str::trim) {
        Some(l) if !l.is_empty() => l.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_placeholder_defaults() {
        let session = Session::default();
        assert_eq!(session.id, None);
        assert_eq!(session.name, "N/A");
        assert_eq!(session.owner, "N/A");
        assert_eq!(session.status, SessionStatus::Ready);
        assert_eq!(session.total_time, Duration::zero());
        assert!(session.invariant_violation().is_none());
    }

    #[test]
    fn test_started_session() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let session = Session::started(7, Some("Deep work"), Some("  "), now);

        assert_eq!(session.id, Some(7));
        assert_eq!(session.name, "Deep work");
        assert_eq!(session.owner, "N/A");
        assert_eq!(session.start_time, Some(now));
        assert_eq!(session.status, SessionStatus::Active);
        assert!(session.is_live());
        assert!(session.invariant_violation().is_none());
    }

    #[test]
    fn test_label_or_na() {
        assert_eq!(label_or_na(None), "N/A");
        assert_eq!(label_or_na(Some("")), "N/A");
        assert_eq!(label_or_na(Some("  Alice ")), "Alice");
    }

    #[test]
    fn test_status_is_live() {
        assert!(!SessionStatus::Ready.is_live());
        assert!(SessionStatus::Active.is_live());
        assert!(SessionStatus::Paused.is_live());
        assert!(!SessionStatus::Completed.is_live());
    }

    #[test]
    fn test_invariant_violation_detected() {
        let mut session = Session::default();
        session.status = SessionStatus::Active;
        assert!(session.invariant_violation().is_some());
    }

    #[test]
    fn test_serialized_field_names() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let session = Session::started(1, None, None, now);
        let value = serde_json::to_value(&session).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "id",
                "name",
                "owner",
                "pauseTime",
                "resumeTime",
                "startTime",
                "status",
                "stopTime",
                "totalTime"
            ]
        );
        assert_eq!(object["status"], "Active");
        assert_eq!(object["totalTime"], "00:00:00");
        assert_eq!(object["startTime"], "2024-05-01T08:30:00Z");
        assert!(object["stopTime"].is_null());
    }
}

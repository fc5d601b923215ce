//! Time accounting for sessions.
//!
//! [`elapsed`] is the single function both the live tick and `stop` use to
//! derive a session's total time, so the running display and the recorded
//! duration always agree. It is pure in `(session, now, mode)`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::session::Session;

/// How pause intervals are discounted from a session's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PauseAccounting {
    /// Only an open pause (pauseTime set, resumeTime absent) is subtracted.
    ///
    /// Once a session has been resumed, its pause gaps stay in the total,
    /// including any later pause, since `resumeTime` is never cleared.
    #[default]
    Reference,
    /// Every pause gap is subtracted: the closed gaps accumulated on resume
    /// plus the currently open one.
    ///
    /// Diverges from the reference accounting; opt-in only.
    Cumulative,
}

impl PauseAccounting {
    /// Parse accounting mode from string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reference" | "ref" => Some(Self::Reference),
            "cumulative" | "cum" => Some(Self::Cumulative),
            _ => None,
        }
    }
}

/// Compute the elapsed tracked time of `session` as of `now`.
///
/// The end of the interval is `stopTime` if present, else `now`. The result
/// is clamped at zero and truncated to whole seconds.
#[must_use]
pub fn elapsed(session: &Session, now: DateTime<Utc>, mode: PauseAccounting) -> Duration {
    let Some(start) = session.start_time else {
        return Duration::zero();
    };

    let end = session.stop_time.unwrap_or(now);
    let mut total = end.signed_duration_since(start);

    match mode {
        PauseAccounting::Reference => {
            if let (Some(paused_at), None) = (session.pause_time, session.resume_time) {
                total = total - end.signed_duration_since(paused_at);
            }
        }
        PauseAccounting::Cumulative => {
            total = total - session.paused_total;
            if let Some(paused_at) = open_pause(session) {
                total = total - end.signed_duration_since(paused_at);
            }
        }
    }

    Duration::seconds(total.num_seconds().max(0))
}

/// The start of the currently open pause, if the session is on hold.
fn open_pause(session: &Session) -> Option<DateTime<Utc>> {
    let paused_at = session.pause_time?;
    match session.resume_time {
        Some(resumed_at) if resumed_at >= paused_at => None,
        _ => Some(paused_at),
    }
}

/// Format a duration as zero-padded `HH:MM:SS`. Hours are not capped at 24.
#[must_use]
pub fn format_hms(d: Duration) -> String {
    let total_seconds = d.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Parse a `HH:MM:SS` string produced by [`format_hms`].
#[must_use]
pub fn parse_hms(s: &str) -> Option<Duration> {
    let mut parts = s.trim().split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some()
        || hours < 0
        || !(0..60).contains(&minutes)
        || !(0..60).contains(&seconds)
    {
        return None;
    }
    Some(Duration::seconds(hours * 3600 + minutes * 60 + seconds))
}

/// Serde adapter storing a `Duration` as `HH:MM:SS`.
pub mod hms_serde {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize as `HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hms(*d))
    }

    /// Deserialize from `HH:MM:SS`.
    ///
    /// # Errors
    ///
    /// Fails if the string is not a valid `HH:MM:SS` duration.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_hms(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid HH:MM:SS duration: {s}")))
    }
}

//! JSON output formatting for tracklog.
//!
//! Sessions are emitted in their export shape so CLI output can be fed
//! straight back into anything that reads exports.

use serde::Serialize;
use serde_json::json;

use crate::error::TrackerError;
use crate::tracking::export::{history_to_json, session_to_json};
use crate::tracking::Session;

/// Format a single session as JSON
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn format_session_json(session: &Session) -> Result<String, TrackerError> {
    session_to_json(session)
}

/// Format the history as a JSON array
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn format_history_json(history: &[Session]) -> Result<String, TrackerError> {
    history_to_json(history)
}

/// Format an acknowledgment for a lifecycle operation
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn format_event_json(
    action: &str,
    applied: bool,
    session: &Session,
) -> Result<String, TrackerError> {
    let output = json!({
        "action": action,
        "applied": applied,
        "session": session,
    });
    Ok(serde_json::to_string(&output)?)
}

/// Serialize any value to pretty JSON
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, TrackerError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_event_json() {
        let session = Session::default();
        let output = format_event_json("pause", false, &session).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["action"], "pause");
        assert_eq!(value["applied"], false);
        assert_eq!(value["session"]["status"], "Ready");
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_format_history_json_empty() {
        assert_eq!(format_history_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_to_json() {
        let output = to_json(&vec!["a", "b"]).unwrap();
        assert!(output.contains("\"a\""));
    }
}

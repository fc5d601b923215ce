//! JSON export of sessions.
//!
//! Exports mirror the [`Session`] shape exactly: camelCase fields, ISO-8601
//! timestamps, `null` for absent values and `totalTime` as `HH:MM:SS`.
//! The same payload is used for file downloads and clipboard copies.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::info;

use super::session::Session;
use crate::error::TrackerError;

/// File name used when downloading the whole history.
pub const HISTORY_FILE_NAME: &str = "tracking-history.json";

/// What to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// Only the session in the live slot.
    Current,
    /// Every completed session, newest first.
    History,
}

impl ExportScope {
    /// Parse scope from string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "current" | "session" | "c" => Some(Self::Current),
            "history" | "all" | "h" => Some(Self::History),
            _ => None,
        }
    }
}

/// Serialize one session as pretty-printed JSON.
///
/// # Errors
///
/// Returns `TrackerError::Parse` if serialization fails.
pub fn session_to_json(session: &Session) -> Result<String, TrackerError> {
    Ok(serde_json::to_string_pretty(session)?)
}

/// Serialize the history as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns `TrackerError::Parse` if serialization fails.
pub fn history_to_json(history: &[Session]) -> Result<String, TrackerError> {
    Ok(serde_json::to_string_pretty(history)?)
}

/// Parse a session previously produced by [`session_to_json`].
///
/// Unknown fields (such as a legacy empty `history` array) are ignored.
///
/// # Errors
///
/// Returns `TrackerError::Parse` if the JSON does not describe a session.
pub fn parse_session(json: &str) -> Result<Session, TrackerError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a history array previously produced by [`history_to_json`].
///
/// # Errors
///
/// Returns `TrackerError::Parse` if the JSON does not describe a session list.
pub fn parse_history(json: &str) -> Result<Vec<Session>, TrackerError> {
    Ok(serde_json::from_str(json)?)
}

/// Default download file name for a single session.
#[must_use]
pub fn session_file_name(session: &Session) -> String {
    session.id.map_or_else(
        || "tracking-session-current.json".to_string(),
        |id| format!("tracking-session-{id}.json"),
    )
}

/// Write an export payload into `dir`, creating it if needed.
///
/// Returns the full path written.
///
/// # Errors
///
/// Returns `TrackerError::Export` if the directory or file cannot be written.
pub fn write_export(dir: &Path, file_name: &str, payload: &str) -> Result<PathBuf, TrackerError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        TrackerError::Export(format!("Failed to create directory {}: {e}", dir.display()))
    })?;

    let path = dir.join(file_name);
    std::fs::write(&path, payload)
        .map_err(|e| TrackerError::Export(format!("Failed to write {}: {e}", path.display())))?;

    info!(path = %path.display(), bytes = payload.len(), "export written");
    Ok(path)
}

/// Download the current session into `dir` under its default file name.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn download_session(dir: &Path, session: &Session) -> Result<PathBuf, TrackerError> {
    write_export(dir, &session_file_name(session), &session_to_json(session)?)
}

/// Download the whole history into `dir` as `tracking-history.json`.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn download_history(dir: &Path, history: &[Session]) -> Result<PathBuf, TrackerError> {
    write_export(dir, HISTORY_FILE_NAME, &history_to_json(history)?)
}

/// Wrap a payload in an OSC 52 escape so the terminal places it on the
/// system clipboard.
#[must_use]
pub fn osc52_sequence(payload: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(payload))
}

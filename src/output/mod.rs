//! Output formatting for tracklog.
//!
//! This module provides formatters for displaying sessions in various formats.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::TrackerError;
use crate::tracking::Session;

pub use json::*;
pub use pretty::*;

/// Format a single session based on output format
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn format_session(session: &Session, format: OutputFormat) -> Result<String, TrackerError> {
    match format {
        OutputFormat::Pretty => Ok(format_session_pretty(session)),
        OutputFormat::Json => format_session_json(session),
    }
}

/// Format the history based on output format
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn format_history(history: &[Session], format: OutputFormat) -> Result<String, TrackerError> {
    match format {
        OutputFormat::Pretty => Ok(format_history_pretty(history)),
        OutputFormat::Json => format_history_json(history),
    }
}

/// Format a lifecycle acknowledgment based on output format
///
/// # Errors
///
/// Returns `TrackerError::Parse` if JSON serialization fails.
pub fn format_event(
    action: &str,
    applied: bool,
    session: &Session,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    match format {
        OutputFormat::Pretty => Ok(format_event_pretty(action, applied, session)),
        OutputFormat::Json => format_event_json(action, applied, session),
    }
}

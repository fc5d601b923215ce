//! Error types for tracklog.
//!
//! Lifecycle operations never fail: an operation whose precondition does not
//! hold reports [`crate::tracking::Outcome::NotApplicable`] instead. The
//! variants here cover everything around the core (config, export, editing,
//! the terminal).

use thiserror::Error;

/// Errors that can occur while running tracklog.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Configuration could not be loaded, saved, or resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A session id did not match any history entry.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An edit would leave a session's timestamps inconsistent.
    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    /// Malformed user input (script commands, durations, field values).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Writing an export file or clipboard payload failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Terminal setup, drawing or event polling failed.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Parse(#[from] serde_json::Error),

    /// YAML (de)serialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    /// Exit code to use when this error terminates the process.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) | Self::InvalidEdit(_) => 2,
            Self::NotFound(_) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackerError::NotFound("session 42".to_string());
        assert_eq!(err.to_string(), "Not found: session 42");

        let err = TrackerError::InvalidEdit("stop before start".to_string());
        assert_eq!(err.to_string(), "Invalid edit: stop before start");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: TrackerError = parse.unwrap_err().into();
        assert!(matches!(err, TrackerError::Parse(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(TrackerError::InvalidArgument("x".into()).exit_code(), 2);
        assert_eq!(TrackerError::NotFound("x".into()).exit_code(), 3);
        assert_eq!(TrackerError::Config("x".into()).exit_code(), 1);
    }
}

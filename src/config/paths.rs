//! Path resolution for tracklog configuration and data files.
//!
//! All tracklog files live in `~/.tracklog/` (or `$TRACKLOG_HOME`):
//! - `config.yaml` - Main configuration file
//! - `exports/` - Default target for session/history downloads
//! - `logs/` - Rolling log files
//!
//! Sessions themselves are never written here; they live in memory only.

use std::path::PathBuf;

use crate::error::TrackerError;

/// Environment variable overriding the root directory.
pub const HOME_ENV: &str = "TRACKLOG_HOME";

/// Paths to tracklog configuration and data directories.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.tracklog/`
    pub root: PathBuf,
    /// Config file: `~/.tracklog/config.yaml`
    pub config_file: PathBuf,
    /// Exports directory: `~/.tracklog/exports/`
    pub exports: PathBuf,
    /// Logs directory: `~/.tracklog/logs/`
    pub logs: PathBuf,
}

impl Paths {
    /// Resolve paths from `$TRACKLOG_HOME`, falling back to `~/.tracklog`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither variable is set.
    pub fn new() -> Result<Self, TrackerError> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            TrackerError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".tracklog")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            exports: root.join("exports"),
            logs: root.join("logs"),
            root,
        }
    }

    /// Ensure all directories exist, creating them if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), TrackerError> {
        for dir in [&self.root, &self.exports, &self.logs] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    TrackerError::Config(format!(
                        "Failed to create directory {}: {e}",
                        dir.display()
                    ))
                })?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths_with_root() {
        let root = PathBuf::from("/tmp/test-tracklog");
        let paths = Paths::with_root(root.clone());

        assert_eq!(paths.root, root);
        assert_eq!(paths.config_file, root.join("config.yaml"));
        assert_eq!(paths.exports, root.join("exports"));
        assert_eq!(paths.logs, root.join("logs"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().join("nested"));

        paths.ensure_dirs().unwrap();

        assert!(paths.root.exists());
        assert!(paths.exports.exists());
        assert!(paths.logs.exists());
    }
}

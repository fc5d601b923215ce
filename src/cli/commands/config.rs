//! Config command implementation.

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::TrackerError;
use crate::output::to_json;

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the config cannot be serialized or written.
pub fn config(
    cmd: &ConfigCommands,
    config: &Config,
    paths: &Paths,
    format: OutputFormat,
) -> Result<String, TrackerError> {
    match cmd {
        ConfigCommands::Show => match format {
            OutputFormat::Json => to_json(config),
            OutputFormat::Pretty => config.to_yaml(),
        },
        ConfigCommands::Path => Ok(paths.config_file.display().to_string()),
        ConfigCommands::Init { force } => init_config(paths, *force),
    }
}

fn init_config(paths: &Paths, force: bool) -> Result<String, TrackerError> {
    if paths.config_file.exists() && !force {
        return Err(TrackerError::Config(format!(
            "{} already exists (use --force to overwrite)",
            paths.config_file.display()
        )));
    }

    paths.ensure_dirs()?;
    Config::default().save_to_path(&paths.config_file)?;
    Ok(format!("Wrote {}", paths.config_file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_default() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().to_path_buf());

        let output = config(
            &ConfigCommands::Init { force: false },
            &Config::default(),
            &paths,
            OutputFormat::Pretty,
        )
        .unwrap();
        assert!(output.starts_with("Wrote"));
        assert!(paths.config_file.exists());

        let loaded = Config::load_from_path(&paths.config_file).unwrap();
        assert_eq!(loaded.tracker.reset_delay_secs, 2);
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().to_path_buf());
        std::fs::write(&paths.config_file, "ui:\n  theme: dark\n").unwrap();

        let err = config(
            &ConfigCommands::Init { force: false },
            &Config::default(),
            &paths,
            OutputFormat::Pretty,
        )
        .unwrap_err();
        assert!(matches!(err, TrackerError::Config(_)));

        config(
            &ConfigCommands::Init { force: true },
            &Config::default(),
            &paths,
            OutputFormat::Pretty,
        )
        .unwrap();
    }

    #[test]
    fn test_show_json() {
        let paths = Paths::with_root(std::path::PathBuf::from("/tmp/tl"));
        let output = config(
            &ConfigCommands::Show,
            &Config::default(),
            &paths,
            OutputFormat::Json,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["tracker"]["pause_accounting"], "reference");
    }
}

//! Configuration settings for tracklog.
//!
//! Settings are loaded from `~/.tracklog/config.yaml`. Every field has a
//! default, so a partial (or missing) file is fine.

use std::path::PathBuf;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::cli::args::OutputFormat;
use crate::config::Paths;
use crate::error::TrackerError;
use crate::tracking::{PauseAccounting, TrackerOptions};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Tracker behavior.
    pub tracker: TrackerConfig,
    /// Export settings.
    pub export: ExportConfig,
    /// Terminal UI settings.
    pub ui: UiConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default = "default_output_format")]
    pub default_output: OutputFormat,
    /// Color output setting.
    #[serde(default = "default_color")]
    pub color: ColorSetting,
}

/// Color output setting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorSetting {
    /// Auto-detect based on terminal.
    #[default]
    Auto,
    /// Always use colors.
    Always,
    /// Never use colors.
    Never,
}

impl ColorSetting {
    /// Apply this setting to `colored`'s global override.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Tracker behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Name pre-filled for new sessions.
    #[serde(default)]
    pub default_name: Option<String>,
    /// Owner pre-filled for new sessions.
    #[serde(default)]
    pub default_owner: Option<String>,
    /// Seconds a completed session stays visible before the Ready reset.
    #[serde(default = "default_reset_delay")]
    pub reset_delay_secs: u64,
    /// Display refresh interval in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Interval of the "still tracking" log heartbeat, in seconds. 0 disables it.
    #[serde(default = "default_heartbeat")]
    pub heartbeat_secs: u64,
    /// Pause accounting mode.
    #[serde(default)]
    pub pause_accounting: PauseAccounting,
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExportConfig {
    /// Where downloads go; defaults to `~/.tracklog/exports`.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Terminal UI settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct UiConfig {
    /// Initial color theme.
    #[serde(default)]
    pub theme: Theme,
}

/// Color theme of the TUI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background.
    #[default]
    Light,
    /// Dark background.
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

// Default value functions for serde
const fn default_output_format() -> OutputFormat {
    OutputFormat::Pretty
}

const fn default_color() -> ColorSetting {
    ColorSetting::Auto
}

const fn default_reset_delay() -> u64 {
    2
}

const fn default_tick_interval() -> u64 {
    1000
}

const fn default_heartbeat() -> u64 {
    30
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_output: default_output_format(),
            color: default_color(),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_name: None,
            default_owner: None,
            reset_delay_secs: default_reset_delay(),
            tick_interval_ms: default_tick_interval(),
            heartbeat_secs: default_heartbeat(),
            pause_accounting: PauseAccounting::default(),
        }
    }
}

impl TrackerConfig {
    /// Tracker options derived from these settings.
    #[must_use]
    pub fn options(&self) -> TrackerOptions {
        TrackerOptions {
            reset_delay: Duration::seconds(clamp_interval(self.reset_delay_secs)),
            pause_accounting: self.pause_accounting,
        }
    }

    /// Tick interval as a chrono duration.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::milliseconds(clamp_interval(self.tick_interval_ms))
    }

    /// Heartbeat interval, or `None` if disabled.
    #[must_use]
    pub fn heartbeat(&self) -> Option<Duration> {
        (self.heartbeat_secs > 0)
            .then(|| Duration::seconds(clamp_interval(self.heartbeat_secs)))
    }
}

/// Clamp a configured interval so chrono durations never overflow.
fn clamp_interval(value: u64) -> i64 {
    i64::try_from(value.min(86_400_000)).unwrap_or(86_400_000)
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self, TrackerError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            TrackerError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        serde_yaml::from_str(&contents).map_err(|e| {
            TrackerError::Config(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be written.
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), TrackerError> {
        std::fs::write(path, self.to_yaml()?).map_err(|e| {
            TrackerError::Config(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Render the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, TrackerError> {
        serde_yaml::to_string(self)
            .map_err(|e| TrackerError::Config(format!("Failed to serialize config: {e}")))
    }

    /// Directory downloads are written to.
    #[must_use]
    pub fn export_dir(&self, paths: &Paths) -> PathBuf {
        self.export
            .directory
            .clone()
            .unwrap_or_else(|| paths.exports.clone())
    }
}

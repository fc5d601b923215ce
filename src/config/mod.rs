//! Configuration management for tracklog.
//!
//! This module handles loading and saving configuration from `~/.tracklog/`.

mod paths;
mod settings;

pub use paths::{Paths, HOME_ENV};
pub use settings::{ColorSetting, Config, ExportConfig, GeneralConfig, Theme, TrackerConfig, UiConfig};

//! tracklog - a single-screen terminal time tracker
//!
//! Start, pause, resume and stop a named work session, keep an in-memory
//! history of completed sessions, and export sessions as JSON.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod output;
pub mod tracking;
pub mod tui;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::TrackerError;
pub use tracking::SessionTracker;

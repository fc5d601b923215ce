//! Command implementations.
//!
//! Each command returns the text to print; commands that stream their own
//! output (the script runner) return an empty string.

mod completions;
mod config;
mod script;

pub use completions::completions;
pub use config::config;
pub use script::{script, ScriptRunner};

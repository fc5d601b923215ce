//! Core abstractions for tracklog.
//!
//! This module provides the clock seam and shared formatting helpers.

mod clock;
mod datetime;

pub use clock::{Clock, ManualClock, SystemClock};
pub use datetime::{format_time_of_day, format_timestamp, parse_duration, NOT_AVAILABLE};

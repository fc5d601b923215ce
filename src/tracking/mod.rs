//! Session tracking.
//!
//! Provides the single-session time tracker:
//! - Start/pause/resume/stop lifecycle with a Ready placeholder in between
//! - Pause-aware elapsed time accounting shared by ticks and `stop`
//! - Newest-first history of completed sessions
//! - JSON export and validated editing of history entries

pub mod edit;
pub mod elapsed;
pub mod export;
pub mod session;
pub mod ticker;
pub mod tracker;

pub use edit::SessionEdit;
pub use elapsed::{elapsed, format_hms, parse_hms, PauseAccounting};
pub use export::ExportScope;
pub use session::{label_or_na, Session, SessionId, SessionStatus};
pub use ticker::TickSchedule;
pub use tracker::{Outcome, SessionTracker, TickOutcome, TrackerOptions};

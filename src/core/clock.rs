//! Wall-clock abstraction.
//!
//! The tracker reads time only through [`Clock`] so lifecycle and tick logic
//! can be driven deterministically in tests and in simulated script runs.

use std::cell::Cell;

use chrono::{DateTime, Duration, SubsecRound, Utc};

/// Source of the current time.
pub trait Clock {
    /// The current instant, at millisecond precision.
    fn now(&self) -> DateTime<Utc>;

    /// Let `duration` pass. The system clock blocks the thread.
    fn sleep(&self, duration: Duration) {
        if let Ok(d) = duration.to_std() {
            std::thread::sleep(d);
        }
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

/// A clock that only moves when told to.
///
/// Used by tests and by `tracklog script --simulated`.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start.trunc_subsecs(3)),
        }
    }

    /// Create a clock frozen at the current system time.
    #[must_use]
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }

    /// Move the clock forward (or backward, for a negative duration).
    ///
    /// Saturates at the bounds of `DateTime<Utc>`.
    pub fn advance(&self, by: Duration) {
        let next = self.now.get().checked_add_signed(by).unwrap_or(if by < Duration::zero() {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });
        self.now.set(next);
    }

    /// Jump to an absolute instant.
    pub fn set(&self, to: DateTime<Utc>) {
        self.now.set(to.trunc_subsecs(3));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

//! Tick scheduling.
//!
//! The schedule only answers "is a tick due?". Whoever owns the tracker
//! decides how to wait (the TUI folds it into its input poll timeout).

use chrono::{DateTime, Duration, Utc};

/// A fixed-interval schedule for display refresh ticks.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    interval: Duration,
    next_due: Option<DateTime<Utc>>,
}

impl TickSchedule {
    /// Create a schedule firing every `interval`.
    ///
    /// Non-positive intervals are bumped to one millisecond.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let interval = if interval > Duration::zero() {
            interval
        } else {
            Duration::milliseconds(1)
        };
        Self {
            interval,
            next_due: None,
        }
    }

    /// A schedule firing once per second.
    #[must_use]
    pub fn every_second() -> Self {
        Self::new(Duration::seconds(1))
    }

    /// The configured interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Check whether a tick is due at `now`, advancing the schedule if so.
    ///
    /// The first call always fires. If several intervals were missed only a
    /// single tick is reported.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.next_due {
            Some(due) if now < due => false,
            Some(due) => {
                let mut next = due + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next_due = Some(next);
                true
            }
            None => {
                self.next_due = Some(now + self.interval);
                true
            }
        }
    }

    /// Time remaining until the next tick (zero if one is due now).
    #[must_use]
    pub fn time_until_due(&self, now: DateTime<Utc>) -> Duration {
        self.next_due
            .map_or_else(Duration::zero, |due| (due - now).max(Duration::zero()))
    }

    /// Forget the schedule so the next poll fires immediately.
    pub fn reset(&mut self) {
        self.next_due = None;
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::every_second()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::milliseconds(ms)
    }

    #[test]
    fn test_first_poll_fires() {
        let mut schedule = TickSchedule::every_second();
        assert!(schedule.poll(t(0)));
        assert!(!schedule.poll(t(500)));
        assert!(schedule.poll(t(1_000)));
        assert!(!schedule.poll(t(1_999)));
        assert!(schedule.poll(t(2_000)));
    }

    #[test]
    fn test_missed_intervals_collapse() {
        let mut schedule = TickSchedule::every_second();
        assert!(schedule.poll(t(0)));
        assert!(schedule.poll(t(5_500)));
        assert!(!schedule.poll(t(6_000)));
        assert!(schedule.poll(t(6_500)));
    }

    #[test]
    fn test_time_until_due() {
        let mut schedule = TickSchedule::every_second();
        assert_eq!(schedule.time_until_due(t(0)), Duration::zero());
        schedule.poll(t(0));
        assert_eq!(schedule.time_until_due(t(250)), Duration::milliseconds(750));
        assert_eq!(schedule.time_until_due(t(3_000)), Duration::zero());
    }

    #[test]
    fn test_reset_fires_immediately() {
        let mut schedule = TickSchedule::every_second();
        schedule.poll(t(0));
        schedule.reset();
        assert!(schedule.poll(t(10)));
    }

    #[test]
    fn test_non_positive_interval() {
        let schedule = TickSchedule::new(Duration::zero());
        assert_eq!(schedule.interval(), Duration::milliseconds(1));
    }
}

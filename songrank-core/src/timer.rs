//! Polled timers.
//!
//! Nothing here runs on its own: the controller checks its timers every
//! update against a [`Clock`](crate::clock::Clock), which keeps all state
//! changes on the UI thread.

use std::time::{Duration, Instant};

/// A one-shot deadline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timeout {
    deadline: Option<Instant>,
}
impl Timeout {
    /// Arms the timeout to fire `after` from `now`, replacing any earlier
    /// deadline.
    pub fn arm(&mut self, now: Instant, after: Duration) {
        self.deadline = now.checked_add(after);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once when the deadline has passed, disarming
    /// the timeout.
    pub fn take_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// A repeating timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    next: Option<Instant>,
}
impl Interval {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// Starts (or restarts) the interval; the first tick is one period from
    /// `now`.
    pub fn start(&mut self, now: Instant) {
        self.next = now.checked_add(self.period);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Returns `true` if a tick is due. Missed ticks are collapsed into one.
    pub fn take_if_due(&mut self, now: Instant) -> bool {
        match self.next {
            Some(next) if now >= next => {
                self.next = now.checked_add(self.period);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_fires_once() {
        let start = Instant::now();
        let mut timeout = Timeout::default();
        assert!(!timeout.take_if_due(start));

        timeout.arm(start, Duration::from_secs(10));
        assert!(timeout.is_armed());
        assert!(!timeout.take_if_due(start + Duration::from_secs(9)));
        assert!(timeout.take_if_due(start + Duration::from_secs(10)));
        assert!(!timeout.take_if_due(start + Duration::from_secs(11)));
        assert!(!timeout.is_armed());
    }

    #[test]
    fn test_timeout_rearm_and_cancel() {
        let start = Instant::now();
        let mut timeout = Timeout::default();
        timeout.arm(start, Duration::from_secs(10));
        timeout.arm(start + Duration::from_secs(5), Duration::from_secs(10));
        assert!(!timeout.take_if_due(start + Duration::from_secs(12)));
        assert!(timeout.take_if_due(start + Duration::from_secs(15)));

        timeout.arm(start, Duration::from_secs(1));
        timeout.cancel();
        assert!(!timeout.take_if_due(start + Duration::from_secs(60)));
    }

    #[test]
    fn test_interval_ticks_and_collapses() {
        let start = Instant::now();
        let period = Duration::from_millis(500);
        let mut interval = Interval::new(period);
        assert!(!interval.take_if_due(start + period));

        interval.start(start);
        assert!(!interval.take_if_due(start + Duration::from_millis(499)));
        assert!(interval.take_if_due(start + period));
        assert!(!interval.take_if_due(start + Duration::from_millis(999)));

        // Three periods late still yields a single tick.
        let late = start + Duration::from_millis(2500);
        assert!(interval.take_if_due(late));
        assert!(!interval.take_if_due(late));

        interval.stop();
        assert!(!interval.is_running());
        assert!(!interval.take_if_due(late + Duration::from_secs(10)));
    }
}

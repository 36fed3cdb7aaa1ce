//! Deadline bookkeeping for the control loop.
//!
//! Two timers feed the state machine: a restartable one-shot that switches
//! the idle display to promo video, and a fixed-period ticker for the
//! cosmetic clock refresh.  Both are plain deadline records — the control
//! loop sleeps until the earliest deadline and polls on wake, so no timer
//! thread exists.

use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// IdleTimer
// ---------------------------------------------------------------------------

/// Restartable one-shot countdown.
///
/// Restarting an armed timer pushes the deadline out; cancelling a stopped
/// timer is a no-op, never a fault.
#[derive(Debug)]
pub struct IdleTimer {
    period: Duration,
    deadline: Option<Instant>,
}

impl IdleTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the countdown from `now`.
    pub fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + self.period);
    }

    /// Disarm.  Idempotent.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Consume an expiry.  Returns `true` at most once per arm.
    pub fn fired(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Pending deadline, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

// ---------------------------------------------------------------------------
// DisplayTicker
// ---------------------------------------------------------------------------

/// Fixed-period repeating tick for the display clock.
#[derive(Debug)]
pub struct DisplayTicker {
    period: Duration,
    next: Instant,
}

impl DisplayTicker {
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next: now + period,
        }
    }

    /// Consume a tick if due, scheduling the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now >= self.next {
            self.next = now + self.period;
            true
        } else {
            false
        }
    }

    pub fn deadline(&self) -> Instant {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_secs(10);

    #[test]
    fn unarmed_timer_never_fires() {
        let mut t = IdleTimer::new(PERIOD);
        assert!(!t.fired(Instant::now() + Duration::from_secs(100)));
        assert_eq!(t.deadline(), None);
    }

    #[test]
    fn fires_once_after_period() {
        let start = Instant::now();
        let mut t = IdleTimer::new(PERIOD);
        t.restart(start);
        assert!(!t.fired(start + Duration::from_secs(9)));
        assert!(t.fired(start + PERIOD));
        // Expiry was consumed; it does not fire again until re-armed.
        assert!(!t.fired(start + Duration::from_secs(100)));
    }

    #[test]
    fn restart_pushes_deadline_out() {
        let start = Instant::now();
        let mut t = IdleTimer::new(PERIOD);
        t.restart(start);
        t.restart(start + Duration::from_secs(5));
        assert!(!t.fired(start + PERIOD));
        assert!(t.fired(start + Duration::from_secs(15)));
    }

    #[test]
    fn cancel_is_idempotent() {
        let start = Instant::now();
        let mut t = IdleTimer::new(PERIOD);
        t.cancel();
        t.restart(start);
        t.cancel();
        t.cancel();
        assert!(!t.fired(start + Duration::from_secs(100)));
    }

    #[test]
    fn ticker_repeats_every_period() {
        let start = Instant::now();
        let period = Duration::from_millis(500);
        let mut ticker = DisplayTicker::new(period, start);
        assert!(!ticker.poll(start));
        assert!(ticker.poll(start + period));
        assert!(!ticker.poll(start + period));
        assert!(ticker.poll(start + period + period));
    }
}

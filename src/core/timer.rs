use std::time::{Duration, Instant};

/// Default tick period in milliseconds
pub const DEFAULT_TICK_MS: u64 = 15;

/// Fixed-period tick scheduler.
///
/// Drives the update -> render cycle. Deadlines advance by whole periods so
/// ticks stay on a fixed grid; after a long stall the schedule skips ahead
/// instead of firing a burst of catch-up ticks.
#[derive(Debug, Clone, Copy)]
pub struct TickScheduler {
    period: Duration,
    next: Option<Instant>,
    ticks: u64,
}

impl TickScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: None,
            ticks: 0,
        }
    }

    pub fn from_millis(period_ms: u64) -> Self {
        Self::new(Duration::from_millis(period_ms))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Total ticks fired so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Deadline of the next tick; `None` until the first tick fires
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Returns true if a tick is due at `now`, and schedules the following one
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(deadline) if now < deadline => false,
            Some(deadline) => {
                let mut next = deadline + self.period;
                if next <= now {
                    next = now + self.period;
                }
                self.fire(next)
            }
            None => self.fire(now + self.period),
        }
    }

    fn fire(&mut self, next: Instant) -> bool {
        self.next = Some(next);
        self.ticks += 1;
        true
    }
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::from_millis(DEFAULT_TICK_MS)
    }
}

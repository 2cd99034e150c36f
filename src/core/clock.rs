use std::time::Instant;

/// Monotonic millisecond clock anchored at creation.
/// Camera updates sample it once per tick.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Milliseconds from clock start to `instant`; instants before the start read as zero
    pub fn millis_at(&self, instant: Instant) -> f64 {
        instant.saturating_duration_since(self.start).as_secs_f64() * 1000.0
    }

    /// Milliseconds elapsed since clock start
    pub fn now_ms(&self) -> f64 {
        self.millis_at(Instant::now())
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn clock_measures_milliseconds() {
        let clock = Clock::new();

        thread::sleep(Duration::from_millis(10));
        let now = clock.now_ms();

        assert!(now >= 9.0);
    }

    #[test]
    fn clock_is_monotonic() {
        let clock = Clock::new();
        let first = clock.now_ms();
        let second = clock.now_ms();
        assert!(second >= first);
    }

    #[test]
    fn millis_at_offsets_from_start() {
        let clock = Clock::new();
        let later = clock.start + Duration::from_millis(250);
        assert_eq!(clock.millis_at(later), 250.0);
        assert_eq!(clock.millis_at(clock.start), 0.0);
    }
}

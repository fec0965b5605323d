//! Time sources for timers, `+diff` suffixes and line timestamps.

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::fmt;
use std::time::{Duration, Instant};

/// Monotonic and wall-clock time as seen by a registry.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Monotonic time since an arbitrary, fixed origin.
    fn monotonic(&self) -> Duration;

    /// Local wall-clock time, used for line timestamps only.
    fn wall(&self) -> DateTime<Local>;
}

/// Clock backed by `Instant` and the system time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn monotonic(&self) -> Duration {
        self.origin.elapsed()
    }

    fn wall(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that only moves when told to.
///
/// Both readings advance together, so a test can assert on exact elapsed
/// values and on a fixed timestamp prefix.
///
/// ```rust
/// use chanlog::clock::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::default();
/// clock.advance(Duration::from_millis(5));
/// assert_eq!(clock.monotonic(), Duration::from_millis(5));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    state: Mutex<(Duration, DateTime<Local>)>,
}

impl ManualClock {
    pub fn new(wall: DateTime<Local>) -> Self {
        Self {
            state: Mutex::new((Duration::ZERO, wall)),
        }
    }

    /// Move both readings forward.
    pub fn advance(&self, by: Duration) {
        let mut state = self.state.lock();
        state.0 += by;
        state.1 = state.1 + chrono::Duration::from_std(by).unwrap_or_else(|_| chrono::Duration::zero());
    }

    /// Replace the wall-clock reading without touching monotonic time.
    pub fn set_wall(&self, wall: DateTime<Local>) {
        self.state.lock().1 = wall;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Local::now())
    }
}

impl Clock for ManualClock {
    fn monotonic(&self) -> Duration {
        self.state.lock().0
    }

    fn wall(&self) -> DateTime<Local> {
        self.state.lock().1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.monotonic();
        let second = clock.monotonic();
        assert!(second >= first);
    }

    #[test]
    fn test_manual_clock_advances_both_readings() {
        let start = Local.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.monotonic(), Duration::ZERO);

        clock.advance(Duration::from_secs(61));
        assert_eq!(clock.monotonic(), Duration::from_secs(61));
        assert_eq!(
            clock.wall().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-03-01 12:01:01"
        );
    }

    #[test]
    fn test_manual_clock_set_wall() {
        let clock = ManualClock::default();
        clock.advance(Duration::from_millis(3));
        let later = Local.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        clock.set_wall(later);
        assert_eq!(clock.wall(), later);
        assert_eq!(clock.monotonic(), Duration::from_millis(3));
    }
}

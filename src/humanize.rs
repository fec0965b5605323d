//! # Duration Formatting
//!
//! Two renderings of elapsed time are used by the loggers:
//!
//! - [`humanize`]: the short `+diff` suffix appended to every line
//!   (e.g. `"120ms"`, `"2s"`, `"5m"`)
//! - [`format_millis`]: the fixed three-decimal millisecond value reported by
//!   the timer helpers (e.g. `"12.345"`)
//!
//! ```rust
//! use chanlog::humanize::{format_millis, humanize};
//! use std::time::Duration;
//!
//! assert_eq!(humanize(Duration::from_millis(120)), "120ms");
//! assert_eq!(humanize(Duration::from_millis(1500)), "2s");
//! assert_eq!(format_millis(Duration::from_micros(1500)), "1.500");
//! ```

use std::time::Duration;

const SECOND_MS: u128 = 1_000;
const MINUTE_MS: u128 = 60 * SECOND_MS;
const HOUR_MS: u128 = 60 * MINUTE_MS;
const DAY_MS: u128 = 24 * HOUR_MS;

/// Convert a duration into a short human-readable string
///
/// Selects the largest unit the duration reaches and rounds to a whole
/// number of that unit (half rounds up).
///
/// ## Unit Selection
///
/// - **Milliseconds**: < 1 s, exact (e.g., "750ms")
/// - **Seconds**: < 1 min (e.g., "2s" for 1500ms)
/// - **Minutes**: < 1 h (e.g., "5m")
/// - **Hours**: < 1 d (e.g., "3h")
/// - **Days**: everything longer (e.g., "2d")
pub fn humanize(duration: Duration) -> String {
    let ms = duration.as_millis();

    if ms >= DAY_MS {
        format!("{}d", round_div(ms, DAY_MS))
    } else if ms >= HOUR_MS {
        format!("{}h", round_div(ms, HOUR_MS))
    } else if ms >= MINUTE_MS {
        format!("{}m", round_div(ms, MINUTE_MS))
    } else if ms >= SECOND_MS {
        format!("{}s", round_div(ms, SECOND_MS))
    } else {
        format!("{}ms", ms)
    }
}

/// Milliseconds with exactly three decimal places.
pub fn format_millis(duration: Duration) -> String {
    format!("{:.3}", duration.as_secs_f64() * 1_000.0)
}

fn round_div(value: u128, unit: u128) -> u128 {
    (value + unit / 2) / unit
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test each unit boundary of the short form
    #[test]
    fn test_humanize_units() {
        assert_eq!(humanize(Duration::ZERO), "0ms");
        assert_eq!(humanize(Duration::from_millis(999)), "999ms");
        assert_eq!(humanize(Duration::from_millis(1000)), "1s");
        assert_eq!(humanize(Duration::from_secs(59)), "59s");
        assert_eq!(humanize(Duration::from_secs(60)), "1m");
        assert_eq!(humanize(Duration::from_secs(3600)), "1h");
        assert_eq!(humanize(Duration::from_secs(86_400 * 3)), "3d");
    }

    /// Test half-up rounding within a unit
    #[test]
    fn test_humanize_rounding() {
        assert_eq!(humanize(Duration::from_millis(1499)), "1s");
        assert_eq!(humanize(Duration::from_millis(1500)), "2s");
        assert_eq!(humanize(Duration::from_secs(90)), "2m");
        assert_eq!(humanize(Duration::from_secs(89)), "1m");
    }

    #[test]
    fn test_humanize_truncates_sub_millisecond() {
        assert_eq!(humanize(Duration::from_micros(1999)), "1ms");
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(Duration::ZERO), "0.000");
        assert_eq!(format_millis(Duration::from_micros(12_345)), "12.345");
        assert_eq!(format_millis(Duration::from_nanos(1_600)), "0.002");
        assert_eq!(format_millis(Duration::from_secs(2)), "2000.000");
    }
}

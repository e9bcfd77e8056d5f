//! Time sources and formatting helpers.

use court_types::Timestamp;

/// A source of the current time.
///
/// Production code uses [`SystemClock`]; tests swap in a controllable clock
/// so expiry can be exercised without waiting.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Format fractional hours with one decimal, e.g. `7.5`.
pub fn format_hours(hours: f64) -> String {
    format!("{:.1}", hours.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_hours_uses_one_decimal() {
        assert_eq!(format_hours(8.0), "8.0");
        assert_eq!(format_hours(7.24), "7.2");
        assert_eq!(format_hours(0.04), "0.0");
    }

    #[test]
    fn format_hours_clamps_negative() {
        assert_eq!(format_hours(-1.0), "0.0");
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now() > Timestamp::EPOCH);
    }
}

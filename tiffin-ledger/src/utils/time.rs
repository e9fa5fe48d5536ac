//! Business clock
//!
//! "Today" is the calendar date in the business timezone, not UTC. Services
//! take a `Clock` so tests can pin the date.

use chrono_tz::Tz;
use shared::{BusinessDate, MonthKey};

/// Source of the current business date and timestamp
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn today(&self) -> BusinessDate;

    /// Unix millis
    fn now_millis(&self) -> i64;

    fn current_month(&self) -> MonthKey {
        self.today().month_key()
    }
}

/// Wall clock evaluated in the business timezone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> BusinessDate {
        BusinessDate::new(chrono::Utc::now().with_timezone(&self.tz).date_naive())
    }

    fn now_millis(&self) -> i64 {
        shared::util::now_millis()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    date: BusinessDate,
    millis: i64,
}

impl FixedClock {
    /// Pinned to `date`; timestamps still come from the wall clock so rows
    /// created in sequence keep increasing `created_at`
    pub fn new(date: BusinessDate) -> Self {
        Self { date, millis: 0 }
    }

    /// Pinned to `date` with a fixed timestamp
    pub fn at(date: BusinessDate, millis: i64) -> Self {
        Self { date, millis }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> BusinessDate {
        self.date
    }

    fn now_millis(&self) -> i64 {
        if self.millis > 0 {
            self.millis
        } else {
            shared::util::now_millis()
        }
    }
}

/// Parse an IANA timezone name
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.parse::<Tz>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let date = BusinessDate::parse("2024-03-01").unwrap();
        let clock = FixedClock::at(date, 1234);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now_millis(), 1234);
        assert_eq!(clock.current_month().prefix(), "2024-03");
    }

    #[test]
    fn test_system_clock_uses_timezone() {
        let kolkata = parse_timezone("Asia/Kolkata").unwrap();
        let clock = SystemClock::new(kolkata);
        let expected = chrono::Utc::now().with_timezone(&kolkata).date_naive();
        // Can straddle midnight only if the test runs across it
        assert_eq!(clock.today().naive(), expected);
        assert!(parse_timezone("Mars/Olympus").is_none());
    }
}

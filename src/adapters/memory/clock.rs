//! Clock implementations.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Mutex;

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Pins the clock to noon UTC on `date`.
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc();
        Self::new(noon)
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_datetime(*self.now.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_pinned_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), date);
    }

    #[test]
    fn advance_days_moves_today() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let clock = FixedClock::on(date);
        clock.advance_days(1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn system_clock_today_matches_utc() {
        assert_eq!(SystemClock.today(), Utc::now().date_naive());
    }
}

//! Clock port.
//!
//! All "now" and "today" values in the application layer come from here so
//! date-dependent rules can be exercised with a fixed date.

use chrono::NaiveDate;

use crate::domain::foundation::Timestamp;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;

    /// Today's UTC calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

//! Wall-clock access behind a trait, so calendar math and the cache
//! boundary check are deterministic under test.

use chrono::{DateTime, Local, NaiveDate};

/// Source of the current local time.
pub trait Clock: Send + Sync {
    /// Current local date-time.
    fn now(&self) -> DateTime<Local>;

    /// Today's calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock pinned to a fixed instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

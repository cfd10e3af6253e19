//! Time source for the engine
//!
//! The engine never reads the system clock directly. "Today" drives the due-date
//! filters and "now" stamps receipts and events, so both come through [`Clock`]
//! and tests can pin them.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Utc};
use std::cell::Cell;

/// Source of the current date and time
pub trait Clock {
    /// Current instant (UTC), used for receipt and event timestamps
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date, used by the overdue / this-week filters
    fn today(&self) -> NaiveDate;
}

/// Production clock: UTC instants, system local date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Deterministic clock for tests and replays
///
/// Every call to [`Clock::now`] returns the current instant and then advances
/// it by `tick`, so consecutive receipts get strictly increasing timestamps
/// when a non-zero tick is configured.
///
/// # Example
/// ```
/// use chrono::{Duration, NaiveDate};
/// use echeancier_core_rs::core::{Clock, FixedClock};
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let clock = FixedClock::at_date(date).with_tick(Duration::seconds(1));
///
/// let first = clock.now();
/// let second = clock.now();
/// assert_eq!(second - first, Duration::seconds(1));
/// assert_eq!(clock.today(), date);
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
    tick: Duration,
}

impl FixedClock {
    /// Clock frozen at `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(now),
            tick: Duration::zero(),
        }
    }

    /// Clock frozen at midnight UTC of `date`
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(NaiveTime::default()).and_utc())
    }

    /// Advance by `tick` after every `now()` call (builder pattern)
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Move the clock to another instant
    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let current = self.now.get();
        self.now.set(current + self.tick);
        current
    }

    fn today(&self) -> NaiveDate {
        self.now.get().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_without_tick_is_frozen() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let clock = FixedClock::at_date(date);

        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.today(), date);
    }

    #[test]
    fn test_fixed_clock_set_moves_today() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        let later = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        clock.set(later.and_time(NaiveTime::default()).and_utc());
        assert_eq!(clock.today(), later);
    }
}

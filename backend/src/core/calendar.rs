//! Calendar arithmetic for due dates and week filters
//!
//! # Month overflow
//!
//! Adding months keeps the day-of-month and clamps to the last day of the
//! target month when that day does not exist: 2024-01-31 plus one month is
//! 2024-02-29, plus two months is 2024-03-31. Callers always add from the
//! original start date, so a clamp in February never shortens later months.

use chrono::{Datelike, Days, Months, NaiveDate};

/// Advance `date` by `months` calendar months, clamping to month end
///
/// Saturates at [`NaiveDate::MAX`] instead of failing for dates beyond
/// chrono's representable range.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use echeancier_core_rs::core::calendar::add_months;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
/// assert_eq!(add_months(start, 1), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert_eq!(add_months(start, 3), NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
/// ```
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Monday and Sunday of the week containing `today` (both inclusive)
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use echeancier_core_rs::core::calendar::week_bounds;
///
/// // 2024-03-14 is a Thursday
/// let (monday, sunday) = week_bounds(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
/// assert_eq!(monday, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
/// assert_eq!(sunday, NaiveDate::from_ymd_opt(2024, 3, 17).unwrap());
/// ```
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from_monday = u64::from(today.weekday().num_days_from_monday());
    let monday = today
        .checked_sub_days(Days::new(from_monday))
        .unwrap_or(NaiveDate::MIN);
    let sunday = today
        .checked_add_days(Days::new(6 - from_monday))
        .unwrap_or(NaiveDate::MAX);
    (monday, sunday)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_months_keeps_day() {
        assert_eq!(add_months(date(2024, 1, 15), 11), date(2024, 12, 15));
        assert_eq!(add_months(date(2024, 11, 15), 2), date(2025, 1, 15));
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(add_months(date(2023, 1, 31), 1), date(2023, 2, 28));
        assert_eq!(add_months(date(2024, 3, 31), 1), date(2024, 4, 30));
    }

    #[test]
    fn test_week_bounds_on_monday_and_sunday() {
        assert_eq!(
            week_bounds(date(2024, 3, 11)),
            (date(2024, 3, 11), date(2024, 3, 17))
        );
        assert_eq!(
            week_bounds(date(2024, 3, 17)),
            (date(2024, 3, 11), date(2024, 3, 17))
        );
    }

    #[test]
    fn test_week_bounds_across_year_end() {
        // 2025-01-01 is a Wednesday
        assert_eq!(
            week_bounds(date(2025, 1, 1)),
            (date(2024, 12, 30), date(2025, 1, 5))
        );
    }
}

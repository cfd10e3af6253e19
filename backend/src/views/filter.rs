//! Due-date filters for the schedule table
//!
//! "Remaining" in these predicates is the installment's own unpaid balance, so
//! an installment paid off before its due date never shows up as overdue.

use crate::core::calendar::week_bounds;
use crate::models::installment::Installment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Filter mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueFilter {
    /// Every installment
    #[default]
    All,
    /// Unpaid and due strictly before today
    Overdue,
    /// Unpaid and due within the current Monday–Sunday week
    ThisWeek,
}

impl DueFilter {
    /// Predicate for one installment, evaluated against `today`
    pub fn matches(&self, installment: &Installment, today: NaiveDate) -> bool {
        match self {
            DueFilter::All => true,
            DueFilter::Overdue => installment.remaining() > 0 && installment.due_date() < today,
            DueFilter::ThisWeek => {
                let (monday, sunday) = week_bounds(today);
                installment.remaining() > 0
                    && installment.due_date() >= monday
                    && installment.due_date() <= sunday
            }
        }
    }
}

impl fmt::Display for DueFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueFilter::All => write!(f, "all"),
            DueFilter::Overdue => write!(f, "overdue"),
            DueFilter::ThisWeek => write!(f, "this-week"),
        }
    }
}

impl FromStr for DueFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(DueFilter::All),
            "overdue" => Ok(DueFilter::Overdue),
            "thisweek" | "this-week" | "this_week" => Ok(DueFilter::ThisWeek),
            other => Err(format!("Unknown due filter: {}", other)),
        }
    }
}

/// Installments matching `mode`, with their 0-based schedule position,
/// in schedule order
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use echeancier_core_rs::schedule::build_schedule;
/// use echeancier_core_rs::views::{filter_schedule, DueFilter};
///
/// let contract = build_schedule(1_200_000, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
/// let today = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
///
/// let overdue = filter_schedule(contract.schedule(), DueFilter::Overdue, today);
/// let positions: Vec<usize> = overdue.iter().map(|(i, _)| *i).collect();
/// assert_eq!(positions, vec![0, 1, 2]);
/// ```
pub fn filter_schedule(
    schedule: &[Installment],
    mode: DueFilter,
    today: NaiveDate,
) -> Vec<(usize, &Installment)> {
    schedule
        .iter()
        .enumerate()
        .filter(|(_, installment)| mode.matches(installment, today))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_modes() {
        assert_eq!("all".parse::<DueFilter>(), Ok(DueFilter::All));
        assert_eq!("Overdue".parse::<DueFilter>(), Ok(DueFilter::Overdue));
        assert_eq!("thisWeek".parse::<DueFilter>(), Ok(DueFilter::ThisWeek));
        assert_eq!("this-week".parse::<DueFilter>(), Ok(DueFilter::ThisWeek));
        assert!("later".parse::<DueFilter>().is_err());
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let installment = Installment::new(100, today);
        assert!(!DueFilter::Overdue.matches(&installment, today));
        assert!(DueFilter::ThisWeek.matches(&installment, today));
    }

    #[test]
    fn test_display_round_trips() {
        for mode in [DueFilter::All, DueFilter::Overdue, DueFilter::ThisWeek] {
            assert_eq!(mode.to_string().parse::<DueFilter>(), Ok(mode));
        }
    }
}

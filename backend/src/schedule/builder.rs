//! Schedule building
//!
//! Turns a total and a start date into a [`Contract`]: installment `i` gets
//! the `i`-th part of [`split`] and is due `i` months after the start date
//! (see [`crate::core::calendar`] for the month-end clamp).
//!
//! # Rebuild policy
//!
//! Editing a contract's total or start date recomputes the whole schedule.
//! Paid amounts and locks are discarded, never merged into the new schedule.
//! That path is [`rebuild_schedule`], kept apart from [`build_schedule`] so a
//! caller cannot wipe payment progress by accident.

use crate::core::calendar::add_months;
use crate::models::contract::Contract;
use crate::models::installment::Installment;
use crate::schedule::splitter::{coerce_amount, split};
use crate::views::sum_paid;
use chrono::NaiveDate;

/// Build a fresh contract: twelve open, unpaid installments
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use echeancier_core_rs::schedule::build_schedule;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let contract = build_schedule(1_200_000, start);
///
/// assert_eq!(contract.schedule()[0].due_date(), start);
/// assert_eq!(
///     contract.schedule()[11].due_date(),
///     NaiveDate::from_ymd_opt(2024, 12, 15).unwrap()
/// );
/// assert!(contract.schedule().iter().all(|i| i.amount() == 100_000));
/// ```
pub fn build_schedule(total_amount: i64, start_date: NaiveDate) -> Contract {
    let total_amount = coerce_amount(total_amount);
    let parts = split(total_amount);
    let schedule = std::array::from_fn(|i| {
        Installment::new(parts[i], add_months(start_date, i as u32))
    });

    Contract::new(total_amount, start_date, schedule)
}

/// Replace `contract` with a freshly built schedule
///
/// Returns the paid amount that the rebuild discarded.
pub fn rebuild_schedule(contract: &mut Contract, total_amount: i64, start_date: NaiveDate) -> i64 {
    let discarded = sum_paid(contract.schedule());
    *contract = build_schedule(total_amount, start_date);
    discarded
}

/// Rebuild with a new total, keeping the contract's start date
pub fn with_total_amount(contract: &mut Contract, total_amount: i64) -> i64 {
    let start_date = contract.start_date();
    rebuild_schedule(contract, total_amount, start_date)
}

/// Rebuild from a new start date, keeping the contract's total
pub fn with_start_date(contract: &mut Contract, start_date: NaiveDate) -> i64 {
    let total_amount = contract.total_amount();
    rebuild_schedule(contract, total_amount, start_date)
}

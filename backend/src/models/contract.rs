//! Contract model ("échéancier")
//!
//! The twelve-installment payment plan owned by one client.
//!
//! # Critical Invariants
//!
//! 1. The schedule holds exactly [`INSTALLMENT_COUNT`] installments
//! 2. Installment amounts sum to `total_amount` when the contract is built
//! 3. Due dates are `start_date + i` months, ascending

use crate::models::installment::Installment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of installments in every schedule
pub const INSTALLMENT_COUNT: usize = 12;

/// Twelve-installment payment plan
///
/// Contracts are produced by [`crate::schedule::build_schedule`]; payment
/// operations in [`crate::ledger`] are the only code that mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    total_amount: i64,
    start_date: NaiveDate,
    schedule: [Installment; INSTALLMENT_COUNT],
}

impl Contract {
    pub(crate) fn new(
        total_amount: i64,
        start_date: NaiveDate,
        schedule: [Installment; INSTALLMENT_COUNT],
    ) -> Self {
        Self {
            total_amount,
            start_date,
            schedule,
        }
    }

    /// Restore a contract with all fields preserved (snapshot loading)
    ///
    /// No invariant is checked here; see
    /// [`crate::store::snapshot::validate_snapshot`].
    pub fn from_snapshot(
        total_amount: i64,
        start_date: NaiveDate,
        schedule: [Installment; INSTALLMENT_COUNT],
    ) -> Self {
        Self::new(total_amount, start_date, schedule)
    }

    /// Total amount of the plan
    pub fn total_amount(&self) -> i64 {
        self.total_amount
    }

    /// Due date of the first installment
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn schedule(&self) -> &[Installment; INSTALLMENT_COUNT] {
        &self.schedule
    }

    /// Installment at 0-based `index`, if in range
    pub fn installment(&self, index: usize) -> Option<&Installment> {
        self.schedule.get(index)
    }

    pub(crate) fn installment_mut(&mut self, index: usize) -> Option<&mut Installment> {
        self.schedule.get_mut(index)
    }

    /// Sum of installment amounts
    pub fn scheduled_amount(&self) -> i64 {
        self.schedule.iter().map(Installment::amount).sum()
    }

    /// True when every installment is closed
    pub fn is_settled(&self) -> bool {
        self.schedule.iter().all(Installment::is_closed)
    }
}

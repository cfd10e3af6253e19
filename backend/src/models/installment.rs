//! Installment model
//!
//! One of the twelve monthly obligations of a contract ("échéance").
//! Each installment has:
//! - Amount due (i64, smallest currency unit)
//! - Due date
//! - Amount paid so far
//! - Closed flag (fully paid, or locked by the admin)
//!
//! CRITICAL: `paid` never exceeds `amount` through payment operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single scheduled payment obligation
///
/// Installments are addressed by their 0-based position in the contract's
/// schedule; they carry no identifier of their own.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use echeancier_core_rs::Installment;
///
/// let due = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let installment = Installment::new(100_000, due);
///
/// assert_eq!(installment.remaining(), 100_000);
/// assert!(!installment.is_closed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    amount: i64,
    due_date: NaiveDate,
    paid: i64,
    closed: bool,
}

impl Installment {
    /// Create an open, unpaid installment
    pub fn new(amount: i64, due_date: NaiveDate) -> Self {
        Self {
            amount: amount.max(0),
            due_date,
            paid: 0,
            closed: false,
        }
    }

    /// Restore an installment with all fields preserved (snapshot loading)
    pub fn from_snapshot(amount: i64, due_date: NaiveDate, paid: i64, closed: bool) -> Self {
        Self {
            amount,
            due_date,
            paid,
            closed,
        }
    }

    /// Amount due
    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Amount recorded as paid
    pub fn paid(&self) -> i64 {
        self.paid
    }

    /// Paid amount clamped to the amount due
    ///
    /// Guards aggregate views against a restored state where `paid` was edited
    /// past `amount`, or either field went negative.
    pub fn paid_clamped(&self) -> i64 {
        self.paid.min(self.amount).max(0)
    }

    /// Amount still owed on this installment (never negative)
    pub fn remaining(&self) -> i64 {
        self.amount.saturating_sub(self.paid).max(0)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// True when nothing remains to be paid
    pub fn is_fully_paid(&self) -> bool {
        self.remaining() == 0
    }

    pub(crate) fn set_paid(&mut self, paid: i64) {
        self.paid = paid;
    }

    pub(crate) fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }
}

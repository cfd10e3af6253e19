//! Payment ledger
//!
//! Applies admin payment operations to a contract's installments.
//!
//! # Operations
//!
//! - **Partial payment**: adds up to the installment's remaining balance and
//!   closes it once fully paid
//! - **Full payment**: pays the whole remaining balance and closes it
//! - **Lock toggle**: admin override flipping `closed` without touching `paid`
//!
//! # Critical Invariants
//!
//! - **No overpayment**: a payment never raises `paid` above `amount`; excess
//!   input is clamped away, not rejected
//! - **Closed means closed**: payments against a closed installment change nothing
//! - **Explicit no-ops**: operations that change nothing return
//!   `Err(NoOpReason)` instead of a silent zero delta

mod payment;

pub use payment::{apply_full_payment, apply_partial_payment, realized_delta, toggle_lock};

use crate::models::installment::Installment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a ledger operation left the contract untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum NoOpReason {
    #[error("Payment amount is zero")]
    ZeroAmount,

    #[error("Installment {index} is closed")]
    InstallmentClosed { index: usize },

    #[error("Installment {index} is already fully paid")]
    AlreadyPaid { index: usize },

    #[error("Installment index {index} is out of range")]
    IndexOutOfRange { index: usize },
}

/// Result of a payment operation the ledger accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentApplied {
    /// 0-based installment position
    pub index: usize,

    /// Due date of the installment
    pub due_date: NaiveDate,

    /// Amount due on the installment
    pub installment_amount: i64,

    /// Amount actually added to `paid` (may be less than requested, may be 0
    /// when an open installment had nothing left to pay)
    pub delta: i64,

    /// Installment's `paid` after the operation
    pub paid_after: i64,

    /// Installment's remaining balance after the operation
    pub remaining_after: i64,

    /// Installment's `closed` flag after the operation
    pub closed_after: bool,
}

impl PaymentApplied {
    fn from_installment(index: usize, installment: &Installment, delta: i64) -> Self {
        Self {
            index,
            due_date: installment.due_date(),
            installment_amount: installment.amount(),
            delta,
            paid_after: installment.paid(),
            remaining_after: installment.remaining(),
            closed_after: installment.is_closed(),
        }
    }

    /// True when the operation moved money and warrants a receipt
    pub fn moved_money(&self) -> bool {
        self.delta > 0
    }
}

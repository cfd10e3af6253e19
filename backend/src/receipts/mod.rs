//! Receipt recording
//!
//! Turns an accepted payment into an immutable [`ReceiptEntry`]. Recording
//! only captures facts; rendering a receipt document is
//! [`crate::export::ReceiptDocument`]'s job.

use crate::core::{Clock, IdGenerator};
use crate::ledger::PaymentApplied;
use crate::models::receipt::ReceiptEntry;
use tracing::debug;

/// Build the receipt for an accepted payment
///
/// Returns `None` when the payment realized no money (`delta <= 0`): such
/// operations never produce a receipt.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use echeancier_core_rs::core::{FixedClock, SequentialIdGenerator};
/// use echeancier_core_rs::ledger::apply_partial_payment;
/// use echeancier_core_rs::receipts::record_receipt;
/// use echeancier_core_rs::schedule::build_schedule;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let mut contract = build_schedule(1_200_000, start);
/// let applied = apply_partial_payment(&mut contract, 0, 30_000).unwrap();
///
/// let mut ids = SequentialIdGenerator::new("rcpt");
/// let clock = FixedClock::at_date(start);
/// let receipt = record_receipt("client_1", &applied, &mut ids, &clock).unwrap();
///
/// assert_eq!(receipt.paid_delta(), 30_000);
/// assert_eq!(receipt.remaining_after(), 70_000);
/// ```
pub fn record_receipt(
    client_id: &str,
    applied: &PaymentApplied,
    ids: &mut dyn IdGenerator,
    clock: &dyn Clock,
) -> Option<ReceiptEntry> {
    if !applied.moved_money() {
        debug!(
            client_id,
            index = applied.index,
            "zero-delta payment, no receipt recorded"
        );
        return None;
    }

    Some(ReceiptEntry::new(
        ids.next_id(),
        client_id.to_string(),
        clock.now(),
        applied.index,
        applied.due_date,
        applied.delta,
        applied.paid_after,
        applied.remaining_after,
    ))
}

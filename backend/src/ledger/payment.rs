//! Payment state transitions
//!
//! Each operation is a pure state transition on one installment: it either
//! mutates the contract and returns what changed, or returns a [`NoOpReason`]
//! and leaves the contract exactly as it was.

use super::{NoOpReason, PaymentApplied};
use crate::models::contract::Contract;
use crate::schedule::splitter::coerce_amount;

/// Record a payment of up to `amount` against installment `index`
///
/// The realized delta is `min(amount, remaining)`; the installment closes once
/// `paid` reaches `amount`. An open installment with nothing left to pay still
/// accepts the payment, realizes 0 and is closed again.
///
/// # Returns
///
/// - `Ok(PaymentApplied)` with the realized delta
/// - `Err(NoOpReason::ZeroAmount)` if `amount` coerces to 0
/// - `Err(NoOpReason::IndexOutOfRange)` if `index >= 12`
/// - `Err(NoOpReason::InstallmentClosed)` if the installment is closed
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use echeancier_core_rs::ledger::apply_partial_payment;
/// use echeancier_core_rs::schedule::build_schedule;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let mut contract = build_schedule(1_200_000, start);
///
/// let applied = apply_partial_payment(&mut contract, 0, 200_000).unwrap();
/// assert_eq!(applied.delta, 100_000); // clamped: no overpayment
/// assert!(applied.closed_after);
/// ```
pub fn apply_partial_payment(
    contract: &mut Contract,
    index: usize,
    amount: i64,
) -> Result<PaymentApplied, NoOpReason> {
    let amount = coerce_amount(amount);
    if amount == 0 {
        return Err(NoOpReason::ZeroAmount);
    }

    let installment = contract
        .installment_mut(index)
        .ok_or(NoOpReason::IndexOutOfRange { index })?;

    if installment.is_closed() {
        return Err(NoOpReason::InstallmentClosed { index });
    }

    let delta = amount.min(installment.remaining());
    installment.set_paid(installment.paid() + delta);
    if installment.paid() >= installment.amount() {
        installment.set_closed(true);
    }

    Ok(PaymentApplied::from_installment(index, installment, delta))
}

/// Pay the whole remaining balance of installment `index` and close it
///
/// # Returns
///
/// - `Ok(PaymentApplied)` with `delta = amount - previous paid`
/// - `Err(NoOpReason::IndexOutOfRange)` if `index >= 12`
/// - `Err(NoOpReason::InstallmentClosed)` if the installment is closed
/// - `Err(NoOpReason::AlreadyPaid)` if nothing remains (state unchanged, the
///   installment is not closed by this call)
pub fn apply_full_payment(
    contract: &mut Contract,
    index: usize,
) -> Result<PaymentApplied, NoOpReason> {
    let installment = contract
        .installment_mut(index)
        .ok_or(NoOpReason::IndexOutOfRange { index })?;

    if installment.is_closed() {
        return Err(NoOpReason::InstallmentClosed { index });
    }

    let delta = installment.amount() - installment.paid();
    if delta <= 0 {
        return Err(NoOpReason::AlreadyPaid { index });
    }

    installment.set_paid(installment.amount());
    installment.set_closed(true);

    Ok(PaymentApplied::from_installment(index, installment, delta))
}

/// Flip the `closed` flag of installment `index`, leaving `paid` untouched
///
/// Unlocking a fully-paid installment is allowed: the admin override wins
/// over the natural closure rule.
///
/// Returns the new `closed` value.
pub fn toggle_lock(contract: &mut Contract, index: usize) -> Result<bool, NoOpReason> {
    let installment = contract
        .installment_mut(index)
        .ok_or(NoOpReason::IndexOutOfRange { index })?;

    let closed = !installment.is_closed();
    installment.set_closed(closed);
    Ok(closed)
}

/// Delta realized by a payment operation, 0 for any no-op
pub fn realized_delta(result: &Result<PaymentApplied, NoOpReason>) -> i64 {
    result.as_ref().map_or(0, |applied| applied.delta)
}

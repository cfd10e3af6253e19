//! Amount splitting
//!
//! Divides a contract total into [`INSTALLMENT_COUNT`] integer parts.
//!
//! # Algorithm
//!
//! ```text
//! base      = total / 12
//! remainder = total - base * 12
//! parts     = [base + 1; remainder] ++ [base; 12 - remainder]
//! ```
//!
//! The remainder is front-loaded onto the earliest installments, one unit
//! each. The parts always sum to the total exactly and differ by at most 1.

use crate::models::contract::INSTALLMENT_COUNT;

/// Coerce a raw amount to a non-negative integer (negatives become 0)
pub fn coerce_amount(amount: i64) -> i64 {
    amount.max(0)
}

/// Coerce user-entered text to a non-negative integer amount
///
/// Decimal input is truncated; empty, non-numeric, non-finite and negative
/// input become 0.
///
/// # Example
/// ```
/// use echeancier_core_rs::schedule::coerce_amount_str;
///
/// assert_eq!(coerce_amount_str("30000"), 30_000);
/// assert_eq!(coerce_amount_str(" 1250.99 "), 1_250);
/// assert_eq!(coerce_amount_str("-40"), 0);
/// assert_eq!(coerce_amount_str("abc"), 0);
/// ```
pub fn coerce_amount_str(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return coerce_amount(value);
    }
    match trimmed.parse::<f64>() {
        // `as` saturates at i64::MAX for huge values
        Ok(value) if value.is_finite() && value > 0.0 => value.trunc() as i64,
        _ => 0,
    }
}

/// Split `total` into twelve parts, remainder first
///
/// # Example
/// ```
/// use echeancier_core_rs::schedule::split;
///
/// let parts = split(1_200_005);
/// assert_eq!(parts[..5], [100_001; 5]);
/// assert_eq!(parts[5..], [100_000; 7]);
/// assert_eq!(parts.iter().sum::<i64>(), 1_200_005);
/// ```
pub fn split(total: i64) -> [i64; INSTALLMENT_COUNT] {
    let total = coerce_amount(total);
    let count = INSTALLMENT_COUNT as i64;
    let base = total / count;
    let remainder = (total - base * count) as usize;

    std::array::from_fn(|i| if i < remainder { base + 1 } else { base })
}

//! Balance and progress aggregates
//!
//! # Critical Invariants
//!
//! - `remaining(c) + sum_paid(c.schedule()) == c.total_amount()` for any
//!   contract reachable through the ledger
//! - Paid amounts are clamped per installment, so an overpaid restored
//!   installment never inflates the totals

use crate::models::contract::Contract;
use crate::models::installment::Installment;
use serde::{Deserialize, Serialize};

/// Σ min(paid, amount) over the schedule
pub fn sum_paid(schedule: &[Installment]) -> i64 {
    schedule
        .iter()
        .map(Installment::paid_clamped)
        .fold(0i64, i64::saturating_add)
}

/// Amount still owed on the contract, never negative
pub fn remaining(contract: &Contract) -> i64 {
    contract
        .total_amount()
        .saturating_sub(sum_paid(contract.schedule()))
        .max(0)
}

/// Paid share of the total as a rounded percentage (0 for an empty contract)
///
/// Halves round up: 1 paid out of 200 is 1%.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use echeancier_core_rs::ledger::apply_full_payment;
/// use echeancier_core_rs::schedule::build_schedule;
/// use echeancier_core_rs::views::progress_percent;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let mut contract = build_schedule(1_200_000, start);
/// apply_full_payment(&mut contract, 0).unwrap();
///
/// assert_eq!(progress_percent(&contract), 8); // 100_000 / 1_200_000 = 8.33%
/// ```
pub fn progress_percent(contract: &Contract) -> i64 {
    let total = i128::from(contract.total_amount());
    if total <= 0 {
        return 0;
    }
    let paid = i128::from(sum_paid(contract.schedule()));
    ((200 * paid + total) / (2 * total)) as i64
}

/// Headline figures for one contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSummary {
    pub total_amount: i64,
    pub paid: i64,
    pub remaining: i64,
    pub progress_percent: i64,
    pub closed_installments: usize,
}

impl ContractSummary {
    pub fn of(contract: &Contract) -> Self {
        Self {
            total_amount: contract.total_amount(),
            paid: sum_paid(contract.schedule()),
            remaining: remaining(contract),
            progress_percent: progress_percent(contract),
            closed_installments: contract
                .schedule()
                .iter()
                .filter(|installment| installment.is_closed())
                .count(),
        }
    }
}

/// Totals across every client's contract (admin dashboard)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Σ contract totals
    pub amount: i64,
    /// Σ paid across contracts
    pub paid: i64,
    /// max(0, amount - paid)
    pub remaining: i64,
    /// Number of contracts aggregated
    pub contracts: usize,
}

/// Aggregate a set of contracts
///
/// Clients without a contract simply contribute nothing. Sums are taken in
/// `i128` and saturate at `i64::MAX` when narrowed back.
pub fn portfolio_summary<'a, I>(contracts: I) -> PortfolioSummary
where
    I: IntoIterator<Item = &'a Contract>,
{
    let (amount, paid, count) = contracts.into_iter().fold(
        (0i128, 0i128, 0usize),
        |(amount, paid, count), contract| {
            (
                amount + i128::from(contract.total_amount()),
                paid + i128::from(sum_paid(contract.schedule())),
                count + 1,
            )
        },
    );

    PortfolioSummary {
        amount: narrow(amount),
        paid: narrow(paid),
        remaining: narrow((amount - paid).max(0)),
        contracts: count,
    }
}

fn narrow(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}

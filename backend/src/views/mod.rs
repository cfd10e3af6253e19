//! Read-only views derived from contracts
//!
//! Everything here is recomputed on demand from the schedule; nothing is cached.

pub mod aggregates;
pub mod filter;

pub use aggregates::{
    portfolio_summary, progress_percent, remaining, sum_paid, ContractSummary, PortfolioSummary,
};
pub use filter::{filter_schedule, DueFilter};

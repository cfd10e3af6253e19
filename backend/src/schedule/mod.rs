//! Schedule construction
//!
//! - **splitter**: divides a total into twelve near-equal integer parts
//! - **builder**: dates the parts month by month into a [`crate::Contract`]

pub mod builder;
pub mod splitter;

pub use builder::{build_schedule, rebuild_schedule, with_start_date, with_total_amount};
pub use splitter::{coerce_amount, coerce_amount_str, split};

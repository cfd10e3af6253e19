//! Domain models for the installment-schedule engine

pub mod client;
pub mod contract;
pub mod event;
pub mod installment;
pub mod receipt;

// Re-exports
pub use client::Client;
pub use contract::{Contract, INSTALLMENT_COUNT};
pub use event::{Event, EventLog};
pub use installment::Installment;
pub use receipt::{ReceiptEntry, ReceiptLog};

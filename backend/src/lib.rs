//! Échéancier Core - Rust Engine
//!
//! Twelve-installment payment schedules for travel-agency clients.
//!
//! # Architecture
//!
//! - **core**: Clock, id generation and calendar arithmetic
//! - **models**: Domain types (Installment, Contract, Client, ReceiptEntry, Event)
//! - **schedule**: Amount splitting and schedule building
//! - **ledger**: Payment operations (partial, full, lock toggle)
//! - **receipts**: Receipt recording for accepted payments
//! - **views**: Remaining balance, progress, portfolio totals, due-date filters
//! - **export**: Schedule rows and receipt documents for renderers
//! - **store**: Repository traits, in-memory store, checksummed snapshots
//! - **book**: Service facade used by the admin and client surfaces
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 in the smallest currency unit
//! 2. Every schedule has exactly twelve installments summing to the total
//! 3. A payment never raises an installment's paid amount above its amount
//! 4. Every payment that moves money produces exactly one receipt

// Module declarations
pub mod book;
pub mod core;
pub mod export;
pub mod ledger;
pub mod models;
pub mod receipts;
pub mod schedule;
pub mod store;
pub mod views;

// Re-exports for convenience
pub use book::{BookError, ClientConfig, ClientStatement, PaymentOutcome, ScheduleBook};
pub use ledger::{NoOpReason, PaymentApplied};
pub use models::{
    client::Client,
    contract::{Contract, INSTALLMENT_COUNT},
    event::{Event, EventLog},
    installment::Installment,
    receipt::{ReceiptEntry, ReceiptLog},
};
pub use schedule::{build_schedule, rebuild_schedule, split};
pub use store::{InMemoryStore, StoreError};
pub use views::{DueFilter, PortfolioSummary};

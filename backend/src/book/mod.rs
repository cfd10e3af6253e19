//! Schedule book - the service used by the admin and client surfaces
//!
//! Wires repositories, clock and id generator around the pure engine
//! functions. See `engine.rs` for the implementation.

pub mod engine;

// Re-export main types for convenience
pub use engine::{BookError, ClientConfig, ClientStatement, PaymentOutcome, ScheduleBook};

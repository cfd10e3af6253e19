//! Event logging for auditing schedule changes.
//!
//! This module defines the Event enum which captures every state change the
//! [`crate::book::ScheduleBook`] performs. Events enable:
//! - Auditing (who was rebuilt, which payments were ignored and why)
//! - Debugging (understand what happened and when)
//! - Testing (assert on the exact operation trail)
//!
//! Receipts remain the authoritative payment record; the event log also keeps
//! the operations that did not move money.
//!
//! # Example
//!
//! ```rust
//! use chrono::{NaiveDate, Utc};
//! use echeancier_core_rs::models::Event;
//!
//! let event = Event::LockToggled {
//!     at: Utc::now(),
//!     client_id: "client_00000001".to_string(),
//!     index: 3,
//!     closed: true,
//! };
//!
//! assert_eq!(event.event_type(), "LockToggled");
//! assert_eq!(event.installment_index(), Some(3));
//! ```

use crate::ledger::NoOpReason;
use chrono::{DateTime, NaiveDate, Utc};

/// Schedule event capturing a state change (or a deliberately ignored one).
///
/// Events are logged in the order the operations ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Client account created together with its first contract
    ClientCreated {
        at: DateTime<Utc>,
        client_id: String,
        total_amount: i64,
        start_date: NaiveDate,
    },

    /// Contract rebuilt from scratch after an amount or start-date edit
    ScheduleRebuilt {
        at: DateTime<Utc>,
        client_id: String,
        total_amount: i64,
        start_date: NaiveDate,
        /// Payment progress thrown away by the rebuild
        discarded_paid: i64,
    },

    /// Payment operation accepted by the ledger
    PaymentApplied {
        at: DateTime<Utc>,
        client_id: String,
        index: usize,
        delta: i64,
        /// None when the operation realized a zero delta
        receipt_id: Option<String>,
    },

    /// Payment operation rejected as a no-op
    PaymentIgnored {
        at: DateTime<Utc>,
        client_id: String,
        index: usize,
        reason: NoOpReason,
    },

    /// Admin locked or unlocked an installment
    LockToggled {
        at: DateTime<Utc>,
        client_id: String,
        index: usize,
        closed: bool,
    },
}

impl Event {
    /// Get the instant this event occurred
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::ClientCreated { at, .. } => *at,
            Event::ScheduleRebuilt { at, .. } => *at,
            Event::PaymentApplied { at, .. } => *at,
            Event::PaymentIgnored { at, .. } => *at,
            Event::LockToggled { at, .. } => *at,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::ClientCreated { .. } => "ClientCreated",
            Event::ScheduleRebuilt { .. } => "ScheduleRebuilt",
            Event::PaymentApplied { .. } => "PaymentApplied",
            Event::PaymentIgnored { .. } => "PaymentIgnored",
            Event::LockToggled { .. } => "LockToggled",
        }
    }

    pub fn client_id(&self) -> &str {
        match self {
            Event::ClientCreated { client_id, .. } => client_id,
            Event::ScheduleRebuilt { client_id, .. } => client_id,
            Event::PaymentApplied { client_id, .. } => client_id,
            Event::PaymentIgnored { client_id, .. } => client_id,
            Event::LockToggled { client_id, .. } => client_id,
        }
    }

    /// Get installment index if event relates to a specific installment
    pub fn installment_index(&self) -> Option<usize> {
        match self {
            Event::PaymentApplied { index, .. } => Some(*index),
            Event::PaymentIgnored { index, .. } => Some(*index),
            Event::LockToggled { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Event log for storing and querying schedule events.
///
/// This is a simple wrapper around Vec<Event> with convenience methods.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific client
    pub fn events_for_client(&self, client_id: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.client_id() == client_id)
            .collect()
    }
}

//! Unique identifiers for clients and receipts

/// Produces unique string identifiers
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random UUID v4 identifiers (production)
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Monotonic `prefix_00000001`-style identifiers
///
/// Used by tests so receipts and clients have predictable ids.
///
/// # Example
/// ```
/// use echeancier_core_rs::core::{IdGenerator, SequentialIdGenerator};
///
/// let mut ids = SequentialIdGenerator::new("rcpt");
/// assert_eq!(ids.next_id(), "rcpt_00000001");
/// assert_eq!(ids.next_id(), "rcpt_00000002");
/// ```
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        let id = format!("{}_{:08}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

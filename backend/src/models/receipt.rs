//! Payment receipts
//!
//! A receipt is the immutable audit record of one payment operation that moved
//! money onto an installment. Receipts are appended to the owning client's
//! [`ReceiptLog`] and never mutated or removed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Audit entry for one successful payment operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptEntry {
    id: String,
    client_id: String,
    timestamp: DateTime<Utc>,
    installment_index: usize,
    due_date: NaiveDate,
    paid_delta: i64,
    total_paid_after: i64,
    remaining_after: i64,
}

impl ReceiptEntry {
    pub fn new(
        id: String,
        client_id: String,
        timestamp: DateTime<Utc>,
        installment_index: usize,
        due_date: NaiveDate,
        paid_delta: i64,
        total_paid_after: i64,
        remaining_after: i64,
    ) -> Self {
        Self {
            id,
            client_id,
            timestamp,
            installment_index,
            due_date,
            paid_delta,
            total_paid_after,
            remaining_after,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// 0-based position of the installment in the schedule
    pub fn installment_index(&self) -> usize {
        self.installment_index
    }

    /// Due date of the installment at the time of payment
    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Amount this operation added to the installment
    pub fn paid_delta(&self) -> i64 {
        self.paid_delta
    }

    /// Installment's paid amount after the operation
    pub fn total_paid_after(&self) -> i64 {
        self.total_paid_after
    }

    /// Installment's remaining balance after the operation
    pub fn remaining_after(&self) -> i64 {
        self.remaining_after
    }
}

/// Append-only receipt history of one client
///
/// Storage order is insertion order; [`ReceiptLog::newest_first`] gives the
/// display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptLog {
    entries: Vec<ReceiptEntry>,
}

impl ReceiptLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_entries(entries: Vec<ReceiptEntry>) -> Self {
        Self { entries }
    }

    pub fn append(&mut self, entry: ReceiptEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[ReceiptEntry] {
        &self.entries
    }

    /// Entries by timestamp, newest first; equal timestamps list the later
    /// insertion first
    pub fn newest_first(&self) -> Vec<&ReceiptEntry> {
        let mut ordered: Vec<&ReceiptEntry> = self.entries.iter().rev().collect();
        ordered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        ordered
    }

    pub fn find(&self, receipt_id: &str) -> Option<&ReceiptEntry> {
        self.entries.iter().find(|entry| entry.id == receipt_id)
    }

    /// Sum of all recorded deltas
    pub fn total_received(&self) -> i64 {
        self.entries.iter().map(|entry| entry.paid_delta).sum()
    }
}

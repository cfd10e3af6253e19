//! Storage seams
//!
//! The engine is stateless: contracts, clients and receipt histories live
//! behind these repository traits and travel as plain records. A single
//! [`InMemoryStore`] implements all three; [`snapshot`] persists it to disk.

pub mod memory;
pub mod snapshot;

pub use memory::InMemoryStore;
pub use snapshot::{StoreSnapshot, SNAPSHOT_VERSION};

use crate::models::{Client, Contract, ReceiptEntry};
use thiserror::Error;

/// Client accounts, in creation order
pub trait ClientRepository {
    fn get_client(&self, client_id: &str) -> Option<Client>;

    /// Insert or replace by id
    fn insert_client(&mut self, client: Client);

    fn list_clients(&self) -> Vec<Client>;
}

/// One contract per client
pub trait ContractRepository {
    fn get(&self, client_id: &str) -> Option<Contract>;

    /// Store `contract` as the client's contract, replacing any previous one
    fn set(&mut self, client_id: &str, contract: Contract);
}

/// Append-only receipt histories
pub trait ReceiptRepository {
    fn append(&mut self, client_id: &str, entry: ReceiptEntry);

    /// Receipts in insertion order (empty for unknown clients)
    fn list(&self, client_id: &str) -> Vec<ReceiptEntry>;
}

/// Errors raised while persisting or restoring a store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Snapshot checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Snapshot validation failed: {0}")]
    Validation(String),
}

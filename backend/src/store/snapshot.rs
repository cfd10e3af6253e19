//! Snapshot - Save/Load Store State
//!
//! Serializes a complete [`InMemoryStore`] to JSON so a session can resume
//! where it stopped.
//!
//! # Critical Invariants
//!
//! - **Integrity**: the SHA-256 checksum over the canonical JSON body must match
//! - **Ownership**: every contract and receipt history belongs to a known client
//! - **Schedule shape**: paid ≤ amount, amounts sum to the total, due dates ascend

use crate::models::contract::INSTALLMENT_COUNT;
use crate::models::{Client, Contract, ReceiptEntry, ReceiptLog};
use crate::store::{InMemoryStore, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Current on-disk format version
pub const SNAPSHOT_VERSION: u32 = 1;

// ============================================================================
// Snapshot Structure
// ============================================================================

/// Complete store snapshot
///
/// Maps are `BTreeMap` so the serialized form is stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,

    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,

    /// Clients in creation order
    pub clients: Vec<Client>,

    /// Contracts by client ID
    pub contracts: BTreeMap<String, Contract>,

    /// Receipt histories by client ID, insertion order
    pub receipts: BTreeMap<String, Vec<ReceiptEntry>>,

    /// SHA-256 of the canonical JSON of every other field
    pub checksum: String,
}

impl StoreSnapshot {
    /// Capture the full state of `store`
    pub fn capture(store: &InMemoryStore, saved_at: DateTime<Utc>) -> Result<Self, StoreError> {
        let mut snapshot = Self {
            version: SNAPSHOT_VERSION,
            saved_at,
            clients: store.clients().to_vec(),
            contracts: store
                .contracts()
                .iter()
                .map(|(id, contract)| (id.clone(), contract.clone()))
                .collect(),
            receipts: store
                .receipt_logs()
                .iter()
                .map(|(id, log)| (id.clone(), log.entries().to_vec()))
                .collect(),
            checksum: String::new(),
        };
        snapshot.checksum = snapshot.compute_checksum()?;
        Ok(snapshot)
    }

    /// Compute the checksum of this snapshot's body
    ///
    /// Uses canonical JSON serialization with sorted keys, ignoring the
    /// `checksum` field itself.
    pub fn compute_checksum(&self) -> Result<String, StoreError> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.remove("checksum");
        }

        let json = serde_json::to_string(&canonicalize(value))?;

        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Check version, checksum and invariants, then rebuild the store
    pub fn restore(self) -> Result<InMemoryStore, StoreError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let actual = self.compute_checksum()?;
        if actual != self.checksum {
            return Err(StoreError::ChecksumMismatch {
                expected: self.checksum,
                actual,
            });
        }

        if let Err(err) = validate_snapshot(&self) {
            warn!(error = %err, "rejecting store snapshot");
            return Err(err);
        }

        let contracts: HashMap<String, Contract> = self.contracts.into_iter().collect();
        let receipts: HashMap<String, ReceiptLog> = self
            .receipts
            .into_iter()
            .map(|(id, entries)| (id, ReceiptLog::from_entries(entries)))
            .collect();

        Ok(InMemoryStore::from_parts(self.clients, contracts, receipts))
    }
}

/// Recursively sort all object keys for canonical representation
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validate snapshot integrity
///
/// Checks critical invariants:
/// - Client ID uniqueness
/// - Contract and receipt ownership
/// - Per-contract schedule shape
/// - Receipt plausibility and ID uniqueness
pub fn validate_snapshot(snapshot: &StoreSnapshot) -> Result<(), StoreError> {
    // 1. Client uniqueness
    let mut client_ids = HashSet::new();
    for client in &snapshot.clients {
        if !client_ids.insert(client.id()) {
            return Err(StoreError::Validation(format!(
                "Duplicate client {}",
                client.id()
            )));
        }
    }

    // 2. Contracts
    for (client_id, contract) in &snapshot.contracts {
        if !client_ids.contains(client_id.as_str()) {
            return Err(StoreError::Validation(format!(
                "Orphaned contract for unknown client {}",
                client_id
            )));
        }
        validate_contract(client_id, contract)?;
    }

    // 3. Receipts
    let mut receipt_ids = HashSet::new();
    for (client_id, entries) in &snapshot.receipts {
        if !client_ids.contains(client_id.as_str()) {
            return Err(StoreError::Validation(format!(
                "Orphaned receipts for unknown client {}",
                client_id
            )));
        }
        for entry in entries {
            if entry.client_id() != client_id {
                return Err(StoreError::Validation(format!(
                    "Receipt {} filed under {} but issued to {}",
                    entry.id(),
                    client_id,
                    entry.client_id()
                )));
            }
            if entry.installment_index() >= INSTALLMENT_COUNT
                || entry.paid_delta() <= 0
                || entry.remaining_after() < 0
            {
                return Err(StoreError::Validation(format!(
                    "Malformed receipt {} for client {}",
                    entry.id(),
                    client_id
                )));
            }
            if !receipt_ids.insert(entry.id()) {
                return Err(StoreError::Validation(format!(
                    "Duplicate receipt {}",
                    entry.id()
                )));
            }
        }
    }

    Ok(())
}

fn validate_contract(client_id: &str, contract: &Contract) -> Result<(), StoreError> {
    if contract.scheduled_amount() != contract.total_amount() {
        return Err(StoreError::Validation(format!(
            "Contract of {}: installments sum to {}, total is {}",
            client_id,
            contract.scheduled_amount(),
            contract.total_amount()
        )));
    }

    for (index, installment) in contract.schedule().iter().enumerate() {
        if installment.amount() < 0 || installment.paid() < 0 || installment.paid() > installment.amount()
        {
            return Err(StoreError::Validation(format!(
                "Contract of {}: installment {} has paid {} of {}",
                client_id,
                index,
                installment.paid(),
                installment.amount()
            )));
        }
    }

    let ascending = contract
        .schedule()
        .windows(2)
        .all(|pair| pair[0].due_date() < pair[1].due_date());
    if !ascending {
        return Err(StoreError::Validation(format!(
            "Contract of {}: due dates are not ascending",
            client_id
        )));
    }

    Ok(())
}

// ============================================================================
// File I/O
// ============================================================================

impl InMemoryStore {
    /// Write a checksummed snapshot to `path`
    ///
    /// The snapshot is validated before anything is written, so a state that
    /// [`InMemoryStore::load_snapshot`] would reject never reaches disk and the
    /// previous file stays in place. The file is written next to `path` first
    /// and renamed into place, so an interrupted save never leaves a truncated
    /// snapshot behind.
    pub fn save_snapshot(&self, path: &Path, saved_at: DateTime<Utc>) -> Result<(), StoreError> {
        let snapshot = StoreSnapshot::capture(self, saved_at)?;
        if let Err(err) = validate_snapshot(&snapshot) {
            warn!(path = %path.display(), error = %err, "refusing to save store snapshot");
            return Err(err);
        }
        let json = serde_json::to_string_pretty(&snapshot)?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;

        info!(
            path = %path.display(),
            clients = snapshot.clients.len(),
            "store snapshot saved"
        );
        Ok(())
    }

    /// Read, verify and restore a snapshot from `path`
    pub fn load_snapshot(path: &Path) -> Result<Self, StoreError> {
        let json = fs::read_to_string(path)?;
        let snapshot: StoreSnapshot = serde_json::from_str(&json)?;
        let store = snapshot.restore()?;

        info!(
            path = %path.display(),
            clients = store.num_clients(),
            "store snapshot loaded"
        );
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::build_schedule;
    use crate::store::{ClientRepository, ContractRepository};
    use chrono::NaiveDate;

    fn saved_at() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn sample_store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store.insert_client(Client::new("c1".into(), "Awa".into(), String::new()));
        store.set(
            "c1",
            build_schedule(1_200_000, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
        );
        store
    }

    #[test]
    fn test_checksum_deterministic() {
        let store = sample_store();
        let a = StoreSnapshot::capture(&store, saved_at()).unwrap();
        let b = StoreSnapshot::capture(&store, saved_at()).unwrap();
        assert_eq!(a.checksum, b.checksum, "Same store should produce same checksum");
    }

    #[test]
    fn test_orphaned_contract_rejected() {
        let mut snapshot = StoreSnapshot::capture(&sample_store(), saved_at()).unwrap();
        snapshot.clients.clear();

        let err = validate_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_wrong_version_rejected() {
        let mut snapshot = StoreSnapshot::capture(&sample_store(), saved_at()).unwrap();
        snapshot.version = 99;

        assert!(matches!(
            snapshot.restore(),
            Err(StoreError::UnsupportedVersion { found: 99, .. })
        ));
    }
}

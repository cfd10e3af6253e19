//! In-memory store
//!
//! Holds every client, contract and receipt history of a running session.
//!
//! # Critical Invariants
//!
//! 1. **Client order**: clients are listed in insertion order, so portfolio
//!    listings are stable
//! 2. **Append-only receipts**: histories only grow

use crate::models::{Client, Contract, ReceiptEntry, ReceiptLog};
use crate::store::{ClientRepository, ContractRepository, ReceiptRepository};
use std::collections::HashMap;

/// Store backing a [`crate::book::ScheduleBook`]
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use echeancier_core_rs::schedule::build_schedule;
/// use echeancier_core_rs::store::{ContractRepository, InMemoryStore};
///
/// let mut store = InMemoryStore::new();
/// let contract = build_schedule(1_200_000, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
///
/// store.set("client_1", contract.clone());
/// assert_eq!(store.get("client_1"), Some(contract));
/// assert_eq!(store.get("client_2"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    /// All clients in insertion order
    clients: Vec<Client>,

    /// Contracts indexed by owning client ID
    contracts: HashMap<String, Contract>,

    /// Receipt histories indexed by client ID
    receipts: HashMap<String, ReceiptLog>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_clients(&self) -> usize {
        self.clients.len()
    }

    /// Borrow a client's receipt history without cloning
    pub fn receipt_log(&self, client_id: &str) -> Option<&ReceiptLog> {
        self.receipts.get(client_id)
    }

    pub(crate) fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub(crate) fn contracts(&self) -> &HashMap<String, Contract> {
        &self.contracts
    }

    pub(crate) fn receipt_logs(&self) -> &HashMap<String, ReceiptLog> {
        &self.receipts
    }

    pub(crate) fn from_parts(
        clients: Vec<Client>,
        contracts: HashMap<String, Contract>,
        receipts: HashMap<String, ReceiptLog>,
    ) -> Self {
        Self {
            clients,
            contracts,
            receipts,
        }
    }
}

impl ClientRepository for InMemoryStore {
    fn get_client(&self, client_id: &str) -> Option<Client> {
        self.clients.iter().find(|c| c.id() == client_id).cloned()
    }

    fn insert_client(&mut self, client: Client) {
        match self.clients.iter_mut().find(|c| c.id() == client.id()) {
            Some(existing) => *existing = client,
            None => self.clients.push(client),
        }
    }

    fn list_clients(&self) -> Vec<Client> {
        self.clients.clone()
    }
}

impl ContractRepository for InMemoryStore {
    fn get(&self, client_id: &str) -> Option<Contract> {
        self.contracts.get(client_id).cloned()
    }

    fn set(&mut self, client_id: &str, contract: Contract) {
        self.contracts.insert(client_id.to_string(), contract);
    }
}

impl ReceiptRepository for InMemoryStore {
    fn append(&mut self, client_id: &str, entry: ReceiptEntry) {
        self.receipts
            .entry(client_id.to_string())
            .or_default()
            .append(entry);
    }

    fn list(&self, client_id: &str) -> Vec<ReceiptEntry> {
        self.receipts
            .get(client_id)
            .map(|log| log.entries().to_vec())
            .unwrap_or_default()
    }
}

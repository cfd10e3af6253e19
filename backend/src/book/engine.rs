//! Schedule Book Engine
//!
//! Admin and client operations on top of the pure schedule engine:
//! - Client creation (contract built from a [`ClientConfig`])
//! - Destructive rebuilds on amount / start-date edits
//! - Payment application with atomic receipt recording
//! - Lock toggling
//! - Statements, portfolio totals, filtered schedules and exports
//!
//! # Payment flow
//!
//! ```text
//! 1. Load the client's contract from the repository
//! 2. Apply the ledger operation to the loaded copy
//! 3. No-op?  → log PaymentIgnored, write nothing
//! 4. Build the receipt (delta > 0 only)
//! 5. Write contract and append receipt together
//! 6. Log PaymentApplied
//! ```
//!
//! Nothing is written between steps 1 and 5, so a contract is never stored
//! without the receipt that accounts for its new paid amount.
//!
//! # Event log scope
//!
//! The [`EventLog`] lives in memory for the lifetime of the book and is not
//! part of the store snapshot. Receipts are the durable payment record.
//! Long-lived callers drain it with [`ScheduleBook::take_events`].
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use echeancier_core_rs::book::{ClientConfig, PaymentOutcome, ScheduleBook};
//! use echeancier_core_rs::store::InMemoryStore;
//!
//! let mut book = ScheduleBook::new(InMemoryStore::new());
//! let client_id = book
//!     .create_client(ClientConfig {
//!         name: "Awa Diop".to_string(),
//!         email: "awa@example.com".to_string(),
//!         total_amount: 1_200_000,
//!         start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
//!     })
//!     .unwrap();
//!
//! let outcome = book.add_payment(&client_id, 0, 30_000).unwrap();
//! assert!(matches!(outcome, PaymentOutcome::Applied { .. }));
//! assert_eq!(book.receipts_newest_first(&client_id).unwrap().len(), 1);
//! ```

use crate::core::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::export::{ReceiptDocument, ScheduleExport};
use crate::ledger::{self, NoOpReason, PaymentApplied};
use crate::models::client::{Client, DEFAULT_CLIENT_NAME};
use crate::models::contract::Contract;
use crate::models::event::{Event, EventLog};
use crate::models::installment::Installment;
use crate::models::receipt::{ReceiptEntry, ReceiptLog};
use crate::receipts::record_receipt;
use crate::schedule::{build_schedule, rebuild_schedule};
use crate::store::{ClientRepository, ContractRepository, ReceiptRepository};
use crate::views::{filter_schedule, portfolio_summary, ContractSummary, DueFilter, PortfolioSummary};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// Configuration Types
// ============================================================================

/// Input for creating a client account and its contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Display name (defaults to "Client" when empty)
    #[serde(default)]
    pub name: String,

    /// Contact email
    #[serde(default)]
    pub email: String,

    /// Contract total; negative values are coerced to 0
    pub total_amount: i64,

    /// Due date of the first installment
    pub start_date: NaiveDate,
}

// ============================================================================
// Results and Errors
// ============================================================================

/// Errors for operations addressed to an unknown entity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("No contract for client {0}")]
    ContractNotFound(String),

    #[error("Receipt {receipt_id} not found for client {client_id}")]
    ReceiptNotFound {
        client_id: String,
        receipt_id: String,
    },
}

/// Outcome of a payment operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Ledger accepted the payment; `receipt` is None for a zero delta
    Applied {
        applied: PaymentApplied,
        receipt: Option<ReceiptEntry>,
    },

    /// Nothing changed
    NoOp(NoOpReason),
}

impl PaymentOutcome {
    /// Realized delta (0 for no-ops)
    pub fn delta(&self) -> i64 {
        match self {
            PaymentOutcome::Applied { applied, .. } => applied.delta,
            PaymentOutcome::NoOp(_) => 0,
        }
    }

    pub fn receipt(&self) -> Option<&ReceiptEntry> {
        match self {
            PaymentOutcome::Applied { receipt, .. } => receipt.as_ref(),
            PaymentOutcome::NoOp(_) => None,
        }
    }
}

/// Everything the client-facing view shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientStatement {
    pub client: Client,
    pub start_date: NaiveDate,
    pub summary: ContractSummary,
    pub installments: Vec<Installment>,
    /// Newest first
    pub receipts: Vec<ReceiptEntry>,
}

// ============================================================================
// Schedule Book
// ============================================================================

/// Service facade over a store
///
/// Single-actor: every operation runs to completion before the next starts.
pub struct ScheduleBook<S> {
    store: S,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    events: EventLog,
}

impl<S> ScheduleBook<S>
where
    S: ClientRepository + ContractRepository + ReceiptRepository,
{
    /// Book with the system clock and UUID identifiers
    pub fn new(store: S) -> Self {
        Self::with_collaborators(store, Box::new(SystemClock), Box::new(UuidGenerator))
    }

    /// Book with injected clock and id generator
    pub fn with_collaborators(store: S, clock: Box<dyn Clock>, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            store,
            clock,
            ids,
            events: EventLog::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Hand over the events logged so far, leaving an empty log behind
    pub fn take_events(&mut self) -> EventLog {
        std::mem::take(&mut self.events)
    }

    /// Today's date according to the book's clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    // ------------------------------------------------------------------------
    // Accounts and contracts
    // ------------------------------------------------------------------------

    /// Create a client and build its contract; returns the new client ID
    pub fn create_client(&mut self, config: ClientConfig) -> Result<String, BookError> {
        let client_id = self.ids.next_id();
        let name = if config.name.trim().is_empty() {
            DEFAULT_CLIENT_NAME.to_string()
        } else {
            config.name.trim().to_string()
        };
        let contract = build_schedule(config.total_amount, config.start_date);

        self.events.log(Event::ClientCreated {
            at: self.clock.now(),
            client_id: client_id.clone(),
            total_amount: contract.total_amount(),
            start_date: contract.start_date(),
        });
        info!(
            client_id = %client_id,
            total_amount = contract.total_amount(),
            start_date = %contract.start_date(),
            "client created"
        );

        self.store.insert_client(Client::new(
            client_id.clone(),
            name,
            config.email.trim().to_string(),
        ));
        self.store.set(&client_id, contract);
        Ok(client_id)
    }

    /// Rebuild a client's contract from scratch, discarding payment progress
    ///
    /// Receipts already issued are kept.
    pub fn rebuild_contract(
        &mut self,
        client_id: &str,
        total_amount: i64,
        start_date: NaiveDate,
    ) -> Result<Contract, BookError> {
        self.require_client(client_id)?;

        let (contract, discarded_paid) = match self.store.get(client_id) {
            Some(mut contract) => {
                let discarded = rebuild_schedule(&mut contract, total_amount, start_date);
                (contract, discarded)
            }
            None => (build_schedule(total_amount, start_date), 0),
        };

        self.events.log(Event::ScheduleRebuilt {
            at: self.clock.now(),
            client_id: client_id.to_string(),
            total_amount: contract.total_amount(),
            start_date: contract.start_date(),
            discarded_paid,
        });
        info!(
            client_id,
            total_amount = contract.total_amount(),
            start_date = %contract.start_date(),
            discarded_paid,
            "schedule rebuilt"
        );

        self.store.set(client_id, contract.clone());
        Ok(contract)
    }

    /// Change the total, keeping the start date (today if no contract yet)
    pub fn update_total_amount(
        &mut self,
        client_id: &str,
        total_amount: i64,
    ) -> Result<Contract, BookError> {
        let start_date = self
            .store
            .get(client_id)
            .map(|c| c.start_date())
            .unwrap_or_else(|| self.clock.today());
        self.rebuild_contract(client_id, total_amount, start_date)
    }

    /// Change the start date, keeping the total (0 if no contract yet)
    pub fn update_start_date(
        &mut self,
        client_id: &str,
        start_date: NaiveDate,
    ) -> Result<Contract, BookError> {
        let total_amount = self
            .store
            .get(client_id)
            .map(|c| c.total_amount())
            .unwrap_or(0);
        self.rebuild_contract(client_id, total_amount, start_date)
    }

    // ------------------------------------------------------------------------
    // Payments
    // ------------------------------------------------------------------------

    /// Record a partial payment of up to `amount` on installment `index`
    pub fn add_payment(
        &mut self,
        client_id: &str,
        index: usize,
        amount: i64,
    ) -> Result<PaymentOutcome, BookError> {
        let mut contract = self.require_contract(client_id)?;
        let result = ledger::apply_partial_payment(&mut contract, index, amount);
        Ok(self.commit(client_id, index, contract, result))
    }

    /// Pay installment `index` in full
    pub fn pay_in_full(
        &mut self,
        client_id: &str,
        index: usize,
    ) -> Result<PaymentOutcome, BookError> {
        let mut contract = self.require_contract(client_id)?;
        let result = ledger::apply_full_payment(&mut contract, index);
        Ok(self.commit(client_id, index, contract, result))
    }

    /// Lock or unlock installment `index`; returns the new `closed` flag
    pub fn toggle_lock(&mut self, client_id: &str, index: usize) -> Result<bool, BookError> {
        let mut contract = self.require_contract(client_id)?;

        match ledger::toggle_lock(&mut contract, index) {
            Ok(closed) => {
                self.store.set(client_id, contract);
                self.events.log(Event::LockToggled {
                    at: self.clock.now(),
                    client_id: client_id.to_string(),
                    index,
                    closed,
                });
                info!(client_id, index, closed, "installment lock toggled");
                Ok(closed)
            }
            Err(reason) => {
                debug!(client_id, index, %reason, "lock toggle ignored");
                Ok(contract.installment(index).is_some_and(Installment::is_closed))
            }
        }
    }

    fn commit(
        &mut self,
        client_id: &str,
        index: usize,
        contract: Contract,
        result: Result<PaymentApplied, NoOpReason>,
    ) -> PaymentOutcome {
        let applied = match result {
            Ok(applied) => applied,
            Err(reason) => {
                self.events.log(Event::PaymentIgnored {
                    at: self.clock.now(),
                    client_id: client_id.to_string(),
                    index,
                    reason,
                });
                debug!(client_id, index, %reason, "payment ignored");
                return PaymentOutcome::NoOp(reason);
            }
        };

        let receipt = record_receipt(client_id, &applied, self.ids.as_mut(), self.clock.as_ref());

        self.store.set(client_id, contract);
        if let Some(entry) = &receipt {
            self.store.append(client_id, entry.clone());
        }

        self.events.log(Event::PaymentApplied {
            at: self.clock.now(),
            client_id: client_id.to_string(),
            index,
            delta: applied.delta,
            receipt_id: receipt.as_ref().map(|r| r.id().to_string()),
        });
        info!(
            client_id,
            index,
            delta = applied.delta,
            remaining = applied.remaining_after,
            closed = applied.closed_after,
            "payment applied"
        );

        PaymentOutcome::Applied { applied, receipt }
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    pub fn client(&self, client_id: &str) -> Result<Client, BookError> {
        self.require_client(client_id)
    }

    pub fn clients(&self) -> Vec<Client> {
        self.store.list_clients()
    }

    pub fn contract(&self, client_id: &str) -> Result<Contract, BookError> {
        self.require_contract(client_id)
    }

    /// Receipt history, newest first
    pub fn receipts_newest_first(&self, client_id: &str) -> Result<Vec<ReceiptEntry>, BookError> {
        self.require_client(client_id)?;
        let log = ReceiptLog::from_entries(self.store.list(client_id));
        Ok(log.newest_first().into_iter().cloned().collect())
    }

    /// Totals across every client's contract
    pub fn portfolio(&self) -> PortfolioSummary {
        let contracts: Vec<Contract> = self
            .store
            .list_clients()
            .iter()
            .filter_map(|client| self.store.get(client.id()))
            .collect();
        portfolio_summary(&contracts)
    }

    /// Installments matching `mode` as of the clock's today, with positions
    pub fn filtered_schedule(
        &self,
        client_id: &str,
        mode: DueFilter,
    ) -> Result<Vec<(usize, Installment)>, BookError> {
        let contract = self.require_contract(client_id)?;
        let today = self.clock.today();
        Ok(filter_schedule(contract.schedule(), mode, today)
            .into_iter()
            .map(|(index, installment)| (index, *installment))
            .collect())
    }

    /// Client-facing statement: summary, schedule and receipts
    pub fn client_statement(&self, client_id: &str) -> Result<ClientStatement, BookError> {
        let client = self.require_client(client_id)?;
        let contract = self.require_contract(client_id)?;
        let receipts = self.receipts_newest_first(client_id)?;

        Ok(ClientStatement {
            client,
            start_date: contract.start_date(),
            summary: ContractSummary::of(&contract),
            installments: contract.schedule().to_vec(),
            receipts,
        })
    }

    pub fn schedule_export(&self, client_id: &str) -> Result<ScheduleExport, BookError> {
        let client = self.require_client(client_id)?;
        let contract = self.require_contract(client_id)?;
        Ok(ScheduleExport::from_contract(client.display_name(), &contract))
    }

    pub fn receipt_document(
        &self,
        client_id: &str,
        receipt_id: &str,
    ) -> Result<ReceiptDocument, BookError> {
        let client = self.require_client(client_id)?;
        let log = ReceiptLog::from_entries(self.store.list(client_id));
        let receipt = log
            .find(receipt_id)
            .ok_or_else(|| BookError::ReceiptNotFound {
                client_id: client_id.to_string(),
                receipt_id: receipt_id.to_string(),
            })?;
        let contract = self.store.get(client_id);

        Ok(ReceiptDocument::from_receipt(
            client.display_name(),
            contract.as_ref(),
            receipt,
        ))
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    fn require_client(&self, client_id: &str) -> Result<Client, BookError> {
        self.store
            .get_client(client_id)
            .ok_or_else(|| BookError::ClientNotFound(client_id.to_string()))
    }

    fn require_contract(&self, client_id: &str) -> Result<Contract, BookError> {
        self.require_client(client_id)?;
        self.store
            .get(client_id)
            .ok_or_else(|| BookError::ContractNotFound(client_id.to_string()))
    }
}

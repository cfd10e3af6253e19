//! Store snapshot tests
//!
//! Save/load through the file system, checksum verification and invariant
//! validation on restore.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use echeancier_core_rs::core::{FixedClock, SequentialIdGenerator};
use echeancier_core_rs::schedule::build_schedule;
use echeancier_core_rs::store::{
    ClientRepository, ContractRepository, ReceiptRepository, StoreSnapshot, SNAPSHOT_VERSION,
};
use echeancier_core_rs::{ClientConfig, InMemoryStore, ReceiptEntry, ScheduleBook, StoreError};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn saved_at() -> DateTime<Utc> {
    date(2024, 4, 1).and_hms_opt(18, 30, 0).unwrap().and_utc()
}

/// Store with two clients, a few payments and a locked installment
fn create_populated_store() -> (InMemoryStore, String, String) {
    let mut book = ScheduleBook::with_collaborators(
        InMemoryStore::new(),
        Box::new(FixedClock::at_date(date(2024, 4, 1)).with_tick(Duration::seconds(1))),
        Box::new(SequentialIdGenerator::new("id")),
    );
    let awa = book
        .create_client(ClientConfig {
            name: "Awa Diop".to_string(),
            email: "awa@example.com".to_string(),
            total_amount: 1_200_000,
            start_date: date(2024, 1, 15),
        })
        .unwrap();
    let moussa = book
        .create_client(ClientConfig {
            name: "Moussa Ba".to_string(),
            email: String::new(),
            total_amount: 1_000_007,
            start_date: date(2024, 1, 31),
        })
        .unwrap();

    book.pay_in_full(&awa, 0).unwrap();
    book.add_payment(&awa, 1, 30_000).unwrap();
    book.toggle_lock(&awa, 6).unwrap();
    book.add_payment(&moussa, 0, 50_000).unwrap();

    (book.into_store(), awa, moussa)
}

fn assert_stores_equal(left: &InMemoryStore, right: &InMemoryStore) {
    assert_eq!(left.list_clients(), right.list_clients());
    for client in left.list_clients() {
        assert_eq!(left.get(client.id()), right.get(client.id()));
        assert_eq!(
            ReceiptRepository::list(left, client.id()),
            ReceiptRepository::list(right, client.id())
        );
    }
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("echeancier.json");
    let (store, awa, _) = create_populated_store();

    store.save_snapshot(&path, saved_at()).unwrap();
    let loaded = InMemoryStore::load_snapshot(&path).unwrap();

    assert_stores_equal(&store, &loaded);
    let contract = loaded.get(&awa).unwrap();
    assert!(contract.schedule()[0].is_closed());
    assert_eq!(contract.schedule()[1].paid(), 30_000);
    assert!(contract.schedule()[6].is_closed());
    assert_eq!(loaded.receipt_log(&awa).unwrap().len(), 2);
}

#[test]
fn test_save_leaves_no_temporary_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("echeancier.json");
    let (store, _, _) = create_populated_store();

    store.save_snapshot(&path, saved_at()).unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn test_loaded_store_keeps_working() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("echeancier.json");
    let (store, awa, _) = create_populated_store();
    store.save_snapshot(&path, saved_at()).unwrap();

    let mut book = ScheduleBook::with_collaborators(
        InMemoryStore::load_snapshot(&path).unwrap(),
        Box::new(FixedClock::at_date(date(2024, 4, 2))),
        Box::new(SequentialIdGenerator::new("later")),
    );
    let outcome = book.add_payment(&awa, 1, 70_000).unwrap();

    assert_eq!(outcome.delta(), 70_000);
    assert_eq!(book.receipts_newest_first(&awa).unwrap().len(), 3);
}

#[test]
fn test_empty_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.json");

    InMemoryStore::new().save_snapshot(&path, saved_at()).unwrap();
    let loaded = InMemoryStore::load_snapshot(&path).unwrap();

    assert_eq!(loaded.num_clients(), 0);
}

#[test]
fn test_checksum_is_stable() {
    let (store, _, _) = create_populated_store();

    let first = StoreSnapshot::capture(&store, saved_at()).unwrap();
    let second = StoreSnapshot::capture(&store, saved_at()).unwrap();

    assert_eq!(first.checksum, second.checksum);
    assert_eq!(first.checksum.len(), 64);
    assert_eq!(first.version, SNAPSHOT_VERSION);
}

// ============================================================================
// Integrity Checks
// ============================================================================

#[test]
fn test_tampered_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("echeancier.json");
    let (store, awa, _) = create_populated_store();
    store.save_snapshot(&path, saved_at()).unwrap();

    let mut value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    value["contracts"][awa.as_str()]["schedule"][2]["paid"] = Value::from(100_000);
    fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

    let result = InMemoryStore::load_snapshot(&path);

    assert!(matches!(result, Err(StoreError::ChecksumMismatch { .. })));
}

#[test]
fn test_unsupported_version_is_rejected() {
    let (store, _, _) = create_populated_store();
    let mut snapshot = StoreSnapshot::capture(&store, saved_at()).unwrap();
    snapshot.version = SNAPSHOT_VERSION + 1;

    let result = snapshot.restore();

    assert!(matches!(
        result,
        Err(StoreError::UnsupportedVersion { found, expected })
            if found == SNAPSHOT_VERSION + 1 && expected == SNAPSHOT_VERSION
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();

    let result = InMemoryStore::load_snapshot(&dir.path().join("absent.json"));

    assert!(matches!(result, Err(StoreError::Io(_))));
}

#[test]
fn test_garbage_file_is_serialization_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.json");
    fs::write(&path, "not a snapshot").unwrap();

    let result = InMemoryStore::load_snapshot(&path);

    assert!(matches!(result, Err(StoreError::Serialization(_))));
}

// ============================================================================
// Validation
// ============================================================================

/// Apply `edit` to a captured snapshot, re-seal it and try to restore
fn restore_edited(edit: impl FnOnce(&mut StoreSnapshot)) -> Result<InMemoryStore, StoreError> {
    let (store, _, _) = create_populated_store();
    let mut snapshot = StoreSnapshot::capture(&store, saved_at()).unwrap();
    edit(&mut snapshot);
    snapshot.checksum = snapshot.compute_checksum().unwrap();
    snapshot.restore()
}

#[test]
fn test_orphaned_contract_is_rejected() {
    let result = restore_edited(|snapshot| {
        snapshot
            .contracts
            .insert("ghost".to_string(), build_schedule(1_200, date(2024, 1, 1)));
    });

    assert!(matches!(result, Err(StoreError::Validation(_))));
}

#[test]
fn test_duplicate_client_is_rejected() {
    let result = restore_edited(|snapshot| {
        let first = snapshot.clients[0].clone();
        snapshot.clients.push(first);
    });

    assert!(matches!(result, Err(StoreError::Validation(_))));
}

#[test]
fn test_overpaid_installment_is_rejected() {
    let result = restore_edited(|snapshot| {
        let mut value = serde_json::to_value(&snapshot.contracts).unwrap();
        for contract in value.as_object_mut().unwrap().values_mut() {
            contract["schedule"][3]["paid"] = Value::from(10_000_000);
        }
        snapshot.contracts = serde_json::from_value(value).unwrap();
    });

    assert!(matches!(result, Err(StoreError::Validation(_))));
}

#[test]
fn test_misfiled_receipt_is_rejected() {
    let (store, awa, moussa) = create_populated_store();
    let mut snapshot = StoreSnapshot::capture(&store, saved_at()).unwrap();
    let stolen: ReceiptEntry = snapshot.receipts[&awa][0].clone();
    snapshot.receipts.get_mut(&moussa).unwrap().push(stolen);
    snapshot.checksum = snapshot.compute_checksum().unwrap();

    assert!(matches!(snapshot.restore(), Err(StoreError::Validation(_))));
}

#[test]
fn test_duplicate_receipt_id_is_rejected() {
    let (store, awa, _) = create_populated_store();
    let mut snapshot = StoreSnapshot::capture(&store, saved_at()).unwrap();
    let copy = snapshot.receipts[&awa][0].clone();
    snapshot.receipts.get_mut(&awa).unwrap().push(copy);
    snapshot.checksum = snapshot.compute_checksum().unwrap();

    assert!(matches!(snapshot.restore(), Err(StoreError::Validation(_))));
}

#[test]
fn test_contract_set_through_repository_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("echeancier.json");
    let (mut store, awa, _) = create_populated_store();
    store.set(&awa, build_schedule(2_400_000, date(2025, 1, 31)));

    store.save_snapshot(&path, saved_at()).unwrap();
    let loaded = InMemoryStore::load_snapshot(&path).unwrap();

    let contract = loaded.get(&awa).unwrap();
    assert_eq!(contract.total_amount(), 2_400_000);
    assert_eq!(contract.schedule()[1].due_date(), date(2025, 2, 28));
}

#[test]
fn test_save_refuses_state_that_would_not_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("echeancier.json");
    let (mut store, awa, _) = create_populated_store();
    store.save_snapshot(&path, saved_at()).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    // Months past the calendar limit all land on NaiveDate::MAX
    let start = NaiveDate::MAX.checked_sub_months(Months::new(2)).unwrap();
    store.set(&awa, build_schedule(1_200, start));

    let result = store.save_snapshot(&path, saved_at());

    assert!(matches!(result, Err(StoreError::Validation(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert!(InMemoryStore::load_snapshot(&path).is_ok());
}

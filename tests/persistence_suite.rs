mod common;

use std::fs;

use common::{day, open_store, setup_store, TestClock};
use daybook::daybook_domain::{NewTransaction, PaymentMethod};

#[test]
fn failed_save_keeps_memory_and_the_previous_file() {
    let clock = TestClock::at(day(2025, 3, 4), 8);
    let (mut store, dir) = setup_store(clock.clone());
    store.start_day(10.0).unwrap();
    let path = dir.join("daybook.json");
    let original = fs::read_to_string(&path).expect("first save");

    // A directory at the temp path makes the next write fail.
    fs::create_dir_all(dir.join("daybook.json.tmp")).unwrap();

    store
        .add_transaction(NewTransaction::income(5.0, PaymentMethod::Cash, "Unsaved"))
        .unwrap();
    assert!(store.last_save_error().is_some());
    assert_eq!(store.state().transactions.len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);

    fs::remove_dir(dir.join("daybook.json.tmp")).unwrap();
    store.flush().unwrap();
    assert!(store.last_save_error().is_none());

    let reopened = open_store(&dir, clock);
    assert_eq!(reopened.state().transactions.len(), 1);
}

#[test]
fn corrupt_file_falls_back_to_initial_state() {
    let clock = TestClock::at(day(2025, 3, 4), 8);
    let dir = common::temp_dir();
    fs::write(dir.join("daybook.json"), "{ not json").unwrap();

    let store = open_store(&dir, clock);
    let summary = store.load_summary();
    assert!(summary.fallback_reason.is_some());
    assert!(store.state().daily_logs.is_empty());
}

#[test]
fn legacy_snapshot_is_migrated_on_open() {
    let clock = TestClock::at(day(2024, 5, 2), 8);
    let dir = common::temp_dir();
    let legacy = r#"{
        "transactions": [
            {"id": "7d9f1f0e-1111-4000-8000-000000000001", "date": "2024-05-01T09:00:00Z",
             "type": "sale", "amount": 12.5, "paymentMethod": "cash", "description": "Bread"}
        ],
        "dailyLogs": [
            {"id": "2024-05-01", "date": "2024-05-01T08:00:00Z", "openingCash": 20.0,
             "transactions": ["7d9f1f0e-1111-4000-8000-000000000001"],
             "totalSales": 12.5, "totalExpenses": 0.0, "status": "open"}
        ],
        "debts": [],
        "settings": {"currency": "USD"}
    }"#;
    fs::write(dir.join("daybook.json"), legacy).unwrap();

    let store = open_store(&dir, clock);
    assert!(store.load_summary().fallback_reason.is_none());
    assert!(!store.load_summary().migrations.is_empty());

    let state = store.state();
    let log = state.log(day(2024, 5, 1)).expect("migrated log");
    assert_eq!(log.total_income, 12.5);
    assert_eq!(log.transaction_ids.len(), 1);
    assert_eq!(state.transactions[0].description, "Bread");
}

#[test]
fn no_op_mutations_leave_the_saved_file_alone() {
    let clock = TestClock::at(day(2025, 3, 4), 8);
    let (mut store, dir) = setup_store(clock);
    store.start_day(10.0).unwrap();
    let path = dir.join("daybook.json");
    let saved = fs::read_to_string(&path).unwrap();

    // Removing the file shows whether a later no-op rewrites it.
    fs::remove_file(&path).unwrap();
    assert!(!store.start_day(10.0).unwrap());
    assert!(!store.delete_transaction(uuid::Uuid::new_v4()));
    assert!(!path.exists());

    store.flush().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), saved);
}

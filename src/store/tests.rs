#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::models::ExpenseDraft;

fn make_record(id: i64, category: &str, amount: &str) -> ExpenseRecord {
    let draft = ExpenseDraft::parse("2024-01-15", category, amount, "").unwrap();
    ExpenseRecord::new(id, draft, None)
}

fn seeded(db: &Database, n: i64) -> Store<ExpenseRecord> {
    let mut store = Store::<ExpenseRecord>::load(db);
    for i in 1..=n {
        store
            .append(db, make_record(i, &format!("Cat{i}"), "10"))
            .unwrap();
    }
    store
}

// ── load ──────────────────────────────────────────────────────

#[test]
fn test_load_absent_key_is_empty() {
    let db = Database::open_in_memory().unwrap();
    let store = Store::<ExpenseRecord>::load(&db);
    assert!(store.is_empty());
}

#[test]
fn test_load_malformed_json_is_empty() {
    let db = Database::open_in_memory().unwrap();
    db.set_item("expenses", "{not json").unwrap();
    let store = Store::<ExpenseRecord>::load(&db);
    assert!(store.is_empty());
}

#[test]
fn test_load_wrong_shape_is_empty() {
    let db = Database::open_in_memory().unwrap();
    db.set_item("expenses", r#"{"date":"2024-01-01"}"#).unwrap();
    assert!(Store::<ExpenseRecord>::load(&db).is_empty());
}

#[test]
fn test_load_assigns_ids_to_legacy_records() {
    let db = Database::open_in_memory().unwrap();
    db.set_item(
        "expenses",
        r#"[{"date":"2024-01-01","category":"Food","amount":5,"note":""},
            {"date":"2024-01-02","category":"Fuel","amount":7,"note":""}]"#,
    )
    .unwrap();
    let store = Store::<ExpenseRecord>::load(&db);
    let ids: Vec<i64> = store.items().iter().map(|r| r.id).collect();
    assert!(ids[0] > 0);
    assert_eq!(ids[1], ids[0] + 1);

    // Repaired ids are written back, so a reload sees the same ones.
    let again = Store::<ExpenseRecord>::load(&db);
    assert_eq!(again.items(), store.items());
}

#[test]
fn test_load_repairs_duplicate_ids() {
    let db = Database::open_in_memory().unwrap();
    db.set_item(
        "expenses",
        r#"[{"id":5,"date":"2024-01-01","category":"A","amount":1},
            {"id":5,"date":"2024-01-02","category":"B","amount":2}]"#,
    )
    .unwrap();
    let store = Store::<ExpenseRecord>::load(&db);
    assert_eq!(store.items()[0].id, 5);
    assert_ne!(store.items()[1].id, 5);
}

// ── append / roundtrip ───────────────────────────────────────

#[test]
fn test_append_order_and_roundtrip() {
    let db = Database::open_in_memory().unwrap();
    let store = seeded(&db, 3);
    let categories: Vec<&str> = store.items().iter().map(|r| r.category.as_str()).collect();
    assert_eq!(categories, ["Cat1", "Cat2", "Cat3"]);

    let reloaded = Store::<ExpenseRecord>::load(&db);
    assert_eq!(reloaded.items(), store.items());
}

#[test]
fn test_append_rejects_duplicate_id() {
    let db = Database::open_in_memory().unwrap();
    let mut store = seeded(&db, 1);
    assert!(store.append(&db, make_record(1, "Dup", "1")).is_err());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_append_batch_single_commit() {
    let db = Database::open_in_memory().unwrap();
    let mut store = Store::<ExpenseRecord>::load(&db);
    let added = store
        .append_batch(&db, vec![make_record(1, "A", "1"), make_record(2, "B", "2")])
        .unwrap();
    assert_eq!(added, 2);
    assert_eq!(Store::<ExpenseRecord>::load(&db).len(), 2);
}

#[test]
fn test_append_batch_rejects_internal_duplicates() {
    let db = Database::open_in_memory().unwrap();
    let mut store = Store::<ExpenseRecord>::load(&db);
    let result = store.append_batch(&db, vec![make_record(1, "A", "1"), make_record(1, "B", "2")]);
    assert!(result.is_err());
    assert!(store.is_empty());
}

#[test]
fn test_next_id_is_unique_and_increasing() {
    let db = Database::open_in_memory().unwrap();
    let mut store = Store::<ExpenseRecord>::load(&db);
    let far_future = chrono::Utc::now().timestamp_millis() + 1_000_000;
    store.append(&db, make_record(far_future, "A", "1")).unwrap();
    assert_eq!(store.next_id(), far_future + 1);
}

// ── remove ───────────────────────────────────────────────────

#[test]
fn test_remove_at_shifts_positions() {
    let db = Database::open_in_memory().unwrap();
    let mut store = seeded(&db, 4);
    let removed = store.remove_at(&db, 1).unwrap();
    assert_eq!(removed.category, "Cat2");
    assert_eq!(store.len(), 3);
    assert_eq!(store.items()[1].category, "Cat3");
    assert_eq!(store.items()[2].category, "Cat4");
}

#[test]
fn test_remove_until_empty_persists_empty() {
    let db = Database::open_in_memory().unwrap();
    let mut store = seeded(&db, 3);
    while !store.is_empty() {
        store.remove_at(&db, 0).unwrap();
    }
    assert_eq!(db.get_item("expenses").unwrap().as_deref(), Some("[]"));
    assert!(Store::<ExpenseRecord>::load(&db).is_empty());
}

#[test]
fn test_remove_by_id() {
    let db = Database::open_in_memory().unwrap();
    let mut store = seeded(&db, 3);
    store.remove(&db, 2).unwrap();
    assert!(store.get(2).is_none());
    assert!(store.remove(&db, 2).is_err());
    assert!(store.remove_at(&db, 10).is_err());
}

// ── replace ──────────────────────────────────────────────────

#[test]
fn test_replace_preserves_id_and_length() {
    let db = Database::open_in_memory().unwrap();
    let mut store = seeded(&db, 3);
    let mut edited = make_record(999, "Edited", "42.00");
    edited.note = "changed".into();
    store.replace(&db, 2, edited).unwrap();

    assert_eq!(store.len(), 3);
    let record = &store.items()[1];
    assert_eq!(record.id, 2);
    assert_eq!(record.category, "Edited");
    assert_eq!(record.amount, dec!(42.00));
    assert_eq!(record.note, "changed");
    assert_eq!(Store::<ExpenseRecord>::load(&db).items(), store.items());
}

#[test]
fn test_replace_unknown_id_fails() {
    let db = Database::open_in_memory().unwrap();
    let mut store = seeded(&db, 1);
    assert!(store.replace(&db, 77, make_record(77, "X", "1")).is_err());
}

// ── failed writes ────────────────────────────────────────────

#[test]
fn test_failed_write_keeps_prior_state() {
    let db = Database::open_in_memory().unwrap();
    let mut store = seeded(&db, 2);
    let before = store.items().to_vec();
    db.make_read_only().unwrap();

    assert!(store.append(&db, make_record(3, "C", "1")).is_err());
    assert!(store.remove_at(&db, 0).is_err());
    assert!(store.replace(&db, 1, make_record(1, "Z", "9")).is_err());
    assert_eq!(store.items(), before.as_slice());
}

#[test]
fn test_bills_use_their_own_key() {
    let db = Database::open_in_memory().unwrap();
    let mut bills = Store::<BillAsset>::load(&db);
    bills
        .append(&db, BillAsset::new(1, "a.pdf".into(), "application/pdf", b"%PDF"))
        .unwrap();
    assert!(Store::<ExpenseRecord>::load(&db).is_empty());
    assert_eq!(Store::<BillAsset>::load(&db).len(), 1);
}

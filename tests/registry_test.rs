//! Tests for the bulletin registry and its delete-then-append replace.

use campaign_board::error::Result as BoardResult;
use campaign_board::models::Bulletin;
use campaign_board::registry::MessageRegistry;
use campaign_board::schema::messages;
use campaign_board::store::{MemoryStore, Row, TableStore};
use mockall::mock;
use mockall::predicate::eq;

mock! {
    Store {}

    impl TableStore for Store {
        fn read_table(&self, table: &str) -> BoardResult<Vec<Row>>;
        fn append_row(&self, table: &str, values: &[String]) -> BoardResult<()>;
        fn find_row(&self, table: &str, key: &str) -> BoardResult<Option<usize>>;
        fn delete_row(&self, table: &str, position: usize) -> BoardResult<()>;
    }
}

fn bulletin(target: &str, message: &str) -> Bulletin {
    Bulletin {
        target: target.to_string(),
        message: message.to_string(),
        suggestion_1: "Share the post".to_string(),
        suggestion_2: "Invite a neighbor".to_string(),
        task: String::new(),
        reference_date: "15/03/2026".to_string(),
    }
}

fn messages_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.create_table("Messages", &messages::ORDER);
    store
}

#[test]
fn upsert_for_fresh_target_appends_without_delete() {
    let mut store = MockStore::new();
    store.expect_find_row().with(eq("Messages"), eq("G1")).times(1).returning(|_, _| Ok(None));
    store.expect_delete_row().times(0);
    store
        .expect_append_row()
        .withf(|table, values| table == "Messages" && values[0] == "G1")
        .times(1)
        .returning(|_, _| Ok(()));

    let registry = MessageRegistry::new(&store, "Messages");
    registry.upsert(&bulletin("G1", "Welcome!")).unwrap();
}

#[test]
fn upsert_then_get_returns_new_record() {
    let store = messages_store();
    let registry = MessageRegistry::new(&store, "Messages");

    registry.upsert(&bulletin("G1", "First version")).unwrap();
    registry.upsert(&bulletin("G1", "Second version")).unwrap();

    let current = registry.get("G1").unwrap().unwrap();
    assert_eq!(current.message, "Second version");

    // Exactly one record for the target remains after the replace.
    assert_eq!(store.read_table("Messages").unwrap().len(), 1);
}

#[test]
fn upsert_leaves_other_targets_untouched() {
    let store = messages_store();
    let registry = MessageRegistry::new(&store, "Messages");

    registry.upsert(&bulletin("G1", "For group one")).unwrap();
    registry.upsert(&bulletin("G2", "For group two")).unwrap();
    registry.upsert(&bulletin("G1", "Updated group one")).unwrap();

    assert_eq!(registry.get("G1").unwrap().unwrap().message, "Updated group one");
    assert_eq!(registry.get("G2").unwrap().unwrap().message, "For group two");
    assert_eq!(store.read_table("Messages").unwrap().len(), 2);
}

#[test]
fn get_absent_target_returns_none() {
    let store = messages_store();
    let registry = MessageRegistry::new(&store, "Messages");

    assert!(registry.get("G9").unwrap().is_none());
    assert!(registry.get("  ").unwrap().is_none());
}

#[test]
fn get_trims_target_before_matching() {
    let store = messages_store();
    let registry = MessageRegistry::new(&store, "Messages");

    registry.upsert(&bulletin("G1", "Hello")).unwrap();
    assert!(registry.get("  G1  ").unwrap().is_some());
}

#[test]
fn duplicate_records_resolve_to_first_row_returned() {
    // Invariant violation (two records for one target): get picks the row
    // the table returns first. Documented limitation, not silently fixed.
    let store = messages_store();
    store
        .append_row(
            "Messages",
            &["G1", "Older", "", "", "", ""].iter().map(|c| (*c).to_string()).collect::<Vec<_>>(),
        )
        .unwrap();
    store
        .append_row(
            "Messages",
            &["G1", "Newer", "", "", "", ""].iter().map(|c| (*c).to_string()).collect::<Vec<_>>(),
        )
        .unwrap();

    let registry = MessageRegistry::new(&store, "Messages");
    assert_eq!(registry.get("G1").unwrap().unwrap().message, "Older");
}

#[test]
fn upsert_rejects_empty_target() {
    let store = messages_store();
    let registry = MessageRegistry::new(&store, "Messages");

    assert!(registry.upsert(&bulletin("  ", "No target")).is_err());
}

#[test]
fn directed_task_treats_nan_as_absent() {
    let mut b = bulletin("G1", "Hello");
    assert!(b.directed_task().is_none());

    b.task = "nan".to_string();
    assert!(b.directed_task().is_none());

    b.task = "Visit the market square".to_string();
    assert_eq!(b.directed_task(), Some("Visit the market square"));
}

//! Tests for the CSV-file table store adapter.

use campaign_board::error::BoardError;
use campaign_board::store::{CsvFileStore, TableStore};
use tempfile::TempDir;

fn values(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| (*c).to_string()).collect()
}

fn fresh_store() -> (TempDir, CsvFileStore) {
    let dir = TempDir::new().unwrap();
    let store = CsvFileStore::new(dir.path());
    store.create_table("Users", &["ID_Usuario", "Nome", "Cargo"]).unwrap();
    (dir, store)
}

#[test]
fn append_then_read_roundtrip_preserves_order() {
    let (_dir, store) = fresh_store();

    store.append_row("Users", &values(&["a@x.com", "Alice", "Supervisor"])).unwrap();
    store.append_row("Users", &values(&["b@x.com", "Beto", "Volunteer"])).unwrap();

    let rows = store.read_table("Users").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["ID_Usuario"], "a@x.com");
    assert_eq!(rows[1]["Nome"], "Beto");
}

#[test]
fn read_trims_cell_whitespace() {
    let (_dir, store) = fresh_store();

    store.append_row("Users", &values(&["  a@x.com  ", " Alice ", "Supervisor"])).unwrap();

    let rows = store.read_table("Users").unwrap();
    assert_eq!(rows[0]["ID_Usuario"], "a@x.com");
    assert_eq!(rows[0]["Nome"], "Alice");
}

#[test]
fn read_missing_table_is_a_fetch_error() {
    let (_dir, store) = fresh_store();

    let result = store.read_table("Nope");
    assert!(matches!(result, Err(BoardError::Fetch { .. })));
}

#[test]
fn append_to_missing_table_is_a_write_error() {
    let (_dir, store) = fresh_store();

    let result = store.append_row("Nope", &values(&["x"]));
    assert!(matches!(result, Err(BoardError::Write { .. })));
}

#[test]
fn find_row_matches_any_cell_and_returns_data_position() {
    let (_dir, store) = fresh_store();

    store.append_row("Users", &values(&["a@x.com", "Alice", "Supervisor"])).unwrap();
    store.append_row("Users", &values(&["b@x.com", "Beto", "Volunteer"])).unwrap();

    assert_eq!(store.find_row("Users", "b@x.com").unwrap(), Some(1));
    assert_eq!(store.find_row("Users", "Alice").unwrap(), Some(0));
    assert_eq!(store.find_row("Users", "nobody").unwrap(), None);
}

#[test]
fn delete_row_removes_exactly_one_row() {
    let (_dir, store) = fresh_store();

    store.append_row("Users", &values(&["a@x.com", "Alice", "Supervisor"])).unwrap();
    store.append_row("Users", &values(&["b@x.com", "Beto", "Volunteer"])).unwrap();

    store.delete_row("Users", 0).unwrap();

    let rows = store.read_table("Users").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["ID_Usuario"], "b@x.com");
}

#[test]
fn delete_out_of_range_is_a_write_error() {
    let (_dir, store) = fresh_store();

    let result = store.delete_row("Users", 5);
    assert!(matches!(result, Err(BoardError::Write { .. })));
}

#[test]
fn create_table_twice_fails() {
    let (_dir, store) = fresh_store();

    let result = store.create_table("Users", &["ID_Usuario"]);
    assert!(matches!(result, Err(BoardError::Write { .. })));
}

#[test]
fn delete_then_append_survives_roundtrip() {
    // The registry's replace pattern: delete the old row, append the new one.
    let (_dir, store) = fresh_store();

    store.append_row("Users", &values(&["a@x.com", "Alice", "Supervisor"])).unwrap();
    let position = store.find_row("Users", "a@x.com").unwrap().unwrap();
    store.delete_row("Users", position).unwrap();
    store.append_row("Users", &values(&["a@x.com", "Alice Prado", "Supervisor"])).unwrap();

    let rows = store.read_table("Users").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Nome"], "Alice Prado");
}

#[test]
fn short_rows_are_padded_with_empty_strings() {
    let (_dir, store) = fresh_store();

    store.append_row("Users", &values(&["a@x.com"])).unwrap();

    let rows = store.read_table("Users").unwrap();
    assert_eq!(rows[0]["ID_Usuario"], "a@x.com");
    assert_eq!(rows[0]["Cargo"], "");
}

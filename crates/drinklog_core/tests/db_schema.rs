use drinklog_core::db::migrations::latest_version;
use drinklog_core::db::{open_db, open_db_in_memory, DbError};
use drinklog_core::{DrinkStore, StoreLocation};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "drinks");
}

#[test]
fn drinks_schema_matches_contract() {
    let conn = open_db_in_memory().unwrap();

    let mut stmt = conn
        .prepare("SELECT name, \"notnull\" FROM pragma_table_info('drinks') ORDER BY cid;")
        .unwrap();
    let columns: Vec<(String, i64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .map(|row| row.unwrap())
        .collect();

    let names: Vec<&str> = columns.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["_id", "type", "millilitres", "datetime"]);

    let millilitres_not_null = columns
        .iter()
        .find(|(name, _)| name == "millilitres")
        .map(|(_, not_null)| *not_null)
        .unwrap();
    assert_eq!(millilitres_not_null, 1, "millilitres must be NOT NULL");
}

#[test]
fn engine_fills_timestamp_when_insert_omits_it() {
    let conn = open_db_in_memory().unwrap();

    conn.execute("INSERT INTO drinks (millilitres) VALUES (300);", [])
        .unwrap();
    let recorded_at: String = conn
        .query_row("SELECT datetime FROM drinks;", [], |row| row.get(0))
        .unwrap();

    assert_eq!(recorded_at.len(), "1970-01-01 00:00:00".len());
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drinklog.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "drinks");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn store_starts_closed_and_open_is_idempotent() {
    let mut store = DrinkStore::in_memory();
    assert!(!store.is_open());
    assert!(store.connection().is_none());

    store.open().unwrap();
    assert!(store.is_open());

    store
        .connection()
        .unwrap()
        .execute("INSERT INTO drinks (millilitres) VALUES (100);", [])
        .unwrap();

    store.open().unwrap();
    let count: i64 = store
        .connection()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM drinks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1, "reopening an open store must keep its connection");
}

#[test]
fn on_disk_store_creates_directory_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("nested").join("data");

    let mut store = DrinkStore::on_disk(&data_dir);
    assert_eq!(
        store.location(),
        &StoreLocation::OnDisk(data_dir.clone()),
        "location is fixed at construction"
    );
    store.open().unwrap();

    let db_path = store.database_path().unwrap();
    assert!(db_path.exists());
    assert!(db_path.ends_with("drinklog.sqlite3"));

    store
        .connection()
        .unwrap()
        .execute("INSERT INTO drinks (millilitres) VALUES (250);", [])
        .unwrap();
    store.close();
    assert!(!store.is_open());

    store.open().unwrap();
    let count: i64 = store
        .connection()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM drinks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

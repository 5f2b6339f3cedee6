use handshakeos::core::capture::CaptureStore;
use handshakeos::core::error::HandshakeError;
use rusqlite::Connection;
use tempfile::TempDir;

fn schema_dump(db_path: &std::path::Path) -> Vec<(String, String)> {
    let conn = Connection::open(db_path).expect("open");
    let mut stmt = conn
        .prepare("SELECT name, COALESCE(sql, '') FROM sqlite_master ORDER BY name")
        .expect("prepare");
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .expect("query");
    rows.collect::<Result<_, _>>().expect("rows")
}

#[test]
fn ensure_schema_is_idempotent() {
    let tmp = TempDir::new().expect("tempdir");
    let db_path = tmp.path().join("schema.db");

    let store = CaptureStore::open(&db_path).expect("open store");
    store.ensure_schema().expect("first setup");
    let first = schema_dump(&db_path);
    store.ensure_schema().expect("second setup");
    let second = schema_dump(&db_path);

    assert_eq!(first, second, "repeat setup must not alter the schema");
    let names: Vec<&str> = first.iter().map(|(name, _)| name.as_str()).collect();
    for table in [
        "intents",
        "observations",
        "hypotheses",
        "tests",
        "outcomes",
        "pattern_seeds",
    ] {
        assert!(names.contains(&table), "missing table {table}");
    }
}

#[test]
fn ensure_schema_preserves_existing_rows() {
    let tmp = TempDir::new().expect("tempdir");
    let db_path = tmp.path().join("schema.db");

    let store = CaptureStore::open(&db_path).expect("open store");
    store.ensure_schema().expect("setup");

    let conn = Connection::open(&db_path).expect("open");
    conn.execute(
        "INSERT INTO intents (goal, constraints, success_signal, confidence)
         VALUES ('g', 'c', 's', 0.5)",
        [],
    )
    .expect("seed row");
    drop(conn);

    store.ensure_schema().expect("re-setup");
    let verify = Connection::open(&db_path).expect("open verify");
    let count: i64 = verify
        .query_row("SELECT COUNT(*) FROM intents", [], |row| row.get(0))
        .expect("count");
    assert_eq!(count, 1, "existing data must survive repeat setup");
}

#[test]
fn newer_store_version_is_refused() {
    let tmp = TempDir::new().expect("tempdir");
    let db_path = tmp.path().join("schema.db");

    let store = CaptureStore::open(&db_path).expect("open store");
    store.ensure_schema().expect("setup");

    let conn = Connection::open(&db_path).expect("open");
    conn.execute(
        "UPDATE meta SET value = '999' WHERE key = 'schema_version'",
        [],
    )
    .expect("bump version");
    drop(conn);

    let err = store.ensure_schema().expect_err("must refuse newer store");
    assert!(
        matches!(err, HandshakeError::DatabaseInitializationError(_)),
        "{err}"
    );
    assert!(err.to_string().contains("newer than supported"), "{err}");
}

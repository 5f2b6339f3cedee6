use handshakeos::core::db;
use handshakeos::core::error::HandshakeError;
use handshakeos::plugins::observations;
use rusqlite::Connection;
use tempfile::TempDir;

fn open_log(tmp: &TempDir) -> Connection {
    let conn = db::db_connect(&tmp.path().join("obs.db")).expect("connect");
    observations::ensure_schema(&conn).expect("schema");
    conn
}

#[test]
fn add_and_list_round_trip() {
    let tmp = TempDir::new().expect("tempdir");
    let conn = open_log(&tmp);

    let entry = observations::add_entry(
        &conn,
        "spike at 14:00",
        Some("latency,deploy"),
        Some("eu-west-1"),
        Some(1_714_000_000),
    )
    .expect("add");
    assert_eq!(entry.timestamp, 1_714_000_000);

    let listed = observations::list_entries(&conn, 20, 0).expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, entry.id);
    assert_eq!(listed[0].content, "spike at 14:00");
    assert_eq!(listed[0].tags.as_deref(), Some("latency,deploy"));
}

#[test]
fn list_orders_newest_first_with_limit_and_offset() {
    let tmp = TempDir::new().expect("tempdir");
    let conn = open_log(&tmp);

    for (content, ts) in [("first", 100), ("second", 200), ("third", 300)] {
        observations::add_entry(&conn, content, None, None, Some(ts)).expect("add");
    }

    let page = observations::list_entries(&conn, 2, 0).expect("list");
    let contents: Vec<&str> = page.iter().map(|entry| entry.content.as_str()).collect();
    assert_eq!(contents, ["third", "second"]);

    let rest = observations::list_entries(&conn, 2, 2).expect("list");
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].content, "first");
}

#[test]
fn add_defaults_timestamp_to_now() {
    let tmp = TempDir::new().expect("tempdir");
    let conn = open_log(&tmp);
    let entry = observations::add_entry(&conn, "note", None, None, None).expect("add");
    assert!(entry.timestamp > 0);
}

#[test]
fn update_changes_only_provided_fields() {
    let tmp = TempDir::new().expect("tempdir");
    let conn = open_log(&tmp);
    let entry =
        observations::add_entry(&conn, "original", Some("a"), None, Some(100)).expect("add");

    observations::update_entry(&conn, entry.id, Some("edited"), None, Some("office"), None)
        .expect("update");

    let listed = observations::list_entries(&conn, 10, 0).expect("list");
    assert_eq!(listed[0].content, "edited");
    assert_eq!(listed[0].tags.as_deref(), Some("a"));
    assert_eq!(listed[0].location.as_deref(), Some("office"));
    assert_eq!(listed[0].timestamp, 100);
}

#[test]
fn update_without_fields_is_a_validation_error() {
    let tmp = TempDir::new().expect("tempdir");
    let conn = open_log(&tmp);
    let entry = observations::add_entry(&conn, "note", None, None, None).expect("add");

    let err = observations::update_entry(&conn, entry.id, None, None, None, None)
        .expect_err("must reject");
    assert!(matches!(err, HandshakeError::ValidationError(_)), "{err}");
}

#[test]
fn update_and_delete_report_missing_ids() {
    let tmp = TempDir::new().expect("tempdir");
    let conn = open_log(&tmp);

    let err = observations::update_entry(&conn, 404, Some("x"), None, None, None)
        .expect_err("must miss");
    assert!(matches!(err, HandshakeError::NotFound(_)), "{err}");

    let err = observations::delete_entry(&conn, 404).expect_err("must miss");
    assert!(matches!(err, HandshakeError::NotFound(_)), "{err}");
}

#[test]
fn delete_removes_the_entry() {
    let tmp = TempDir::new().expect("tempdir");
    let conn = open_log(&tmp);
    let entry = observations::add_entry(&conn, "note", None, None, None).expect("add");

    observations::delete_entry(&conn, entry.id).expect("delete");
    let listed = observations::list_entries(&conn, 10, 0).expect("list");
    assert!(listed.is_empty());
}

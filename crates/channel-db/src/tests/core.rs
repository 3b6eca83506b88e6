use super::test_db;
use crate::schema;

#[test]
fn test_open_and_migrate() {
    let db = test_db();
    assert_eq!(db.get_setting("SERVER_PORT").unwrap(), None);
    assert!(db.get_general(crate::general::GENERAL_VERSION).unwrap().is_none());
}

#[test]
fn test_migrations_are_repeatable() {
    let db = test_db();
    db.with_conn(|conn| schema::run_migrations(conn)).unwrap();
    db.with_conn(|conn| schema::run_migrations(conn)).unwrap();
}

#[test]
fn test_set_setting_overwrites_in_place() {
    let db = test_db();
    db.set_setting("SERVER_PORT", "9000").unwrap();
    assert_eq!(db.get_setting("SERVER_PORT").unwrap(), Some("9000".into()));

    db.set_setting("SERVER_PORT", "9001").unwrap();
    assert_eq!(db.get_setting("SERVER_PORT").unwrap(), Some("9001".into()));

    let rows: i64 = db
        .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?))
        .unwrap();
    assert_eq!(rows, 1);
}

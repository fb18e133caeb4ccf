use chrono::{TimeZone, Utc};
use onboarding_core::db::migrations::latest_version;
use onboarding_core::db::{open_db, open_db_in_memory, DbError};
use onboarding_core::{
    DemoSeeder, EmployeeService, FixedClock, KeyValueStore, NewEmployee, OnboardingRepository,
    SqliteStore, StoreError,
};
use rusqlite::Connection;

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap())
}

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_entries");
}

#[test]
fn roster_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("onboarding.db");
    let clock = clock();

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        DemoSeeder::new(OnboardingRepository::new(&store), &clock)
            .seed()
            .unwrap();
        EmployeeService::new(OnboardingRepository::new(&store), &clock)
            .create_employee(&NewEmployee {
                name: "Dana Lee".to_string(),
                email: "dana.lee@company.com".to_string(),
                department: "Finance".to_string(),
                job_role: "Analyst".to_string(),
                joining_date: "2024-03-01".to_string(),
            })
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let store = SqliteStore::try_new(&conn).unwrap();
    let repo = OnboardingRepository::new(&store);

    let employees = repo.load_employees().unwrap();
    assert_eq!(employees.len(), 6);
    assert_eq!(employees[5].id, "EMP006");
    assert_eq!(repo.load_task_sets().unwrap().len(), 6);
    assert_eq!(repo.load_activity().unwrap().len(), 1);
}

#[test]
fn remove_and_overwrite_entries() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    store.set("onboarding_theme", "\"light\"").unwrap();
    store.set("onboarding_theme", "\"dark\"").unwrap();
    assert_eq!(
        store.get("onboarding_theme").unwrap().as_deref(),
        Some("\"dark\"")
    );

    store.remove("onboarding_theme").unwrap();
    assert_eq!(store.get("onboarding_theme").unwrap(), None);
    store.remove("onboarding_theme").unwrap();
}

#[test]
fn store_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        }) => {
            assert_eq!(expected_version, latest_version());
            assert_eq!(actual_version, 0);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unmigrated connection was accepted"),
    }
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

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

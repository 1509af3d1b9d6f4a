use thesis_database::{Database, DatabaseError};

async fn memory_db() -> Database {
    Database::builder().url("mem://").session("thesis", "test").init().await.expect("in-memory db")
}

#[tokio::test]
async fn init_applies_every_migration_once() {
    let db = memory_db().await;

    let report = db.migrate().await.expect("second run");
    assert!(report.applied.is_empty());
    assert!(!report.skipped.is_empty());

    let count: Option<i64> = db
        .query("SELECT count() AS total FROM migration GROUP ALL")
        .await
        .expect("query")
        .take((0, "total"))
        .expect("take");
    assert_eq!(count, i64::try_from(report.skipped.len()).ok());
}

#[tokio::test]
async fn skipped_migrations_report_everything_on_fresh_db() {
    let db = Database::builder()
        .url("mem://")
        .session("thesis", "fresh")
        .skip_migrations(true)
        .init()
        .await
        .expect("db");

    let report = db.migrate().await.expect("migrate");
    assert!(report.skipped.is_empty());
    assert!(report.applied.iter().any(|m| m.slice == "council"));
    assert_eq!(db.namespace(), "thesis");
    assert_eq!(db.database(), "fresh");
}

#[tokio::test]
async fn unique_uid_index_is_enforced() {
    let db = memory_db().await;
    let insert = "CREATE topic CONTENT { uid: 'abc', is_deleted: false }";

    db.query(insert).await.and_then(surrealdb::Response::check).expect("first insert");
    let duplicate = db.query(insert).await.and_then(surrealdb::Response::check);
    assert!(duplicate.is_err());
}

#[tokio::test]
async fn changed_checksum_is_detected() {
    let db = memory_db().await;
    db.query("UPDATE migration SET checksum = 'tampered' WHERE slice = 'topic'")
        .await
        .and_then(surrealdb::Response::check)
        .expect("tamper");

    let err = db.migrate().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Migration { .. }));
}

#[tokio::test]
async fn missing_session_is_a_validation_error() {
    let err = Database::builder().url("mem://").init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));

    let err = Database::builder().session("a", "b").init().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Validation { .. }));
}

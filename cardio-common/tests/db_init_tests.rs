//! Tests for database initialization
//!
//! Covers automatic database creation, reopening existing databases,
//! schema setup, and the in-memory URL form used by service tests.

use cardio_common::db::init_database;
use std::path::PathBuf;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let test_db = format!("/tmp/cardio-test-db-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);

    // Ensure database doesn't exist
    let _ = std::fs::remove_file(&db_path);

    let result = init_database(&format!("sqlite://{}?mode=rwc", test_db)).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());

    // Verify database file was created
    assert!(db_path.exists(), "Database file was not created");

    // Cleanup
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_database_opens_existing() {
    let test_db = format!("/tmp/cardio-test-db-existing-{}.db", std::process::id());
    let db_path = PathBuf::from(&test_db);
    let db_url = format!("sqlite://{}?mode=rwc", test_db);

    // Ensure database doesn't exist
    let _ = std::fs::remove_file(&db_path);

    // Create database first time
    let pool1 = init_database(&db_url).await;
    assert!(pool1.is_ok());

    // Open database second time (should succeed)
    let pool2 = init_database(&db_url).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());

    // Cleanup
    drop(pool1);
    drop(pool2);
    let _ = std::fs::remove_file(&db_path);
}

#[tokio::test]
async fn test_predictions_table_created() {
    let pool = init_database("sqlite::memory:").await.unwrap();

    let table: Option<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'predictions'",
    )
    .fetch_optional(&pool)
    .await
    .unwrap();

    assert!(table.is_some(), "predictions table not created");

    // Schema accepts a full record and a NULL true_class
    sqlx::query(
        "INSERT INTO predictions (observation_id, observation, proba) VALUES (?, ?, ?)",
    )
    .bind(42i64)
    .bind(r#"{"age": 50}"#)
    .bind(0.25f64)
    .execute(&pool)
    .await
    .unwrap();

    let (observation_id, proba, true_class): (i64, f64, Option<i64>) = sqlx::query_as(
        "SELECT observation_id, proba, true_class FROM predictions WHERE observation_id = 42",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(observation_id, 42);
    assert_eq!(proba, 0.25);
    assert_eq!(true_class, None);
}

#[tokio::test]
async fn test_reinitialization_preserves_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("predictions.db").display()
    );

    let pool1 = init_database(&db_url).await.unwrap();
    sqlx::query("INSERT INTO predictions (observation_id, observation, proba) VALUES (1, '{}', 0.5)")
        .execute(&pool1)
        .await
        .unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_url).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM predictions")
        .fetch_one(&pool2)
        .await
        .unwrap();

    assert_eq!(count, 1, "Reinitialization dropped existing rows");
}

#[tokio::test]
async fn test_parent_directory_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("nested").join("deeper").join("predictions.db");
    let db_url = format!("sqlite://{}?mode=rwc", nested.display());

    let result = init_database(&db_url).await;

    assert!(result.is_ok(), "Initialization failed: {:?}", result.err());
    assert!(nested.exists(), "Database file not created in nested directory");
}

#[tokio::test]
async fn test_unique_observation_id_enforced() {
    let pool = init_database("sqlite::memory:").await.unwrap();

    sqlx::query("INSERT INTO predictions (observation_id, observation, proba) VALUES (7, '{}', 0.5)")
        .execute(&pool)
        .await
        .unwrap();

    let duplicate = sqlx::query(
        "INSERT INTO predictions (observation_id, observation, proba) VALUES (7, '{}', 0.9)",
    )
    .execute(&pool)
    .await;

    match duplicate {
        Err(sqlx::Error::Database(e)) => assert!(e.is_unique_violation()),
        other => panic!("Expected unique violation, got {:?}", other),
    }
}

//! Integration tests for PgCatalog.
//! Run with: DATABASE_URL=... cargo test -p catalog-import-storage -- --ignored pg_

#![allow(clippy::unwrap_used, reason = "integration test code")]

use catalog_import_core::{NewProgram, ProgramKey, ProgramRecord};
use catalog_import_storage::{CatalogStore, CatalogTx, PgCatalog, StorageError};
use uuid::Uuid;

const SCHEMA: &str = include_str!("fixtures/schema.sql");

async fn create_pg_catalog() -> PgCatalog {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgCatalog integration tests");
    let catalog = PgCatalog::connect(&url).await.expect("Failed to connect to PostgreSQL");
    // Tests run concurrently; serialize the CREATE IF NOT EXISTS statements.
    let ddl = format!("SELECT pg_advisory_lock(72201);\n{SCHEMA}\nSELECT pg_advisory_unlock(72201);");
    sqlx::raw_sql(&ddl).execute(catalog.pool()).await.expect("Failed to create schema");
    catalog
}

fn unique_name(prefix: &str) -> String {
    format!("{prefix} {}", Uuid::new_v4())
}

#[tokio::test]
#[ignore]
async fn pg_university_insert_and_find() {
    let catalog = create_pg_catalog().await;
    let name = unique_name("Acme U");

    let mut tx = catalog.begin().await.unwrap();
    assert_eq!(tx.find_university(&name).await.unwrap(), None);
    let id = tx.insert_university(&name).await.unwrap();
    assert_eq!(tx.find_university(&name).await.unwrap(), Some(id));
    tx.commit().await.unwrap();

    let mut tx = catalog.begin().await.unwrap();
    assert_eq!(tx.find_university(&name).await.unwrap(), Some(id));
    assert_eq!(tx.find_university(&name.to_lowercase()).await.unwrap(), None);
    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_duplicate_university_maps_to_duplicate_and_poisons() {
    let catalog = create_pg_catalog().await;
    let name = unique_name("Dup U");

    let mut tx = catalog.begin().await.unwrap();
    tx.insert_university(&name).await.unwrap();
    let err = tx.insert_university(&name).await.unwrap_err();
    assert!(err.is_duplicate(), "expected duplicate, got {err:?}");

    let err = tx.find_university(&name).await.unwrap_err();
    assert!(matches!(err, StorageError::TransactionAborted(_)), "got {err:?}");
    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_savepoint_recovers_from_failed_statement() {
    let catalog = create_pg_catalog().await;
    let kept = unique_name("Kept U");
    let dropped = unique_name("Dropped U");

    let mut tx = catalog.begin().await.unwrap();
    tx.insert_university(&kept).await.unwrap();

    tx.savepoint().await.unwrap();
    tx.insert_university(&dropped).await.unwrap();
    assert!(tx.insert_university(&kept).await.is_err());
    tx.rollback_to_savepoint().await.unwrap();

    assert!(tx.find_university(&kept).await.unwrap().is_some());
    assert_eq!(tx.find_university(&dropped).await.unwrap(), None);
    tx.commit().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_program_insert_and_find_by_key() {
    let catalog = create_pg_catalog().await;
    let uni_name = unique_name("Program U");

    let mut tx = catalog.begin().await.unwrap();
    let uni = tx.insert_university(&uni_name).await.unwrap();
    let record = ProgramRecord::new(uni_name.as_str(), "MS CS").with_degree_type("masters");
    let id = tx.insert_program(&NewProgram::from_record(uni, "MS CS", &record)).await.unwrap();

    let hit = ProgramKey::new(uni, "MS CS", "masters");
    let miss = ProgramKey::new(uni, "MS CS", "unknown");
    assert_eq!(tx.find_program(&hit).await.unwrap(), Some(id));
    assert_eq!(tx.find_program(&miss).await.unwrap(), None);

    tx.commit().await.unwrap();

    let (degree_type, country, city, status, visibility): (String, String, String, String, String) =
        sqlx::query_as(
            "SELECT degree_type, country, city, status, visibility FROM programs WHERE id = $1",
        )
        .bind(id.0)
        .fetch_one(catalog.pool())
        .await
        .unwrap();
    assert_eq!(degree_type, "masters");
    assert_eq!(country, "United States");
    assert_eq!(city, "");
    assert_eq!(status, "active");
    assert_eq!(visibility, "pending");
}

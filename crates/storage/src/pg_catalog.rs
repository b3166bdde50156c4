//! PostgreSQL catalog backend using sqlx.

use std::time::Duration;

use async_trait::async_trait;
use catalog_import_core::env_config::env_parse_with_default;
use catalog_import_core::{
    NewProgram, ProgramId, ProgramKey, UniversityId, CONNECT_TIMEOUT_VAR,
    PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::StorageError;
use crate::traits::{CatalogStore, CatalogTx};

const RECORD_SAVEPOINT: &str = "catalog_record";

#[derive(Clone, Debug)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    /// Connect with a single-connection pool.
    ///
    /// Fails immediately when the server is unreachable or rejects the credentials.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let acquire_timeout =
            env_parse_with_default(CONNECT_TIMEOUT_VAR, PG_POOL_ACQUIRE_TIMEOUT_SECS);
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(acquire_timeout))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        tracing::info!("Connected to database successfully");
        Ok(Self { pool })
    }

    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }
}

#[async_trait]
impl CatalogStore for PgCatalog {
    type Tx = PgCatalogTx;

    async fn begin(&self) -> Result<PgCatalogTx, StorageError> {
        Ok(PgCatalogTx { tx: self.pool.begin().await? })
    }
}

/// An open PostgreSQL transaction. Dropping it without commit rolls back.
pub struct PgCatalogTx {
    tx: Transaction<'static, Postgres>,
}

impl PgCatalogTx {
    async fn execute(&mut self, sql: &str) -> Result<(), StorageError> {
        sqlx::query(sql).execute(&mut *self.tx).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogTx for PgCatalogTx {
    async fn find_university(
        &mut self,
        name: &str,
    ) -> Result<Option<UniversityId>, StorageError> {
        let id: Option<i32> = sqlx::query_scalar("SELECT id FROM universities WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(id.map(UniversityId))
    }

    async fn insert_university(&mut self, name: &str) -> Result<UniversityId, StorageError> {
        let id: i32 =
            sqlx::query_scalar("INSERT INTO universities (name) VALUES ($1) RETURNING id")
                .bind(name)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(UniversityId(id))
    }

    async fn find_program(
        &mut self,
        key: &ProgramKey<'_>,
    ) -> Result<Option<ProgramId>, StorageError> {
        let id: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM programs
             WHERE university_id = $1 AND name = $2 AND degree_type = $3",
        )
        .bind(key.university_id.0)
        .bind(key.name)
        .bind(key.degree_type)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(id.map(ProgramId))
    }

    async fn insert_program(&mut self, program: &NewProgram) -> Result<ProgramId, StorageError> {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO programs
                (university_id, name, description, degree_type, country, city,
                 state, url, status, visibility)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id",
        )
        .bind(program.university_id.0)
        .bind(&program.name)
        .bind(&program.description)
        .bind(&program.degree_type)
        .bind(&program.country)
        .bind(&program.city)
        .bind(&program.state)
        .bind(&program.url)
        .bind(&program.status)
        .bind(&program.visibility)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(ProgramId(id))
    }

    async fn savepoint(&mut self) -> Result<(), StorageError> {
        self.execute(&format!("SAVEPOINT {RECORD_SAVEPOINT}")).await
    }

    async fn release_savepoint(&mut self) -> Result<(), StorageError> {
        self.execute(&format!("RELEASE SAVEPOINT {RECORD_SAVEPOINT}")).await
    }

    async fn rollback_to_savepoint(&mut self) -> Result<(), StorageError> {
        // ROLLBACK TO keeps the savepoint alive; release it so the next record starts clean.
        self.execute(&format!("ROLLBACK TO SAVEPOINT {RECORD_SAVEPOINT}")).await?;
        self.execute(&format!("RELEASE SAVEPOINT {RECORD_SAVEPOINT}")).await
    }

    async fn commit(self) -> Result<(), StorageError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StorageError> {
        self.tx.rollback().await?;
        Ok(())
    }
}

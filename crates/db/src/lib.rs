//! Persistence layer for the project catalog.
//!
//! Two interchangeable backends sit behind [`backend::CatalogBackend`]:
//! the remote document collection (PostgreSQL, soft-delete flag,
//! partial-field merge writes) and the local persisted substitute (a single
//! serialized JSON blob at a well-known path), selected once at startup.

pub mod backend;
pub mod local;
pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

/// Database connection pool type used across the workspace.
pub type DbPool = sqlx::PgPool;

/// Create a connection pool against the given database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from the bundled `migrations/` directory.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

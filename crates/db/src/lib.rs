//! Persistence layer for the storefront.
//!
//! - [`client`]: the [`TableClient`](client::TableClient) boundary and its
//!   REST, Postgres and in-memory implementations.
//! - [`local`] / [`local_submissions`]: browser-style key/value storage used
//!   by the public submission flow.
//! - [`mapping`]: the single translation point between UI and storage field
//!   names.
//! - [`repositories`]: per-entity data-access functions.

use sqlx::postgres::PgPoolOptions;

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod local;
pub mod local_submissions;
pub mod mapping;
pub mod repositories;

pub use error::StoreError;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the pool is usable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded `templates` / `custom_solutions` schema.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

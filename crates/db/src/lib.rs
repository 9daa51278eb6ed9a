//! Audit-logged persistence layer for the todo service.
//!
//! [`SqlQuerier`] implements every capability trait in [`managers`] against
//! SQLite. [`TracedDataManager`] wraps any implementation with tracing spans.

pub mod audit;
pub mod clock;
pub mod config;
pub mod connection;
pub mod error;
pub mod managers;
pub mod models;
pub mod querier;
pub mod querybuilding;
pub mod traced;

use sqlx::sqlite::SqlitePoolOptions;

pub use config::DbConfig;
pub use error::{DbError, DbResult};
pub use managers::DataManager;
pub use querier::SqlQuerier;
pub use traced::TracedDataManager;

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool from the database configuration.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
}

/// Verify the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

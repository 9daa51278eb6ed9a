//! Shared fixtures for the persistence integration tests.
//!
//! Every test gets its own in-memory SQLite database. The pool is capped at a
//! single connection because each `sqlite::memory:` connection is a separate
//! database.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::DateTime;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use todo_core::types::{DbId, Timestamp};
use todo_db::clock::FixedClock;
use todo_db::config::DEFAULT_BATCH_SIZE;
use todo_db::managers::UserDataManager;
use todo_db::models::item::ItemCreationInput;
use todo_db::models::user::{User, UserCreationInput};
use todo_db::querybuilding::SqliteQueryBuilder;
use todo_db::SqlQuerier;

const SCHEMA: &str = include_str!("schema.sql");

/// Timestamp every fixture querier stamps on created rows.
pub const FIXED_NOW_SECS: i64 = 1_700_000_000;

pub fn fixed_now() -> Timestamp {
    DateTime::from_timestamp(FIXED_NOW_SECS, 0).unwrap()
}

/// A fresh in-memory database with the full schema applied.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open");

    for statement in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .expect("schema statement should apply");
    }
    pool
}

/// A querier over `pool` with a fixed clock.
pub fn querier_for(pool: &SqlitePool) -> SqlQuerier {
    SqlQuerier::with_parts(
        Arc::new(pool.clone()),
        Arc::new(SqliteQueryBuilder),
        Arc::new(FixedClock(fixed_now())),
        DEFAULT_BATCH_SIZE,
    )
}

pub async fn test_querier() -> (SqlitePool, SqlQuerier) {
    let pool = test_pool().await;
    let querier = querier_for(&pool);
    (pool, querier)
}

/// Install a fmt subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn new_user(username: &str) -> UserCreationInput {
    UserCreationInput {
        username: username.to_string(),
        hashed_password: format!("hashed-{username}"),
        salt: vec![1, 2, 3, 4],
        two_factor_secret: format!("TOTP-{username}"),
    }
}

/// Create a user and verify their two-factor secret.
pub async fn create_verified_user(querier: &SqlQuerier, username: &str) -> User {
    let user = querier
        .create_user(&new_user(username))
        .await
        .expect("user should be created");
    querier
        .verify_user_two_factor_secret(user.id)
        .await
        .expect("user should verify");
    querier
        .get_user(user.id)
        .await
        .expect("verified user should load")
}

pub fn new_item(owner: DbId, name: &str) -> ItemCreationInput {
    ItemCreationInput {
        name: name.to_string(),
        details: format!("details for {name}"),
        belongs_to_user: owner,
    }
}

/// Number of audit rows with the given event type.
pub async fn count_events(pool: &SqlitePool, event_type: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM audit_log WHERE event_type = ?")
        .bind(event_type)
        .fetch_one(pool)
        .await
        .expect("audit count should run")
}

/// Stamp `archived_on` directly, bypassing the managers and their audit trail.
pub async fn archive_row(pool: &SqlitePool, table: &str, id: DbId) {
    sqlx::query(&format!(
        "UPDATE {table} SET archived_on = {FIXED_NOW_SECS} WHERE id = ?"
    ))
    .bind(id)
    .execute(pool)
    .await
    .expect("archive should apply");
}

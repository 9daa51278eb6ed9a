//! Integration tests for the audit log: authentication events, redaction,
//! listing, and best-effort appends that never fail the mutation.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::json;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;
use todo_core::audit::{event_types, keys};
use todo_db::clock::FixedClock;
use todo_db::connection::{Connection, Query, WriteResult};
use todo_db::error::DbError;
use todo_db::managers::{AuditLogEntryDataManager, ItemDataManager, UserDataManager};
use todo_db::models::filter::{QueryFilter, SortBy};
use todo_db::models::FieldChangeSummary;
use todo_db::querybuilding::SqliteQueryBuilder;
use todo_db::SqlQuerier;

use common::{count_events, create_verified_user, fixed_now, new_item, test_pool, test_querier};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Passes everything through except inserts into `audit_log`, which fail.
struct FailingAuditConnection {
    pool: SqlitePool,
}

#[async_trait]
impl Connection for FailingAuditConnection {
    async fn fetch_optional(&self, query: &Query) -> Result<Option<SqliteRow>, sqlx::Error> {
        Connection::fetch_optional(&self.pool, query).await
    }

    fn fetch<'a>(&'a self, query: &'a Query) -> BoxStream<'a, Result<SqliteRow, sqlx::Error>> {
        Connection::fetch(&self.pool, query)
    }

    async fn execute(&self, query: &Query) -> Result<WriteResult, sqlx::Error> {
        if query.sql.starts_with("INSERT INTO audit_log") {
            return Err(sqlx::Error::Protocol("audit log unavailable".into()));
        }
        Connection::execute(&self.pool, query).await
    }
}

// ---------------------------------------------------------------------------
// Best-effort appends
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_audit_append_does_not_fail_mutation() {
    let pool = test_pool().await;
    let healthy = common::querier_for(&pool);
    let owner = create_verified_user(&healthy, "alice").await;

    let failing = SqlQuerier::with_parts(
        Arc::new(FailingAuditConnection { pool: pool.clone() }),
        Arc::new(SqliteQueryBuilder),
        Arc::new(FixedClock(fixed_now())),
        100,
    );

    let item = failing
        .create_item(&new_item(owner.id, "groceries"))
        .await
        .unwrap();
    failing.archive_item(item.id, owner.id).await.unwrap();

    assert_eq!(count_events(&pool, event_types::ITEM_CREATED).await, 0);
    assert_eq!(count_events(&pool, event_types::ITEM_ARCHIVED).await, 0);
    assert!(!healthy.item_exists(item.id, owner.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Authentication events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn auth_events_are_recorded_against_the_user() {
    let (_pool, querier) = test_querier().await;
    let user = create_verified_user(&querier, "alice").await;

    querier.log_successful_login_event(user.id).await;
    querier.log_unsuccessful_login_bad_password_event(user.id).await;
    querier
        .log_unsuccessful_login_bad_two_factor_token_event(user.id)
        .await;
    querier.log_banned_user_login_attempt_event(user.id).await;
    querier.log_cycle_cookie_secret_event(user.id).await;
    querier.log_logout_event(user.id).await;

    let entries = querier.get_audit_log_entries_for_user(user.id).await.unwrap();
    let events: Vec<_> = entries.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        events,
        vec![
            event_types::USER_CREATED,
            event_types::USER_TWO_FACTOR_SECRET_VERIFIED,
            event_types::SUCCESSFUL_LOGIN,
            event_types::UNSUCCESSFUL_LOGIN_BAD_PASSWORD,
            event_types::UNSUCCESSFUL_LOGIN_BAD_TWO_FACTOR_TOKEN,
            event_types::BANNED_USER_LOGIN_ATTEMPT,
            event_types::CYCLE_COOKIE_SECRET,
            event_types::LOGOUT,
        ]
    );
    assert!(entries
        .iter()
        .all(|e| e.context_id(keys::USER) == Some(user.id)));
}

// ---------------------------------------------------------------------------
// Redaction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sensitive_changes_are_redacted() {
    let (_pool, querier) = test_querier().await;
    let user = create_verified_user(&querier, "alice").await;

    let changes = vec![
        FieldChangeSummary {
            field_name: "two_factor_secret".into(),
            old_value: json!("OLDSECRET"),
            new_value: json!("NEWSECRET"),
        },
        FieldChangeSummary {
            field_name: "username".into(),
            old_value: json!("alice"),
            new_value: json!("alicia"),
        },
    ];
    querier.log_user_update_event(user.id, &changes).await;

    let entries = querier.get_audit_log_entries_for_user(user.id).await.unwrap();
    let update = entries
        .iter()
        .find(|e| e.event_type == event_types::USER_UPDATED)
        .unwrap();
    let recorded = &update.context["changes"];
    assert_eq!(recorded[0]["field_name"], "two_factor_secret");
    assert_eq!(recorded[0]["new_value"], "[REDACTED]");
    assert_eq!(recorded[1]["new_value"], "alicia");
    assert!(!update.context.to_string().contains("NEWSECRET"));
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn entries_can_be_fetched_listed_and_counted() {
    let (_pool, querier) = test_querier().await;
    let user = create_verified_user(&querier, "alice").await;
    querier.log_logout_event(user.id).await;

    let total = querier.get_all_audit_log_entries_count().await.unwrap();
    assert_eq!(total, 3);

    let filter = QueryFilter {
        sort_by: SortBy::Desc,
        limit: 1,
        ..QueryFilter::default()
    };
    let page = querier.get_audit_log_entries(Some(&filter)).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].event_type, event_types::LOGOUT);
    assert_eq!(page.pagination.total_count, 3);

    let entry = querier.get_audit_log_entry(page.data[0].id).await.unwrap();
    assert_eq!(entry, page.data[0]);
    assert_eq!(entry.created_on, fixed_now());
}

#[tokio::test]
async fn missing_entry_is_not_found() {
    let (_pool, querier) = test_querier().await;
    assert_matches!(
        querier.get_audit_log_entry(12345).await,
        Err(DbError::NotFound { .. })
    );
}

#[tokio::test]
async fn malformed_context_is_a_scan_error() {
    let (pool, querier) = test_querier().await;
    let id = sqlx::query("INSERT INTO audit_log (event_type, context, created_on) VALUES (?, ?, ?)")
        .bind("user_logged_in")
        .bind("{not json")
        .bind(common::FIXED_NOW_SECS)
        .execute(&pool)
        .await
        .unwrap()
        .last_insert_rowid();

    assert_matches!(
        querier.get_audit_log_entry(id).await,
        Err(DbError::Scan { .. })
    );
}

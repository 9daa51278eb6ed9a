//! Tests for the tracing decorator.
//!
//! `#[traced_test]` installs its own subscriber, so nothing here may call
//! `common::init_tracing`.

mod common;

use tracing_test::traced_test;
use todo_db::managers::{AuditLogEntryDataManager, DataManager, ItemDataManager, UserDataManager};
use todo_db::TracedDataManager;

use common::{new_item, new_user, test_querier};

async fn traced_manager() -> (sqlx::SqlitePool, impl DataManager) {
    let (pool, querier) = test_querier().await;
    (pool, TracedDataManager::new(querier))
}

#[tokio::test]
#[traced_test]
async fn calls_are_logged_and_delegated() {
    let (_pool, manager) = traced_manager().await;

    let user = manager.create_user(&new_user("alice")).await.unwrap();
    manager.verify_user_two_factor_secret(user.id).await.unwrap();
    let item = manager
        .create_item(&new_item(user.id, "groceries"))
        .await
        .unwrap();
    let fetched = manager.get_item(item.id, user.id).await.unwrap();

    assert_eq!(fetched, item);
    assert!(logs_contain("create_user called"));
    assert!(logs_contain("verify_user_two_factor_secret called"));
    assert!(logs_contain("create_item called"));
    assert!(logs_contain("get_item called"));
    assert!(logs_contain(&format!("item_id={}", item.id)));
}

#[tokio::test]
#[traced_test]
async fn errors_pass_through_unchanged() {
    let (_pool, manager) = traced_manager().await;

    let err = manager.get_item(41, 1).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(logs_contain("get_item called"));
}

#[tokio::test]
#[traced_test]
async fn credentials_stay_out_of_spans() {
    let (_pool, manager) = traced_manager().await;

    let user = manager.create_user(&new_user("alice")).await.unwrap();
    manager
        .update_user_password(user.id, "very-private-hash")
        .await
        .unwrap();
    manager
        .update_user_two_factor_secret(user.id, "VERYPRIVATETOTP")
        .await
        .unwrap();
    manager.log_logout_event(user.id).await;

    assert!(logs_contain("update_user_password called"));
    assert!(logs_contain("log_logout_event called"));
    assert!(!logs_contain("very-private-hash"));
    assert!(!logs_contain("VERYPRIVATETOTP"));
    assert!(!logs_contain("hashed-alice"));
}

//! Integration tests for user persistence.
//!
//! Covers the two-factor verification gate on lookups, credential updates,
//! account status changes and the audit trail they leave.

mod common;

use assert_matches::assert_matches;
use todo_core::audit::{event_types, keys};
use todo_core::error::ErrorKind;
use todo_db::error::DbError;
use todo_db::managers::UserDataManager;
use todo_db::models::user::{UserAccountStatus, UserAccountStatusUpdateInput, UserUpdateInput};

use common::{count_events, create_verified_user, fixed_now, new_user, test_querier};

// ---------------------------------------------------------------------------
// Creation and verification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_users_start_unverified() {
    let (_pool, querier) = test_querier().await;

    let user = querier.create_user(&new_user("alice")).await.unwrap();
    assert_eq!(user.account_status, UserAccountStatus::Unverified);
    assert_eq!(user.created_on, fixed_now());
    assert!(user.two_factor_secret_verified_on.is_none());

    assert_matches!(
        querier.get_user(user.id).await,
        Err(DbError::NotFound { .. })
    );
    let unverified = querier
        .get_user_with_unverified_two_factor_secret(user.id)
        .await
        .unwrap();
    assert_eq!(unverified, user);
    assert_eq!(unverified.salt, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn verification_moves_user_to_good_standing() {
    let (pool, querier) = test_querier().await;
    let user = querier.create_user(&new_user("alice")).await.unwrap();

    querier.verify_user_two_factor_secret(user.id).await.unwrap();

    let verified = querier.get_user(user.id).await.unwrap();
    assert!(verified.two_factor_secret_verified_on.is_some());
    assert_eq!(verified.account_status, UserAccountStatus::GoodStanding);
    assert_matches!(
        querier
            .get_user_with_unverified_two_factor_secret(user.id)
            .await,
        Err(DbError::NotFound { .. })
    );
    assert_eq!(
        count_events(&pool, event_types::USER_TWO_FACTOR_SECRET_VERIFIED).await,
        1
    );
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let (pool, querier) = test_querier().await;
    querier.create_user(&new_user("alice")).await.unwrap();

    let err = querier.create_user(&new_user("alice")).await.unwrap_err();
    assert_matches!(err, DbError::Conflict { .. });
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(count_events(&pool, event_types::USER_CREATED).await, 1);
}

#[tokio::test]
async fn creation_audit_omits_credentials() {
    let (_pool, querier) = test_querier().await;
    let user = querier.create_user(&new_user("alice")).await.unwrap();

    let entries = querier.get_audit_log_entries_for_user(user.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    let created = &entries[0].context["created"];
    assert_eq!(created["username"], "alice");
    assert!(created.get("hashed_password").is_none());
    assert!(created.get("two_factor_secret").is_none());
    assert!(created.get("salt").is_none());
    assert!(!entries[0].context.to_string().contains("hashed-alice"));
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_by_username_finds_live_users() {
    let (_pool, querier) = test_querier().await;
    let user = create_verified_user(&querier, "alice").await;

    let found = querier.get_user_by_username("alice").await.unwrap();
    assert_eq!(found.id, user.id);
    assert_matches!(
        querier.get_user_by_username("nobody").await,
        Err(DbError::NotFound { .. })
    );

    querier.archive_user(user.id).await.unwrap();
    assert_matches!(
        querier.get_user_by_username("alice").await,
        Err(DbError::NotFound { .. })
    );
}

#[tokio::test]
async fn search_matches_prefix_of_verified_users() {
    let (_pool, querier) = test_querier().await;
    create_verified_user(&querier, "alice").await;
    create_verified_user(&querier, "alicia").await;
    create_verified_user(&querier, "bob").await;
    querier.create_user(&new_user("alina")).await.unwrap();

    let found = querier.search_for_users_by_username("ali").await.unwrap();
    let names: Vec<_> = found.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "alicia"]);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
    let (_pool, querier) = test_querier().await;
    create_verified_user(&querier, "a_b").await;
    create_verified_user(&querier, "axb").await;

    let found = querier.search_for_users_by_username("a_").await.unwrap();
    let names: Vec<_> = found.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["a_b"]);
}

#[tokio::test]
async fn users_list_and_count() {
    let (_pool, querier) = test_querier().await;
    create_verified_user(&querier, "alice").await;
    let bob = create_verified_user(&querier, "bob").await;
    querier.archive_user(bob.id).await.unwrap();

    assert_eq!(querier.get_all_users_count().await.unwrap(), 1);
    assert_eq!(querier.get_users(None).await.unwrap().data.len(), 1);
    assert_eq!(querier.get_users_for_admin(None).await.unwrap().data.len(), 1);
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_persists_profile_fields() {
    let (pool, querier) = test_querier().await;
    let mut user = create_verified_user(&querier, "alice").await;

    let changes = user.update(&UserUpdateInput {
        avatar_src: Some(Some("https://example.com/a.png".into())),
        is_site_admin: Some(true),
        ..UserUpdateInput::default()
    });
    assert_eq!(changes.len(), 2);
    querier.update_user(&user, &changes).await.unwrap();

    let fetched = querier.get_user(user.id).await.unwrap();
    assert_eq!(fetched.avatar_src.as_deref(), Some("https://example.com/a.png"));
    assert!(fetched.is_site_admin);
    assert_eq!(count_events(&pool, event_types::USER_UPDATED).await, 1);
}

#[tokio::test]
async fn password_update_stamps_change_time() {
    let (pool, querier) = test_querier().await;
    let user = create_verified_user(&querier, "alice").await;

    querier
        .update_user_password(user.id, "new-hash")
        .await
        .unwrap();

    let fetched = querier.get_user(user.id).await.unwrap();
    assert_eq!(fetched.hashed_password, "new-hash");
    assert!(!fetched.requires_password_change);
    assert!(fetched.password_last_changed_on.is_some());
    assert_eq!(count_events(&pool, event_types::USER_PASSWORD_UPDATED).await, 1);
}

#[tokio::test]
async fn new_two_factor_secret_requires_reverification() {
    let (_pool, querier) = test_querier().await;
    let user = create_verified_user(&querier, "alice").await;

    querier
        .update_user_two_factor_secret(user.id, "NEWSECRET")
        .await
        .unwrap();

    assert_matches!(
        querier.get_user(user.id).await,
        Err(DbError::NotFound { .. })
    );
    let unverified = querier
        .get_user_with_unverified_two_factor_secret(user.id)
        .await
        .unwrap();
    assert_eq!(unverified.two_factor_secret, "NEWSECRET");
}

#[tokio::test]
async fn credential_updates_on_missing_user_are_not_found() {
    let (_pool, querier) = test_querier().await;

    assert_matches!(
        querier.update_user_password(404, "x").await,
        Err(DbError::NotFound { .. })
    );
    assert_matches!(
        querier.verify_user_two_factor_secret(404).await,
        Err(DbError::NotFound { .. })
    );
}

// ---------------------------------------------------------------------------
// Account status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn banning_records_reason_and_actor() {
    let (_pool, querier) = test_querier().await;
    let admin = create_verified_user(&querier, "admin").await;
    let target = create_verified_user(&querier, "mallory").await;

    querier
        .set_user_account_status(
            admin.id,
            &UserAccountStatusUpdateInput {
                target_user_id: target.id,
                new_status: UserAccountStatus::Banned,
                reason: "spam".into(),
            },
        )
        .await
        .unwrap();

    let fetched = querier.get_user(target.id).await.unwrap();
    assert!(fetched.is_banned());
    assert_eq!(fetched.account_status_explanation, "spam");
    assert!(querier
        .user_has_status(target.id, &[UserAccountStatus::Banned, UserAccountStatus::Terminated])
        .await
        .unwrap());
    assert!(!querier
        .user_has_status(target.id, &[UserAccountStatus::GoodStanding])
        .await
        .unwrap());

    let entries = querier.get_audit_log_entries_for_user(target.id).await.unwrap();
    let ban = entries
        .iter()
        .find(|e| e.event_type == event_types::USER_BANNED)
        .unwrap();
    assert_eq!(ban.context_id(keys::ACTOR), Some(admin.id));
    assert_eq!(ban.context["reason"], "spam");

    let by_admin = querier.get_audit_log_entries_for_user(admin.id).await.unwrap();
    assert!(by_admin
        .iter()
        .any(|e| e.event_type == event_types::USER_BANNED));
}

#[tokio::test]
async fn status_check_of_unknown_user_is_false() {
    let (_pool, querier) = test_querier().await;
    assert!(!querier
        .user_has_status(404, &[UserAccountStatus::GoodStanding])
        .await
        .unwrap());
}

#[tokio::test]
async fn archive_user_hides_them() {
    let (pool, querier) = test_querier().await;
    let user = create_verified_user(&querier, "alice").await;

    querier.archive_user(user.id).await.unwrap();
    assert_matches!(
        querier.get_user(user.id).await,
        Err(DbError::NotFound { .. })
    );
    assert_matches!(
        querier.archive_user(user.id).await,
        Err(DbError::NotFound { .. })
    );
    assert_eq!(count_events(&pool, event_types::USER_ARCHIVED).await, 1);
}

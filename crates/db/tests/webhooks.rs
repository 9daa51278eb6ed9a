//! Integration tests for webhook persistence, including list-valued columns.

mod common;

use assert_matches::assert_matches;
use todo_core::audit::{event_types, keys};
use todo_core::types::DbId;
use todo_db::error::DbError;
use todo_db::managers::WebhookDataManager;
use todo_db::models::webhook::{WebhookCreationInput, WebhookUpdateInput};

use common::{count_events, create_verified_user, test_querier};

fn new_webhook(owner: DbId, name: &str) -> WebhookCreationInput {
    WebhookCreationInput {
        name: name.to_string(),
        content_type: "application/json".to_string(),
        url: "https://example.com/hook".to_string(),
        method: "POST".to_string(),
        events: vec!["item_created".to_string(), "item_archived".to_string()],
        data_types: vec!["item".to_string()],
        topics: vec![],
        belongs_to_user: owner,
    }
}

#[tokio::test]
async fn list_columns_round_trip() {
    let (_pool, querier) = test_querier().await;
    let owner = create_verified_user(&querier, "alice").await;

    let created = querier
        .create_webhook(&new_webhook(owner.id, "notify"))
        .await
        .unwrap();
    let fetched = querier.get_webhook(created.id, owner.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.events, vec!["item_created", "item_archived"]);
    assert_eq!(fetched.data_types, vec!["item"]);
    assert!(fetched.topics.is_empty());
}

#[tokio::test]
async fn update_rewrites_lists_and_audits() {
    let (pool, querier) = test_querier().await;
    let owner = create_verified_user(&querier, "alice").await;
    let mut webhook = querier
        .create_webhook(&new_webhook(owner.id, "notify"))
        .await
        .unwrap();

    let changes = webhook.update(&WebhookUpdateInput {
        topics: Some(vec!["billing".to_string()]),
        url: Some("https://example.com/v2".to_string()),
        ..WebhookUpdateInput::default()
    });
    assert_eq!(changes.len(), 2);
    querier
        .update_webhook(&webhook, owner.id, &changes)
        .await
        .unwrap();

    let fetched = querier.get_webhook(webhook.id, owner.id).await.unwrap();
    assert_eq!(fetched.topics, vec!["billing"]);
    assert_eq!(fetched.url, "https://example.com/v2");
    assert_eq!(count_events(&pool, event_types::WEBHOOK_UPDATED).await, 1);
}

#[tokio::test]
async fn webhooks_are_owner_scoped() {
    let (_pool, querier) = test_querier().await;
    let alice = create_verified_user(&querier, "alice").await;
    let bob = create_verified_user(&querier, "bob").await;
    let webhook = querier
        .create_webhook(&new_webhook(alice.id, "notify"))
        .await
        .unwrap();

    assert!(querier.webhook_exists(webhook.id, alice.id).await.unwrap());
    assert!(!querier.webhook_exists(webhook.id, bob.id).await.unwrap());
    assert!(querier.get_webhooks(bob.id, None).await.unwrap().data.is_empty());
    assert_eq!(querier.get_webhooks_for_admin(None).await.unwrap().data.len(), 1);
}

#[tokio::test]
async fn archive_records_actor_and_owner() {
    let (_pool, querier) = test_querier().await;
    let owner = create_verified_user(&querier, "alice").await;
    let webhook = querier
        .create_webhook(&new_webhook(owner.id, "notify"))
        .await
        .unwrap();

    querier.archive_webhook(webhook.id, owner.id).await.unwrap();
    assert_matches!(
        querier.get_webhook(webhook.id, owner.id).await,
        Err(DbError::NotFound { .. })
    );

    let entries = querier
        .get_audit_log_entries_for_webhook(webhook.id)
        .await
        .unwrap();
    let events: Vec<_> = entries.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        events,
        vec![event_types::WEBHOOK_CREATED, event_types::WEBHOOK_ARCHIVED]
    );
    assert_eq!(entries[1].context_id(keys::USER), Some(owner.id));
    assert_eq!(entries[1].context_id(keys::WEBHOOK), Some(webhook.id));
}

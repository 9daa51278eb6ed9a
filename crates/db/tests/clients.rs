//! Integration tests for OAuth2 and API client persistence.

mod common;

use assert_matches::assert_matches;
use todo_core::audit::{event_types, keys};
use todo_core::types::DbId;
use todo_db::error::DbError;
use todo_db::managers::{ApiClientDataManager, OAuth2ClientDataManager};
use todo_db::models::api_client::ApiClientCreationInput;
use todo_db::models::oauth2_client::{OAuth2ClientCreationInput, OAuth2ClientUpdateInput};

use common::{count_events, create_verified_user, test_querier};

fn new_oauth2_client(owner: DbId, client_id: &str) -> OAuth2ClientCreationInput {
    OAuth2ClientCreationInput {
        name: "mobile app".to_string(),
        client_id: client_id.to_string(),
        client_secret: "s3cr3t".to_string(),
        redirect_uri: "https://example.com/callback".to_string(),
        scopes: vec!["items:read".to_string(), "items:write".to_string()],
        belongs_to_user: owner,
    }
}

fn new_api_client(owner: DbId, client_id: &str) -> ApiClientCreationInput {
    ApiClientCreationInput {
        name: "cli".to_string(),
        client_id: client_id.to_string(),
        client_secret: "api-s3cr3t".to_string(),
        belongs_to_user: owner,
    }
}

// ---------------------------------------------------------------------------
// OAuth2 clients
// ---------------------------------------------------------------------------

#[tokio::test]
async fn oauth2_client_is_found_by_either_id() {
    let (_pool, querier) = test_querier().await;
    let owner = create_verified_user(&querier, "alice").await;
    let client = querier
        .create_oauth2_client(&new_oauth2_client(owner.id, "abc123"))
        .await
        .unwrap();

    let by_client_id = querier
        .get_oauth2_client_by_client_id("abc123")
        .await
        .unwrap();
    assert_eq!(by_client_id, client);
    assert!(by_client_id.has_scope("items:write"));

    let by_db_id = querier
        .get_oauth2_client_by_database_id(client.id, owner.id)
        .await
        .unwrap();
    assert_eq!(by_db_id.client_secret, "s3cr3t");
}

#[tokio::test]
async fn oauth2_client_database_lookup_is_owner_scoped() {
    let (_pool, querier) = test_querier().await;
    let alice = create_verified_user(&querier, "alice").await;
    let bob = create_verified_user(&querier, "bob").await;
    let client = querier
        .create_oauth2_client(&new_oauth2_client(alice.id, "abc123"))
        .await
        .unwrap();

    assert_matches!(
        querier
            .get_oauth2_client_by_database_id(client.id, bob.id)
            .await,
        Err(DbError::NotFound { .. })
    );
    assert!(querier
        .get_oauth2_clients(bob.id, None)
        .await
        .unwrap()
        .data
        .is_empty());
}

#[tokio::test]
async fn duplicate_client_id_is_a_conflict() {
    let (_pool, querier) = test_querier().await;
    let owner = create_verified_user(&querier, "alice").await;
    querier
        .create_oauth2_client(&new_oauth2_client(owner.id, "abc123"))
        .await
        .unwrap();

    assert_matches!(
        querier
            .create_oauth2_client(&new_oauth2_client(owner.id, "abc123"))
            .await,
        Err(DbError::Conflict { .. })
    );
}

#[tokio::test]
async fn oauth2_client_update_and_archive() {
    let (pool, querier) = test_querier().await;
    let owner = create_verified_user(&querier, "alice").await;
    let mut client = querier
        .create_oauth2_client(&new_oauth2_client(owner.id, "abc123"))
        .await
        .unwrap();

    let changes = client.update(&OAuth2ClientUpdateInput {
        scopes: Some(vec!["items:read".to_string()]),
        ..OAuth2ClientUpdateInput::default()
    });
    querier
        .update_oauth2_client(&client, owner.id, &changes)
        .await
        .unwrap();
    let fetched = querier
        .get_oauth2_client_by_client_id("abc123")
        .await
        .unwrap();
    assert_eq!(fetched.scopes, vec!["items:read"]);

    querier
        .archive_oauth2_client(client.id, owner.id)
        .await
        .unwrap();
    assert_matches!(
        querier.get_oauth2_client_by_client_id("abc123").await,
        Err(DbError::NotFound { .. })
    );
    assert_eq!(count_events(&pool, event_types::OAUTH2_CLIENT_ARCHIVED).await, 1);
}

#[tokio::test]
async fn oauth2_client_audit_never_holds_secret() {
    let (_pool, querier) = test_querier().await;
    let owner = create_verified_user(&querier, "alice").await;
    let client = querier
        .create_oauth2_client(&new_oauth2_client(owner.id, "abc123"))
        .await
        .unwrap();

    let entries = querier
        .get_audit_log_entries_for_oauth2_client(client.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].context_id(keys::OAUTH2_CLIENT), Some(client.id));
    assert!(!entries[0].context.to_string().contains("s3cr3t"));
}

// ---------------------------------------------------------------------------
// API clients
// ---------------------------------------------------------------------------

#[tokio::test]
async fn api_client_lifecycle() {
    let (pool, querier) = test_querier().await;
    let owner = create_verified_user(&querier, "alice").await;

    let client = querier
        .create_api_client(&new_api_client(owner.id, "key-1"))
        .await
        .unwrap();
    assert_eq!(
        querier.get_api_client_by_client_id("key-1").await.unwrap(),
        client
    );
    assert_eq!(
        querier
            .get_api_client_by_database_id(client.id, owner.id)
            .await
            .unwrap(),
        client
    );
    assert_eq!(querier.get_all_api_clients_count().await.unwrap(), 1);
    assert_eq!(
        querier
            .get_api_clients(owner.id, None)
            .await
            .unwrap()
            .pagination
            .total_count,
        1
    );

    querier.archive_api_client(client.id, owner.id).await.unwrap();
    assert_eq!(querier.get_all_api_clients_count().await.unwrap(), 0);

    let entries = querier
        .get_audit_log_entries_for_api_client(client.id)
        .await
        .unwrap();
    let events: Vec<_> = entries.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        events,
        vec![event_types::API_CLIENT_CREATED, event_types::API_CLIENT_ARCHIVED]
    );
    assert!(!entries[0].context.to_string().contains("api-s3cr3t"));
    assert_eq!(count_events(&pool, event_types::API_CLIENT_CREATED).await, 1);
}

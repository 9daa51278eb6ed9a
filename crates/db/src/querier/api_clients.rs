use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tokio::sync::mpsc;
use todo_core::audit::{event_types, keys};
use todo_core::types::DbId;

use super::manager::EntityConfig;
use super::scan::{optional_timestamp_at, timestamp_at};
use super::SqlQuerier;
use crate::audit::AuditEntry;
use crate::error::DbResult;
use crate::managers::ApiClientDataManager;
use crate::models::api_client::{ApiClient, ApiClientCreationInput, ApiClientList};
use crate::models::audit::AuditLogEntry;
use crate::models::filter::QueryFilter;
use crate::querybuilding::tables::{API_CLIENTS, OWNERSHIP_COLUMN};

pub(super) static API_CLIENT_CONFIG: EntityConfig<ApiClient> = EntityConfig {
    table: &API_CLIENTS,
    scan: scan_api_client,
};

fn scan_api_client(row: &SqliteRow) -> Result<ApiClient, sqlx::Error> {
    Ok(ApiClient {
        id: row.try_get(0)?,
        name: row.try_get(1)?,
        client_id: row.try_get(2)?,
        client_secret: row.try_get(3)?,
        created_on: timestamp_at(row, 4)?,
        last_updated_on: optional_timestamp_at(row, 5)?,
        archived_on: optional_timestamp_at(row, 6)?,
        belongs_to_user: row.try_get(7)?,
    })
}

#[async_trait]
impl ApiClientDataManager for SqlQuerier {
    async fn get_api_client_by_client_id(&self, client_id: &str) -> DbResult<ApiClient> {
        self.manager(&API_CLIENT_CONFIG)
            .get_by_column("client_id", client_id.into())
            .await
    }

    async fn get_api_client_by_database_id(
        &self,
        client_id: DbId,
        user_id: DbId,
    ) -> DbResult<ApiClient> {
        self.manager(&API_CLIENT_CONFIG)
            .get(client_id, Some(user_id))
            .await
    }

    async fn get_all_api_clients_count(&self) -> DbResult<u64> {
        self.manager(&API_CLIENT_CONFIG).count(false).await
    }

    async fn get_all_api_clients(
        &self,
        results: mpsc::Sender<Vec<ApiClient>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        self.manager(&API_CLIENT_CONFIG)
            .stream_all(results, bucket_size)
            .await
    }

    async fn get_api_clients(
        &self,
        user_id: DbId,
        filter: Option<&QueryFilter>,
    ) -> DbResult<ApiClientList> {
        self.manager(&API_CLIENT_CONFIG)
            .list(Some(user_id), false, filter)
            .await
    }

    async fn create_api_client(&self, input: &ApiClientCreationInput) -> DbResult<ApiClient> {
        let created_on = self.clock.now();
        let id = self
            .manager(&API_CLIENT_CONFIG)
            .insert(&vec![
                ("name", input.name.as_str().into()),
                ("client_id", input.client_id.as_str().into()),
                ("client_secret", input.client_secret.as_str().into()),
                ("created_on", created_on.into()),
                (OWNERSHIP_COLUMN, input.belongs_to_user.into()),
            ])
            .await?;

        let client = ApiClient {
            id,
            name: input.name.clone(),
            client_id: input.client_id.clone(),
            client_secret: input.client_secret.clone(),
            created_on,
            last_updated_on: None,
            archived_on: None,
            belongs_to_user: input.belongs_to_user,
        };
        self.log_api_client_creation_event(&client).await;
        Ok(client)
    }

    async fn archive_api_client(&self, client_id: DbId, user_id: DbId) -> DbResult<()> {
        self.manager(&API_CLIENT_CONFIG)
            .archive(client_id, Some(user_id))
            .await?;
        self.log_api_client_archive_event(user_id, client_id).await;
        Ok(())
    }

    async fn get_audit_log_entries_for_api_client(
        &self,
        client_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>> {
        self.audit_log_entries_for(&[keys::API_CLIENT], client_id)
            .await
    }

    async fn log_api_client_creation_event(&self, client: &ApiClient) {
        self.append_audit_entry(
            AuditEntry::new(event_types::API_CLIENT_CREATED)
                .with_actor(client.belongs_to_user)
                .with_id(keys::USER, client.belongs_to_user)
                .with_id(keys::API_CLIENT, client.id)
                .with_creation(client),
        )
        .await;
    }

    async fn log_api_client_archive_event(&self, user_id: DbId, client_id: DbId) {
        self.append_audit_entry(
            AuditEntry::new(event_types::API_CLIENT_ARCHIVED)
                .with_actor(user_id)
                .with_id(keys::USER, user_id)
                .with_id(keys::API_CLIENT, client_id),
        )
        .await;
    }
}

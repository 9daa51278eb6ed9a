use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tokio::sync::mpsc;
use todo_core::audit::{event_types, keys};
use todo_core::types::DbId;

use super::manager::EntityConfig;
use super::scan::{join_list, list_at, optional_timestamp_at, timestamp_at};
use super::SqlQuerier;
use crate::audit::AuditEntry;
use crate::error::DbResult;
use crate::managers::OAuth2ClientDataManager;
use crate::models::audit::AuditLogEntry;
use crate::models::filter::QueryFilter;
use crate::models::oauth2_client::{OAuth2Client, OAuth2ClientCreationInput, OAuth2ClientList};
use crate::models::FieldChangeSummary;
use crate::querybuilding::tables::{OAUTH2_CLIENTS, OWNERSHIP_COLUMN};

pub(super) static OAUTH2_CLIENT_CONFIG: EntityConfig<OAuth2Client> = EntityConfig {
    table: &OAUTH2_CLIENTS,
    scan: scan_oauth2_client,
};

fn scan_oauth2_client(row: &SqliteRow) -> Result<OAuth2Client, sqlx::Error> {
    Ok(OAuth2Client {
        id: row.try_get(0)?,
        name: row.try_get(1)?,
        client_id: row.try_get(2)?,
        client_secret: row.try_get(3)?,
        redirect_uri: row.try_get(4)?,
        scopes: list_at(row, 5)?,
        created_on: timestamp_at(row, 6)?,
        last_updated_on: optional_timestamp_at(row, 7)?,
        archived_on: optional_timestamp_at(row, 8)?,
        belongs_to_user: row.try_get(9)?,
    })
}

#[async_trait]
impl OAuth2ClientDataManager for SqlQuerier {
    async fn get_oauth2_client_by_client_id(&self, client_id: &str) -> DbResult<OAuth2Client> {
        self.manager(&OAUTH2_CLIENT_CONFIG)
            .get_by_column("client_id", client_id.into())
            .await
    }

    async fn get_oauth2_client_by_database_id(
        &self,
        client_id: DbId,
        user_id: DbId,
    ) -> DbResult<OAuth2Client> {
        self.manager(&OAUTH2_CLIENT_CONFIG)
            .get(client_id, Some(user_id))
            .await
    }

    async fn get_all_oauth2_clients_count(&self) -> DbResult<u64> {
        self.manager(&OAUTH2_CLIENT_CONFIG).count(false).await
    }

    async fn get_all_oauth2_clients(
        &self,
        results: mpsc::Sender<Vec<OAuth2Client>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        self.manager(&OAUTH2_CLIENT_CONFIG)
            .stream_all(results, bucket_size)
            .await
    }

    async fn get_oauth2_clients(
        &self,
        user_id: DbId,
        filter: Option<&QueryFilter>,
    ) -> DbResult<OAuth2ClientList> {
        self.manager(&OAUTH2_CLIENT_CONFIG)
            .list(Some(user_id), false, filter)
            .await
    }

    async fn create_oauth2_client(
        &self,
        input: &OAuth2ClientCreationInput,
    ) -> DbResult<OAuth2Client> {
        let created_on = self.clock.now();
        let id = self
            .manager(&OAUTH2_CLIENT_CONFIG)
            .insert(&vec![
                ("name", input.name.as_str().into()),
                ("client_id", input.client_id.as_str().into()),
                ("client_secret", input.client_secret.as_str().into()),
                ("redirect_uri", input.redirect_uri.as_str().into()),
                ("scopes", join_list(&input.scopes).into()),
                ("created_on", created_on.into()),
                (OWNERSHIP_COLUMN, input.belongs_to_user.into()),
            ])
            .await?;

        let client = OAuth2Client {
            id,
            name: input.name.clone(),
            client_id: input.client_id.clone(),
            client_secret: input.client_secret.clone(),
            redirect_uri: input.redirect_uri.clone(),
            scopes: input.scopes.clone(),
            created_on,
            last_updated_on: None,
            archived_on: None,
            belongs_to_user: input.belongs_to_user,
        };
        self.log_oauth2_client_creation_event(&client).await;
        Ok(client)
    }

    async fn update_oauth2_client(
        &self,
        updated: &OAuth2Client,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()> {
        self.manager(&OAUTH2_CLIENT_CONFIG)
            .update(
                updated.id,
                Some(updated.belongs_to_user),
                &vec![
                    ("name", updated.name.as_str().into()),
                    ("redirect_uri", updated.redirect_uri.as_str().into()),
                    ("scopes", join_list(&updated.scopes).into()),
                ],
            )
            .await?;
        self.log_oauth2_client_update_event(changed_by, updated.id, changes)
            .await;
        Ok(())
    }

    async fn archive_oauth2_client(&self, client_id: DbId, user_id: DbId) -> DbResult<()> {
        self.manager(&OAUTH2_CLIENT_CONFIG)
            .archive(client_id, Some(user_id))
            .await?;
        self.log_oauth2_client_archive_event(user_id, client_id)
            .await;
        Ok(())
    }

    async fn get_audit_log_entries_for_oauth2_client(
        &self,
        client_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>> {
        self.audit_log_entries_for(&[keys::OAUTH2_CLIENT], client_id)
            .await
    }

    async fn log_oauth2_client_creation_event(&self, client: &OAuth2Client) {
        self.append_audit_entry(
            AuditEntry::new(event_types::OAUTH2_CLIENT_CREATED)
                .with_actor(client.belongs_to_user)
                .with_id(keys::USER, client.belongs_to_user)
                .with_id(keys::OAUTH2_CLIENT, client.id)
                .with_creation(client),
        )
        .await;
    }

    async fn log_oauth2_client_update_event(
        &self,
        user_id: DbId,
        client_id: DbId,
        changes: &[FieldChangeSummary],
    ) {
        self.append_audit_entry(
            AuditEntry::new(event_types::OAUTH2_CLIENT_UPDATED)
                .with_actor(user_id)
                .with_id(keys::OAUTH2_CLIENT, client_id)
                .with_changes(changes),
        )
        .await;
    }

    async fn log_oauth2_client_archive_event(&self, user_id: DbId, client_id: DbId) {
        self.append_audit_entry(
            AuditEntry::new(event_types::OAUTH2_CLIENT_ARCHIVED)
                .with_actor(user_id)
                .with_id(keys::USER, user_id)
                .with_id(keys::OAUTH2_CLIENT, client_id),
        )
        .await;
    }
}

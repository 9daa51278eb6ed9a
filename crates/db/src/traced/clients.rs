use async_trait::async_trait;
use tokio::sync::mpsc;
use todo_core::types::DbId;

use super::TracedDataManager;
use crate::error::DbResult;
use crate::managers::{ApiClientDataManager, OAuth2ClientDataManager};
use crate::models::api_client::{ApiClient, ApiClientCreationInput, ApiClientList};
use crate::models::audit::AuditLogEntry;
use crate::models::filter::QueryFilter;
use crate::models::oauth2_client::{OAuth2Client, OAuth2ClientCreationInput, OAuth2ClientList};
use crate::models::FieldChangeSummary;

// ---------------------------------------------------------------------------
// OAuth2 clients
// ---------------------------------------------------------------------------

#[async_trait]
impl<D: OAuth2ClientDataManager> OAuth2ClientDataManager for TracedDataManager<D> {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_oauth2_client_by_client_id(&self, client_id: &str) -> DbResult<OAuth2Client> {
        tracing::debug!("get_oauth2_client_by_client_id called");
        self.inner.get_oauth2_client_by_client_id(client_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_oauth2_client_by_database_id(
        &self,
        client_id: DbId,
        user_id: DbId,
    ) -> DbResult<OAuth2Client> {
        tracing::debug!("get_oauth2_client_by_database_id called");
        self.inner
            .get_oauth2_client_by_database_id(client_id, user_id)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_all_oauth2_clients_count(&self) -> DbResult<u64> {
        tracing::debug!("get_all_oauth2_clients_count called");
        self.inner.get_all_oauth2_clients_count().await
    }

    #[tracing::instrument(skip(self, results), level = "debug")]
    async fn get_all_oauth2_clients(
        &self,
        results: mpsc::Sender<Vec<OAuth2Client>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        tracing::debug!("get_all_oauth2_clients called");
        self.inner.get_all_oauth2_clients(results, bucket_size).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_oauth2_clients(
        &self,
        user_id: DbId,
        filter: Option<&QueryFilter>,
    ) -> DbResult<OAuth2ClientList> {
        tracing::debug!("get_oauth2_clients called");
        self.inner.get_oauth2_clients(user_id, filter).await
    }

    #[tracing::instrument(skip(self, input), fields(user_id = input.belongs_to_user), level = "debug")]
    async fn create_oauth2_client(
        &self,
        input: &OAuth2ClientCreationInput,
    ) -> DbResult<OAuth2Client> {
        tracing::debug!("create_oauth2_client called");
        self.inner.create_oauth2_client(input).await
    }

    #[tracing::instrument(skip(self, updated, changes), fields(client_id = updated.id), level = "debug")]
    async fn update_oauth2_client(
        &self,
        updated: &OAuth2Client,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()> {
        tracing::debug!("update_oauth2_client called");
        self.inner
            .update_oauth2_client(updated, changed_by, changes)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn archive_oauth2_client(&self, client_id: DbId, user_id: DbId) -> DbResult<()> {
        tracing::debug!("archive_oauth2_client called");
        self.inner.archive_oauth2_client(client_id, user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_audit_log_entries_for_oauth2_client(
        &self,
        client_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>> {
        tracing::debug!("get_audit_log_entries_for_oauth2_client called");
        self.inner
            .get_audit_log_entries_for_oauth2_client(client_id)
            .await
    }

    #[tracing::instrument(skip(self, client), fields(client_id = client.id), level = "debug")]
    async fn log_oauth2_client_creation_event(&self, client: &OAuth2Client) {
        tracing::debug!("log_oauth2_client_creation_event called");
        self.inner.log_oauth2_client_creation_event(client).await
    }

    #[tracing::instrument(skip(self, changes), level = "debug")]
    async fn log_oauth2_client_update_event(
        &self,
        user_id: DbId,
        client_id: DbId,
        changes: &[FieldChangeSummary],
    ) {
        tracing::debug!("log_oauth2_client_update_event called");
        self.inner
            .log_oauth2_client_update_event(user_id, client_id, changes)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn log_oauth2_client_archive_event(&self, user_id: DbId, client_id: DbId) {
        tracing::debug!("log_oauth2_client_archive_event called");
        self.inner
            .log_oauth2_client_archive_event(user_id, client_id)
            .await
    }
}

// ---------------------------------------------------------------------------
// API clients
// ---------------------------------------------------------------------------

#[async_trait]
impl<D: ApiClientDataManager> ApiClientDataManager for TracedDataManager<D> {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_api_client_by_client_id(&self, client_id: &str) -> DbResult<ApiClient> {
        tracing::debug!("get_api_client_by_client_id called");
        self.inner.get_api_client_by_client_id(client_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_api_client_by_database_id(
        &self,
        client_id: DbId,
        user_id: DbId,
    ) -> DbResult<ApiClient> {
        tracing::debug!("get_api_client_by_database_id called");
        self.inner
            .get_api_client_by_database_id(client_id, user_id)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_all_api_clients_count(&self) -> DbResult<u64> {
        tracing::debug!("get_all_api_clients_count called");
        self.inner.get_all_api_clients_count().await
    }

    #[tracing::instrument(skip(self, results), level = "debug")]
    async fn get_all_api_clients(
        &self,
        results: mpsc::Sender<Vec<ApiClient>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        tracing::debug!("get_all_api_clients called");
        self.inner.get_all_api_clients(results, bucket_size).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_api_clients(
        &self,
        user_id: DbId,
        filter: Option<&QueryFilter>,
    ) -> DbResult<ApiClientList> {
        tracing::debug!("get_api_clients called");
        self.inner.get_api_clients(user_id, filter).await
    }

    #[tracing::instrument(skip(self, input), fields(user_id = input.belongs_to_user), level = "debug")]
    async fn create_api_client(&self, input: &ApiClientCreationInput) -> DbResult<ApiClient> {
        tracing::debug!("create_api_client called");
        self.inner.create_api_client(input).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn archive_api_client(&self, client_id: DbId, user_id: DbId) -> DbResult<()> {
        tracing::debug!("archive_api_client called");
        self.inner.archive_api_client(client_id, user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_audit_log_entries_for_api_client(
        &self,
        client_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>> {
        tracing::debug!("get_audit_log_entries_for_api_client called");
        self.inner.get_audit_log_entries_for_api_client(client_id).await
    }

    #[tracing::instrument(skip(self, client), fields(client_id = client.id), level = "debug")]
    async fn log_api_client_creation_event(&self, client: &ApiClient) {
        tracing::debug!("log_api_client_creation_event called");
        self.inner.log_api_client_creation_event(client).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn log_api_client_archive_event(&self, user_id: DbId, client_id: DbId) {
        tracing::debug!("log_api_client_archive_event called");
        self.inner
            .log_api_client_archive_event(user_id, client_id)
            .await
    }
}

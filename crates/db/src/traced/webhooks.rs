use async_trait::async_trait;
use tokio::sync::mpsc;
use todo_core::types::DbId;

use super::TracedDataManager;
use crate::error::DbResult;
use crate::managers::WebhookDataManager;
use crate::models::audit::AuditLogEntry;
use crate::models::filter::QueryFilter;
use crate::models::webhook::{Webhook, WebhookCreationInput, WebhookList};
use crate::models::FieldChangeSummary;

#[async_trait]
impl<D: WebhookDataManager> WebhookDataManager for TracedDataManager<D> {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn webhook_exists(&self, webhook_id: DbId, user_id: DbId) -> DbResult<bool> {
        tracing::debug!("webhook_exists called");
        self.inner.webhook_exists(webhook_id, user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_webhook(&self, webhook_id: DbId, user_id: DbId) -> DbResult<Webhook> {
        tracing::debug!("get_webhook called");
        self.inner.get_webhook(webhook_id, user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_all_webhooks_count(&self) -> DbResult<u64> {
        tracing::debug!("get_all_webhooks_count called");
        self.inner.get_all_webhooks_count().await
    }

    #[tracing::instrument(skip(self, results), level = "debug")]
    async fn get_all_webhooks(
        &self,
        results: mpsc::Sender<Vec<Webhook>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        tracing::debug!("get_all_webhooks called");
        self.inner.get_all_webhooks(results, bucket_size).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_webhooks(
        &self,
        user_id: DbId,
        filter: Option<&QueryFilter>,
    ) -> DbResult<WebhookList> {
        tracing::debug!("get_webhooks called");
        self.inner.get_webhooks(user_id, filter).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_webhooks_for_admin(&self, filter: Option<&QueryFilter>) -> DbResult<WebhookList> {
        tracing::debug!("get_webhooks_for_admin called");
        self.inner.get_webhooks_for_admin(filter).await
    }

    #[tracing::instrument(skip(self, input), fields(user_id = input.belongs_to_user), level = "debug")]
    async fn create_webhook(&self, input: &WebhookCreationInput) -> DbResult<Webhook> {
        tracing::debug!("create_webhook called");
        self.inner.create_webhook(input).await
    }

    #[tracing::instrument(skip(self, updated, changes), fields(webhook_id = updated.id), level = "debug")]
    async fn update_webhook(
        &self,
        updated: &Webhook,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()> {
        tracing::debug!("update_webhook called");
        self.inner.update_webhook(updated, changed_by, changes).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn archive_webhook(&self, webhook_id: DbId, user_id: DbId) -> DbResult<()> {
        tracing::debug!("archive_webhook called");
        self.inner.archive_webhook(webhook_id, user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_audit_log_entries_for_webhook(
        &self,
        webhook_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>> {
        tracing::debug!("get_audit_log_entries_for_webhook called");
        self.inner.get_audit_log_entries_for_webhook(webhook_id).await
    }

    #[tracing::instrument(skip(self, webhook), fields(webhook_id = webhook.id), level = "debug")]
    async fn log_webhook_creation_event(&self, webhook: &Webhook) {
        tracing::debug!("log_webhook_creation_event called");
        self.inner.log_webhook_creation_event(webhook).await
    }

    #[tracing::instrument(skip(self, changes), level = "debug")]
    async fn log_webhook_update_event(
        &self,
        user_id: DbId,
        webhook_id: DbId,
        changes: &[FieldChangeSummary],
    ) {
        tracing::debug!("log_webhook_update_event called");
        self.inner
            .log_webhook_update_event(user_id, webhook_id, changes)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn log_webhook_archive_event(&self, user_id: DbId, webhook_id: DbId) {
        tracing::debug!("log_webhook_archive_event called");
        self.inner
            .log_webhook_archive_event(user_id, webhook_id)
            .await
    }
}

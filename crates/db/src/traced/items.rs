use async_trait::async_trait;
use tokio::sync::mpsc;
use todo_core::types::DbId;

use super::TracedDataManager;
use crate::error::DbResult;
use crate::managers::ItemDataManager;
use crate::models::audit::AuditLogEntry;
use crate::models::filter::QueryFilter;
use crate::models::item::{Item, ItemCreationInput, ItemList};
use crate::models::FieldChangeSummary;

#[async_trait]
impl<D: ItemDataManager> ItemDataManager for TracedDataManager<D> {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn item_exists(&self, item_id: DbId, user_id: DbId) -> DbResult<bool> {
        tracing::debug!("item_exists called");
        self.inner.item_exists(item_id, user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_item(&self, item_id: DbId, user_id: DbId) -> DbResult<Item> {
        tracing::debug!("get_item called");
        self.inner.get_item(item_id, user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_all_items_count(&self) -> DbResult<u64> {
        tracing::debug!("get_all_items_count called");
        self.inner.get_all_items_count().await
    }

    #[tracing::instrument(skip(self, results), level = "debug")]
    async fn get_all_items(
        &self,
        results: mpsc::Sender<Vec<Item>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        tracing::debug!("get_all_items called");
        self.inner.get_all_items(results, bucket_size).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_items(&self, user_id: DbId, filter: Option<&QueryFilter>) -> DbResult<ItemList> {
        tracing::debug!("get_items called");
        self.inner.get_items(user_id, filter).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_items_for_admin(&self, filter: Option<&QueryFilter>) -> DbResult<ItemList> {
        tracing::debug!("get_items_for_admin called");
        self.inner.get_items_for_admin(filter).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_items_with_ids(
        &self,
        user_id: DbId,
        limit: u8,
        ids: &[DbId],
    ) -> DbResult<Vec<Item>> {
        tracing::debug!("get_items_with_ids called");
        self.inner.get_items_with_ids(user_id, limit, ids).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_items_with_ids_for_admin(&self, limit: u8, ids: &[DbId]) -> DbResult<Vec<Item>> {
        tracing::debug!("get_items_with_ids_for_admin called");
        self.inner.get_items_with_ids_for_admin(limit, ids).await
    }

    #[tracing::instrument(skip(self, input), fields(user_id = input.belongs_to_user), level = "debug")]
    async fn create_item(&self, input: &ItemCreationInput) -> DbResult<Item> {
        tracing::debug!("create_item called");
        self.inner.create_item(input).await
    }

    #[tracing::instrument(skip(self, updated, changes), fields(item_id = updated.id), level = "debug")]
    async fn update_item(
        &self,
        updated: &Item,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()> {
        tracing::debug!("update_item called");
        self.inner.update_item(updated, changed_by, changes).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn archive_item(&self, item_id: DbId, user_id: DbId) -> DbResult<()> {
        tracing::debug!("archive_item called");
        self.inner.archive_item(item_id, user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_audit_log_entries_for_item(&self, item_id: DbId) -> DbResult<Vec<AuditLogEntry>> {
        tracing::debug!("get_audit_log_entries_for_item called");
        self.inner.get_audit_log_entries_for_item(item_id).await
    }

    #[tracing::instrument(skip(self, item), fields(item_id = item.id), level = "debug")]
    async fn log_item_creation_event(&self, item: &Item) {
        tracing::debug!("log_item_creation_event called");
        self.inner.log_item_creation_event(item).await
    }

    #[tracing::instrument(skip(self, changes), level = "debug")]
    async fn log_item_update_event(
        &self,
        user_id: DbId,
        item_id: DbId,
        changes: &[FieldChangeSummary],
    ) {
        tracing::debug!("log_item_update_event called");
        self.inner
            .log_item_update_event(user_id, item_id, changes)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn log_item_archive_event(&self, user_id: DbId, item_id: DbId) {
        tracing::debug!("log_item_archive_event called");
        self.inner.log_item_archive_event(user_id, item_id).await
    }
}

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
use crate::managers::ItemDataManager;
use crate::models::audit::AuditLogEntry;
use crate::models::filter::QueryFilter;
use crate::models::item::{Item, ItemCreationInput, ItemList};
use crate::models::FieldChangeSummary;
use crate::querybuilding::tables::{ITEMS, OWNERSHIP_COLUMN};

pub(super) static ITEM_CONFIG: EntityConfig<Item> = EntityConfig {
    table: &ITEMS,
    scan: scan_item,
};

fn scan_item(row: &SqliteRow) -> Result<Item, sqlx::Error> {
    Ok(Item {
        id: row.try_get(0)?,
        name: row.try_get(1)?,
        details: row.try_get(2)?,
        created_on: timestamp_at(row, 3)?,
        last_updated_on: optional_timestamp_at(row, 4)?,
        archived_on: optional_timestamp_at(row, 5)?,
        belongs_to_user: row.try_get(6)?,
    })
}

#[async_trait]
impl ItemDataManager for SqlQuerier {
    async fn item_exists(&self, item_id: DbId, user_id: DbId) -> DbResult<bool> {
        self.manager(&ITEM_CONFIG).exists(item_id, Some(user_id)).await
    }

    async fn get_item(&self, item_id: DbId, user_id: DbId) -> DbResult<Item> {
        self.manager(&ITEM_CONFIG).get(item_id, Some(user_id)).await
    }

    async fn get_all_items_count(&self) -> DbResult<u64> {
        self.manager(&ITEM_CONFIG).count(false).await
    }

    async fn get_all_items(
        &self,
        results: mpsc::Sender<Vec<Item>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        self.manager(&ITEM_CONFIG)
            .stream_all(results, bucket_size)
            .await
    }

    async fn get_items(&self, user_id: DbId, filter: Option<&QueryFilter>) -> DbResult<ItemList> {
        self.manager(&ITEM_CONFIG)
            .list(Some(user_id), false, filter)
            .await
    }

    async fn get_items_for_admin(&self, filter: Option<&QueryFilter>) -> DbResult<ItemList> {
        self.manager(&ITEM_CONFIG).list(None, true, filter).await
    }

    async fn get_items_with_ids(
        &self,
        user_id: DbId,
        limit: u8,
        ids: &[DbId],
    ) -> DbResult<Vec<Item>> {
        self.manager(&ITEM_CONFIG)
            .with_ids(Some(user_id), limit, ids, false)
            .await
    }

    async fn get_items_with_ids_for_admin(&self, limit: u8, ids: &[DbId]) -> DbResult<Vec<Item>> {
        self.manager(&ITEM_CONFIG)
            .with_ids(None, limit, ids, true)
            .await
    }

    async fn create_item(&self, input: &ItemCreationInput) -> DbResult<Item> {
        let created_on = self.clock.now();
        let id = self
            .manager(&ITEM_CONFIG)
            .insert(&vec![
                ("name", input.name.as_str().into()),
                ("details", input.details.as_str().into()),
                ("created_on", created_on.into()),
                (OWNERSHIP_COLUMN, input.belongs_to_user.into()),
            ])
            .await?;

        let item = Item {
            id,
            name: input.name.clone(),
            details: input.details.clone(),
            created_on,
            last_updated_on: None,
            archived_on: None,
            belongs_to_user: input.belongs_to_user,
        };
        self.log_item_creation_event(&item).await;
        Ok(item)
    }

    async fn update_item(
        &self,
        updated: &Item,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()> {
        self.manager(&ITEM_CONFIG)
            .update(
                updated.id,
                Some(updated.belongs_to_user),
                &vec![
                    ("name", updated.name.as_str().into()),
                    ("details", updated.details.as_str().into()),
                ],
            )
            .await?;
        self.log_item_update_event(changed_by, updated.id, changes)
            .await;
        Ok(())
    }

    async fn archive_item(&self, item_id: DbId, user_id: DbId) -> DbResult<()> {
        self.manager(&ITEM_CONFIG)
            .archive(item_id, Some(user_id))
            .await?;
        self.log_item_archive_event(user_id, item_id).await;
        Ok(())
    }

    async fn get_audit_log_entries_for_item(&self, item_id: DbId) -> DbResult<Vec<AuditLogEntry>> {
        self.audit_log_entries_for(&[keys::ITEM], item_id).await
    }

    async fn log_item_creation_event(&self, item: &Item) {
        self.append_audit_entry(
            AuditEntry::new(event_types::ITEM_CREATED)
                .with_actor(item.belongs_to_user)
                .with_id(keys::USER, item.belongs_to_user)
                .with_id(keys::ITEM, item.id)
                .with_creation(item),
        )
        .await;
    }

    async fn log_item_update_event(
        &self,
        user_id: DbId,
        item_id: DbId,
        changes: &[FieldChangeSummary],
    ) {
        self.append_audit_entry(
            AuditEntry::new(event_types::ITEM_UPDATED)
                .with_actor(user_id)
                .with_id(keys::ITEM, item_id)
                .with_changes(changes),
        )
        .await;
    }

    async fn log_item_archive_event(&self, user_id: DbId, item_id: DbId) {
        self.append_audit_entry(
            AuditEntry::new(event_types::ITEM_ARCHIVED)
                .with_actor(user_id)
                .with_id(keys::USER, user_id)
                .with_id(keys::ITEM, item_id),
        )
        .await;
    }
}

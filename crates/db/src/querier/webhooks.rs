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
use crate::managers::WebhookDataManager;
use crate::models::audit::AuditLogEntry;
use crate::models::filter::QueryFilter;
use crate::models::webhook::{Webhook, WebhookCreationInput, WebhookList};
use crate::models::FieldChangeSummary;
use crate::querybuilding::tables::{OWNERSHIP_COLUMN, WEBHOOKS};
use crate::querybuilding::ColumnValues;

pub(super) static WEBHOOK_CONFIG: EntityConfig<Webhook> = EntityConfig {
    table: &WEBHOOKS,
    scan: scan_webhook,
};

fn scan_webhook(row: &SqliteRow) -> Result<Webhook, sqlx::Error> {
    Ok(Webhook {
        id: row.try_get(0)?,
        name: row.try_get(1)?,
        content_type: row.try_get(2)?,
        url: row.try_get(3)?,
        method: row.try_get(4)?,
        events: list_at(row, 5)?,
        data_types: list_at(row, 6)?,
        topics: list_at(row, 7)?,
        created_on: timestamp_at(row, 8)?,
        last_updated_on: optional_timestamp_at(row, 9)?,
        archived_on: optional_timestamp_at(row, 10)?,
        belongs_to_user: row.try_get(11)?,
    })
}

/// Mutable columns, shared by insert and update.
fn webhook_values(
    name: &str,
    content_type: &str,
    url: &str,
    method: &str,
    events: &[String],
    data_types: &[String],
    topics: &[String],
) -> ColumnValues {
    vec![
        ("name", name.into()),
        ("content_type", content_type.into()),
        ("url", url.into()),
        ("method", method.into()),
        ("events", join_list(events).into()),
        ("data_types", join_list(data_types).into()),
        ("topics", join_list(topics).into()),
    ]
}

#[async_trait]
impl WebhookDataManager for SqlQuerier {
    async fn webhook_exists(&self, webhook_id: DbId, user_id: DbId) -> DbResult<bool> {
        self.manager(&WEBHOOK_CONFIG)
            .exists(webhook_id, Some(user_id))
            .await
    }

    async fn get_webhook(&self, webhook_id: DbId, user_id: DbId) -> DbResult<Webhook> {
        self.manager(&WEBHOOK_CONFIG)
            .get(webhook_id, Some(user_id))
            .await
    }

    async fn get_all_webhooks_count(&self) -> DbResult<u64> {
        self.manager(&WEBHOOK_CONFIG).count(false).await
    }

    async fn get_all_webhooks(
        &self,
        results: mpsc::Sender<Vec<Webhook>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        self.manager(&WEBHOOK_CONFIG)
            .stream_all(results, bucket_size)
            .await
    }

    async fn get_webhooks(
        &self,
        user_id: DbId,
        filter: Option<&QueryFilter>,
    ) -> DbResult<WebhookList> {
        self.manager(&WEBHOOK_CONFIG)
            .list(Some(user_id), false, filter)
            .await
    }

    async fn get_webhooks_for_admin(&self, filter: Option<&QueryFilter>) -> DbResult<WebhookList> {
        self.manager(&WEBHOOK_CONFIG).list(None, true, filter).await
    }

    async fn create_webhook(&self, input: &WebhookCreationInput) -> DbResult<Webhook> {
        let created_on = self.clock.now();
        let mut values = webhook_values(
            &input.name,
            &input.content_type,
            &input.url,
            &input.method,
            &input.events,
            &input.data_types,
            &input.topics,
        );
        values.push(("created_on", created_on.into()));
        values.push((OWNERSHIP_COLUMN, input.belongs_to_user.into()));
        let id = self.manager(&WEBHOOK_CONFIG).insert(&values).await?;

        let webhook = Webhook {
            id,
            name: input.name.clone(),
            content_type: input.content_type.clone(),
            url: input.url.clone(),
            method: input.method.clone(),
            events: input.events.clone(),
            data_types: input.data_types.clone(),
            topics: input.topics.clone(),
            created_on,
            last_updated_on: None,
            archived_on: None,
            belongs_to_user: input.belongs_to_user,
        };
        self.log_webhook_creation_event(&webhook).await;
        Ok(webhook)
    }

    async fn update_webhook(
        &self,
        updated: &Webhook,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()> {
        let values = webhook_values(
            &updated.name,
            &updated.content_type,
            &updated.url,
            &updated.method,
            &updated.events,
            &updated.data_types,
            &updated.topics,
        );
        self.manager(&WEBHOOK_CONFIG)
            .update(updated.id, Some(updated.belongs_to_user), &values)
            .await?;
        self.log_webhook_update_event(changed_by, updated.id, changes)
            .await;
        Ok(())
    }

    async fn archive_webhook(&self, webhook_id: DbId, user_id: DbId) -> DbResult<()> {
        self.manager(&WEBHOOK_CONFIG)
            .archive(webhook_id, Some(user_id))
            .await?;
        self.log_webhook_archive_event(user_id, webhook_id).await;
        Ok(())
    }

    async fn get_audit_log_entries_for_webhook(
        &self,
        webhook_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>> {
        self.audit_log_entries_for(&[keys::WEBHOOK], webhook_id)
            .await
    }

    async fn log_webhook_creation_event(&self, webhook: &Webhook) {
        self.append_audit_entry(
            AuditEntry::new(event_types::WEBHOOK_CREATED)
                .with_actor(webhook.belongs_to_user)
                .with_id(keys::USER, webhook.belongs_to_user)
                .with_id(keys::WEBHOOK, webhook.id)
                .with_creation(webhook),
        )
        .await;
    }

    async fn log_webhook_update_event(
        &self,
        user_id: DbId,
        webhook_id: DbId,
        changes: &[FieldChangeSummary],
    ) {
        self.append_audit_entry(
            AuditEntry::new(event_types::WEBHOOK_UPDATED)
                .with_actor(user_id)
                .with_id(keys::WEBHOOK, webhook_id)
                .with_changes(changes),
        )
        .await;
    }

    async fn log_webhook_archive_event(&self, user_id: DbId, webhook_id: DbId) {
        self.append_audit_entry(
            AuditEntry::new(event_types::WEBHOOK_ARCHIVED)
                .with_actor(user_id)
                .with_id(keys::USER, user_id)
                .with_id(keys::WEBHOOK, webhook_id),
        )
        .await;
    }
}

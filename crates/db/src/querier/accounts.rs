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
use crate::managers::AccountDataManager;
use crate::models::account::{Account, AccountCreationInput, AccountList};
use crate::models::audit::AuditLogEntry;
use crate::models::filter::QueryFilter;
use crate::models::FieldChangeSummary;
use crate::querybuilding::tables::{ACCOUNTS, OWNERSHIP_COLUMN};

pub(super) static ACCOUNT_CONFIG: EntityConfig<Account> = EntityConfig {
    table: &ACCOUNTS,
    scan: scan_account,
};

fn scan_account(row: &SqliteRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: row.try_get(0)?,
        name: row.try_get(1)?,
        plan_id: row.try_get(2)?,
        default_user_permissions: row.try_get(3)?,
        created_on: timestamp_at(row, 4)?,
        last_updated_on: optional_timestamp_at(row, 5)?,
        archived_on: optional_timestamp_at(row, 6)?,
        belongs_to_user: row.try_get(7)?,
    })
}

#[async_trait]
impl AccountDataManager for SqlQuerier {
    async fn account_exists(&self, account_id: DbId, user_id: DbId) -> DbResult<bool> {
        self.manager(&ACCOUNT_CONFIG)
            .exists(account_id, Some(user_id))
            .await
    }

    async fn get_account(&self, account_id: DbId, user_id: DbId) -> DbResult<Account> {
        self.manager(&ACCOUNT_CONFIG)
            .get(account_id, Some(user_id))
            .await
    }

    async fn get_all_accounts_count(&self) -> DbResult<u64> {
        self.manager(&ACCOUNT_CONFIG).count(false).await
    }

    async fn get_all_accounts(
        &self,
        results: mpsc::Sender<Vec<Account>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        self.manager(&ACCOUNT_CONFIG)
            .stream_all(results, bucket_size)
            .await
    }

    async fn get_accounts(
        &self,
        user_id: DbId,
        filter: Option<&QueryFilter>,
    ) -> DbResult<AccountList> {
        self.manager(&ACCOUNT_CONFIG)
            .list(Some(user_id), false, filter)
            .await
    }

    async fn get_accounts_for_admin(&self, filter: Option<&QueryFilter>) -> DbResult<AccountList> {
        self.manager(&ACCOUNT_CONFIG).list(None, true, filter).await
    }

    async fn create_account(&self, input: &AccountCreationInput) -> DbResult<Account> {
        let created_on = self.clock.now();
        let id = self
            .manager(&ACCOUNT_CONFIG)
            .insert(&vec![
                ("name", input.name.as_str().into()),
                ("plan_id", input.plan_id.into()),
                (
                    "default_user_permissions",
                    input.default_user_permissions.into(),
                ),
                ("created_on", created_on.into()),
                (OWNERSHIP_COLUMN, input.belongs_to_user.into()),
            ])
            .await?;

        let account = Account {
            id,
            name: input.name.clone(),
            plan_id: input.plan_id,
            default_user_permissions: input.default_user_permissions,
            created_on,
            last_updated_on: None,
            archived_on: None,
            belongs_to_user: input.belongs_to_user,
        };
        self.log_account_creation_event(&account).await;
        Ok(account)
    }

    async fn update_account(
        &self,
        updated: &Account,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()> {
        self.manager(&ACCOUNT_CONFIG)
            .update(
                updated.id,
                Some(updated.belongs_to_user),
                &vec![
                    ("name", updated.name.as_str().into()),
                    ("plan_id", updated.plan_id.into()),
                    (
                        "default_user_permissions",
                        updated.default_user_permissions.into(),
                    ),
                ],
            )
            .await?;
        self.log_account_update_event(changed_by, updated.id, changes)
            .await;
        Ok(())
    }

    async fn archive_account(&self, account_id: DbId, user_id: DbId) -> DbResult<()> {
        self.manager(&ACCOUNT_CONFIG)
            .archive(account_id, Some(user_id))
            .await?;
        self.log_account_archive_event(user_id, account_id).await;
        Ok(())
    }

    async fn get_audit_log_entries_for_account(
        &self,
        account_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>> {
        self.audit_log_entries_for(&[keys::ACCOUNT], account_id)
            .await
    }

    async fn log_account_creation_event(&self, account: &Account) {
        self.append_audit_entry(
            AuditEntry::new(event_types::ACCOUNT_CREATED)
                .with_actor(account.belongs_to_user)
                .with_id(keys::USER, account.belongs_to_user)
                .with_id(keys::ACCOUNT, account.id)
                .with_creation(account),
        )
        .await;
    }

    async fn log_account_update_event(
        &self,
        user_id: DbId,
        account_id: DbId,
        changes: &[FieldChangeSummary],
    ) {
        self.append_audit_entry(
            AuditEntry::new(event_types::ACCOUNT_UPDATED)
                .with_actor(user_id)
                .with_id(keys::ACCOUNT, account_id)
                .with_changes(changes),
        )
        .await;
    }

    async fn log_account_archive_event(&self, user_id: DbId, account_id: DbId) {
        self.append_audit_entry(
            AuditEntry::new(event_types::ACCOUNT_ARCHIVED)
                .with_actor(user_id)
                .with_id(keys::USER, user_id)
                .with_id(keys::ACCOUNT, account_id),
        )
        .await;
    }
}

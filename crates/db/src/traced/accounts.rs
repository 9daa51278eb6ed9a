use async_trait::async_trait;
use tokio::sync::mpsc;
use todo_core::types::DbId;

use super::TracedDataManager;
use crate::error::DbResult;
use crate::managers::AccountDataManager;
use crate::models::account::{Account, AccountCreationInput, AccountList};
use crate::models::audit::AuditLogEntry;
use crate::models::filter::QueryFilter;
use crate::models::FieldChangeSummary;

#[async_trait]
impl<D: AccountDataManager> AccountDataManager for TracedDataManager<D> {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn account_exists(&self, account_id: DbId, user_id: DbId) -> DbResult<bool> {
        tracing::debug!("account_exists called");
        self.inner.account_exists(account_id, user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_account(&self, account_id: DbId, user_id: DbId) -> DbResult<Account> {
        tracing::debug!("get_account called");
        self.inner.get_account(account_id, user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_all_accounts_count(&self) -> DbResult<u64> {
        tracing::debug!("get_all_accounts_count called");
        self.inner.get_all_accounts_count().await
    }

    #[tracing::instrument(skip(self, results), level = "debug")]
    async fn get_all_accounts(
        &self,
        results: mpsc::Sender<Vec<Account>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        tracing::debug!("get_all_accounts called");
        self.inner.get_all_accounts(results, bucket_size).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_accounts(
        &self,
        user_id: DbId,
        filter: Option<&QueryFilter>,
    ) -> DbResult<AccountList> {
        tracing::debug!("get_accounts called");
        self.inner.get_accounts(user_id, filter).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_accounts_for_admin(&self, filter: Option<&QueryFilter>) -> DbResult<AccountList> {
        tracing::debug!("get_accounts_for_admin called");
        self.inner.get_accounts_for_admin(filter).await
    }

    #[tracing::instrument(skip(self, input), fields(user_id = input.belongs_to_user), level = "debug")]
    async fn create_account(&self, input: &AccountCreationInput) -> DbResult<Account> {
        tracing::debug!("create_account called");
        self.inner.create_account(input).await
    }

    #[tracing::instrument(skip(self, updated, changes), fields(account_id = updated.id), level = "debug")]
    async fn update_account(
        &self,
        updated: &Account,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()> {
        tracing::debug!("update_account called");
        self.inner.update_account(updated, changed_by, changes).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn archive_account(&self, account_id: DbId, user_id: DbId) -> DbResult<()> {
        tracing::debug!("archive_account called");
        self.inner.archive_account(account_id, user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_audit_log_entries_for_account(
        &self,
        account_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>> {
        tracing::debug!("get_audit_log_entries_for_account called");
        self.inner.get_audit_log_entries_for_account(account_id).await
    }

    #[tracing::instrument(skip(self, account), fields(account_id = account.id), level = "debug")]
    async fn log_account_creation_event(&self, account: &Account) {
        tracing::debug!("log_account_creation_event called");
        self.inner.log_account_creation_event(account).await
    }

    #[tracing::instrument(skip(self, changes), level = "debug")]
    async fn log_account_update_event(
        &self,
        user_id: DbId,
        account_id: DbId,
        changes: &[FieldChangeSummary],
    ) {
        tracing::debug!("log_account_update_event called");
        self.inner
            .log_account_update_event(user_id, account_id, changes)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn log_account_archive_event(&self, user_id: DbId, account_id: DbId) {
        tracing::debug!("log_account_archive_event called");
        self.inner
            .log_account_archive_event(user_id, account_id)
            .await
    }
}

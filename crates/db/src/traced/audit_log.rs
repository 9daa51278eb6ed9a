use async_trait::async_trait;
use tokio::sync::mpsc;
use todo_core::types::DbId;

use super::TracedDataManager;
use crate::error::DbResult;
use crate::managers::AuditLogEntryDataManager;
use crate::models::audit::{AuditLogEntry, AuditLogEntryList};
use crate::models::filter::QueryFilter;

#[async_trait]
impl<D: AuditLogEntryDataManager> AuditLogEntryDataManager for TracedDataManager<D> {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_audit_log_entry(&self, entry_id: DbId) -> DbResult<AuditLogEntry> {
        tracing::debug!("get_audit_log_entry called");
        self.inner.get_audit_log_entry(entry_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_all_audit_log_entries_count(&self) -> DbResult<u64> {
        tracing::debug!("get_all_audit_log_entries_count called");
        self.inner.get_all_audit_log_entries_count().await
    }

    #[tracing::instrument(skip(self, results), level = "debug")]
    async fn get_all_audit_log_entries(
        &self,
        results: mpsc::Sender<Vec<AuditLogEntry>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        tracing::debug!("get_all_audit_log_entries called");
        self.inner
            .get_all_audit_log_entries(results, bucket_size)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_audit_log_entries(
        &self,
        filter: Option<&QueryFilter>,
    ) -> DbResult<AuditLogEntryList> {
        tracing::debug!("get_audit_log_entries called");
        self.inner.get_audit_log_entries(filter).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn log_successful_login_event(&self, user_id: DbId) {
        tracing::debug!("log_successful_login_event called");
        self.inner.log_successful_login_event(user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn log_banned_user_login_attempt_event(&self, user_id: DbId) {
        tracing::debug!("log_banned_user_login_attempt_event called");
        self.inner.log_banned_user_login_attempt_event(user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn log_unsuccessful_login_bad_password_event(&self, user_id: DbId) {
        tracing::debug!("log_unsuccessful_login_bad_password_event called");
        self.inner
            .log_unsuccessful_login_bad_password_event(user_id)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn log_unsuccessful_login_bad_two_factor_token_event(&self, user_id: DbId) {
        tracing::debug!("log_unsuccessful_login_bad_two_factor_token_event called");
        self.inner
            .log_unsuccessful_login_bad_two_factor_token_event(user_id)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn log_logout_event(&self, user_id: DbId) {
        tracing::debug!("log_logout_event called");
        self.inner.log_logout_event(user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn log_cycle_cookie_secret_event(&self, user_id: DbId) {
        tracing::debug!("log_cycle_cookie_secret_event called");
        self.inner.log_cycle_cookie_secret_event(user_id).await
    }
}

use async_trait::async_trait;
use tokio::sync::mpsc;
use todo_core::types::DbId;

use super::TracedDataManager;
use crate::error::DbResult;
use crate::managers::UserDataManager;
use crate::models::audit::AuditLogEntry;
use crate::models::filter::QueryFilter;
use crate::models::user::{
    User, UserAccountStatus, UserAccountStatusUpdateInput, UserCreationInput, UserList,
};
use crate::models::FieldChangeSummary;

#[async_trait]
impl<D: UserDataManager> UserDataManager for TracedDataManager<D> {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_user(&self, user_id: DbId) -> DbResult<User> {
        tracing::debug!("get_user called");
        self.inner.get_user(user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_user_with_unverified_two_factor_secret(&self, user_id: DbId) -> DbResult<User> {
        tracing::debug!("get_user_with_unverified_two_factor_secret called");
        self.inner
            .get_user_with_unverified_two_factor_secret(user_id)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_user_by_username(&self, username: &str) -> DbResult<User> {
        tracing::debug!("get_user_by_username called");
        self.inner.get_user_by_username(username).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn search_for_users_by_username(&self, username_prefix: &str) -> DbResult<Vec<User>> {
        tracing::debug!("search_for_users_by_username called");
        self.inner
            .search_for_users_by_username(username_prefix)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_all_users_count(&self) -> DbResult<u64> {
        tracing::debug!("get_all_users_count called");
        self.inner.get_all_users_count().await
    }

    #[tracing::instrument(skip(self, results), level = "debug")]
    async fn get_all_users(
        &self,
        results: mpsc::Sender<Vec<User>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        tracing::debug!("get_all_users called");
        self.inner.get_all_users(results, bucket_size).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_users(&self, filter: Option<&QueryFilter>) -> DbResult<UserList> {
        tracing::debug!("get_users called");
        self.inner.get_users(filter).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_users_for_admin(&self, filter: Option<&QueryFilter>) -> DbResult<UserList> {
        tracing::debug!("get_users_for_admin called");
        self.inner.get_users_for_admin(filter).await
    }

    #[tracing::instrument(skip(self, input), fields(username = %input.username), level = "debug")]
    async fn create_user(&self, input: &UserCreationInput) -> DbResult<User> {
        tracing::debug!("create_user called");
        self.inner.create_user(input).await
    }

    #[tracing::instrument(skip(self, updated, changes), fields(user_id = updated.id), level = "debug")]
    async fn update_user(&self, updated: &User, changes: &[FieldChangeSummary]) -> DbResult<()> {
        tracing::debug!("update_user called");
        self.inner.update_user(updated, changes).await
    }

    #[tracing::instrument(skip(self, new_hashed_password), level = "debug")]
    async fn update_user_password(
        &self,
        user_id: DbId,
        new_hashed_password: &str,
    ) -> DbResult<()> {
        tracing::debug!("update_user_password called");
        self.inner
            .update_user_password(user_id, new_hashed_password)
            .await
    }

    #[tracing::instrument(skip(self, new_secret), level = "debug")]
    async fn update_user_two_factor_secret(
        &self,
        user_id: DbId,
        new_secret: &str,
    ) -> DbResult<()> {
        tracing::debug!("update_user_two_factor_secret called");
        self.inner
            .update_user_two_factor_secret(user_id, new_secret)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn verify_user_two_factor_secret(&self, user_id: DbId) -> DbResult<()> {
        tracing::debug!("verify_user_two_factor_secret called");
        self.inner.verify_user_two_factor_secret(user_id).await
    }

    #[tracing::instrument(
        skip(self, input),
        fields(user_id = input.target_user_id, new_status = input.new_status.as_str()),
        level = "debug"
    )]
    async fn set_user_account_status(
        &self,
        changed_by: DbId,
        input: &UserAccountStatusUpdateInput,
    ) -> DbResult<()> {
        tracing::debug!("set_user_account_status called");
        self.inner.set_user_account_status(changed_by, input).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn user_has_status(
        &self,
        user_id: DbId,
        statuses: &[UserAccountStatus],
    ) -> DbResult<bool> {
        tracing::debug!("user_has_status called");
        self.inner.user_has_status(user_id, statuses).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn archive_user(&self, user_id: DbId) -> DbResult<()> {
        tracing::debug!("archive_user called");
        self.inner.archive_user(user_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_audit_log_entries_for_user(&self, user_id: DbId) -> DbResult<Vec<AuditLogEntry>> {
        tracing::debug!("get_audit_log_entries_for_user called");
        self.inner.get_audit_log_entries_for_user(user_id).await
    }

    #[tracing::instrument(skip(self, user), fields(user_id = user.id), level = "debug")]
    async fn log_user_creation_event(&self, user: &User) {
        tracing::debug!("log_user_creation_event called");
        self.inner.log_user_creation_event(user).await
    }

    #[tracing::instrument(skip(self, changes), level = "debug")]
    async fn log_user_update_event(&self, user_id: DbId, changes: &[FieldChangeSummary]) {
        tracing::debug!("log_user_update_event called");
        self.inner.log_user_update_event(user_id, changes).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn log_user_archive_event(&self, user_id: DbId) {
        tracing::debug!("log_user_archive_event called");
        self.inner.log_user_archive_event(user_id).await
    }

    #[tracing::instrument(skip(self, input), fields(user_id = input.target_user_id), level = "debug")]
    async fn log_user_account_status_change_event(
        &self,
        changed_by: DbId,
        input: &UserAccountStatusUpdateInput,
    ) {
        tracing::debug!("log_user_account_status_change_event called");
        self.inner
            .log_user_account_status_change_event(changed_by, input)
            .await
    }
}

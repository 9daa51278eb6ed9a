use async_trait::async_trait;
use todo_core::types::DbId;

use super::TracedDataManager;
use crate::error::DbResult;
use crate::managers::AccountSubscriptionPlanDataManager;
use crate::models::audit::AuditLogEntry;
use crate::models::filter::QueryFilter;
use crate::models::plan::{
    AccountSubscriptionPlan, AccountSubscriptionPlanCreationInput, AccountSubscriptionPlanList,
};
use crate::models::FieldChangeSummary;

#[async_trait]
impl<D: AccountSubscriptionPlanDataManager> AccountSubscriptionPlanDataManager
    for TracedDataManager<D>
{
    #[tracing::instrument(skip(self), level = "debug")]
    async fn account_subscription_plan_exists(&self, plan_id: DbId) -> DbResult<bool> {
        tracing::debug!("account_subscription_plan_exists called");
        self.inner.account_subscription_plan_exists(plan_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_account_subscription_plan(
        &self,
        plan_id: DbId,
    ) -> DbResult<AccountSubscriptionPlan> {
        tracing::debug!("get_account_subscription_plan called");
        self.inner.get_account_subscription_plan(plan_id).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_all_account_subscription_plans_count(&self) -> DbResult<u64> {
        tracing::debug!("get_all_account_subscription_plans_count called");
        self.inner.get_all_account_subscription_plans_count().await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_account_subscription_plans(
        &self,
        filter: Option<&QueryFilter>,
    ) -> DbResult<AccountSubscriptionPlanList> {
        tracing::debug!("get_account_subscription_plans called");
        self.inner.get_account_subscription_plans(filter).await
    }

    #[tracing::instrument(skip(self, input), fields(name = %input.name), level = "debug")]
    async fn create_account_subscription_plan(
        &self,
        input: &AccountSubscriptionPlanCreationInput,
    ) -> DbResult<AccountSubscriptionPlan> {
        tracing::debug!("create_account_subscription_plan called");
        self.inner.create_account_subscription_plan(input).await
    }

    #[tracing::instrument(skip(self, updated, changes), fields(plan_id = updated.id), level = "debug")]
    async fn update_account_subscription_plan(
        &self,
        updated: &AccountSubscriptionPlan,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()> {
        tracing::debug!("update_account_subscription_plan called");
        self.inner
            .update_account_subscription_plan(updated, changed_by, changes)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn archive_account_subscription_plan(
        &self,
        plan_id: DbId,
        archived_by: DbId,
    ) -> DbResult<()> {
        tracing::debug!("archive_account_subscription_plan called");
        self.inner
            .archive_account_subscription_plan(plan_id, archived_by)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn get_audit_log_entries_for_account_subscription_plan(
        &self,
        plan_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>> {
        tracing::debug!("get_audit_log_entries_for_account_subscription_plan called");
        self.inner
            .get_audit_log_entries_for_account_subscription_plan(plan_id)
            .await
    }

    #[tracing::instrument(skip(self, plan), fields(plan_id = plan.id), level = "debug")]
    async fn log_account_subscription_plan_creation_event(&self, plan: &AccountSubscriptionPlan) {
        tracing::debug!("log_account_subscription_plan_creation_event called");
        self.inner
            .log_account_subscription_plan_creation_event(plan)
            .await
    }

    #[tracing::instrument(skip(self, changes), level = "debug")]
    async fn log_account_subscription_plan_update_event(
        &self,
        user_id: DbId,
        plan_id: DbId,
        changes: &[FieldChangeSummary],
    ) {
        tracing::debug!("log_account_subscription_plan_update_event called");
        self.inner
            .log_account_subscription_plan_update_event(user_id, plan_id, changes)
            .await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn log_account_subscription_plan_archive_event(&self, user_id: DbId, plan_id: DbId) {
        tracing::debug!("log_account_subscription_plan_archive_event called");
        self.inner
            .log_account_subscription_plan_archive_event(user_id, plan_id)
            .await
    }
}

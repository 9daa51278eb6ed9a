use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use todo_core::audit::{event_types, keys};
use todo_core::types::DbId;

use super::manager::EntityConfig;
use super::scan::{decode_error, optional_timestamp_at, timestamp_at};
use super::SqlQuerier;
use crate::audit::AuditEntry;
use crate::connection::QueryArg;
use crate::error::DbResult;
use crate::managers::AccountSubscriptionPlanDataManager;
use crate::models::audit::AuditLogEntry;
use crate::models::filter::QueryFilter;
use crate::models::plan::{
    AccountSubscriptionPlan, AccountSubscriptionPlanCreationInput, AccountSubscriptionPlanList,
};
use crate::models::FieldChangeSummary;
use crate::querybuilding::tables::PLANS;
use crate::querybuilding::ColumnValues;

pub(super) static PLAN_CONFIG: EntityConfig<AccountSubscriptionPlan> = EntityConfig {
    table: &PLANS,
    scan: scan_plan,
};

fn scan_plan(row: &SqliteRow) -> Result<AccountSubscriptionPlan, sqlx::Error> {
    let period_secs: i64 = row.try_get(4)?;
    let period = u64::try_from(period_secs)
        .map(Duration::from_secs)
        .map_err(|_| decode_error(4, format!("negative plan period: {period_secs}")))?;

    Ok(AccountSubscriptionPlan {
        id: row.try_get(0)?,
        name: row.try_get(1)?,
        description: row.try_get(2)?,
        price: row.try_get(3)?,
        period,
        created_on: timestamp_at(row, 5)?,
        last_updated_on: optional_timestamp_at(row, 6)?,
        archived_on: optional_timestamp_at(row, 7)?,
    })
}

fn plan_values(name: &str, description: &str, price: u32, period: Duration) -> ColumnValues {
    let period_secs = i64::try_from(period.as_secs()).unwrap_or(i64::MAX);
    vec![
        ("name", name.into()),
        ("description", description.into()),
        ("price", price.into()),
        ("period", QueryArg::Int(period_secs)),
    ]
}

#[async_trait]
impl AccountSubscriptionPlanDataManager for SqlQuerier {
    async fn account_subscription_plan_exists(&self, plan_id: DbId) -> DbResult<bool> {
        self.manager(&PLAN_CONFIG).exists(plan_id, None).await
    }

    async fn get_account_subscription_plan(
        &self,
        plan_id: DbId,
    ) -> DbResult<AccountSubscriptionPlan> {
        self.manager(&PLAN_CONFIG).get(plan_id, None).await
    }

    async fn get_all_account_subscription_plans_count(&self) -> DbResult<u64> {
        self.manager(&PLAN_CONFIG).count(false).await
    }

    async fn get_account_subscription_plans(
        &self,
        filter: Option<&QueryFilter>,
    ) -> DbResult<AccountSubscriptionPlanList> {
        self.manager(&PLAN_CONFIG).list(None, false, filter).await
    }

    async fn create_account_subscription_plan(
        &self,
        input: &AccountSubscriptionPlanCreationInput,
    ) -> DbResult<AccountSubscriptionPlan> {
        let created_on = self.clock.now();
        let mut values = plan_values(&input.name, &input.description, input.price, input.period);
        values.push(("created_on", created_on.into()));
        let id = self.manager(&PLAN_CONFIG).insert(&values).await?;

        let plan = AccountSubscriptionPlan {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price,
            period: input.period,
            created_on,
            last_updated_on: None,
            archived_on: None,
        };
        self.log_account_subscription_plan_creation_event(&plan)
            .await;
        Ok(plan)
    }

    async fn update_account_subscription_plan(
        &self,
        updated: &AccountSubscriptionPlan,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()> {
        let values = plan_values(
            &updated.name,
            &updated.description,
            updated.price,
            updated.period,
        );
        self.manager(&PLAN_CONFIG)
            .update(updated.id, None, &values)
            .await?;
        self.log_account_subscription_plan_update_event(changed_by, updated.id, changes)
            .await;
        Ok(())
    }

    async fn archive_account_subscription_plan(
        &self,
        plan_id: DbId,
        archived_by: DbId,
    ) -> DbResult<()> {
        self.manager(&PLAN_CONFIG).archive(plan_id, None).await?;
        self.log_account_subscription_plan_archive_event(archived_by, plan_id)
            .await;
        Ok(())
    }

    async fn get_audit_log_entries_for_account_subscription_plan(
        &self,
        plan_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>> {
        self.audit_log_entries_for(&[keys::PLAN], plan_id).await
    }

    async fn log_account_subscription_plan_creation_event(&self, plan: &AccountSubscriptionPlan) {
        self.append_audit_entry(
            AuditEntry::new(event_types::PLAN_CREATED)
                .with_id(keys::PLAN, plan.id)
                .with_creation(plan),
        )
        .await;
    }

    async fn log_account_subscription_plan_update_event(
        &self,
        user_id: DbId,
        plan_id: DbId,
        changes: &[FieldChangeSummary],
    ) {
        self.append_audit_entry(
            AuditEntry::new(event_types::PLAN_UPDATED)
                .with_actor(user_id)
                .with_id(keys::PLAN, plan_id)
                .with_changes(changes),
        )
        .await;
    }

    async fn log_account_subscription_plan_archive_event(&self, user_id: DbId, plan_id: DbId) {
        self.append_audit_entry(
            AuditEntry::new(event_types::PLAN_ARCHIVED)
                .with_actor(user_id)
                .with_id(keys::PLAN, plan_id),
        )
        .await;
    }
}

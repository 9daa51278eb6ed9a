use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tokio::sync::mpsc;
use todo_core::audit::{event_types, keys};
use todo_core::types::DbId;

use super::executor;
use super::manager::EntityConfig;
use super::scan::{decode_error, optional_timestamp_at, timestamp_at};
use super::SqlQuerier;
use crate::audit::AuditEntry;
use crate::error::DbResult;
use crate::managers::UserDataManager;
use crate::models::audit::AuditLogEntry;
use crate::models::filter::QueryFilter;
use crate::models::user::{
    User, UserAccountStatus, UserAccountStatusUpdateInput, UserCreationInput, UserList,
};
use crate::models::FieldChangeSummary;
use crate::querybuilding::tables::USERS;

pub(super) static USER_CONFIG: EntityConfig<User> = EntityConfig {
    table: &USERS,
    scan: scan_user,
};

fn scan_user(row: &SqliteRow) -> Result<User, sqlx::Error> {
    let status: String = row.try_get(11)?;
    let account_status = status
        .parse::<UserAccountStatus>()
        .map_err(|e| decode_error(11, e))?;

    Ok(User {
        id: row.try_get(0)?,
        username: row.try_get(1)?,
        avatar_src: row.try_get(2)?,
        hashed_password: row.try_get(3)?,
        salt: row.try_get(4)?,
        requires_password_change: row.try_get(5)?,
        password_last_changed_on: optional_timestamp_at(row, 6)?,
        two_factor_secret: row.try_get(7)?,
        two_factor_secret_verified_on: optional_timestamp_at(row, 8)?,
        is_site_admin: row.try_get(9)?,
        admin_permissions: row.try_get(10)?,
        account_status,
        account_status_explanation: row.try_get(12)?,
        created_on: timestamp_at(row, 13)?,
        last_updated_on: optional_timestamp_at(row, 14)?,
        archived_on: optional_timestamp_at(row, 15)?,
    })
}

/// Event type recorded when a user's account status changes.
fn status_change_event_type(status: UserAccountStatus) -> &'static str {
    match status {
        UserAccountStatus::Banned => event_types::USER_BANNED,
        UserAccountStatus::Terminated => event_types::USER_ACCOUNT_TERMINATED,
        UserAccountStatus::Unverified | UserAccountStatus::GoodStanding => {
            event_types::USER_ACCOUNT_STATUS_CHANGED
        }
    }
}

#[async_trait]
impl UserDataManager for SqlQuerier {
    async fn get_user(&self, user_id: DbId) -> DbResult<User> {
        let query = self.builder.build_get_user_query(user_id, true);
        self.manager(&USER_CONFIG)
            .fetch_one(&query, "fetching")
            .await
    }

    async fn get_user_with_unverified_two_factor_secret(&self, user_id: DbId) -> DbResult<User> {
        let query = self.builder.build_get_user_query(user_id, false);
        self.manager(&USER_CONFIG)
            .fetch_one(&query, "fetching unverified")
            .await
    }

    async fn get_user_by_username(&self, username: &str) -> DbResult<User> {
        self.manager(&USER_CONFIG)
            .get_by_column("username", username.into())
            .await
    }

    async fn search_for_users_by_username(&self, username_prefix: &str) -> DbResult<Vec<User>> {
        let query = self
            .builder
            .build_search_users_by_username_query(username_prefix);
        self.manager(&USER_CONFIG)
            .fetch_all(&query, "searching")
            .await
    }

    async fn get_all_users_count(&self) -> DbResult<u64> {
        self.manager(&USER_CONFIG).count(false).await
    }

    async fn get_all_users(
        &self,
        results: mpsc::Sender<Vec<User>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        self.manager(&USER_CONFIG)
            .stream_all(results, bucket_size)
            .await
    }

    async fn get_users(&self, filter: Option<&QueryFilter>) -> DbResult<UserList> {
        self.manager(&USER_CONFIG).list(None, false, filter).await
    }

    async fn get_users_for_admin(&self, filter: Option<&QueryFilter>) -> DbResult<UserList> {
        self.manager(&USER_CONFIG).list(None, true, filter).await
    }

    async fn create_user(&self, input: &UserCreationInput) -> DbResult<User> {
        let created_on = self.clock.now();
        let status = UserAccountStatus::Unverified;
        let id = self
            .manager(&USER_CONFIG)
            .insert(&vec![
                ("username", input.username.as_str().into()),
                ("hashed_password", input.hashed_password.as_str().into()),
                ("salt", input.salt.clone().into()),
                ("requires_password_change", false.into()),
                ("two_factor_secret", input.two_factor_secret.as_str().into()),
                ("is_site_admin", false.into()),
                ("admin_permissions", 0_i64.into()),
                ("account_status", status.as_str().into()),
                ("account_status_explanation", "".into()),
                ("created_on", created_on.into()),
            ])
            .await?;

        let user = User {
            id,
            username: input.username.clone(),
            avatar_src: None,
            hashed_password: input.hashed_password.clone(),
            salt: input.salt.clone(),
            requires_password_change: false,
            password_last_changed_on: None,
            two_factor_secret: input.two_factor_secret.clone(),
            two_factor_secret_verified_on: None,
            is_site_admin: false,
            admin_permissions: 0,
            account_status: status,
            account_status_explanation: String::new(),
            created_on,
            last_updated_on: None,
            archived_on: None,
        };
        self.log_user_creation_event(&user).await;
        Ok(user)
    }

    async fn update_user(&self, updated: &User, changes: &[FieldChangeSummary]) -> DbResult<()> {
        self.manager(&USER_CONFIG)
            .update(
                updated.id,
                None,
                &vec![
                    ("username", updated.username.as_str().into()),
                    ("avatar_src", updated.avatar_src.as_deref().into()),
                    ("is_site_admin", updated.is_site_admin.into()),
                    ("admin_permissions", updated.admin_permissions.into()),
                ],
            )
            .await?;
        self.log_user_update_event(updated.id, changes).await;
        Ok(())
    }

    async fn update_user_password(
        &self,
        user_id: DbId,
        new_hashed_password: &str,
    ) -> DbResult<()> {
        let query = self
            .builder
            .build_update_user_password_query(user_id, new_hashed_password);
        self.manager(&USER_CONFIG)
            .write(&query, "updating password for")
            .await?;
        self.append_audit_entry(
            AuditEntry::new(event_types::USER_PASSWORD_UPDATED)
                .with_actor(user_id)
                .with_id(keys::USER, user_id),
        )
        .await;
        Ok(())
    }

    async fn update_user_two_factor_secret(
        &self,
        user_id: DbId,
        new_secret: &str,
    ) -> DbResult<()> {
        let query = self
            .builder
            .build_update_user_two_factor_secret_query(user_id, new_secret);
        self.manager(&USER_CONFIG)
            .write(&query, "updating two factor secret for")
            .await?;
        self.append_audit_entry(
            AuditEntry::new(event_types::USER_TWO_FACTOR_SECRET_CHANGED)
                .with_actor(user_id)
                .with_id(keys::USER, user_id),
        )
        .await;
        Ok(())
    }

    async fn verify_user_two_factor_secret(&self, user_id: DbId) -> DbResult<()> {
        let query = self
            .builder
            .build_verify_user_two_factor_secret_query(user_id);
        self.manager(&USER_CONFIG)
            .write(&query, "verifying two factor secret for")
            .await?;
        self.append_audit_entry(
            AuditEntry::new(event_types::USER_TWO_FACTOR_SECRET_VERIFIED)
                .with_actor(user_id)
                .with_id(keys::USER, user_id),
        )
        .await;
        Ok(())
    }

    async fn set_user_account_status(
        &self,
        changed_by: DbId,
        input: &UserAccountStatusUpdateInput,
    ) -> DbResult<()> {
        let query = self.builder.build_set_user_account_status_query(
            input.target_user_id,
            input.new_status.as_str(),
            &input.reason,
        );
        self.manager(&USER_CONFIG)
            .write(&query, "setting account status for")
            .await?;
        self.log_user_account_status_change_event(changed_by, input)
            .await;
        Ok(())
    }

    async fn user_has_status(
        &self,
        user_id: DbId,
        statuses: &[UserAccountStatus],
    ) -> DbResult<bool> {
        let statuses: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
        let query = self.builder.build_user_has_status_query(user_id, &statuses);
        executor::perform_boolean_query(
            self.db.as_ref(),
            USERS.entity,
            &query,
            "executing user status check query",
        )
        .await
    }

    async fn archive_user(&self, user_id: DbId) -> DbResult<()> {
        self.manager(&USER_CONFIG).archive(user_id, None).await?;
        self.log_user_archive_event(user_id).await;
        Ok(())
    }

    async fn get_audit_log_entries_for_user(&self, user_id: DbId) -> DbResult<Vec<AuditLogEntry>> {
        self.audit_log_entries_for(&[keys::USER, keys::ACTOR], user_id)
            .await
    }

    async fn log_user_creation_event(&self, user: &User) {
        self.append_audit_entry(
            AuditEntry::new(event_types::USER_CREATED)
                .with_actor(user.id)
                .with_id(keys::USER, user.id)
                .with_creation(user),
        )
        .await;
    }

    async fn log_user_update_event(&self, user_id: DbId, changes: &[FieldChangeSummary]) {
        self.append_audit_entry(
            AuditEntry::new(event_types::USER_UPDATED)
                .with_actor(user_id)
                .with_id(keys::USER, user_id)
                .with_changes(changes),
        )
        .await;
    }

    async fn log_user_archive_event(&self, user_id: DbId) {
        self.append_audit_entry(
            AuditEntry::new(event_types::USER_ARCHIVED)
                .with_actor(user_id)
                .with_id(keys::USER, user_id),
        )
        .await;
    }

    async fn log_user_account_status_change_event(
        &self,
        changed_by: DbId,
        input: &UserAccountStatusUpdateInput,
    ) {
        self.append_audit_entry(
            AuditEntry::new(status_change_event_type(input.new_status))
                .with_actor(changed_by)
                .with_id(keys::USER, input.target_user_id)
                .with_reason(&input.reason),
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banning_records_a_ban_event() {
        assert_eq!(
            status_change_event_type(UserAccountStatus::Banned),
            event_types::USER_BANNED
        );
        assert_eq!(
            status_change_event_type(UserAccountStatus::GoodStanding),
            event_types::USER_ACCOUNT_STATUS_CHANGED
        );
    }
}

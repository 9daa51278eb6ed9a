use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tokio::sync::mpsc;
use todo_core::audit::{event_types, keys};
use todo_core::types::DbId;

use super::manager::EntityConfig;
use super::scan::{decode_error, timestamp_at};
use super::SqlQuerier;
use crate::audit::AuditEntry;
use crate::error::DbResult;
use crate::managers::AuditLogEntryDataManager;
use crate::models::audit::{AuditLogEntry, AuditLogEntryList};
use crate::models::filter::QueryFilter;
use crate::querybuilding::tables::AUDIT_LOG;

pub(super) static AUDIT_LOG_ENTRY_CONFIG: EntityConfig<AuditLogEntry> = EntityConfig {
    table: &AUDIT_LOG,
    scan: scan_audit_log_entry,
};

fn scan_audit_log_entry(row: &SqliteRow) -> Result<AuditLogEntry, sqlx::Error> {
    let raw_context: String = row.try_get(2)?;
    let context = serde_json::from_str(&raw_context).map_err(|e| decode_error(2, e.to_string()))?;

    Ok(AuditLogEntry {
        id: row.try_get(0)?,
        event_type: row.try_get(1)?,
        context,
        created_on: timestamp_at(row, 3)?,
    })
}

impl SqlQuerier {
    async fn log_auth_event(&self, event_type: &'static str, user_id: DbId) {
        self.append_audit_entry(
            AuditEntry::new(event_type)
                .with_actor(user_id)
                .with_id(keys::USER, user_id),
        )
        .await;
    }
}

#[async_trait]
impl AuditLogEntryDataManager for SqlQuerier {
    async fn get_audit_log_entry(&self, entry_id: DbId) -> DbResult<AuditLogEntry> {
        self.manager(&AUDIT_LOG_ENTRY_CONFIG)
            .get(entry_id, None)
            .await
    }

    async fn get_all_audit_log_entries_count(&self) -> DbResult<u64> {
        self.manager(&AUDIT_LOG_ENTRY_CONFIG).count(false).await
    }

    async fn get_all_audit_log_entries(
        &self,
        results: mpsc::Sender<Vec<AuditLogEntry>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        self.manager(&AUDIT_LOG_ENTRY_CONFIG)
            .stream_all(results, bucket_size)
            .await
    }

    async fn get_audit_log_entries(
        &self,
        filter: Option<&QueryFilter>,
    ) -> DbResult<AuditLogEntryList> {
        self.manager(&AUDIT_LOG_ENTRY_CONFIG)
            .list(None, true, filter)
            .await
    }

    async fn log_successful_login_event(&self, user_id: DbId) {
        self.log_auth_event(event_types::SUCCESSFUL_LOGIN, user_id)
            .await;
    }

    async fn log_banned_user_login_attempt_event(&self, user_id: DbId) {
        self.log_auth_event(event_types::BANNED_USER_LOGIN_ATTEMPT, user_id)
            .await;
    }

    async fn log_unsuccessful_login_bad_password_event(&self, user_id: DbId) {
        self.log_auth_event(event_types::UNSUCCESSFUL_LOGIN_BAD_PASSWORD, user_id)
            .await;
    }

    async fn log_unsuccessful_login_bad_two_factor_token_event(&self, user_id: DbId) {
        self.log_auth_event(event_types::UNSUCCESSFUL_LOGIN_BAD_TWO_FACTOR_TOKEN, user_id)
            .await;
    }

    async fn log_logout_event(&self, user_id: DbId) {
        self.log_auth_event(event_types::LOGOUT, user_id).await;
    }

    async fn log_cycle_cookie_secret_event(&self, user_id: DbId) {
        self.log_auth_event(event_types::CYCLE_COOKIE_SECRET, user_id)
            .await;
    }
}

//! SQL-backed implementation of the capability traits.

mod accounts;
mod api_clients;
mod audit_log;
mod batch;
mod executor;
mod items;
mod manager;
mod oauth2_clients;
mod plans;
mod scan;
mod users;
mod webhooks;

use std::sync::Arc;

use sqlx::SqlitePool;
use todo_core::types::DbId;

use crate::audit::{AuditEntry, AuditLogAppender};
use crate::clock::{Clock, SystemClock};
use crate::config::DbConfig;
use crate::connection::Connection;
use crate::error::DbResult;
use crate::models::audit::AuditLogEntry;
use crate::querybuilding::{SqlQueryBuilder, SqliteQueryBuilder};

use manager::{EntityConfig, Manager};

/// The database-backed [`DataManager`](crate::managers::DataManager).
///
/// Holds no state of its own beyond shared handles; every call goes to the
/// store.
pub struct SqlQuerier {
    db: Arc<dyn Connection>,
    builder: Arc<dyn SqlQueryBuilder>,
    clock: Arc<dyn Clock>,
    appender: AuditLogAppender,
    batch_size: u16,
}

impl SqlQuerier {
    /// Wire a querier over a SQLite pool with the system clock.
    pub fn new(pool: SqlitePool, config: &DbConfig) -> Self {
        Self::with_parts(
            Arc::new(pool),
            Arc::new(SqliteQueryBuilder),
            Arc::new(SystemClock),
            config.batch_size,
        )
    }

    /// Wire a querier from individually supplied collaborators.
    pub fn with_parts(
        db: Arc<dyn Connection>,
        builder: Arc<dyn SqlQueryBuilder>,
        clock: Arc<dyn Clock>,
        batch_size: u16,
    ) -> Self {
        let appender = AuditLogAppender::new(
            Arc::clone(&db),
            Arc::clone(&builder),
            Arc::clone(&clock),
        );
        Self {
            db,
            builder,
            clock,
            appender,
            batch_size,
        }
    }

    fn manager<E: Send + 'static>(&self, config: &'static EntityConfig<E>) -> Manager<E> {
        Manager {
            config,
            db: Arc::clone(&self.db),
            builder: Arc::clone(&self.builder),
            batch_size: self.batch_size,
        }
    }

    async fn append_audit_entry(&self, entry: AuditEntry) {
        self.appender.append(entry).await;
    }

    /// Audit entries whose context carries `id` under any of `keys`.
    async fn audit_log_entries_for(&self, keys: &[&str], id: DbId) -> DbResult<Vec<AuditLogEntry>> {
        let query = self.builder.build_audit_log_entries_for_keys_query(keys, id);
        self.manager(&audit_log::AUDIT_LOG_ENTRY_CONFIG)
            .fetch_all(&query, "fetching")
            .await
    }
}

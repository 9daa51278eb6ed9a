//! Audit log appender.
//!
//! [`AuditEntry`] builds the event payload; [`AuditLogAppender`] persists it.
//! Appending is best-effort: a failed write is logged and swallowed so the
//! mutation that triggered it still succeeds.

use std::sync::Arc;

use serde::Serialize;
use todo_core::audit::{event_category, keys, redact_sensitive_fields};
use todo_core::types::DbId;

use crate::clock::Clock;
use crate::connection::Connection;
use crate::models::audit::AuditLogEntryCreationInput;
use crate::models::FieldChangeSummary;
use crate::querybuilding::SqlQueryBuilder;

// ---------------------------------------------------------------------------
// AuditEntry
// ---------------------------------------------------------------------------

/// An audit event under construction.
///
/// Created via [`AuditEntry::new`] and enriched with the builder methods
/// before being turned into an [`AuditLogEntryCreationInput`].
#[derive(Debug, Clone)]
pub struct AuditEntry {
    event_type: &'static str,
    context: serde_json::Map<String, serde_json::Value>,
}

impl AuditEntry {
    pub fn new(event_type: &'static str) -> Self {
        Self {
            event_type,
            context: serde_json::Map::new(),
        }
    }

    /// Record the acting user.
    pub fn with_actor(self, user_id: DbId) -> Self {
        self.with_id(keys::ACTOR, user_id)
    }

    /// Record an entity or user ID under `key`.
    pub fn with_id(mut self, key: &str, id: DbId) -> Self {
        self.context.insert(key.to_string(), id.into());
        self
    }

    /// Record the created entity. Values that fail to serialize become `null`.
    pub fn with_creation(mut self, created: &impl Serialize) -> Self {
        let value = serde_json::to_value(created).unwrap_or(serde_json::Value::Null);
        self.context.insert(keys::CREATION.to_string(), value);
        self
    }

    pub fn with_changes(mut self, changes: &[FieldChangeSummary]) -> Self {
        let value = serde_json::to_value(changes).unwrap_or(serde_json::Value::Null);
        self.context.insert(keys::CHANGES.to_string(), value);
        self
    }

    pub fn with_reason(mut self, reason: &str) -> Self {
        self.context
            .insert(keys::REASON.to_string(), reason.to_string().into());
        self
    }

    pub fn build(self) -> AuditLogEntryCreationInput {
        AuditLogEntryCreationInput {
            event_type: self.event_type.to_string(),
            context: serde_json::Value::Object(self.context),
        }
    }
}

// ---------------------------------------------------------------------------
// AuditLogAppender
// ---------------------------------------------------------------------------

/// Persists audit entries next to the mutation that produced them.
#[derive(Clone)]
pub(crate) struct AuditLogAppender {
    db: Arc<dyn Connection>,
    builder: Arc<dyn SqlQueryBuilder>,
    clock: Arc<dyn Clock>,
}

impl AuditLogAppender {
    pub(crate) fn new(
        db: Arc<dyn Connection>,
        builder: Arc<dyn SqlQueryBuilder>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { db, builder, clock }
    }

    /// Write one entry. Failures are logged, never returned.
    pub(crate) async fn append(&self, entry: AuditEntry) {
        let mut input = entry.build();
        input.context = redact_sensitive_fields(&input.context);

        let query = self
            .builder
            .build_create_audit_log_entry_query(&input, self.clock.now());
        match self.db.execute(&query).await {
            Ok(result) => tracing::debug!(
                audit_log_entry_id = result.last_insert_id,
                event_type = %input.event_type,
                category = event_category(&input.event_type),
                "Appended audit log entry"
            ),
            Err(e) => tracing::error!(
                error = %e,
                event_type = %input.event_type,
                "Failed to append audit log entry"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

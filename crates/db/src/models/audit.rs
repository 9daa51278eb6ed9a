//! Audit log entry model and DTOs.
//!
//! Entries are append-only: there is no update input and no archive column.

use serde::{Deserialize, Serialize};
use todo_core::types::{DbId, Timestamp};

use super::filter::Paginated;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLogEntry {
    pub id: DbId,
    pub event_type: String,
    pub context: serde_json::Value,
    pub created_on: Timestamp,
}

pub type AuditLogEntryList = Paginated<AuditLogEntry>;

/// DTO for appending an entry. The context must be a JSON object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuditLogEntryCreationInput {
    pub event_type: String,
    pub context: serde_json::Value,
}

impl AuditLogEntry {
    /// Read an integer ID stored under `key` in the context.
    pub fn context_id(&self, key: &str) -> Option<DbId> {
        self.context.get(key).and_then(serde_json::Value::as_i64)
    }
}

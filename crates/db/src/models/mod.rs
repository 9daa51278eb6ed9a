//! Domain model structs and DTOs.
//!
//! Each entity submodule contains:
//! - The entity struct as it is stored and returned
//! - A creation input carrying the caller-supplied fields
//! - An update input (all `Option` fields) with an `update` method on the
//!   entity that applies it and reports the changed fields

pub mod account;
pub mod api_client;
pub mod audit;
pub mod filter;
pub mod item;
pub mod oauth2_client;
pub mod plan;
pub mod user;
pub mod webhook;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Change summaries
// ---------------------------------------------------------------------------

/// One changed field, as recorded in update audit entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChangeSummary {
    pub field_name: String,
    pub old_value: serde_json::Value,
    pub new_value: serde_json::Value,
}

/// Assign `new` to `field` when it differs, recording the change.
pub(crate) fn apply_change<T>(
    changes: &mut Vec<FieldChangeSummary>,
    field_name: &str,
    field: &mut T,
    new: Option<&T>,
) where
    T: Clone + PartialEq + Serialize,
{
    let Some(new) = new else { return };
    if field == new {
        return;
    }
    changes.push(FieldChangeSummary {
        field_name: field_name.to_string(),
        old_value: serde_json::to_value(&*field).unwrap_or(serde_json::Value::Null),
        new_value: serde_json::to_value(new).unwrap_or(serde_json::Value::Null),
    });
    *field = new.clone();
}

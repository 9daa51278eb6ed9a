//! Item entity model and DTOs.

use serde::{Deserialize, Serialize};
use todo_core::types::{DbId, Timestamp};

use super::filter::Paginated;
use super::{apply_change, FieldChangeSummary};

/// A todo item. Owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: DbId,
    pub name: String,
    pub details: String,
    pub created_on: Timestamp,
    pub last_updated_on: Option<Timestamp>,
    pub archived_on: Option<Timestamp>,
    pub belongs_to_user: DbId,
}

pub type ItemList = Paginated<Item>;

/// Input for creating an item.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemCreationInput {
    pub name: String,
    pub details: String,
    pub belongs_to_user: DbId,
}

/// Partial update for an item. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemUpdateInput {
    pub name: Option<String>,
    pub details: Option<String>,
}

impl Item {
    /// Apply an update input, returning the fields that actually changed.
    pub fn update(&mut self, input: &ItemUpdateInput) -> Vec<FieldChangeSummary> {
        let mut changes = Vec::new();
        apply_change(&mut changes, "name", &mut self.name, input.name.as_ref());
        apply_change(&mut changes, "details", &mut self.details, input.details.as_ref());
        changes
    }
}

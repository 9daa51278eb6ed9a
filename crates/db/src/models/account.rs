//! Account entity model and DTOs.

use serde::{Deserialize, Serialize};
use todo_core::types::{DbId, Timestamp};

use super::filter::Paginated;
use super::{apply_change, FieldChangeSummary};

/// A tenancy boundary owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: DbId,
    pub name: String,
    pub plan_id: Option<DbId>,
    pub default_user_permissions: i64,
    pub created_on: Timestamp,
    pub last_updated_on: Option<Timestamp>,
    pub archived_on: Option<Timestamp>,
    pub belongs_to_user: DbId,
}

pub type AccountList = Paginated<Account>;

#[derive(Debug, Clone, Deserialize)]
pub struct AccountCreationInput {
    pub name: String,
    pub plan_id: Option<DbId>,
    pub default_user_permissions: i64,
    pub belongs_to_user: DbId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountUpdateInput {
    pub name: Option<String>,
    pub plan_id: Option<Option<DbId>>,
    pub default_user_permissions: Option<i64>,
}

impl Account {
    pub fn update(&mut self, input: &AccountUpdateInput) -> Vec<FieldChangeSummary> {
        let mut changes = Vec::new();
        apply_change(&mut changes, "name", &mut self.name, input.name.as_ref());
        apply_change(&mut changes, "plan_id", &mut self.plan_id, input.plan_id.as_ref());
        apply_change(
            &mut changes,
            "default_user_permissions",
            &mut self.default_user_permissions,
            input.default_user_permissions.as_ref(),
        );
        changes
    }
}

//! Account subscription plan model and DTOs. Plans are global.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use todo_core::types::{DbId, Timestamp};

use super::filter::Paginated;
use super::{apply_change, FieldChangeSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSubscriptionPlan {
    pub id: DbId,
    pub name: String,
    pub description: String,
    /// Price in the smallest currency unit.
    pub price: u32,
    /// Billing period, stored as whole seconds.
    pub period: Duration,
    pub created_on: Timestamp,
    pub last_updated_on: Option<Timestamp>,
    pub archived_on: Option<Timestamp>,
}

pub type AccountSubscriptionPlanList = Paginated<AccountSubscriptionPlan>;

#[derive(Debug, Clone, Deserialize)]
pub struct AccountSubscriptionPlanCreationInput {
    pub name: String,
    pub description: String,
    pub price: u32,
    pub period: Duration,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountSubscriptionPlanUpdateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<u32>,
    pub period: Option<Duration>,
}

impl AccountSubscriptionPlan {
    pub fn update(&mut self, input: &AccountSubscriptionPlanUpdateInput) -> Vec<FieldChangeSummary> {
        let mut changes = Vec::new();
        apply_change(&mut changes, "name", &mut self.name, input.name.as_ref());
        apply_change(
            &mut changes,
            "description",
            &mut self.description,
            input.description.as_ref(),
        );
        apply_change(&mut changes, "price", &mut self.price, input.price.as_ref());
        apply_change(&mut changes, "period", &mut self.period, input.period.as_ref());
        changes
    }
}

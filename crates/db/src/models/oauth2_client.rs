//! OAuth2 client model and DTOs.

use serde::{Deserialize, Serialize};
use todo_core::types::{DbId, Timestamp};

use super::filter::Paginated;
use super::{apply_change, FieldChangeSummary};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OAuth2Client {
    pub id: DbId,
    pub name: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub redirect_uri: String,
    /// Stored comma-joined.
    pub scopes: Vec<String>,
    pub created_on: Timestamp,
    pub last_updated_on: Option<Timestamp>,
    pub archived_on: Option<Timestamp>,
    pub belongs_to_user: DbId,
}

pub type OAuth2ClientList = Paginated<OAuth2Client>;

#[derive(Debug, Clone, Deserialize)]
pub struct OAuth2ClientCreationInput {
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub belongs_to_user: DbId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuth2ClientUpdateInput {
    pub name: Option<String>,
    pub redirect_uri: Option<String>,
    pub scopes: Option<Vec<String>>,
}

impl OAuth2Client {
    pub fn update(&mut self, input: &OAuth2ClientUpdateInput) -> Vec<FieldChangeSummary> {
        let mut changes = Vec::new();
        apply_change(&mut changes, "name", &mut self.name, input.name.as_ref());
        apply_change(
            &mut changes,
            "redirect_uri",
            &mut self.redirect_uri,
            input.redirect_uri.as_ref(),
        );
        apply_change(&mut changes, "scopes", &mut self.scopes, input.scopes.as_ref());
        changes
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope || s == "*")
    }
}

//! API client model and DTOs. API clients are never updated, only archived.

use serde::{Deserialize, Serialize};
use todo_core::types::{DbId, Timestamp};

use super::filter::Paginated;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiClient {
    pub id: DbId,
    pub name: String,
    pub client_id: String,
    /// NEVER serialize this.
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub created_on: Timestamp,
    pub last_updated_on: Option<Timestamp>,
    pub archived_on: Option<Timestamp>,
    pub belongs_to_user: DbId,
}

pub type ApiClientList = Paginated<ApiClient>;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiClientCreationInput {
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub belongs_to_user: DbId,
}

//! User entity model and DTOs.
//!
//! Credentials (`hashed_password`, `salt`, `two_factor_secret`) are never
//! serialized. A user whose two-factor secret has not been verified is only
//! visible through the dedicated unverified lookup.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use todo_core::types::{DbId, Timestamp};

use super::filter::Paginated;
use super::{apply_change, FieldChangeSummary};

// ---------------------------------------------------------------------------
// Account status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAccountStatus {
    Unverified,
    #[serde(rename = "good")]
    GoodStanding,
    Banned,
    Terminated,
}

impl UserAccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserAccountStatus::Unverified => "unverified",
            UserAccountStatus::GoodStanding => "good",
            UserAccountStatus::Banned => "banned",
            UserAccountStatus::Terminated => "terminated",
        }
    }
}

impl FromStr for UserAccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unverified" => Ok(UserAccountStatus::Unverified),
            "good" => Ok(UserAccountStatus::GoodStanding),
            "banned" => Ok(UserAccountStatus::Banned),
            "terminated" => Ok(UserAccountStatus::Terminated),
            other => Err(format!("unknown user account status: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub avatar_src: Option<String>,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    #[serde(skip_serializing)]
    pub salt: Vec<u8>,
    pub requires_password_change: bool,
    pub password_last_changed_on: Option<Timestamp>,
    #[serde(skip_serializing)]
    pub two_factor_secret: String,
    pub two_factor_secret_verified_on: Option<Timestamp>,
    pub is_site_admin: bool,
    pub admin_permissions: i64,
    pub account_status: UserAccountStatus,
    pub account_status_explanation: String,
    pub created_on: Timestamp,
    pub last_updated_on: Option<Timestamp>,
    pub archived_on: Option<Timestamp>,
}

pub type UserList = Paginated<User>;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for creating a user. The password must already be hashed.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreationInput {
    pub username: String,
    pub hashed_password: String,
    pub salt: Vec<u8>,
    pub two_factor_secret: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdateInput {
    pub username: Option<String>,
    pub avatar_src: Option<Option<String>>,
    pub is_site_admin: Option<bool>,
    pub admin_permissions: Option<i64>,
}

/// A request to change another user's account status.
#[derive(Debug, Clone, Deserialize)]
pub struct UserAccountStatusUpdateInput {
    pub target_user_id: DbId,
    pub new_status: UserAccountStatus,
    pub reason: String,
}

impl User {
    pub fn update(&mut self, input: &UserUpdateInput) -> Vec<FieldChangeSummary> {
        let mut changes = Vec::new();
        apply_change(&mut changes, "username", &mut self.username, input.username.as_ref());
        apply_change(
            &mut changes,
            "avatar_src",
            &mut self.avatar_src,
            input.avatar_src.as_ref(),
        );
        apply_change(
            &mut changes,
            "is_site_admin",
            &mut self.is_site_admin,
            input.is_site_admin.as_ref(),
        );
        apply_change(
            &mut changes,
            "admin_permissions",
            &mut self.admin_permissions,
            input.admin_permissions.as_ref(),
        );
        changes
    }

    pub fn is_banned(&self) -> bool {
        self.account_status == UserAccountStatus::Banned
    }
}

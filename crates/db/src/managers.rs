//! Capability traits, one per entity.
//!
//! [`SqlQuerier`](crate::querier::SqlQuerier) implements them against the
//! database; [`TracedDataManager`](crate::traced::TracedDataManager) wraps any
//! implementation with spans and debug logging. Handlers should depend on
//! [`DataManager`] so either can be substituted.
//!
//! Create, update and archive operations append their own audit entry after
//! the write succeeds. The `log_*_event` methods are the same appenders,
//! exposed for recording events that happen outside these calls.

use async_trait::async_trait;
use tokio::sync::mpsc;
use todo_core::types::DbId;

use crate::error::DbResult;
use crate::models::account::{Account, AccountCreationInput, AccountList};
use crate::models::api_client::{ApiClient, ApiClientCreationInput, ApiClientList};
use crate::models::audit::{AuditLogEntry, AuditLogEntryList};
use crate::models::filter::QueryFilter;
use crate::models::item::{Item, ItemCreationInput, ItemList};
use crate::models::oauth2_client::{OAuth2Client, OAuth2ClientCreationInput, OAuth2ClientList};
use crate::models::plan::{
    AccountSubscriptionPlan, AccountSubscriptionPlanCreationInput, AccountSubscriptionPlanList,
};
use crate::models::user::{
    User, UserAccountStatus, UserAccountStatusUpdateInput, UserCreationInput, UserList,
};
use crate::models::webhook::{Webhook, WebhookCreationInput, WebhookList};
use crate::models::FieldChangeSummary;

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ItemDataManager: Send + Sync {
    async fn item_exists(&self, item_id: DbId, user_id: DbId) -> DbResult<bool>;
    async fn get_item(&self, item_id: DbId, user_id: DbId) -> DbResult<Item>;
    async fn get_all_items_count(&self) -> DbResult<u64>;
    /// Stream every item onto `results` in buckets of `bucket_size` IDs.
    async fn get_all_items(
        &self,
        results: mpsc::Sender<Vec<Item>>,
        bucket_size: u16,
    ) -> DbResult<()>;
    async fn get_items(&self, user_id: DbId, filter: Option<&QueryFilter>) -> DbResult<ItemList>;
    async fn get_items_for_admin(&self, filter: Option<&QueryFilter>) -> DbResult<ItemList>;
    async fn get_items_with_ids(
        &self,
        user_id: DbId,
        limit: u8,
        ids: &[DbId],
    ) -> DbResult<Vec<Item>>;
    async fn get_items_with_ids_for_admin(&self, limit: u8, ids: &[DbId]) -> DbResult<Vec<Item>>;
    async fn create_item(&self, input: &ItemCreationInput) -> DbResult<Item>;
    async fn update_item(
        &self,
        updated: &Item,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()>;
    async fn archive_item(&self, item_id: DbId, user_id: DbId) -> DbResult<()>;
    async fn get_audit_log_entries_for_item(&self, item_id: DbId) -> DbResult<Vec<AuditLogEntry>>;
    async fn log_item_creation_event(&self, item: &Item);
    async fn log_item_update_event(
        &self,
        user_id: DbId,
        item_id: DbId,
        changes: &[FieldChangeSummary],
    );
    async fn log_item_archive_event(&self, user_id: DbId, item_id: DbId);
}

// ---------------------------------------------------------------------------
// Webhooks
// ---------------------------------------------------------------------------

#[async_trait]
pub trait WebhookDataManager: Send + Sync {
    async fn webhook_exists(&self, webhook_id: DbId, user_id: DbId) -> DbResult<bool>;
    async fn get_webhook(&self, webhook_id: DbId, user_id: DbId) -> DbResult<Webhook>;
    async fn get_all_webhooks_count(&self) -> DbResult<u64>;
    async fn get_all_webhooks(
        &self,
        results: mpsc::Sender<Vec<Webhook>>,
        bucket_size: u16,
    ) -> DbResult<()>;
    async fn get_webhooks(
        &self,
        user_id: DbId,
        filter: Option<&QueryFilter>,
    ) -> DbResult<WebhookList>;
    async fn get_webhooks_for_admin(&self, filter: Option<&QueryFilter>) -> DbResult<WebhookList>;
    async fn create_webhook(&self, input: &WebhookCreationInput) -> DbResult<Webhook>;
    async fn update_webhook(
        &self,
        updated: &Webhook,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()>;
    async fn archive_webhook(&self, webhook_id: DbId, user_id: DbId) -> DbResult<()>;
    async fn get_audit_log_entries_for_webhook(
        &self,
        webhook_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>>;
    async fn log_webhook_creation_event(&self, webhook: &Webhook);
    async fn log_webhook_update_event(
        &self,
        user_id: DbId,
        webhook_id: DbId,
        changes: &[FieldChangeSummary],
    );
    async fn log_webhook_archive_event(&self, user_id: DbId, webhook_id: DbId);
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[async_trait]
pub trait AccountDataManager: Send + Sync {
    async fn account_exists(&self, account_id: DbId, user_id: DbId) -> DbResult<bool>;
    async fn get_account(&self, account_id: DbId, user_id: DbId) -> DbResult<Account>;
    async fn get_all_accounts_count(&self) -> DbResult<u64>;
    async fn get_all_accounts(
        &self,
        results: mpsc::Sender<Vec<Account>>,
        bucket_size: u16,
    ) -> DbResult<()>;
    async fn get_accounts(
        &self,
        user_id: DbId,
        filter: Option<&QueryFilter>,
    ) -> DbResult<AccountList>;
    async fn get_accounts_for_admin(&self, filter: Option<&QueryFilter>) -> DbResult<AccountList>;
    async fn create_account(&self, input: &AccountCreationInput) -> DbResult<Account>;
    async fn update_account(
        &self,
        updated: &Account,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()>;
    async fn archive_account(&self, account_id: DbId, user_id: DbId) -> DbResult<()>;
    async fn get_audit_log_entries_for_account(
        &self,
        account_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>>;
    async fn log_account_creation_event(&self, account: &Account);
    async fn log_account_update_event(
        &self,
        user_id: DbId,
        account_id: DbId,
        changes: &[FieldChangeSummary],
    );
    async fn log_account_archive_event(&self, user_id: DbId, account_id: DbId);
}

// ---------------------------------------------------------------------------
// Account subscription plans
// ---------------------------------------------------------------------------

/// Plans are global, so nothing here is owner-scoped.
#[async_trait]
pub trait AccountSubscriptionPlanDataManager: Send + Sync {
    async fn account_subscription_plan_exists(&self, plan_id: DbId) -> DbResult<bool>;
    async fn get_account_subscription_plan(
        &self,
        plan_id: DbId,
    ) -> DbResult<AccountSubscriptionPlan>;
    async fn get_all_account_subscription_plans_count(&self) -> DbResult<u64>;
    async fn get_account_subscription_plans(
        &self,
        filter: Option<&QueryFilter>,
    ) -> DbResult<AccountSubscriptionPlanList>;
    async fn create_account_subscription_plan(
        &self,
        input: &AccountSubscriptionPlanCreationInput,
    ) -> DbResult<AccountSubscriptionPlan>;
    async fn update_account_subscription_plan(
        &self,
        updated: &AccountSubscriptionPlan,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()>;
    async fn archive_account_subscription_plan(
        &self,
        plan_id: DbId,
        archived_by: DbId,
    ) -> DbResult<()>;
    async fn get_audit_log_entries_for_account_subscription_plan(
        &self,
        plan_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>>;
    async fn log_account_subscription_plan_creation_event(&self, plan: &AccountSubscriptionPlan);
    async fn log_account_subscription_plan_update_event(
        &self,
        user_id: DbId,
        plan_id: DbId,
        changes: &[FieldChangeSummary],
    );
    async fn log_account_subscription_plan_archive_event(&self, user_id: DbId, plan_id: DbId);
}

// ---------------------------------------------------------------------------
// OAuth2 clients
// ---------------------------------------------------------------------------

#[async_trait]
pub trait OAuth2ClientDataManager: Send + Sync {
    /// Unscoped lookup used while authenticating requests.
    async fn get_oauth2_client_by_client_id(&self, client_id: &str) -> DbResult<OAuth2Client>;
    async fn get_oauth2_client_by_database_id(
        &self,
        client_id: DbId,
        user_id: DbId,
    ) -> DbResult<OAuth2Client>;
    async fn get_all_oauth2_clients_count(&self) -> DbResult<u64>;
    async fn get_all_oauth2_clients(
        &self,
        results: mpsc::Sender<Vec<OAuth2Client>>,
        bucket_size: u16,
    ) -> DbResult<()>;
    async fn get_oauth2_clients(
        &self,
        user_id: DbId,
        filter: Option<&QueryFilter>,
    ) -> DbResult<OAuth2ClientList>;
    async fn create_oauth2_client(&self, input: &OAuth2ClientCreationInput)
        -> DbResult<OAuth2Client>;
    async fn update_oauth2_client(
        &self,
        updated: &OAuth2Client,
        changed_by: DbId,
        changes: &[FieldChangeSummary],
    ) -> DbResult<()>;
    async fn archive_oauth2_client(&self, client_id: DbId, user_id: DbId) -> DbResult<()>;
    async fn get_audit_log_entries_for_oauth2_client(
        &self,
        client_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>>;
    async fn log_oauth2_client_creation_event(&self, client: &OAuth2Client);
    async fn log_oauth2_client_update_event(
        &self,
        user_id: DbId,
        client_id: DbId,
        changes: &[FieldChangeSummary],
    );
    async fn log_oauth2_client_archive_event(&self, user_id: DbId, client_id: DbId);
}

// ---------------------------------------------------------------------------
// API clients
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ApiClientDataManager: Send + Sync {
    /// Unscoped lookup used while authenticating requests.
    async fn get_api_client_by_client_id(&self, client_id: &str) -> DbResult<ApiClient>;
    async fn get_api_client_by_database_id(
        &self,
        client_id: DbId,
        user_id: DbId,
    ) -> DbResult<ApiClient>;
    async fn get_all_api_clients_count(&self) -> DbResult<u64>;
    async fn get_all_api_clients(
        &self,
        results: mpsc::Sender<Vec<ApiClient>>,
        bucket_size: u16,
    ) -> DbResult<()>;
    async fn get_api_clients(
        &self,
        user_id: DbId,
        filter: Option<&QueryFilter>,
    ) -> DbResult<ApiClientList>;
    async fn create_api_client(&self, input: &ApiClientCreationInput) -> DbResult<ApiClient>;
    async fn archive_api_client(&self, client_id: DbId, user_id: DbId) -> DbResult<()>;
    async fn get_audit_log_entries_for_api_client(
        &self,
        client_id: DbId,
    ) -> DbResult<Vec<AuditLogEntry>>;
    async fn log_api_client_creation_event(&self, client: &ApiClient);
    async fn log_api_client_archive_event(&self, user_id: DbId, client_id: DbId);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[async_trait]
pub trait UserDataManager: Send + Sync {
    /// Fetch a user whose two-factor secret has been verified.
    async fn get_user(&self, user_id: DbId) -> DbResult<User>;
    /// Fetch a user who has not yet verified their two-factor secret.
    async fn get_user_with_unverified_two_factor_secret(&self, user_id: DbId) -> DbResult<User>;
    async fn get_user_by_username(&self, username: &str) -> DbResult<User>;
    async fn search_for_users_by_username(&self, username_prefix: &str) -> DbResult<Vec<User>>;
    async fn get_all_users_count(&self) -> DbResult<u64>;
    async fn get_all_users(&self, results: mpsc::Sender<Vec<User>>, bucket_size: u16)
        -> DbResult<()>;
    async fn get_users(&self, filter: Option<&QueryFilter>) -> DbResult<UserList>;
    async fn get_users_for_admin(&self, filter: Option<&QueryFilter>) -> DbResult<UserList>;
    async fn create_user(&self, input: &UserCreationInput) -> DbResult<User>;
    async fn update_user(&self, updated: &User, changes: &[FieldChangeSummary]) -> DbResult<()>;
    async fn update_user_password(&self, user_id: DbId, new_hashed_password: &str)
        -> DbResult<()>;
    /// Replace the two-factor secret, returning the user to the unverified state.
    async fn update_user_two_factor_secret(&self, user_id: DbId, new_secret: &str)
        -> DbResult<()>;
    async fn verify_user_two_factor_secret(&self, user_id: DbId) -> DbResult<()>;
    async fn set_user_account_status(
        &self,
        changed_by: DbId,
        input: &UserAccountStatusUpdateInput,
    ) -> DbResult<()>;
    async fn user_has_status(&self, user_id: DbId, statuses: &[UserAccountStatus])
        -> DbResult<bool>;
    async fn archive_user(&self, user_id: DbId) -> DbResult<()>;
    /// Entries about the user or performed by them.
    async fn get_audit_log_entries_for_user(&self, user_id: DbId) -> DbResult<Vec<AuditLogEntry>>;
    async fn log_user_creation_event(&self, user: &User);
    async fn log_user_update_event(&self, user_id: DbId, changes: &[FieldChangeSummary]);
    async fn log_user_archive_event(&self, user_id: DbId);
    async fn log_user_account_status_change_event(
        &self,
        changed_by: DbId,
        input: &UserAccountStatusUpdateInput,
    );
}

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

#[async_trait]
pub trait AuditLogEntryDataManager: Send + Sync {
    async fn get_audit_log_entry(&self, entry_id: DbId) -> DbResult<AuditLogEntry>;
    async fn get_all_audit_log_entries_count(&self) -> DbResult<u64>;
    async fn get_all_audit_log_entries(
        &self,
        results: mpsc::Sender<Vec<AuditLogEntry>>,
        bucket_size: u16,
    ) -> DbResult<()>;
    async fn get_audit_log_entries(
        &self,
        filter: Option<&QueryFilter>,
    ) -> DbResult<AuditLogEntryList>;
    async fn log_successful_login_event(&self, user_id: DbId);
    async fn log_banned_user_login_attempt_event(&self, user_id: DbId);
    async fn log_unsuccessful_login_bad_password_event(&self, user_id: DbId);
    async fn log_unsuccessful_login_bad_two_factor_token_event(&self, user_id: DbId);
    async fn log_logout_event(&self, user_id: DbId);
    async fn log_cycle_cookie_secret_event(&self, user_id: DbId);
}

// ---------------------------------------------------------------------------
// Full capability set
// ---------------------------------------------------------------------------

/// Everything the persistence layer offers.
pub trait DataManager:
    ItemDataManager
    + WebhookDataManager
    + AccountDataManager
    + AccountSubscriptionPlanDataManager
    + OAuth2ClientDataManager
    + ApiClientDataManager
    + UserDataManager
    + AuditLogEntryDataManager
{
}

impl<T> DataManager for T where
    T: ItemDataManager
        + WebhookDataManager
        + AccountDataManager
        + AccountSubscriptionPlanDataManager
        + OAuth2ClientDataManager
        + ApiClientDataManager
        + UserDataManager
        + AuditLogEntryDataManager
{
}

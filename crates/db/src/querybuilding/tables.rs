//! Table descriptions consumed by the query builder.

use super::TableSpec;

// ---------------------------------------------------------------------------
// Column lists (fixed order, matched by the scanners)
// ---------------------------------------------------------------------------

pub const ITEM_COLUMNS: &[&str] = &[
    "id",
    "name",
    "details",
    "created_on",
    "last_updated_on",
    "archived_on",
    "belongs_to_user",
];

pub const WEBHOOK_COLUMNS: &[&str] = &[
    "id",
    "name",
    "content_type",
    "url",
    "method",
    "events",
    "data_types",
    "topics",
    "created_on",
    "last_updated_on",
    "archived_on",
    "belongs_to_user",
];

pub const ACCOUNT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "plan_id",
    "default_user_permissions",
    "created_on",
    "last_updated_on",
    "archived_on",
    "belongs_to_user",
];

pub const PLAN_COLUMNS: &[&str] = &[
    "id",
    "name",
    "description",
    "price",
    "period",
    "created_on",
    "last_updated_on",
    "archived_on",
];

pub const OAUTH2_CLIENT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "client_id",
    "client_secret",
    "redirect_uri",
    "scopes",
    "created_on",
    "last_updated_on",
    "archived_on",
    "belongs_to_user",
];

pub const API_CLIENT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "client_id",
    "client_secret",
    "created_on",
    "last_updated_on",
    "archived_on",
    "belongs_to_user",
];

pub const USER_COLUMNS: &[&str] = &[
    "id",
    "username",
    "avatar_src",
    "hashed_password",
    "salt",
    "requires_password_change",
    "password_last_changed_on",
    "two_factor_secret",
    "two_factor_secret_verified_on",
    "is_site_admin",
    "admin_permissions",
    "account_status",
    "account_status_explanation",
    "created_on",
    "last_updated_on",
    "archived_on",
];

pub const AUDIT_LOG_COLUMNS: &[&str] = &["id", "event_type", "context", "created_on"];

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

pub const OWNERSHIP_COLUMN: &str = "belongs_to_user";

pub static ITEMS: TableSpec = TableSpec {
    name: "items",
    entity: "item",
    columns: ITEM_COLUMNS,
    ownership_column: Some(OWNERSHIP_COLUMN),
    archivable: true,
};

pub static WEBHOOKS: TableSpec = TableSpec {
    name: "webhooks",
    entity: "webhook",
    columns: WEBHOOK_COLUMNS,
    ownership_column: Some(OWNERSHIP_COLUMN),
    archivable: true,
};

pub static ACCOUNTS: TableSpec = TableSpec {
    name: "accounts",
    entity: "account",
    columns: ACCOUNT_COLUMNS,
    ownership_column: Some(OWNERSHIP_COLUMN),
    archivable: true,
};

pub static PLANS: TableSpec = TableSpec {
    name: "account_subscription_plans",
    entity: "account subscription plan",
    columns: PLAN_COLUMNS,
    ownership_column: None,
    archivable: true,
};

pub static OAUTH2_CLIENTS: TableSpec = TableSpec {
    name: "oauth2_clients",
    entity: "oauth2 client",
    columns: OAUTH2_CLIENT_COLUMNS,
    ownership_column: Some(OWNERSHIP_COLUMN),
    archivable: true,
};

pub static API_CLIENTS: TableSpec = TableSpec {
    name: "api_clients",
    entity: "api client",
    columns: API_CLIENT_COLUMNS,
    ownership_column: Some(OWNERSHIP_COLUMN),
    archivable: true,
};

pub static USERS: TableSpec = TableSpec {
    name: "users",
    entity: "user",
    columns: USER_COLUMNS,
    ownership_column: None,
    archivable: true,
};

pub static AUDIT_LOG: TableSpec = TableSpec {
    name: "audit_log",
    entity: "audit log entry",
    columns: AUDIT_LOG_COLUMNS,
    ownership_column: None,
    archivable: false,
};

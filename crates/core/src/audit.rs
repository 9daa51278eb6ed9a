//! Audit log vocabulary shared by every layer that records or reads events.
//!
//! Event types name what happened; context keys name the fields of the JSON
//! payload stored alongside each entry.

// ---------------------------------------------------------------------------
// Event type constants
// ---------------------------------------------------------------------------

/// Known event types for audit log entries.
pub mod event_types {
    pub const ITEM_CREATED: &str = "item_created";
    pub const ITEM_UPDATED: &str = "item_updated";
    pub const ITEM_ARCHIVED: &str = "item_archived";

    pub const WEBHOOK_CREATED: &str = "webhook_created";
    pub const WEBHOOK_UPDATED: &str = "webhook_updated";
    pub const WEBHOOK_ARCHIVED: &str = "webhook_archived";

    pub const ACCOUNT_CREATED: &str = "account_created";
    pub const ACCOUNT_UPDATED: &str = "account_updated";
    pub const ACCOUNT_ARCHIVED: &str = "account_archived";

    pub const PLAN_CREATED: &str = "account_subscription_plan_created";
    pub const PLAN_UPDATED: &str = "account_subscription_plan_updated";
    pub const PLAN_ARCHIVED: &str = "account_subscription_plan_archived";

    pub const OAUTH2_CLIENT_CREATED: &str = "oauth2_client_created";
    pub const OAUTH2_CLIENT_UPDATED: &str = "oauth2_client_updated";
    pub const OAUTH2_CLIENT_ARCHIVED: &str = "oauth2_client_archived";

    pub const API_CLIENT_CREATED: &str = "api_client_created";
    pub const API_CLIENT_ARCHIVED: &str = "api_client_archived";

    pub const USER_CREATED: &str = "user_created";
    pub const USER_UPDATED: &str = "user_updated";
    pub const USER_ARCHIVED: &str = "user_archived";
    pub const USER_PASSWORD_UPDATED: &str = "user_password_updated";
    pub const USER_TWO_FACTOR_SECRET_CHANGED: &str = "user_two_factor_secret_changed";
    pub const USER_TWO_FACTOR_SECRET_VERIFIED: &str = "user_two_factor_secret_verified";
    pub const USER_BANNED: &str = "user_banned";
    pub const USER_ACCOUNT_TERMINATED: &str = "user_account_terminated";
    pub const USER_ACCOUNT_STATUS_CHANGED: &str = "user_account_status_changed";

    pub const SUCCESSFUL_LOGIN: &str = "user_logged_in";
    pub const BANNED_USER_LOGIN_ATTEMPT: &str = "banned_user_login_attempt";
    pub const UNSUCCESSFUL_LOGIN_BAD_PASSWORD: &str = "unsuccessful_login_bad_password";
    pub const UNSUCCESSFUL_LOGIN_BAD_TWO_FACTOR_TOKEN: &str = "unsuccessful_login_bad_2fa_token";
    pub const LOGOUT: &str = "user_logged_out";
    pub const CYCLE_COOKIE_SECRET: &str = "cookie_secret_cycled";
}

// ---------------------------------------------------------------------------
// Context keys
// ---------------------------------------------------------------------------

/// Keys used in the JSON context of an audit log entry.
pub mod keys {
    /// The user who performed the action.
    pub const ACTOR: &str = "performed_by";
    /// The user the affected entity belongs to, or the affected user.
    pub const USER: &str = "user_id";
    pub const ITEM: &str = "item_id";
    pub const WEBHOOK: &str = "webhook_id";
    pub const ACCOUNT: &str = "account_id";
    pub const PLAN: &str = "account_subscription_plan_id";
    pub const OAUTH2_CLIENT: &str = "oauth2_client_id";
    pub const API_CLIENT: &str = "api_client_id";
    /// The entity as it was created.
    pub const CREATION: &str = "created";
    /// Field-level change summaries for updates.
    pub const CHANGES: &str = "changes";
    /// Free-form explanation, e.g. why a user was banned.
    pub const REASON: &str = "reason";
}

// ---------------------------------------------------------------------------
// Event categories
// ---------------------------------------------------------------------------

/// Broad groupings used when logging or filtering audit events.
pub mod categories {
    pub const AUTHENTICATION: &str = "authentication";
    pub const ACCOUNT_ADMINISTRATION: &str = "account_administration";
    pub const OPERATIONS: &str = "operations";
}

/// Map an event type to its category.
///
/// Unknown event types default to `"operations"`.
pub fn event_category(event_type: &str) -> &'static str {
    match event_type {
        event_types::SUCCESSFUL_LOGIN
        | event_types::BANNED_USER_LOGIN_ATTEMPT
        | event_types::UNSUCCESSFUL_LOGIN_BAD_PASSWORD
        | event_types::UNSUCCESSFUL_LOGIN_BAD_TWO_FACTOR_TOKEN
        | event_types::LOGOUT
        | event_types::CYCLE_COOKIE_SECRET => categories::AUTHENTICATION,
        event_types::USER_BANNED
        | event_types::USER_ACCOUNT_TERMINATED
        | event_types::USER_ACCOUNT_STATUS_CHANGED
        | event_types::USER_PASSWORD_UPDATED
        | event_types::USER_TWO_FACTOR_SECRET_CHANGED
        | event_types::USER_TWO_FACTOR_SECRET_VERIFIED => categories::ACCOUNT_ADMINISTRATION,
        _ => categories::OPERATIONS,
    }
}

// ---------------------------------------------------------------------------
// Sensitive field redaction
// ---------------------------------------------------------------------------

/// Key fragments whose values never reach the audit log.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "salt",
    "secret",
    "token",
    "api_key",
    "private_key",
    "credential",
];

/// Redact sensitive fields from a JSON value, recursing into objects and arrays.
///
/// Any key containing one of [`SENSITIVE_FIELDS`] has its value replaced with
/// `"[REDACTED]"`. Values stored under `changes` entries keep their shape but
/// lose their old/new values when the changed field itself is sensitive.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let sensitive_change = map
                .get("field_name")
                .and_then(|v| v.as_str())
                .is_some_and(is_sensitive_key);

            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let hide = is_sensitive_key(key)
                    || (sensitive_change && (key == "old_value" || key == "new_value"));
                if hide {
                    redacted.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    SENSITIVE_FIELDS.iter().any(|f| lower.contains(f))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -----------------------------------------------------------------------
    // event_category mapping
    // -----------------------------------------------------------------------

    #[test]
    fn login_events_map_to_authentication() {
        assert_eq!(
            event_category(event_types::SUCCESSFUL_LOGIN),
            categories::AUTHENTICATION
        );
        assert_eq!(event_category(event_types::LOGOUT), categories::AUTHENTICATION);
    }

    #[test]
    fn ban_maps_to_account_administration() {
        assert_eq!(
            event_category(event_types::USER_BANNED),
            categories::ACCOUNT_ADMINISTRATION
        );
    }

    #[test]
    fn entity_mutations_map_to_operations() {
        assert_eq!(event_category(event_types::ITEM_CREATED), categories::OPERATIONS);
        assert_eq!(event_category("something_new"), categories::OPERATIONS);
    }

    // -----------------------------------------------------------------------
    // Redaction
    // -----------------------------------------------------------------------

    #[test]
    fn redacts_secret_keys_at_any_depth() {
        let input = json!({
            "performed_by": 1,
            "created": { "name": "cli", "client_secret": "hunter2" },
        });
        let out = redact_sensitive_fields(&input);
        assert_eq!(out["performed_by"], 1);
        assert_eq!(out["created"]["name"], "cli");
        assert_eq!(out["created"]["client_secret"], "[REDACTED]");
    }

    #[test]
    fn redacts_values_of_sensitive_changes() {
        let input = json!({
            "changes": [
                { "field_name": "hashed_password", "old_value": "a", "new_value": "b" },
                { "field_name": "username", "old_value": "x", "new_value": "y" },
            ],
        });
        let out = redact_sensitive_fields(&input);
        assert_eq!(out["changes"][0]["old_value"], "[REDACTED]");
        assert_eq!(out["changes"][0]["new_value"], "[REDACTED]");
        assert_eq!(out["changes"][1]["new_value"], "y");
    }

    #[test]
    fn leaves_scalars_untouched() {
        assert_eq!(redact_sensitive_fields(&json!(42)), json!(42));
    }
}

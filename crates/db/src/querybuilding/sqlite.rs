//! SQLite dialect.
//!
//! Timestamps are stored as INTEGER unix seconds. Statement-time stamps
//! (`last_updated_on`, `archived_on`, verification times) are taken from the
//! database clock; creation stamps are bound by the caller.

use todo_core::types::{DbId, Timestamp};

use super::tables::{AUDIT_LOG, USERS};
use super::{ColumnValues, Conditions, SqlQueryBuilder, TableSpec};
use crate::connection::{Query, QueryArg};
use crate::models::audit::AuditLogEntryCreationInput;
use crate::models::filter::QueryFilter;
use crate::models::user::UserAccountStatus;

const CURRENT_UNIX_TIME: &str = "CAST(strftime('%s', 'now') AS INTEGER)";

/// Upper bound on username search results.
const USER_SEARCH_LIMIT: i64 = 20;

#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteQueryBuilder;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn qualified_columns(table: &TableSpec) -> String {
    table
        .columns
        .iter()
        .map(|c| format!("{}.{c}", table.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// `id = ?`, live-row and owner predicates for a single row.
///
/// Reads qualify columns with the table name; write statements pass an empty
/// prefix because SQLite rejects qualified names in `SET`.
fn row_conditions(table: &TableSpec, id: DbId, owner: Option<DbId>, prefix: &str) -> Conditions {
    let mut conditions = Conditions::default();
    conditions.push_arg(format!("{prefix}id = ?"), id);
    if table.archivable {
        conditions.push(format!("{prefix}archived_on IS NULL"));
    }
    if let (Some(column), Some(owner)) = (table.ownership_column, owner) {
        conditions.push_arg(format!("{prefix}{column} = ?"), owner);
    }
    conditions
}

/// Archive and owner predicates shared by list, count and with-IDs queries.
fn scope_conditions(
    table: &TableSpec,
    owner: Option<DbId>,
    for_admin: bool,
    include_archived: bool,
) -> Conditions {
    let mut conditions = Conditions::default();
    if table.archivable && !(for_admin && include_archived) {
        conditions.push(format!("{}.archived_on IS NULL", table.name));
    }
    if !for_admin {
        if let (Some(column), Some(owner)) = (table.ownership_column, owner) {
            conditions.push_arg(format!("{}.{column} = ?", table.name), owner);
        }
    }
    conditions
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn clamp_to_i64(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

// ---------------------------------------------------------------------------
// SqlQueryBuilder
// ---------------------------------------------------------------------------

impl SqlQueryBuilder for SqliteQueryBuilder {
    fn build_exists_query(&self, table: &TableSpec, id: DbId, owner: Option<DbId>) -> Query {
        let t = table.name;
        let conditions = row_conditions(table, id, owner, &format!("{t}."));
        Query::new(
            format!("SELECT EXISTS (SELECT {t}.id FROM {t}{})", conditions.to_sql()),
            conditions.into_args(),
        )
    }

    fn build_get_query(&self, table: &TableSpec, id: DbId, owner: Option<DbId>) -> Query {
        let t = table.name;
        let conditions = row_conditions(table, id, owner, &format!("{t}."));
        Query::new(
            format!("SELECT {} FROM {t}{}", qualified_columns(table), conditions.to_sql()),
            conditions.into_args(),
        )
    }

    fn build_get_by_column_query(
        &self,
        table: &TableSpec,
        column: &str,
        value: QueryArg,
    ) -> Query {
        let t = table.name;
        let mut conditions = Conditions::default();
        conditions.push_arg(format!("{t}.{column} = ?"), value);
        if table.archivable {
            conditions.push(format!("{t}.archived_on IS NULL"));
        }
        Query::new(
            format!("SELECT {} FROM {t}{}", qualified_columns(table), conditions.to_sql()),
            conditions.into_args(),
        )
    }

    fn build_count_query(&self, table: &TableSpec, include_archived: bool) -> Query {
        let t = table.name;
        let conditions = scope_conditions(table, None, true, include_archived);
        Query::new(
            format!("SELECT COUNT({t}.id) FROM {t}{}", conditions.to_sql()),
            conditions.into_args(),
        )
    }

    fn build_batch_query(&self, table: &TableSpec, begin: DbId, end: DbId) -> Query {
        let t = table.name;
        Query::new(
            format!(
                "SELECT {} FROM {t} WHERE {t}.id >= ? AND {t}.id < ? ORDER BY {t}.id",
                qualified_columns(table)
            ),
            vec![begin.into(), end.into()],
        )
    }

    fn build_list_query(
        &self,
        table: &TableSpec,
        owner: Option<DbId>,
        for_admin: bool,
        filter: &QueryFilter,
    ) -> Query {
        let t = table.name;
        let scope = scope_conditions(table, owner, for_admin, filter.include_archived);

        let mut filtered = scope.clone();
        if let Some(ts) = filter.created_after {
            filtered.push_arg(format!("{t}.created_on > ?"), ts);
        }
        if let Some(ts) = filter.created_before {
            filtered.push_arg(format!("{t}.created_on < ?"), ts);
        }
        if table.archivable {
            if let Some(ts) = filter.updated_after {
                filtered.push_arg(format!("{t}.last_updated_on > ?"), ts);
            }
            if let Some(ts) = filter.updated_before {
                filtered.push_arg(format!("{t}.last_updated_on < ?"), ts);
            }
        }

        let filtered_where = filtered.to_sql();
        let total_where = scope.to_sql();
        let direction = filter.sort_by.as_sql();
        let sql = format!(
            "SELECT {}, \
             (SELECT COUNT({t}.id) FROM {t}{filtered_where}) AS filtered_count, \
             (SELECT COUNT({t}.id) FROM {t}{total_where}) AS total_count \
             FROM {t}{filtered_where} \
             ORDER BY {t}.created_on {direction}, {t}.id {direction} \
             LIMIT ? OFFSET ?",
            qualified_columns(table),
        );

        let mut args = Vec::new();
        args.extend_from_slice(filtered.args());
        args.extend_from_slice(scope.args());
        args.extend_from_slice(filtered.args());
        args.push(QueryArg::Int(i64::from(filter.limit)));
        args.push(QueryArg::Int(clamp_to_i64(filter.offset())));
        Query::new(sql, args)
    }

    fn build_with_ids_query(
        &self,
        table: &TableSpec,
        owner: Option<DbId>,
        limit: u8,
        ids: &[DbId],
        for_admin: bool,
    ) -> Query {
        let t = table.name;
        let mut conditions = Conditions::default();
        conditions.push(format!("{t}.id IN ({})", placeholders(ids.len())));
        let scope = scope_conditions(table, owner, for_admin, false);

        let ordering = ids
            .iter()
            .map(|_| "WHEN ? THEN ?")
            .collect::<Vec<_>>()
            .join(" ");
        let mut where_sql = conditions.to_sql();
        let scope_sql = scope.to_sql();
        if let Some(rest) = scope_sql.strip_prefix(" WHERE ") {
            where_sql.push_str(" AND ");
            where_sql.push_str(rest);
        }
        let sql = format!(
            "SELECT {} FROM {t}{where_sql} ORDER BY CASE {t}.id {ordering} END LIMIT ?",
            qualified_columns(table),
        );

        let mut args: Vec<QueryArg> = ids.iter().map(|id| QueryArg::Int(*id)).collect();
        args.extend_from_slice(scope.args());
        for (position, id) in ids.iter().enumerate() {
            args.push(QueryArg::Int(*id));
            args.push(QueryArg::Int(clamp_to_i64(position as u64)));
        }
        args.push(QueryArg::Int(i64::from(limit)));
        Query::new(sql, args)
    }

    fn build_insert_query(&self, table: &TableSpec, values: &ColumnValues) -> Query {
        let columns = values
            .iter()
            .map(|(column, _)| *column)
            .collect::<Vec<_>>()
            .join(", ");
        Query::new(
            format!(
                "INSERT INTO {} ({columns}) VALUES ({})",
                table.name,
                placeholders(values.len())
            ),
            values.iter().map(|(_, arg)| arg.clone()).collect(),
        )
    }

    fn build_update_query(
        &self,
        table: &TableSpec,
        id: DbId,
        owner: Option<DbId>,
        values: &ColumnValues,
    ) -> Query {
        let mut assignments: Vec<String> = values
            .iter()
            .map(|(column, _)| format!("{column} = ?"))
            .collect();
        assignments.push(format!("last_updated_on = {CURRENT_UNIX_TIME}"));

        let conditions = row_conditions(table, id, owner, "");
        let mut args: Vec<QueryArg> = values.iter().map(|(_, arg)| arg.clone()).collect();
        args.extend(conditions.args().iter().cloned());
        Query::new(
            format!(
                "UPDATE {} SET {}{}",
                table.name,
                assignments.join(", "),
                conditions.to_sql()
            ),
            args,
        )
    }

    fn build_archive_query(&self, table: &TableSpec, id: DbId, owner: Option<DbId>) -> Query {
        let conditions = row_conditions(table, id, owner, "");
        Query::new(
            format!(
                "UPDATE {} SET last_updated_on = {CURRENT_UNIX_TIME}, \
                 archived_on = {CURRENT_UNIX_TIME}{}",
                table.name,
                conditions.to_sql()
            ),
            conditions.into_args(),
        )
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    fn build_get_user_query(&self, user_id: DbId, verified: bool) -> Query {
        let t = USERS.name;
        let mut conditions = row_conditions(&USERS, user_id, None, &format!("{t}."));
        let null_check = if verified { "IS NOT NULL" } else { "IS NULL" };
        conditions.push(format!("{t}.two_factor_secret_verified_on {null_check}"));
        Query::new(
            format!("SELECT {} FROM {t}{}", qualified_columns(&USERS), conditions.to_sql()),
            conditions.into_args(),
        )
    }

    fn build_search_users_by_username_query(&self, prefix: &str) -> Query {
        let t = USERS.name;
        Query::new(
            format!(
                "SELECT {} FROM {t} WHERE {t}.username LIKE ? ESCAPE '\\' \
                 AND {t}.archived_on IS NULL \
                 AND {t}.two_factor_secret_verified_on IS NOT NULL \
                 ORDER BY {t}.username LIMIT ?",
                qualified_columns(&USERS)
            ),
            vec![
                QueryArg::Text(format!("{}%", escape_like(prefix))),
                QueryArg::Int(USER_SEARCH_LIMIT),
            ],
        )
    }

    fn build_user_has_status_query(&self, user_id: DbId, statuses: &[&str]) -> Query {
        let t = USERS.name;
        let mut args = vec![QueryArg::Int(user_id)];
        args.extend(statuses.iter().map(|s| QueryArg::from(*s)));
        Query::new(
            format!(
                "SELECT EXISTS (SELECT {t}.id FROM {t} WHERE {t}.id = ? \
                 AND {t}.archived_on IS NULL AND {t}.account_status IN ({}))",
                placeholders(statuses.len())
            ),
            args,
        )
    }

    fn build_set_user_account_status_query(
        &self,
        user_id: DbId,
        status: &str,
        reason: &str,
    ) -> Query {
        self.build_update_query(
            &USERS,
            user_id,
            None,
            &vec![
                ("account_status", status.into()),
                ("account_status_explanation", reason.into()),
            ],
        )
    }

    fn build_update_user_password_query(&self, user_id: DbId, hashed_password: &str) -> Query {
        let conditions = row_conditions(&USERS, user_id, None, "");
        let mut args = vec![QueryArg::from(hashed_password), QueryArg::Bool(false)];
        args.extend(conditions.args().iter().cloned());
        Query::new(
            format!(
                "UPDATE {} SET hashed_password = ?, requires_password_change = ?, \
                 password_last_changed_on = {CURRENT_UNIX_TIME}, \
                 last_updated_on = {CURRENT_UNIX_TIME}{}",
                USERS.name,
                conditions.to_sql()
            ),
            args,
        )
    }

    fn build_update_user_two_factor_secret_query(&self, user_id: DbId, secret: &str) -> Query {
        self.build_update_query(
            &USERS,
            user_id,
            None,
            &vec![
                ("two_factor_secret", secret.into()),
                ("two_factor_secret_verified_on", QueryArg::Null),
            ],
        )
    }

    fn build_verify_user_two_factor_secret_query(&self, user_id: DbId) -> Query {
        let conditions = row_conditions(&USERS, user_id, None, "");
        let mut args = vec![QueryArg::from(UserAccountStatus::GoodStanding.as_str())];
        args.extend(conditions.args().iter().cloned());
        Query::new(
            format!(
                "UPDATE {} SET two_factor_secret_verified_on = {CURRENT_UNIX_TIME}, \
                 account_status = ?, last_updated_on = {CURRENT_UNIX_TIME}{}",
                USERS.name,
                conditions.to_sql()
            ),
            args,
        )
    }

    // -----------------------------------------------------------------------
    // Audit log
    // -----------------------------------------------------------------------

    fn build_create_audit_log_entry_query(
        &self,
        input: &AuditLogEntryCreationInput,
        created_on: Timestamp,
    ) -> Query {
        self.build_insert_query(
            &AUDIT_LOG,
            &vec![
                ("event_type", input.event_type.as_str().into()),
                ("context", input.context.to_string().into()),
                ("created_on", created_on.into()),
            ],
        )
    }

    fn build_audit_log_entries_for_keys_query(&self, keys: &[&str], id: DbId) -> Query {
        let t = AUDIT_LOG.name;
        let matches = keys
            .iter()
            .map(|key| format!("json_extract({t}.context, '$.{key}') = ?"))
            .collect::<Vec<_>>()
            .join(" OR ");
        Query::new(
            format!(
                "SELECT {} FROM {t} WHERE ({matches}) ORDER BY {t}.created_on, {t}.id",
                qualified_columns(&AUDIT_LOG)
            ),
            keys.iter().map(|_| QueryArg::Int(id)).collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::querybuilding::tables::{ITEMS, PLANS};
    use todo_core::audit::keys;

    const ITEM_COLS: &str = "items.id, items.name, items.details, items.created_on, \
        items.last_updated_on, items.archived_on, items.belongs_to_user";

    #[test]
    fn exists_query_is_owner_scoped() {
        let q = SqliteQueryBuilder.build_exists_query(&ITEMS, 7, Some(3));
        assert_eq!(
            q.sql,
            "SELECT EXISTS (SELECT items.id FROM items WHERE items.id = ? \
             AND items.archived_on IS NULL AND items.belongs_to_user = ?)"
        );
        assert_eq!(q.args, vec![QueryArg::Int(7), QueryArg::Int(3)]);
    }

    #[test]
    fn get_query_for_global_table_has_no_owner_predicate() {
        let q = SqliteQueryBuilder.build_get_query(&PLANS, 1, Some(99));
        assert!(!q.sql.contains("belongs_to_user"));
        assert_eq!(q.args, vec![QueryArg::Int(1)]);
    }

    #[test]
    fn count_query_honours_archived_flag() {
        let live = SqliteQueryBuilder.build_count_query(&ITEMS, false);
        assert_eq!(
            live.sql,
            "SELECT COUNT(items.id) FROM items WHERE items.archived_on IS NULL"
        );
        let all = SqliteQueryBuilder.build_count_query(&ITEMS, true);
        assert_eq!(all.sql, "SELECT COUNT(items.id) FROM items");
    }

    #[test]
    fn batch_query_is_half_open() {
        let q = SqliteQueryBuilder.build_batch_query(&ITEMS, 1, 11);
        assert_eq!(
            q.sql,
            format!(
                "SELECT {ITEM_COLS} FROM items WHERE items.id >= ? AND items.id < ? \
                 ORDER BY items.id"
            )
        );
        assert_eq!(q.args, vec![QueryArg::Int(1), QueryArg::Int(11)]);
    }

    #[test]
    fn list_query_binds_filters_in_placeholder_order() {
        let filter = QueryFilter {
            page: 2,
            limit: 10,
            created_after: chrono::DateTime::<chrono::Utc>::from_timestamp(100, 0),
            ..Default::default()
        };
        let q = SqliteQueryBuilder.build_list_query(&ITEMS, Some(5), false, &filter);
        assert_eq!(
            q.sql,
            format!(
                "SELECT {ITEM_COLS}, \
                 (SELECT COUNT(items.id) FROM items WHERE items.archived_on IS NULL \
                 AND items.belongs_to_user = ? AND items.created_on > ?) AS filtered_count, \
                 (SELECT COUNT(items.id) FROM items WHERE items.archived_on IS NULL \
                 AND items.belongs_to_user = ?) AS total_count \
                 FROM items WHERE items.archived_on IS NULL AND items.belongs_to_user = ? \
                 AND items.created_on > ? \
                 ORDER BY items.created_on ASC, items.id ASC LIMIT ? OFFSET ?"
            )
        );
        let ts = QueryArg::Timestamp(filter.created_after.unwrap());
        assert_eq!(
            q.args,
            vec![
                QueryArg::Int(5),
                ts.clone(),
                QueryArg::Int(5),
                QueryArg::Int(5),
                ts,
                QueryArg::Int(10),
                QueryArg::Int(10),
            ]
        );
    }

    #[test]
    fn admin_list_with_archived_has_no_predicates() {
        let filter = QueryFilter {
            include_archived: true,
            ..Default::default()
        };
        let q = SqliteQueryBuilder.build_list_query(&ITEMS, None, true, &filter);
        assert!(!q.sql.contains("WHERE"));
        assert_eq!(q.args, vec![QueryArg::Int(20), QueryArg::Int(0)]);
    }

    #[test]
    fn with_ids_query_preserves_requested_order() {
        let q = SqliteQueryBuilder.build_with_ids_query(&ITEMS, Some(2), 20, &[9, 4], false);
        assert_eq!(
            q.sql,
            format!(
                "SELECT {ITEM_COLS} FROM items WHERE items.id IN (?, ?) \
                 AND items.archived_on IS NULL AND items.belongs_to_user = ? \
                 ORDER BY CASE items.id WHEN ? THEN ? WHEN ? THEN ? END LIMIT ?"
            )
        );
        assert_eq!(
            q.args,
            [9, 4, 2, 9, 0, 4, 1, 20].map(QueryArg::Int).to_vec()
        );
    }

    #[test]
    fn archive_query_only_touches_live_owned_rows() {
        let q = SqliteQueryBuilder.build_archive_query(&ITEMS, 1, Some(2));
        assert_eq!(
            q.sql,
            format!(
                "UPDATE items SET last_updated_on = {CURRENT_UNIX_TIME}, \
                 archived_on = {CURRENT_UNIX_TIME} WHERE id = ? AND archived_on IS NULL \
                 AND belongs_to_user = ?"
            )
        );
    }

    #[test]
    fn update_query_binds_values_before_conditions() {
        let q = SqliteQueryBuilder.build_update_query(
            &ITEMS,
            1,
            Some(2),
            &vec![("name", "n".into()), ("details", "d".into())],
        );
        assert_eq!(
            q.sql,
            format!(
                "UPDATE items SET name = ?, details = ?, last_updated_on = {CURRENT_UNIX_TIME} \
                 WHERE id = ? AND archived_on IS NULL AND belongs_to_user = ?"
            )
        );
        assert_eq!(
            q.args,
            vec![
                QueryArg::Text("n".into()),
                QueryArg::Text("d".into()),
                QueryArg::Int(1),
                QueryArg::Int(2),
            ]
        );
    }

    #[test]
    fn insert_query_lists_columns_in_order() {
        let q = SqliteQueryBuilder.build_insert_query(
            &ITEMS,
            &vec![("name", "n".into()), ("belongs_to_user", 4_i64.into())],
        );
        assert_eq!(q.sql, "INSERT INTO items (name, belongs_to_user) VALUES (?, ?)");
    }

    #[test]
    fn user_lookup_distinguishes_verification_state() {
        let verified = SqliteQueryBuilder.build_get_user_query(1, true);
        assert!(verified.sql.ends_with("users.two_factor_secret_verified_on IS NOT NULL"));
        let unverified = SqliteQueryBuilder.build_get_user_query(1, false);
        assert!(unverified.sql.ends_with("users.two_factor_secret_verified_on IS NULL"));
    }

    #[test]
    fn username_search_escapes_wildcards() {
        let q = SqliteQueryBuilder.build_search_users_by_username_query("a_b%");
        assert_eq!(q.args[0], QueryArg::Text("a\\_b\\%%".into()));
    }

    #[test]
    fn audit_lookup_ors_every_key() {
        let q = SqliteQueryBuilder.build_audit_log_entries_for_keys_query(
            &[keys::USER, keys::ACTOR],
            8,
        );
        assert!(q.sql.contains(
            "WHERE (json_extract(audit_log.context, '$.user_id') = ? \
             OR json_extract(audit_log.context, '$.performed_by') = ?)"
        ));
        assert_eq!(q.args, vec![QueryArg::Int(8), QueryArg::Int(8)]);
    }
}

//! SQL generation.
//!
//! Managers never write SQL themselves: they ask a [`SqlQueryBuilder`] for a
//! [`Query`] and hand it to the connection unchanged. Generic operations take a
//! [`TableSpec`]; lookups that only make sense for one table have their own
//! methods.

pub mod sqlite;
pub mod tables;

use todo_core::types::{DbId, Timestamp};

use crate::connection::{Query, QueryArg};
use crate::models::audit::AuditLogEntryCreationInput;
use crate::models::filter::QueryFilter;

pub use sqlite::SqliteQueryBuilder;

/// Static description of one table.
#[derive(Debug)]
pub struct TableSpec {
    pub name: &'static str,
    /// Human-readable entity name used in errors and logs.
    pub entity: &'static str,
    /// Columns in the fixed order the entity's scanner reads them.
    pub columns: &'static [&'static str],
    /// Column holding the owning user's ID, for owner-scoped tables.
    pub ownership_column: Option<&'static str>,
    /// Archivable tables carry `last_updated_on` and `archived_on`.
    pub archivable: bool,
}

/// Column/value pairs for inserts and updates.
pub type ColumnValues = Vec<(&'static str, QueryArg)>;

pub trait SqlQueryBuilder: Send + Sync {
    // -----------------------------------------------------------------------
    // Generic reads
    // -----------------------------------------------------------------------

    fn build_exists_query(&self, table: &TableSpec, id: DbId, owner: Option<DbId>) -> Query;

    fn build_get_query(&self, table: &TableSpec, id: DbId, owner: Option<DbId>) -> Query;

    /// Fetch the single live row whose `column` equals `value`, regardless of owner.
    fn build_get_by_column_query(&self, table: &TableSpec, column: &str, value: QueryArg)
        -> Query;

    fn build_count_query(&self, table: &TableSpec, include_archived: bool) -> Query;

    /// Rows with `begin <= id < end`, archived or not.
    fn build_batch_query(&self, table: &TableSpec, begin: DbId, end: DbId) -> Query;

    /// A page of rows followed by `filtered_count` and `total_count` columns.
    fn build_list_query(
        &self,
        table: &TableSpec,
        owner: Option<DbId>,
        for_admin: bool,
        filter: &QueryFilter,
    ) -> Query;

    /// Rows whose ID is in `ids`, in the order given.
    fn build_with_ids_query(
        &self,
        table: &TableSpec,
        owner: Option<DbId>,
        limit: u8,
        ids: &[DbId],
        for_admin: bool,
    ) -> Query;

    // -----------------------------------------------------------------------
    // Generic writes
    // -----------------------------------------------------------------------

    fn build_insert_query(&self, table: &TableSpec, values: &ColumnValues) -> Query;

    /// Update a live row, stamping `last_updated_on`.
    fn build_update_query(
        &self,
        table: &TableSpec,
        id: DbId,
        owner: Option<DbId>,
        values: &ColumnValues,
    ) -> Query;

    fn build_archive_query(&self, table: &TableSpec, id: DbId, owner: Option<DbId>) -> Query;

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Fetch a user whose two-factor secret is verified (or, with
    /// `verified == false`, not yet verified).
    fn build_get_user_query(&self, user_id: DbId, verified: bool) -> Query;

    fn build_search_users_by_username_query(&self, prefix: &str) -> Query;

    fn build_user_has_status_query(&self, user_id: DbId, statuses: &[&str]) -> Query;

    fn build_set_user_account_status_query(
        &self,
        user_id: DbId,
        status: &str,
        reason: &str,
    ) -> Query;

    fn build_update_user_password_query(&self, user_id: DbId, hashed_password: &str) -> Query;

    fn build_update_user_two_factor_secret_query(&self, user_id: DbId, secret: &str) -> Query;

    fn build_verify_user_two_factor_secret_query(&self, user_id: DbId) -> Query;

    // -----------------------------------------------------------------------
    // Audit log
    // -----------------------------------------------------------------------

    fn build_create_audit_log_entry_query(
        &self,
        input: &AuditLogEntryCreationInput,
        created_on: Timestamp,
    ) -> Query;

    /// Entries whose context carries `id` under any of `keys`.
    fn build_audit_log_entries_for_keys_query(&self, keys: &[&str], id: DbId) -> Query;
}

// ---------------------------------------------------------------------------
// WHERE clause assembly
// ---------------------------------------------------------------------------

/// AND-joined predicates and their bind values.
#[derive(Debug, Clone, Default)]
pub(crate) struct Conditions {
    clauses: Vec<String>,
    args: Vec<QueryArg>,
}

impl Conditions {
    pub(crate) fn push(&mut self, clause: impl Into<String>) {
        self.clauses.push(clause.into());
    }

    pub(crate) fn push_arg(&mut self, clause: impl Into<String>, arg: impl Into<QueryArg>) {
        self.clauses.push(clause.into());
        self.args.push(arg.into());
    }

    /// Render as ` WHERE a AND b`, or an empty string when there are no predicates.
    pub(crate) fn to_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub(crate) fn args(&self) -> &[QueryArg] {
        &self.args
    }

    pub(crate) fn into_args(self) -> Vec<QueryArg> {
        self.args
    }
}

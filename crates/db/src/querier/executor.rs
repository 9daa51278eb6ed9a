//! Statement execution with "no rows" separated from real failures.

use sqlx::Row;
use todo_core::types::DbId;

use super::scan::{scan_rows, ScanFn};
use crate::connection::{Connection, Query};
use crate::error::{DbError, DbResult};

/// Run a `SELECT EXISTS (...)` query. Absence of a row is `false`, not an error.
pub(crate) async fn perform_boolean_query(
    db: &dyn Connection,
    entity: &'static str,
    query: &Query,
    context: &str,
) -> DbResult<bool> {
    match db.fetch_optional(query).await {
        Ok(Some(row)) => row
            .try_get::<bool, _>(0)
            .map_err(|source| DbError::Scan { entity, source }),
        Ok(None) | Err(sqlx::Error::RowNotFound) => Ok(false),
        Err(e) => Err(DbError::query(entity, context, e)),
    }
}

pub(crate) async fn perform_count_query(
    db: &dyn Connection,
    entity: &'static str,
    query: &Query,
    context: &str,
) -> DbResult<u64> {
    let row = db
        .fetch_optional(query)
        .await
        .map_err(|e| DbError::query(entity, context, e))?;
    let Some(row) = row else { return Ok(0) };
    let count: i64 = row
        .try_get(0)
        .map_err(|source| DbError::Scan { entity, source })?;
    Ok(u64::try_from(count).unwrap_or_default())
}

/// Fetch and scan exactly one row; no row is [`DbError::NotFound`].
pub(crate) async fn fetch_one<E>(
    db: &dyn Connection,
    entity: &'static str,
    query: &Query,
    scan: ScanFn<E>,
    context: &str,
) -> DbResult<E> {
    let row = db
        .fetch_optional(query)
        .await
        .map_err(|e| DbError::query(entity, context, e))?
        .ok_or(DbError::NotFound { entity })?;
    scan(&row).map_err(|source| DbError::Scan { entity, source })
}

/// Fetch every row of a query, optionally reading trailing count columns.
pub(crate) async fn fetch_many<E>(
    db: &dyn Connection,
    entity: &'static str,
    query: &Query,
    scan: ScanFn<E>,
    counts_at: Option<usize>,
    context: &str,
) -> DbResult<(Vec<E>, u64, u64)> {
    scan_rows(entity, context, db.fetch(query), scan, counts_at).await
}

/// Run an insert and return the generated row ID.
pub(crate) async fn perform_create_query(
    db: &dyn Connection,
    entity: &'static str,
    query: &Query,
    context: &str,
) -> DbResult<DbId> {
    let result = db
        .execute(query)
        .await
        .map_err(|e| DbError::query(entity, context, e))?;
    Ok(result.last_insert_id)
}

/// Run an update or archive that must touch a row; touching none is
/// [`DbError::NotFound`].
pub(crate) async fn perform_write_query(
    db: &dyn Connection,
    entity: &'static str,
    query: &Query,
    context: &str,
) -> DbResult<()> {
    let result = db
        .execute(query)
        .await
        .map_err(|e| DbError::query(entity, context, e))?;
    if result.rows_affected == 0 {
        return Err(DbError::NotFound { entity });
    }
    Ok(())
}

//! Row hydration.
//!
//! Every entity has a scan function reading its columns by position, in the
//! order listed in `querybuilding::tables`. List queries append
//! `filtered_count` and `total_count` after the entity columns.

use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use futures::TryStreamExt;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use todo_core::types::Timestamp;

use crate::error::{DbError, DbResult};

pub(crate) type ScanFn<E> = fn(&SqliteRow) -> Result<E, sqlx::Error>;

/// Separator for list-valued columns.
pub(crate) const LIST_SEPARATOR: char = ',';

// ---------------------------------------------------------------------------
// Column helpers
// ---------------------------------------------------------------------------

pub(crate) fn decode_error(index: usize, message: String) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: message.into(),
    }
}

fn timestamp_from_secs(index: usize, secs: i64) -> Result<Timestamp, sqlx::Error> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| decode_error(index, format!("timestamp out of range: {secs}")))
}

pub(crate) fn timestamp_at(row: &SqliteRow, index: usize) -> Result<Timestamp, sqlx::Error> {
    timestamp_from_secs(index, row.try_get(index)?)
}

pub(crate) fn optional_timestamp_at(
    row: &SqliteRow,
    index: usize,
) -> Result<Option<Timestamp>, sqlx::Error> {
    row.try_get::<Option<i64>, _>(index)?
        .map(|secs| timestamp_from_secs(index, secs))
        .transpose()
}

/// Read a comma-joined column. An empty string is an empty list.
pub(crate) fn list_at(row: &SqliteRow, index: usize) -> Result<Vec<String>, sqlx::Error> {
    let raw: String = row.try_get(index)?;
    Ok(split_list(&raw))
}

pub(crate) fn split_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(LIST_SEPARATOR).map(str::to_string).collect()
}

pub(crate) fn join_list(values: &[String]) -> String {
    values.join(&LIST_SEPARATOR.to_string())
}

fn count_at(row: &SqliteRow, index: usize) -> Result<u64, sqlx::Error> {
    let count: i64 = row.try_get(index)?;
    u64::try_from(count).map_err(|_| decode_error(index, format!("negative count: {count}")))
}

// ---------------------------------------------------------------------------
// Row scanning
// ---------------------------------------------------------------------------

/// Scan one row, plus the two trailing count columns starting at `counts_at`.
pub(crate) fn scan_with_counts<E>(
    row: &SqliteRow,
    scan: ScanFn<E>,
    counts_at: usize,
) -> Result<(E, u64, u64), sqlx::Error> {
    let entity = scan(row)?;
    Ok((entity, count_at(row, counts_at)?, count_at(row, counts_at + 1)?))
}

/// Drain a row stream into entities.
///
/// When `counts_at` is set, the first non-zero filtered and total counts seen
/// are returned alongside the rows. A failure before the first row is a query
/// error; a failure after it is a cursor error. The stream is dropped, and its
/// connection released, on every return path.
pub(crate) async fn scan_rows<E>(
    entity: &'static str,
    context: &str,
    mut rows: BoxStream<'_, Result<SqliteRow, sqlx::Error>>,
    scan: ScanFn<E>,
    counts_at: Option<usize>,
) -> DbResult<(Vec<E>, u64, u64)> {
    let mut entities = Vec::new();
    let (mut filtered_count, mut total_count) = (0, 0);

    loop {
        let row = match rows.try_next().await {
            Ok(Some(row)) => row,
            Ok(None) => break,
            Err(source) if entities.is_empty() => {
                return Err(DbError::query(entity, context, source))
            }
            Err(source) => return Err(DbError::Cursor { entity, source }),
        };

        let scanned = match counts_at {
            Some(index) => scan_with_counts(&row, scan, index),
            None => scan(&row).map(|e| (e, 0, 0)),
        };
        let (e, filtered, total) = scanned.map_err(|source| DbError::Scan { entity, source })?;
        if filtered_count == 0 {
            filtered_count = filtered;
        }
        if total_count == 0 {
            total_count = total;
        }
        entities.push(e);
    }

    Ok((entities, filtered_count, total_count))
}

//! The storage seam every manager talks through.
//!
//! Query builders produce a [`Query`] (SQL text plus positional arguments);
//! a [`Connection`] executes it. `SqlitePool` is the production connection;
//! tests wrap it to inject failures.

use async_trait::async_trait;
use futures::stream::BoxStream;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Sqlite, SqlitePool};
use todo_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Query and bind values
// ---------------------------------------------------------------------------

/// A positional bind value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryArg {
    Int(i64),
    Text(String),
    Bool(bool),
    Bytes(Vec<u8>),
    Timestamp(Timestamp),
    Null,
}

impl From<i64> for QueryArg {
    fn from(v: i64) -> Self {
        QueryArg::Int(v)
    }
}

impl From<u32> for QueryArg {
    fn from(v: u32) -> Self {
        QueryArg::Int(i64::from(v))
    }
}

impl From<bool> for QueryArg {
    fn from(v: bool) -> Self {
        QueryArg::Bool(v)
    }
}

impl From<&str> for QueryArg {
    fn from(v: &str) -> Self {
        QueryArg::Text(v.to_string())
    }
}

impl From<String> for QueryArg {
    fn from(v: String) -> Self {
        QueryArg::Text(v)
    }
}

impl From<Vec<u8>> for QueryArg {
    fn from(v: Vec<u8>) -> Self {
        QueryArg::Bytes(v)
    }
}

impl From<Timestamp> for QueryArg {
    fn from(v: Timestamp) -> Self {
        QueryArg::Timestamp(v)
    }
}

impl<T: Into<QueryArg>> From<Option<T>> for QueryArg {
    fn from(v: Option<T>) -> Self {
        v.map_or(QueryArg::Null, Into::into)
    }
}

/// SQL text with its positional arguments, in bind order.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub sql: String,
    pub args: Vec<QueryArg>,
}

impl Query {
    pub fn new(sql: impl Into<String>, args: Vec<QueryArg>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

/// Outcome of a write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteResult {
    pub last_insert_id: DbId,
    pub rows_affected: u64,
}

// ---------------------------------------------------------------------------
// Connection trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Connection: Send + Sync + 'static {
    /// Run a query expected to produce at most one row.
    async fn fetch_optional(&self, query: &Query) -> Result<Option<SqliteRow>, sqlx::Error>;

    /// Run a query and stream its rows. Dropping the stream releases the cursor.
    fn fetch<'a>(&'a self, query: &'a Query) -> BoxStream<'a, Result<SqliteRow, sqlx::Error>>;

    /// Run a write statement.
    async fn execute(&self, query: &Query) -> Result<WriteResult, sqlx::Error>;
}

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

fn bind_args<'q>(mut query: SqliteQuery<'q>, args: &'q [QueryArg]) -> SqliteQuery<'q> {
    for arg in args {
        query = match arg {
            QueryArg::Int(v) => query.bind(*v),
            QueryArg::Text(v) => query.bind(v.as_str()),
            QueryArg::Bool(v) => query.bind(*v),
            QueryArg::Bytes(v) => query.bind(v.as_slice()),
            QueryArg::Timestamp(v) => query.bind(v.timestamp()),
            QueryArg::Null => query.bind(Option::<i64>::None),
        };
    }
    query
}

#[async_trait]
impl Connection for SqlitePool {
    async fn fetch_optional(&self, query: &Query) -> Result<Option<SqliteRow>, sqlx::Error> {
        bind_args(sqlx::query(&query.sql), &query.args)
            .fetch_optional(self)
            .await
    }

    fn fetch<'a>(&'a self, query: &'a Query) -> BoxStream<'a, Result<SqliteRow, sqlx::Error>> {
        bind_args(sqlx::query(&query.sql), &query.args).fetch(self)
    }

    async fn execute(&self, query: &Query) -> Result<WriteResult, sqlx::Error> {
        let result = bind_args(sqlx::query(&query.sql), &query.args)
            .execute(self)
            .await?;
        Ok(WriteResult {
            last_insert_id: result.last_insert_rowid(),
            rows_affected: result.rows_affected(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_values_become_null() {
        assert_eq!(QueryArg::from(Option::<i64>::None), QueryArg::Null);
        assert_eq!(QueryArg::from(Some(7_i64)), QueryArg::Int(7));
    }

    #[test]
    fn strings_become_text() {
        assert_eq!(QueryArg::from("a"), QueryArg::Text("a".into()));
    }
}

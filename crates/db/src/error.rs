//! Error type returned by every data manager operation.

use todo_core::error::ErrorKind;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{entity} conflicts with an existing row: {source}")]
    Conflict {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{context}: {source}")]
    Query {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("scanning {entity}: {source}")]
    Scan {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("iterating {entity} rows: {source}")]
    Cursor {
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    /// Wrap a driver error raised while executing a statement.
    ///
    /// `RowNotFound` is normalized to [`DbError::NotFound`] and unique
    /// constraint violations to [`DbError::Conflict`].
    pub fn query(entity: &'static str, context: impl Into<String>, source: sqlx::Error) -> Self {
        let unique_violation = matches!(
            &source,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation()
        );
        match source {
            sqlx::Error::RowNotFound => DbError::NotFound { entity },
            source if unique_violation => DbError::Conflict { entity, source },
            source => DbError::Query {
                context: context.into(),
                source,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::NotFound { .. } => ErrorKind::NotFound,
            DbError::Conflict { .. } => ErrorKind::Conflict,
            DbError::Validation(_) => ErrorKind::Validation,
            DbError::Query { .. } => ErrorKind::Query,
            DbError::Scan { .. } => ErrorKind::Scan,
            DbError::Cursor { .. } => ErrorKind::Cursor,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn row_not_found_normalizes_to_not_found() {
        let err = DbError::query("item", "fetching item", sqlx::Error::RowNotFound);
        assert_matches!(err, DbError::NotFound { entity: "item" });
        assert!(err.is_not_found());
    }

    #[test]
    fn other_driver_errors_keep_context() {
        let err = DbError::query("item", "executing item existence query", sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), ErrorKind::Query);
        assert!(err.to_string().starts_with("executing item existence query: "));
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = DbError::Validation("bucket size".into());
        assert_eq!(err.kind().http_status(), 400);
    }
}

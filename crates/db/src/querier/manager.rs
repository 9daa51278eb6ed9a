//! Generic entity manager.
//!
//! One [`Manager`] per entity type, parameterized by a static
//! [`EntityConfig`]. Entity-specific trait impls in the sibling modules
//! translate their arguments into calls on it.

use std::sync::Arc;

use todo_core::types::DbId;

use super::executor;
use super::scan::ScanFn;
use crate::connection::{Connection, Query, QueryArg};
use crate::error::{DbError, DbResult};
use crate::models::filter::{Paginated, Pagination, QueryFilter};
use crate::querybuilding::{ColumnValues, SqlQueryBuilder, TableSpec};

/// Default `limit` for with-IDs lookups when the caller passes `0`.
pub(crate) const DEFAULT_WITH_IDS_LIMIT: u8 = 20;

pub(crate) struct EntityConfig<E> {
    pub table: &'static TableSpec,
    pub scan: ScanFn<E>,
}

pub(crate) struct Manager<E: 'static> {
    pub(super) config: &'static EntityConfig<E>,
    pub(super) db: Arc<dyn Connection>,
    pub(super) builder: Arc<dyn SqlQueryBuilder>,
    pub(super) batch_size: u16,
}

impl<E> Clone for Manager<E> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            db: Arc::clone(&self.db),
            builder: Arc::clone(&self.builder),
            batch_size: self.batch_size,
        }
    }
}

impl<E: Send + 'static> Manager<E> {
    pub(crate) fn entity(&self) -> &'static str {
        self.config.table.entity
    }

    fn table(&self) -> &'static TableSpec {
        self.config.table
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub(crate) async fn exists(&self, id: DbId, owner: Option<DbId>) -> DbResult<bool> {
        let query = self.builder.build_exists_query(self.table(), id, owner);
        let context = format!("executing {} existence query", self.entity());
        executor::perform_boolean_query(self.db.as_ref(), self.entity(), &query, &context).await
    }

    pub(crate) async fn get(&self, id: DbId, owner: Option<DbId>) -> DbResult<E> {
        let query = self.builder.build_get_query(self.table(), id, owner);
        self.fetch_one(&query, "fetching").await
    }

    pub(crate) async fn get_by_column(&self, column: &str, value: QueryArg) -> DbResult<E> {
        let query = self
            .builder
            .build_get_by_column_query(self.table(), column, value);
        self.fetch_one(&query, "fetching").await
    }

    /// Run a single-row query built outside the generic set.
    pub(crate) async fn fetch_one(&self, query: &Query, action: &str) -> DbResult<E> {
        let context = format!("{action} {}", self.entity());
        executor::fetch_one(
            self.db.as_ref(),
            self.entity(),
            query,
            self.config.scan,
            &context,
        )
        .await
    }

    /// Run a multi-row query built outside the generic set.
    pub(crate) async fn fetch_all(&self, query: &Query, action: &str) -> DbResult<Vec<E>> {
        let context = format!("{action} {} rows", self.entity());
        let (rows, _, _) = executor::fetch_many(
            self.db.as_ref(),
            self.entity(),
            query,
            self.config.scan,
            None,
            &context,
        )
        .await?;
        Ok(rows)
    }

    pub(crate) async fn count(&self, include_archived: bool) -> DbResult<u64> {
        let query = self.builder.build_count_query(self.table(), include_archived);
        let context = format!("counting {} rows", self.entity());
        executor::perform_count_query(self.db.as_ref(), self.entity(), &query, &context).await
    }

    /// A filtered page. A missing filter is the default filter.
    pub(crate) async fn list(
        &self,
        owner: Option<DbId>,
        for_admin: bool,
        filter: Option<&QueryFilter>,
    ) -> DbResult<Paginated<E>> {
        let filter = QueryFilter::effective(filter);
        let query = self
            .builder
            .build_list_query(self.table(), owner, for_admin, &filter);
        let context = format!("listing {} rows", self.entity());
        let (data, filtered_count, total_count) = executor::fetch_many(
            self.db.as_ref(),
            self.entity(),
            &query,
            self.config.scan,
            Some(self.table().columns.len()),
            &context,
        )
        .await?;

        Ok(Paginated {
            pagination: Pagination {
                page: filter.page,
                limit: filter.limit,
                filtered_count,
                total_count,
            },
            data,
        })
    }

    pub(crate) async fn with_ids(
        &self,
        owner: Option<DbId>,
        limit: u8,
        ids: &[DbId],
        for_admin: bool,
    ) -> DbResult<Vec<E>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let limit = if limit == 0 {
            DEFAULT_WITH_IDS_LIMIT
        } else {
            limit
        };
        let query = self
            .builder
            .build_with_ids_query(self.table(), owner, limit, ids, for_admin);
        self.fetch_all(&query, "fetching").await
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    pub(crate) async fn insert(&self, values: &ColumnValues) -> DbResult<DbId> {
        let query = self.builder.build_insert_query(self.table(), values);
        let context = format!("creating {}", self.entity());
        executor::perform_create_query(self.db.as_ref(), self.entity(), &query, &context).await
    }

    pub(crate) async fn update(
        &self,
        id: DbId,
        owner: Option<DbId>,
        values: &ColumnValues,
    ) -> DbResult<()> {
        if id <= 0 {
            return Err(DbError::Validation(format!(
                "{} update requires a stored ID, got {id}",
                self.entity()
            )));
        }
        let query = self
            .builder
            .build_update_query(self.table(), id, owner, values);
        self.write(&query, "updating").await
    }

    pub(crate) async fn archive(&self, id: DbId, owner: Option<DbId>) -> DbResult<()> {
        let query = self.builder.build_archive_query(self.table(), id, owner);
        self.write(&query, "archiving").await
    }

    /// Run a write that must touch exactly the targeted row.
    pub(crate) async fn write(&self, query: &Query, action: &str) -> DbResult<()> {
        let context = format!("{action} {}", self.entity());
        executor::perform_write_query(self.db.as_ref(), self.entity(), query, &context).await
    }
}

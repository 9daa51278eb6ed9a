//! "Get all" streaming.
//!
//! The ID space `[1, count]` is split into buckets of `bucket_size` IDs and
//! each bucket is fetched by its own spawned task, which sends its rows onto
//! the caller's channel. Buckets arrive in no particular order.
//!
//! Bucket tasks are detached from the call that spawned them but are bound to
//! the channel: once every receiver is dropped, in-flight fetches are
//! abandoned without sending.

use tokio::sync::mpsc;
use todo_core::types::DbId;

use super::executor;
use super::manager::Manager;
use crate::error::DbResult;

impl<E: Send + 'static> Manager<E> {
    /// Spawn one fetch per bucket and return without waiting for them.
    ///
    /// The channel is never closed here; it closes when the caller and every
    /// bucket task have dropped their senders. A `bucket_size` of `0` uses the
    /// configured batch size.
    pub(crate) async fn stream_all(
        &self,
        results: mpsc::Sender<Vec<E>>,
        bucket_size: u16,
    ) -> DbResult<()> {
        let bucket_size = if bucket_size == 0 {
            self.batch_size
        } else {
            bucket_size
        };
        let step = DbId::from(bucket_size.max(1));

        // Bucket queries include archived rows, so the span must count them too.
        let count = self.count(true).await?;
        let count = DbId::try_from(count).unwrap_or(DbId::MAX);

        let mut begin: DbId = 1;
        while begin <= count {
            let end = begin.saturating_add(step);
            let manager = self.clone();
            let results = results.clone();
            tokio::spawn(async move { manager.fetch_bucket(begin, end, results).await });
            begin = end;
        }

        tracing::debug!(
            table = self.config.table.name,
            count,
            bucket_size,
            "Dispatched bucket fetches"
        );
        Ok(())
    }

    async fn fetch_bucket(self, begin: DbId, end: DbId, results: mpsc::Sender<Vec<E>>) {
        let entity = self.entity();
        let table = self.config.table.name;
        let query = self.builder.build_batch_query(self.config.table, begin, end);
        let context = format!("fetching {entity} bucket");

        let fetched = tokio::select! {
            _ = results.closed() => {
                tracing::debug!(table, begin, end, "Receiver dropped, abandoning bucket");
                return;
            }
            fetched = executor::fetch_many(
                self.db.as_ref(),
                entity,
                &query,
                self.config.scan,
                None,
                &context,
            ) => fetched,
        };

        match fetched {
            Ok((rows, _, _)) if rows.is_empty() => {}
            Ok((rows, _, _)) => {
                if results.send(rows).await.is_err() {
                    tracing::debug!(table, begin, end, "Receiver dropped before bucket was sent");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, table, begin, end, "Failed to fetch bucket");
            }
        }
    }
}

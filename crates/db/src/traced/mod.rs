//! Tracing decorator over any [`DataManager`](crate::managers::DataManager).
//!
//! Every call opens a debug-level span named after the method, logs that it
//! was called, and delegates unchanged. Entity bodies and creation inputs are
//! kept out of span fields since several of them carry secrets; only IDs are
//! recorded.

mod accounts;
mod audit_log;
mod clients;
mod items;
mod plans;
mod users;
mod webhooks;

/// Wraps `inner`, adding a span and a debug event around each call.
#[derive(Debug, Clone)]
pub struct TracedDataManager<D> {
    inner: D,
}

impl<D> TracedDataManager<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn into_inner(self) -> D {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::DataManager;
    use crate::querier::SqlQuerier;

    fn assert_data_manager<T: DataManager>() {}

    #[test]
    fn wrapped_querier_is_a_data_manager() {
        assert_data_manager::<TracedDataManager<SqlQuerier>>();
    }
}

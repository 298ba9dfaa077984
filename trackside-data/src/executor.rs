use crate::error::DataError;
use crate::query::QueryBuilder;
use std::future::Future;

/// The capability the pager needs from a store: run a row query and a count
/// query described by a [`QueryBuilder`].
///
/// Uses RPITIT (return-position `impl Trait` in traits), so no `async-trait` is needed.
///
/// Implementations must not retry: failures are returned as they came from
/// the driver, wrapped in [`DataError::Database`].
pub trait QueryExecutor: Send + Sync {
    type Row: Send;

    /// Fetch the rows selected by `query` (projection, order, limit, offset).
    fn find_many(
        &self,
        query: &QueryBuilder,
    ) -> impl Future<Output = Result<Vec<Self::Row>, DataError>> + Send;

    /// Count the entities matched by `query`, honouring its distinct-count
    /// field. Ordering and limit/offset are ignored.
    fn count(&self, query: &QueryBuilder) -> impl Future<Output = Result<u64, DataError>> + Send;
}

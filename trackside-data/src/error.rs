use crate::query::QueryError;

/// Errors that can occur in the data layer.
///
/// Paging input problems never show up here: out-of-range page numbers are
/// clamped and filters with unknown operators are dropped before a query is
/// built.
#[derive(Debug)]
pub enum DataError {
    /// The query descriptor was rejected before reaching the store.
    Query(QueryError),
    /// The store failed to execute a query. The driver error is kept as-is.
    Database(Box<dyn std::error::Error + Send + Sync>),
}

impl DataError {
    /// Construct a `Database` variant from any error type.
    ///
    /// Used by backend crates (e.g. `trackside-data-sqlx`) to wrap
    /// driver-specific errors.
    pub fn database(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        DataError::Database(Box::new(err))
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Query(err) => write!(f, "Query error: {err}"),
            DataError::Database(err) => write!(f, "Database error: {err}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Query(err) => Some(err),
            DataError::Database(err) => Some(err.as_ref()),
        }
    }
}

impl From<QueryError> for DataError {
    fn from(err: QueryError) -> Self {
        DataError::Query(err)
    }
}

use sqlx::{Database, Pool};
use std::marker::PhantomData;
use trackside_data::{DataError, IdentifierPolicy, QueryBuilder, QueryExecutor, Value};

use crate::error::SqlxErrorExt;

/// Runs paging queries against an `sqlx::Pool<DB>`, decoding rows into `T`.
///
/// `T` must implement `sqlx::FromRow` for the database's row type.
///
/// # Example
///
/// ```ignore
/// let exec = SqlxExecutor::<EventRow, Sqlite>::new(pool.clone());
/// let page = paginate(&exec, exec.query("events"), request).await?;
/// ```
pub struct SqlxExecutor<T, DB: Database> {
    pool: Pool<DB>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, DB: Database> SqlxExecutor<T, DB> {
    pub fn new(pool: Pool<DB>) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool reference.
    pub fn pool(&self) -> &Pool<DB> {
        &self.pool
    }
}

impl<T, DB: Database> Clone for SqlxExecutor<T, DB> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _marker: PhantomData,
        }
    }
}

/// Bind every value in order. NULLs are bound as untyped text.
macro_rules! bind_values {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for value in $params {
            query = match value {
                Value::Null => query.bind(None::<String>),
                Value::Bool(b) => query.bind(b),
                Value::Int(i) => query.bind(i),
                Value::Float(f) => query.bind(f),
                Value::Text(s) => query.bind(s),
            };
        }
        query
    }};
}

macro_rules! impl_query_executor {
    ($db:ty, $row:ty, $dialect:expr, $policy:expr) => {
        impl<T> SqlxExecutor<T, $db> {
            /// Create a `QueryBuilder` for `table` using this database's dialect
            /// and identifier policy.
            pub fn query(&self, table: &str) -> QueryBuilder {
                QueryBuilder::new_with_dialect(table, $dialect).identifier_policy($policy)
            }
        }

        impl<T> QueryExecutor for SqlxExecutor<T, $db>
        where
            T: for<'r> sqlx::FromRow<'r, $row> + Send + Unpin + 'static,
        {
            type Row = T;

            async fn find_many(&self, query: &QueryBuilder) -> Result<Vec<T>, DataError> {
                let (sql, params) = query.build_select()?;
                tracing::trace!(%sql, params = params.len(), "Executing row query");
                bind_values!(sqlx::query_as::<$db, T>(&sql), params)
                    .fetch_all(&self.pool)
                    .await
                    .map_err(|e| e.into_data_error())
            }

            async fn count(&self, query: &QueryBuilder) -> Result<u64, DataError> {
                let (sql, params) = query.build_count()?;
                tracing::trace!(%sql, params = params.len(), "Executing count query");
                let count: i64 = bind_values!(sqlx::query_scalar::<$db, i64>(&sql), params)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| e.into_data_error())?;
                Ok(u64::try_from(count).unwrap_or(0))
            }
        }
    };
}

#[cfg(feature = "sqlite")]
impl_query_executor!(
    sqlx::Sqlite,
    sqlx::sqlite::SqliteRow,
    trackside_data::Dialect::Sqlite,
    IdentifierPolicy::Validate
);

// Postgres folds unquoted identifiers to lower case, so camelCase columns
// such as `updatedAt` only resolve when quoted.
#[cfg(feature = "postgres")]
impl_query_executor!(
    sqlx::Postgres,
    sqlx::postgres::PgRow,
    trackside_data::Dialect::Postgres,
    IdentifierPolicy::Quote
);

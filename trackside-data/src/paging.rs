//! The paging engine.
//!
//! [`Pager`] merges a caller's base query with a [`PageRequest`]:
//!
//! 1. page and size are clamped to at least 1 (and to `max_size` if set),
//!    `offset = size * (page - 1)`
//! 2. the sort key defaults to `updatedAt` and the direction to DESC
//! 3. filters (and free-text search) are ANDed onto the base query's own
//!    conditions
//! 4. ordering is `customSort ++ [(key, dir)] ++ defaultSort`, unless a
//!    non-empty `multiSort` replaces it
//! 5. the row query and the count query run concurrently over the same
//!    conditions; the first failure cancels the other and is returned as-is
//!
//! ```ignore
//! let base = QueryBuilder::new("events")
//!     .join(JoinKind::Left, "participants", "participants.event_id = events.id")
//!     .select(&["events.*"])
//!     .group_by(&["events.id"]);
//! let request = PageRequest::new(1, 25).with_custom_count_field("events.id");
//! let page = paginate(&executor, base, request).await?;
//! ```

use crate::config::PagingConfig;
use crate::error::DataError;
use crate::executor::QueryExecutor;
use crate::filter::{compile_filters, search_condition};
use crate::page::PageResponse;
use crate::query::QueryBuilder;
use crate::request::PageRequest;
use crate::sort::{compile_sort, OrderClause, SortDir, SortKey, SortSpec};

/// Largest LIMIT/OFFSET a store accepts (a signed 64-bit integer).
const MAX_SQL_INT: u64 = i64::MAX as u64;

/// Effective page window after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub size: u64,
    pub offset: u64,
}

impl PageWindow {
    pub fn resolve(page: i64, size: i64, max_size: Option<u64>) -> Self {
        let page = page.max(1).unsigned_abs();
        let mut size = size.max(1).unsigned_abs();
        if let Some(max) = max_size {
            size = size.min(max.max(1));
        }
        Self {
            page,
            size,
            offset: size.saturating_mul(page - 1).min(MAX_SQL_INT),
        }
    }
}

/// The resolved sort key name, direction and final ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSort {
    pub key_name: String,
    pub direction: SortDir,
    pub ordering: OrderClause,
}

/// Resolve the ordering of a request.
pub fn resolve_sort(request: &PageRequest, config: &PagingConfig) -> ResolvedSort {
    let direction = SortDir::from_srdir(request.srdir, config.default_direction);
    let key = request
        .sort
        .clone()
        .filter(|key| !key.display_name().is_empty())
        .unwrap_or_else(|| SortKey::Field(config.default_sort.clone()));

    let ordering = match request.multi_sort.as_deref() {
        Some(pairs) if !pairs.is_empty() => compile_sort(&SortSpec::Multi(pairs.to_vec())),
        _ => {
            let mut ordering = request.custom_sort.clone();
            ordering.extend(compile_sort(&SortSpec::from_key(&key, direction)));
            ordering.extend(request.default_sort.iter().cloned());
            ordering
        }
    };

    ResolvedSort {
        key_name: key.display_name().to_string(),
        direction,
        ordering,
    }
}

/// The two queries of a page, ready to run.
#[derive(Debug, Clone)]
pub struct PreparedPage {
    pub rows_query: QueryBuilder,
    pub count_query: QueryBuilder,
    pub window: PageWindow,
    pub sort: ResolvedSort,
}

/// Build the row and count queries for `request` on top of `base`.
///
/// Both queries carry the same conditions; the count query differs only in
/// dropping order/limit/offset and counting distinct on the request's
/// count field when one is given.
pub fn prepare(base: QueryBuilder, request: &PageRequest, config: &PagingConfig) -> PreparedPage {
    let window = PageWindow::resolve(request.page, request.size, config.max_size);
    let sort = resolve_sort(request, config);

    let mut filtered = base.and_where_all(compile_filters(&request.filters));
    if let Some(search) = search_condition(request.query.as_deref(), &request.search_fields) {
        filtered = filtered.and_where(search);
    }

    let mut count_query = filtered.clone();
    if let Some(field) = &request.custom_count_field {
        count_query = count_query.count_distinct(field);
    }

    let rows_query = filtered
        .order_by_terms(sort.ordering.clone())
        .limit(window.size)
        .offset(window.offset);

    PreparedPage {
        rows_query,
        count_query,
        window,
        sort,
    }
}

/// Fluent entry point for paging with a non-default [`PagingConfig`].
///
/// ```ignore
/// Pager::new(&executor)
///     .config(PagingConfig::load("application.yaml")?)
///     .fetch(base, request)
///     .await
/// ```
#[must_use]
pub struct Pager<'a, X> {
    executor: &'a X,
    config: PagingConfig,
}

impl<'a, X: QueryExecutor> Pager<'a, X> {
    pub fn new(executor: &'a X) -> Self {
        Self {
            executor,
            config: PagingConfig::default(),
        }
    }

    pub fn config(mut self, config: PagingConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the page. Either both queries succeed or the store error is
    /// returned; there is no partial result.
    pub async fn fetch(
        &self,
        base: QueryBuilder,
        request: PageRequest,
    ) -> Result<PageResponse<X::Row>, DataError> {
        let prepared = prepare(base, &request, &self.config);
        tracing::debug!(
            table = prepared.rows_query.table(),
            page = prepared.window.page,
            size = prepared.window.size,
            offset = prepared.window.offset,
            sort = %prepared.sort.key_name,
            srdir = %prepared.sort.direction,
            filters = prepared.count_query.conditions().len(),
            "Fetching page"
        );

        let (rows, count) = tokio::try_join!(
            self.executor.find_many(&prepared.rows_query),
            self.executor.count(&prepared.count_query),
        )?;
        tracing::debug!(count, rows = rows.len(), "Page fetched");

        Ok(PageResponse {
            count,
            rows,
            page: prepared.window.page,
            size: prepared.window.size,
            sort: prepared.sort.key_name,
            srdir: prepared.sort.direction,
            q: request.query,
            draw: request.draw,
            filters: request.filters,
            multi_sort: request.multi_sort,
        })
    }
}

/// Page `base` according to `request` with the default [`PagingConfig`].
pub async fn paginate<X: QueryExecutor>(
    executor: &X,
    base: QueryBuilder,
    request: PageRequest,
) -> Result<PageResponse<X::Row>, DataError> {
    Pager::new(executor).fetch(base, request).await
}

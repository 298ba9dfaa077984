use serde::{Deserialize, Serialize};

use crate::filter::FilterClause;
use crate::sort::{SortDir, SortPair};

/// A page of results plus the paging parameters that produced it.
///
/// Serialises camelCase:
///
/// ```json
/// { "count": 5, "rows": [...], "page": 2, "size": 2, "sort": "updatedAt",
///   "srdir": "DESC", "q": null, "draw": 3, "filters": [], "multiSort": null }
/// ```
///
/// `count` is the number of matching entities across all pages, not the
/// length of `rows`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub count: u64,
    pub rows: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub sort: String,
    pub srdir: SortDir,
    pub q: Option<String>,
    pub draw: Option<serde_json::Value>,
    pub filters: Vec<FilterClause>,
    pub multi_sort: Option<Vec<SortPair>>,
}

impl<T> PageResponse<T> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            0
        } else {
            self.count.div_ceil(self.size)
        }
    }

    /// Convert the rows, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResponse<U> {
        PageResponse {
            count: self.count,
            rows: self.rows.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            sort: self.sort,
            srdir: self.srdir,
            q: self.q,
            draw: self.draw,
            filters: self.filters,
            multi_sort: self.multi_sort,
        }
    }
}

use serde::Deserialize;

use crate::filter::FilterClause;
use crate::sort::{OrderTerm, SortKey, SortPair};

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

/// A page/sort/filter request, built per call and consumed by the pager.
///
/// The client-facing fields deserialise from the usual query payload:
///
/// ```json
/// { "page": 2, "size": 10, "sort": "name", "srdir": 1,
///   "filters": [{ "field": "city", "opr": "contains", "value": "ber" }] }
/// ```
///
/// `page` and `size` are signed so that out-of-range input can be clamped
/// rather than rejected. Custom sorts, default tie-breakers, the distinct
/// count field and search fields are set by data-access code through the
/// builder methods and are never read from client input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default, alias = "q")]
    pub query: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
    #[serde(default)]
    pub sort: Option<SortKey>,
    /// Negative for descending, anything else ascending.
    #[serde(default)]
    pub srdir: Option<i64>,
    /// When non-empty, replaces every other ordering.
    #[serde(default)]
    pub multi_sort: Option<Vec<SortPair>>,
    #[serde(default)]
    pub filters: Vec<FilterClause>,
    /// Opaque value echoed back unchanged.
    #[serde(default)]
    pub draw: Option<serde_json::Value>,
    /// Terms placed before the resolved sort key.
    #[serde(skip)]
    pub custom_sort: Vec<OrderTerm>,
    /// Trailing tie-breakers appended after the resolved sort key.
    #[serde(skip)]
    pub default_sort: Vec<OrderTerm>,
    #[serde(skip)]
    pub custom_count_field: Option<String>,
    #[serde(skip)]
    pub search_fields: Vec<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            query: None,
            page: default_page(),
            size: default_page_size(),
            sort: None,
            srdir: None,
            multi_sort: None,
            filters: Vec::new(),
            draw: None,
            custom_sort: Vec::new(),
            default_sort: Vec::new(),
            custom_count_field: None,
            search_fields: Vec::new(),
        }
    }
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Self {
        Self {
            page,
            size,
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_sort(mut self, key: impl Into<SortKey>) -> Self {
        self.sort = Some(key.into());
        self
    }

    pub fn with_srdir(mut self, srdir: i64) -> Self {
        self.srdir = Some(srdir);
        self
    }

    pub fn with_multi_sort(mut self, pairs: Vec<SortPair>) -> Self {
        self.multi_sort = Some(pairs);
        self
    }

    pub fn with_filter(mut self, clause: FilterClause) -> Self {
        self.filters.push(clause);
        self
    }

    pub fn with_draw(mut self, draw: serde_json::Value) -> Self {
        self.draw = Some(draw);
        self
    }

    pub fn with_custom_sort(mut self, terms: Vec<OrderTerm>) -> Self {
        self.custom_sort = terms;
        self
    }

    pub fn with_default_sort(mut self, terms: Vec<OrderTerm>) -> Self {
        self.default_sort = terms;
        self
    }

    /// Count distinct values of `field` rather than rows. Required when the
    /// base query joins a one-to-many relation.
    pub fn with_custom_count_field(mut self, field: impl Into<String>) -> Self {
        self.custom_count_field = Some(field.into());
        self
    }

    pub fn with_search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::SortDir;

    #[test]
    fn test_deserialize_client_payload() {
        let req: PageRequest = serde_json::from_str(
            r#"{
                "q": "ber",
                "page": 0,
                "size": -3,
                "sort": "name",
                "srdir": -1,
                "multiSort": [["a", "ASC"], ["b", "DESC"]],
                "filters": [{"field": "city", "opr": "contains", "value": "ber"}],
                "draw": 7
            }"#,
        )
        .unwrap();
        assert_eq!(req.query.as_deref(), Some("ber"));
        assert_eq!((req.page, req.size), (0, -3));
        assert_eq!(req.sort, Some(SortKey::Field("name".into())));
        assert_eq!(req.srdir, Some(-1));
        assert_eq!(
            req.multi_sort,
            Some(vec![SortPair::new("a", SortDir::Asc), SortPair::new("b", SortDir::Desc)])
        );
        assert_eq!(req.filters.len(), 1);
        assert_eq!(req.draw, Some(serde_json::json!(7)));
        assert!(req.custom_sort.is_empty());
        assert!(req.custom_count_field.is_none());
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let req: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!((req.page, req.size), (1, 20));
        assert!(req.sort.is_none());
        assert!(req.srdir.is_none());
        assert!(req.filters.is_empty());
    }

    #[test]
    fn test_server_side_fields_are_not_deserialized() {
        let req: PageRequest =
            serde_json::from_str(r#"{"customCountField": "id", "searchFields": ["name"]}"#).unwrap();
        assert!(req.custom_count_field.is_none());
        assert!(req.search_fields.is_empty());
    }
}

//! # trackside-data: paginated queries over a relational store
//!
//! Every collection-returning data-access function hands its own base query
//! and a client [`PageRequest`] to the [`Pager`] and gets back a uniform
//! [`PageResponse`] envelope.
//!
//! | Module | Role |
//! |--------|------|
//! | [`filter`] | `{field, opr, value}` clauses to conditions |
//! | [`sort`] | field / multi-field / custom-expression ordering |
//! | [`query`] | [`QueryBuilder`] and SQL rendering |
//! | [`executor`] | [`QueryExecutor`], the store capability |
//! | [`paging`] | [`Pager`] and [`paginate`] |
//! | [`config`] | [`PagingConfig`] defaults |
//!
//! Backends live in separate crates (`trackside-data-sqlx`).

pub mod config;
pub mod error;
pub mod executor;
pub mod filter;
pub mod page;
pub mod paging;
pub mod query;
pub mod request;
pub mod sort;
pub mod value;

pub use config::{ConfigError, PagingConfig};
pub use error::DataError;
pub use executor::QueryExecutor;
pub use filter::{compile_filters, FilterClause, FilterOp};
pub use page::PageResponse;
pub use paging::{paginate, Pager};
pub use query::{
    CompareOp, Condition, Dialect, IdentifierPolicy, JoinKind, QueryBuilder, QueryError,
};
pub use request::PageRequest;
pub use sort::{
    compile_sort, Direction, NullsOrder, OrderTerm, SortDir, SortKey, SortPair, SortSpec,
};
pub use value::Value;

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{
        paginate, DataError, FilterClause, OrderTerm, PageRequest, PageResponse, Pager,
        PagingConfig, QueryBuilder, QueryExecutor, SortDir, SortKey, SortPair,
    };
}

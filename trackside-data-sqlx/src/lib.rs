//! # trackside-data-sqlx: SQLx backend for the Trackside paging engine
//!
//! This crate provides the [SQLx](https://github.com/launchbadge/sqlx)-specific
//! implementation of [`trackside_data::QueryExecutor`]. It depends on
//! [`trackside-data`] for the query model and the pager, and adds the executor
//! and error bridging needed to talk to a real database.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SqlxExecutor`] | Pool wrapper that runs row and count queries, decoding rows via `FromRow` |
//! | [`SqlxErrorExt`] | Extension trait to convert `sqlx::Error` → `DataError` (`.into_data_error()`) |
//! | [`SqlxResult<T>`] | Type alias for `Result<T, DataError>` |
//!
//! # Feature flags
//!
//! | Feature    | Driver |
//! |------------|--------|
//! | `sqlite`   | SQLite via `sqlx/sqlite` (default) |
//! | `postgres` | PostgreSQL via `sqlx/postgres` |
//!
//! # Quick start
//!
//! ```ignore
//! use trackside_data::prelude::*;
//! use trackside_data_sqlx::SqlxExecutor;
//! use sqlx::Sqlite;
//!
//! #[derive(sqlx::FromRow, serde::Serialize)]
//! struct EventRow { id: i64, name: String }
//!
//! let exec = SqlxExecutor::<EventRow, Sqlite>::new(pool.clone());
//! let base = exec
//!     .query("events")
//!     .join(JoinKind::Left, "participants", "participants.event_id = events.id")
//!     .select(&["events.id", "events.name"])
//!     .group_by(&["events.id"]);
//! let request = PageRequest::new(1, 20).with_custom_count_field("events.id");
//! let page = paginate(&exec, base, request).await?;
//! ```
//!
//! Store errors are returned as [`DataError::Database`](trackside_data::DataError)
//! wrapping the original `sqlx::Error`; nothing is retried.

pub mod error;
pub mod executor;

pub use error::{SqlxErrorExt, SqlxResult};
pub use executor::SqlxExecutor;

/// Re-exports of the most commonly used types from both `trackside-data` and this crate.
pub mod prelude {
    pub use crate::{SqlxErrorExt, SqlxExecutor};
    pub use trackside_data::prelude::*;
}

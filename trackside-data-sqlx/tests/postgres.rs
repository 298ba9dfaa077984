#![cfg(feature = "postgres")]

//! SQL rendering of the Postgres executor. The pool is lazy and never
//! connects, so no server is needed.

use sqlx::postgres::PgPoolOptions;
use sqlx::Postgres;
use trackside_data::paging::prepare;
use trackside_data::prelude::*;
use trackside_data_sqlx::SqlxExecutor;

fn executor() -> SqlxExecutor<(i64, String), Postgres> {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://trackside@localhost/trackside")
        .unwrap();
    SqlxExecutor::new(pool)
}

#[tokio::test]
async fn test_default_sort_key_is_quoted() {
    let exec = executor();
    let request = PageRequest::new(1, 20);
    let prepared = prepare(exec.query("events"), &request, &PagingConfig::default());

    let (sql, params) = prepared.rows_query.build_select().unwrap();
    assert_eq!(sql, "SELECT * FROM \"events\" ORDER BY \"updatedAt\" DESC LIMIT 20 OFFSET 0");
    assert!(params.is_empty());

    let (sql, _) = prepared.count_query.build_count().unwrap();
    assert_eq!(sql, "SELECT COUNT(*) FROM \"events\"");
}

#[tokio::test]
async fn test_filters_and_count_field_are_quoted() {
    let exec = executor();
    let request = PageRequest::new(2, 10)
        .with_sort("startsAt")
        .with_srdir(1)
        .with_filter(FilterClause::new("events.cityName", "contains", "lyon"))
        .with_custom_count_field("events.id");
    let prepared = prepare(exec.query("events"), &request, &PagingConfig::default());

    let (sql, params) = prepared.rows_query.build_select().unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM \"events\" WHERE \"events\".\"cityName\" ILIKE $1 \
         ORDER BY \"startsAt\" ASC LIMIT 10 OFFSET 10"
    );
    assert_eq!(params, vec![trackside_data::Value::from("%lyon%")]);

    let (sql, _) = prepared.count_query.build_count().unwrap();
    assert_eq!(
        sql,
        "SELECT COUNT(DISTINCT \"events\".\"id\") FROM \"events\" WHERE \"events\".\"cityName\" ILIKE $1"
    );
}

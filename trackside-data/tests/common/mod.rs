#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use serde_json::{json, Value as Json};
use trackside_data::prelude::*;
use trackside_data::query::{CompareOp, Condition};
use trackside_data::Value;

/// Evaluates query descriptors against an in-memory table of JSON objects.
pub struct MemoryExecutor {
    pub rows: Vec<Json>,
    pub find_calls: AtomicUsize,
    pub count_calls: AtomicUsize,
}

impl MemoryExecutor {
    pub fn new(rows: Vec<Json>) -> Self {
        Self {
            rows,
            find_calls: AtomicUsize::new(0),
            count_calls: AtomicUsize::new(0),
        }
    }

    fn matching(&self, query: &QueryBuilder) -> Vec<Json> {
        self.rows
            .iter()
            .filter(|row| query.conditions().iter().all(|c| matches(row, c)))
            .cloned()
            .collect()
    }
}

fn to_json(value: &Value) -> Json {
    serde_json::to_value(value).unwrap()
}

fn compare(a: &Json, b: &Json) -> Option<Ordering> {
    match (a, b) {
        (Json::Number(x), Json::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Json::String(x), Json::String(y)) => Some(x.cmp(y)),
        (Json::Bool(x), Json::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn matches(row: &Json, cond: &Condition) -> bool {
    match cond {
        Condition::Compare { column, op, value } => {
            let field = row.get(column).cloned().unwrap_or(Json::Null);
            let value = to_json(value);
            match op {
                CompareOp::Eq => field == value,
                CompareOp::NotEq => field != value,
                CompareOp::Gt => compare(&field, &value) == Some(Ordering::Greater),
                CompareOp::Gte => matches!(compare(&field, &value), Some(Ordering::Greater | Ordering::Equal)),
                CompareOp::Lt => compare(&field, &value) == Some(Ordering::Less),
                CompareOp::Lte => matches!(compare(&field, &value), Some(Ordering::Less | Ordering::Equal)),
                CompareOp::Like | CompareOp::ILike => {
                    let needle = value.as_str().unwrap_or_default().trim_matches('%').to_lowercase();
                    let hay = match &field {
                        Json::String(s) => s.to_lowercase(),
                        other => other.to_string(),
                    };
                    hay.contains(&needle)
                }
            }
        }
        Condition::AnyOf(inner) => inner.iter().any(|c| matches(row, c)),
        other => panic!("unsupported condition in memory executor: {other:?}"),
    }
}

impl QueryExecutor for MemoryExecutor {
    type Row = Json;

    async fn find_many(&self, query: &QueryBuilder) -> Result<Vec<Json>, DataError> {
        self.find_calls.fetch_add(1, AtomicOrdering::SeqCst);
        let mut rows = self.matching(query);
        rows.sort_by(|a, b| {
            for term in query.order_terms() {
                let OrderTerm::Column { field, direction } = term else {
                    panic!("expression ordering is not supported in memory");
                };
                let ord = compare(&a[field.as_str()], &b[field.as_str()]).unwrap_or(Ordering::Equal);
                let ord = match direction.dir {
                    SortDir::Asc => ord,
                    SortDir::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        let offset = query.offset_value().unwrap_or(0) as usize;
        let limit = query.limit_value().map_or(usize::MAX, |l| l as usize);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, query: &QueryBuilder) -> Result<u64, DataError> {
        self.count_calls.fetch_add(1, AtomicOrdering::SeqCst);
        let rows = self.matching(query);
        let count = match query.count_field() {
            Some(field) => rows
                .iter()
                .map(|row| row[field].to_string())
                .collect::<HashSet<_>>()
                .len(),
            None => rows.len(),
        };
        Ok(count as u64)
    }
}

/// Five events, updated in id order.
pub fn events() -> Vec<Json> {
    (1..=5)
        .map(|id| {
            json!({
                "id": id,
                "name": format!("Race {id}"),
                "city": if id % 2 == 0 { "Berlin" } else { "Lyon" },
                "updatedAt": format!("2026-01-0{id}T00:00:00Z"),
            })
        })
        .collect()
}

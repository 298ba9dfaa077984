//! Filter compiler: declarative filter clauses to query conditions.
//!
//! Every compiled clause becomes one [`Condition`] and the caller ANDs them
//! together. There is no OR and no grouping at this level.
//!
//! A clause whose operator is not recognised is dropped without an error.
//! That keeps older clients working, but a typo in `opr` silently widens the
//! result set.

use serde::{Deserialize, Serialize};

use crate::query::{CompareOp, Condition};
use crate::value::Value;

/// Operators accepted in a [`FilterClause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Gte,
    Lte,
    Gt,
    Lt,
    Eq,
    Ne,
    /// Case-insensitive substring match.
    Contains,
}

impl FilterOp {
    /// Parse the wire name of an operator. Unknown names yield `None`.
    pub fn parse(opr: &str) -> Option<Self> {
        Some(match opr {
            "gte" => FilterOp::Gte,
            "lte" => FilterOp::Lte,
            "gt" => FilterOp::Gt,
            "lt" => FilterOp::Lt,
            "eq" => FilterOp::Eq,
            "ne" => FilterOp::Ne,
            "contains" => FilterOp::Contains,
            _ => return None,
        })
    }

    fn compare_op(self) -> CompareOp {
        match self {
            FilterOp::Gte => CompareOp::Gte,
            FilterOp::Lte => CompareOp::Lte,
            FilterOp::Gt => CompareOp::Gt,
            FilterOp::Lt => CompareOp::Lt,
            FilterOp::Eq => CompareOp::Eq,
            FilterOp::Ne => CompareOp::NotEq,
            FilterOp::Contains => CompareOp::ILike,
        }
    }
}

/// One `{field, opr, value}` filter from a page request.
///
/// `opr` is kept as the raw string so the clause can be echoed back exactly
/// as the client sent it, recognised or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub opr: String,
    #[serde(default)]
    pub value: Value,
}

impl FilterClause {
    pub fn new(field: impl Into<String>, opr: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            opr: opr.into(),
            value: value.into(),
        }
    }
}

/// Compile one clause, or `None` if it contributes nothing.
pub fn compile_filter(clause: &FilterClause) -> Option<Condition> {
    if clause.field.is_empty() {
        return None;
    }
    let Some(op) = FilterOp::parse(&clause.opr) else {
        tracing::debug!(
            field = %clause.field,
            opr = %clause.opr,
            "Ignoring filter with unrecognized operator"
        );
        return None;
    };
    let value = match op {
        FilterOp::Contains => clause.value.to_contains_pattern(),
        _ => clause.value.clone(),
    };
    Some(Condition::Compare {
        column: clause.field.clone(),
        op: op.compare_op(),
        value,
    })
}

/// Compile all clauses, preserving their order.
pub fn compile_filters(clauses: &[FilterClause]) -> Vec<Condition> {
    clauses.iter().filter_map(compile_filter).collect()
}

/// Free-text search: a case-insensitive `%query%` match on any of `fields`.
///
/// Returns `None` when the query is blank or there is nothing to search.
pub fn search_condition(query: Option<&str>, fields: &[String]) -> Option<Condition> {
    let query = query.map(str::trim).filter(|q| !q.is_empty())?;
    if fields.is_empty() {
        return None;
    }
    let pattern = Value::from(query).to_contains_pattern();
    let matches = fields
        .iter()
        .map(|field| Condition::Compare {
            column: field.clone(),
            op: CompareOp::ILike,
            value: pattern.clone(),
        })
        .collect();
    Some(Condition::AnyOf(matches))
}

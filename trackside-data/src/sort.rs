//! Sort compiler: turns a [`SortSpec`] into an ordering clause.
//!
//! Three shapes are supported:
//!
//! | Spec | Ordering |
//! |------|----------|
//! | [`SortSpec::Field`] | `[(field, direction)]` |
//! | [`SortSpec::Multi`] | each `(field, direction)` pair, in order |
//! | [`SortSpec::Custom`] | the pre-built expression, verbatim |
//!
//! NULL placement is part of each term's [`Direction`] and is never altered
//! here; stable paging depends on the caller's choice surviving as written.

use serde::{Deserialize, Serialize};

/// Sort direction. Serialises as `"ASC"` / `"DESC"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDir {
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl SortDir {
    /// Map the numeric `srdir` request field: negative means descending,
    /// anything else ascending, absent falls back to `default`.
    pub fn from_srdir(srdir: Option<i64>, default: SortDir) -> SortDir {
        match srdir {
            Some(n) if n < 0 => SortDir::Desc,
            Some(_) => SortDir::Asc,
            None => default,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for SortDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

impl NullsOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            NullsOrder::First => "NULLS FIRST",
            NullsOrder::Last => "NULLS LAST",
        }
    }
}

/// A direction with optional NULL placement, e.g. `"DESC NULLS LAST"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Direction {
    pub dir: SortDir,
    pub nulls: Option<NullsOrder>,
}

impl Direction {
    pub const ASC: Direction = Direction {
        dir: SortDir::Asc,
        nulls: None,
    };
    pub const DESC: Direction = Direction {
        dir: SortDir::Desc,
        nulls: None,
    };

    pub fn nulls(mut self, nulls: NullsOrder) -> Self {
        self.nulls = Some(nulls);
        self
    }
}

impl From<SortDir> for Direction {
    fn from(dir: SortDir) -> Self {
        Direction { dir, nulls: None }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.nulls {
            Some(nulls) => write!(f, "{} {}", self.dir, nulls.as_sql()),
            None => write!(f, "{}", self.dir),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDirection(pub String);

impl std::fmt::Display for InvalidDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid sort direction: {:?}", self.0)
    }
}

impl std::error::Error for InvalidDirection {}

impl std::str::FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let words: Vec<&str> = upper.split_whitespace().collect();
        let dir = match words.first() {
            Some(&"ASC") => SortDir::Asc,
            Some(&"DESC") => SortDir::Desc,
            _ => return Err(InvalidDirection(s.to_string())),
        };
        let nulls = match &words[1..] {
            [] => None,
            ["NULLS", "FIRST"] => Some(NullsOrder::First),
            ["NULLS", "LAST"] => Some(NullsOrder::Last),
            _ => return Err(InvalidDirection(s.to_string())),
        };
        Ok(Direction { dir, nulls })
    }
}

impl TryFrom<String> for Direction {
    type Error = InvalidDirection;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> Self {
        d.to_string()
    }
}

/// One `(field, direction)` pair of a multi-column sort.
///
/// Serialises as a two-element array: `["startsAt", "DESC NULLS LAST"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, Direction)", into = "(String, Direction)")]
pub struct SortPair {
    pub field: String,
    pub direction: Direction,
}

impl SortPair {
    pub fn new(field: impl Into<String>, direction: impl Into<Direction>) -> Self {
        Self {
            field: field.into(),
            direction: direction.into(),
        }
    }
}

impl From<(String, Direction)> for SortPair {
    fn from((field, direction): (String, Direction)) -> Self {
        Self { field, direction }
    }
}

impl From<SortPair> for (String, Direction) {
    fn from(pair: SortPair) -> Self {
        (pair.field, pair.direction)
    }
}

/// A single term of an ordering clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderTerm {
    /// A column (validated when rendered) with its direction.
    Column { field: String, direction: Direction },
    /// A caller-built expression used verbatim, direction included.
    Expr(String),
}

impl OrderTerm {
    pub fn column(field: impl Into<String>, direction: impl Into<Direction>) -> Self {
        OrderTerm::Column {
            field: field.into(),
            direction: direction.into(),
        }
    }

    pub fn expr(expr: impl Into<String>) -> Self {
        OrderTerm::Expr(expr.into())
    }
}

impl From<&SortPair> for OrderTerm {
    fn from(pair: &SortPair) -> Self {
        OrderTerm::Column {
            field: pair.field.clone(),
            direction: pair.direction,
        }
    }
}

/// An ordered list of terms; earlier terms dominate, later ones break ties.
pub type OrderClause = Vec<OrderTerm>;

/// The logical key a page is sorted by.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SortKey {
    /// A plain column.
    Field(String),
    /// A pre-built ordering expression (for values assembled from joined
    /// records) and the name echoed back to the client. Never read from
    /// client input.
    Custom { expr: String, field_name: String },
}

impl SortKey {
    pub fn custom(expr: impl Into<String>, field_name: impl Into<String>) -> Self {
        SortKey::Custom {
            expr: expr.into(),
            field_name: field_name.into(),
        }
    }

    /// The name reported back in the page envelope.
    pub fn display_name(&self) -> &str {
        match self {
            SortKey::Field(field) => field,
            SortKey::Custom { field_name, .. } => field_name,
        }
    }
}

impl From<String> for SortKey {
    fn from(field: String) -> Self {
        SortKey::Field(field)
    }
}

impl From<&str> for SortKey {
    fn from(field: &str) -> Self {
        SortKey::Field(field.to_string())
    }
}

/// The three ways a page can be sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortSpec {
    Field { field: String, direction: Direction },
    Multi(Vec<SortPair>),
    Custom { expr: String, field_name: String },
}

impl SortSpec {
    /// Build the single-key spec for `key` sorted in `dir`. Custom keys
    /// carry their own direction, so `dir` only applies to plain fields.
    pub fn from_key(key: &SortKey, dir: SortDir) -> Self {
        match key {
            SortKey::Field(field) => SortSpec::Field {
                field: field.clone(),
                direction: dir.into(),
            },
            SortKey::Custom { expr, field_name } => SortSpec::Custom {
                expr: expr.clone(),
                field_name: field_name.clone(),
            },
        }
    }
}

/// Compile a sort spec into an ordering clause.
pub fn compile_sort(spec: &SortSpec) -> OrderClause {
    match spec {
        SortSpec::Field { field, direction } => vec![OrderTerm::column(field.as_str(), *direction)],
        SortSpec::Multi(pairs) => pairs.iter().map(OrderTerm::from).collect(),
        SortSpec::Custom { expr, .. } => vec![OrderTerm::expr(expr.as_str())],
    }
}

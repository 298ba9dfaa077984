use crate::sort::OrderTerm;
use crate::value::Value;

/// SQL dialect: placeholder style, identifier quoting and case-insensitive
/// matching.
///
/// `trackside-data-sqlx` builds `Sqlite` and `Postgres` descriptors.
/// `Generic` and `MySql` are for descriptors built by hand and rendered by
/// other executors through [`QueryBuilder::build_select`] and
/// [`QueryBuilder::build_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Generic SQL using `?` placeholders (default).
    Generic,
    /// SQLite-style `?` placeholders.
    Sqlite,
    /// MySQL-style `?` placeholders with backtick quoting.
    MySql,
    /// Postgres-style `$1, $2, ...` placeholders and native `ILIKE`.
    Postgres,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Generic | Dialect::Sqlite | Dialect::MySql => "?".to_string(),
        }
    }

    fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Generic | Dialect::Sqlite | Dialect::Postgres => '"',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierPolicy {
    /// Validate identifiers against a conservative pattern.
    Validate,
    /// Validate and quote identifiers using the dialect quoting style.
    Quote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub on: String,
}

/// Comparison operators a [`Condition::Compare`] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    /// Case-insensitive `LIKE`.
    ILike,
}

/// A single predicate. All conditions of a query are joined with `AND`.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        column: String,
        op: CompareOp,
        value: Value,
    },
    In(String, Vec<Value>),
    IsNull(String),
    IsNotNull(String),
    /// Matches when any inner condition matches.
    AnyOf(Vec<Condition>),
    /// Caller-built SQL with one `?` marker per parameter.
    Raw { sql: String, params: Vec<Value> },
}

impl Condition {
    pub fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Condition::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }
}

/// A fluent, structured query descriptor for SELECT and COUNT queries.
///
/// Data-access functions build one per entity (table, joins, projection and
/// their own predicates) and hand it to the paging engine, which adds the
/// request's filters, ordering and limit/offset on top.
///
/// # Example
///
/// ```ignore
/// let q = QueryBuilder::new("events")
///     .join(JoinKind::Left, "participants", "participants.event_id = events.id")
///     .select(&["events.*"])
///     .group_by(&["events.id"])
///     .where_eq("events.status", "published")
///     .count_distinct("events.id")
///     .order_by("events.id", true)
///     .limit(10);
/// let (sql, params) = q.build_select()?;
/// ```
///
/// Identifiers that may come from a request (filter fields, order columns,
/// the distinct-count field and the table) are validated, and quoted under
/// [`IdentifierPolicy::Quote`]. Projection, joins, grouping, raw conditions
/// and order expressions are caller-built and rendered verbatim.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    projection: Vec<String>,
    joins: Vec<Join>,
    group_by: Vec<String>,
    conditions: Vec<Condition>,
    order: Vec<OrderTerm>,
    limit_val: Option<u64>,
    offset_val: Option<u64>,
    count_field: Option<String>,
    dialect: Dialect,
    identifier_policy: IdentifierPolicy,
}

impl QueryBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            projection: Vec::new(),
            joins: Vec::new(),
            group_by: Vec::new(),
            conditions: Vec::new(),
            order: Vec::new(),
            limit_val: None,
            offset_val: None,
            count_field: None,
            dialect: Dialect::Generic,
            identifier_policy: IdentifierPolicy::Validate,
        }
    }

    /// Create a new builder with an explicit SQL dialect.
    pub fn new_with_dialect(table: &str, dialect: Dialect) -> Self {
        Self::new(table).dialect(dialect)
    }

    /// Set the SQL dialect (affects placeholder style, quoting and `ILIKE`).
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Configure identifier quoting behavior.
    pub fn identifier_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.identifier_policy = policy;
        self
    }

    /// Set the projection. Defaults to `*`.
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.projection = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn join(mut self, kind: JoinKind, table: &str, on: &str) -> Self {
        self.joins.push(Join {
            kind,
            table: table.to_string(),
            on: on.to_string(),
        });
        self
    }

    pub fn group_by(mut self, columns: &[&str]) -> Self {
        self.group_by = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Count distinct values of `column` instead of rows.
    ///
    /// Needed whenever a join can multiply rows of the base table.
    pub fn count_distinct(mut self, column: &str) -> Self {
        self.count_field = Some(column.to_string());
        self
    }

    pub fn and_where(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn and_where_all(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    pub fn where_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.and_where(Condition::compare(column, CompareOp::Eq, value))
    }

    pub fn where_not_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.and_where(Condition::compare(column, CompareOp::NotEq, value))
    }

    pub fn where_like(self, column: &str, pattern: &str) -> Self {
        self.and_where(Condition::compare(column, CompareOp::Like, pattern))
    }

    pub fn where_gt(self, column: &str, value: impl Into<Value>) -> Self {
        self.and_where(Condition::compare(column, CompareOp::Gt, value))
    }

    pub fn where_lt(self, column: &str, value: impl Into<Value>) -> Self {
        self.and_where(Condition::compare(column, CompareOp::Lt, value))
    }

    pub fn where_in(mut self, column: &str, values: Vec<Value>) -> Self {
        self.conditions
            .push(Condition::In(column.to_string(), values));
        self
    }

    pub fn where_null(mut self, column: &str) -> Self {
        self.conditions
            .push(Condition::IsNull(column.to_string()));
        self
    }

    pub fn where_not_null(mut self, column: &str) -> Self {
        self.conditions
            .push(Condition::IsNotNull(column.to_string()));
        self
    }

    /// Add a trusted SQL fragment. Each `?` outside a single-quoted literal
    /// is a parameter marker and is rewritten to the dialect's placeholder;
    /// the number of markers must equal `params.len()`.
    ///
    /// ```ignore
    /// QueryBuilder::new("events").where_raw("name <> '?' AND age > ?", vec![Value::Int(18)]);
    /// ```
    pub fn where_raw(mut self, sql: &str, params: Vec<Value>) -> Self {
        self.conditions.push(Condition::Raw {
            sql: sql.to_string(),
            params,
        });
        self
    }

    pub fn order_by(self, column: &str, ascending: bool) -> Self {
        let dir = if ascending {
            crate::sort::SortDir::Asc
        } else {
            crate::sort::SortDir::Desc
        };
        self.order_by_term(OrderTerm::column(column, dir))
    }

    pub fn order_by_term(mut self, term: OrderTerm) -> Self {
        self.order.push(term);
        self
    }

    /// Replace the whole ordering.
    pub fn order_by_terms(mut self, terms: impl IntoIterator<Item = OrderTerm>) -> Self {
        self.order = terms.into_iter().collect();
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_val = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset_val = Some(offset);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn order_terms(&self) -> &[OrderTerm] {
        &self.order
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit_val
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset_val
    }

    pub fn count_field(&self) -> Option<&str> {
        self.count_field.as_deref()
    }

    pub fn get_dialect(&self) -> Dialect {
        self.dialect
    }

    /// Build the row query, returning `(sql, bind_values)`.
    pub fn build_select(&self) -> Result<(String, Vec<Value>), QueryError> {
        let projection = if self.projection.is_empty() {
            "*".to_string()
        } else {
            self.projection.join(", ")
        };
        let mut sql = format!("SELECT {projection} FROM {}", self.format_table()?);
        let mut params = Vec::new();
        self.append_joins(&mut sql);
        self.append_where(&mut sql, &mut params)?;
        self.append_group_by(&mut sql);
        self.append_order(&mut sql)?;
        self.append_limit_offset(&mut sql);
        Ok((sql, params))
    }

    /// Build the count query, returning `(sql, bind_values)`.
    ///
    /// Uses the same joins and conditions as [`build_select`](Self::build_select).
    /// With a distinct-count field the count is `COUNT(DISTINCT field)`;
    /// otherwise a grouped query is counted over its groups.
    pub fn build_count(&self) -> Result<(String, Vec<Value>), QueryError> {
        let table = self.format_table()?;
        let mut params = Vec::new();
        let mut sql = match &self.count_field {
            Some(field) => {
                let field = self.format_identifier(field, "count column")?;
                format!("SELECT COUNT(DISTINCT {field}) FROM {table}")
            }
            None if !self.group_by.is_empty() => format!("SELECT 1 FROM {table}"),
            None => format!("SELECT COUNT(*) FROM {table}"),
        };
        self.append_joins(&mut sql);
        self.append_where(&mut sql, &mut params)?;
        if self.count_field.is_none() && !self.group_by.is_empty() {
            self.append_group_by(&mut sql);
            sql = format!("SELECT COUNT(*) FROM ({sql}) AS grouped_rows");
        }
        Ok((sql, params))
    }

    fn format_table(&self) -> Result<String, QueryError> {
        self.format_identifier(&self.table, "table")
    }

    fn append_joins(&self, sql: &mut String) {
        for join in &self.joins {
            sql.push_str(&format!(" {} {} ON {}", join.kind.as_sql(), join.table, join.on));
        }
    }

    fn append_group_by(&self, sql: &mut String) {
        if self.group_by.is_empty() {
            return;
        }
        sql.push_str(" GROUP BY ");
        sql.push_str(&self.group_by.join(", "));
    }

    fn append_where(&self, sql: &mut String, params: &mut Vec<Value>) -> Result<(), QueryError> {
        if self.conditions.is_empty() {
            return Ok(());
        }
        sql.push_str(" WHERE ");
        let mut first = true;
        for cond in &self.conditions {
            if !first {
                sql.push_str(" AND ");
            }
            first = false;
            self.render_condition(cond, sql, params)?;
        }
        Ok(())
    }

    fn bind(&self, value: &Value, params: &mut Vec<Value>) -> String {
        params.push(value.clone());
        self.dialect.placeholder(params.len())
    }

    fn render_condition(
        &self,
        cond: &Condition,
        sql: &mut String,
        params: &mut Vec<Value>,
    ) -> Result<(), QueryError> {
        match cond {
            Condition::Compare { column, op, value } => {
                let col = self.format_identifier(column, "column")?;
                match (op, value) {
                    (CompareOp::Eq, Value::Null) => sql.push_str(&format!("{col} IS NULL")),
                    (CompareOp::NotEq, Value::Null) => sql.push_str(&format!("{col} IS NOT NULL")),
                    (CompareOp::ILike, _) if self.dialect == Dialect::Postgres => {
                        let placeholder = self.bind(value, params);
                        sql.push_str(&format!("{col} ILIKE {placeholder}"));
                    }
                    (CompareOp::ILike, _) => {
                        let placeholder = self.bind(value, params);
                        sql.push_str(&format!("LOWER({col}) LIKE LOWER({placeholder})"));
                    }
                    (op, _) => {
                        let placeholder = self.bind(value, params);
                        let sym = match op {
                            CompareOp::Eq => "=",
                            CompareOp::NotEq => "!=",
                            CompareOp::Gt => ">",
                            CompareOp::Gte => ">=",
                            CompareOp::Lt => "<",
                            CompareOp::Lte => "<=",
                            CompareOp::Like | CompareOp::ILike => "LIKE",
                        };
                        sql.push_str(&format!("{col} {sym} {placeholder}"));
                    }
                }
            }
            Condition::In(col, vals) => {
                let col = self.format_identifier(col, "column")?;
                if vals.is_empty() {
                    sql.push_str("1 = 0");
                } else {
                    let placeholders: Vec<_> = vals.iter().map(|v| self.bind(v, params)).collect();
                    sql.push_str(&format!("{col} IN ({})", placeholders.join(", ")));
                }
            }
            Condition::IsNull(col) => {
                let col = self.format_identifier(col, "column")?;
                sql.push_str(&format!("{col} IS NULL"));
            }
            Condition::IsNotNull(col) => {
                let col = self.format_identifier(col, "column")?;
                sql.push_str(&format!("{col} IS NOT NULL"));
            }
            Condition::AnyOf(inner) => {
                if inner.is_empty() {
                    sql.push_str("1 = 0");
                    return Ok(());
                }
                sql.push('(');
                for (idx, cond) in inner.iter().enumerate() {
                    if idx > 0 {
                        sql.push_str(" OR ");
                    }
                    self.render_condition(cond, sql, params)?;
                }
                sql.push(')');
            }
            Condition::Raw { sql: raw, params: raw_params } => {
                let mut values = raw_params.iter();
                let mut in_literal = false;
                for c in raw.chars() {
                    if c == '\'' {
                        // `''` inside a literal toggles twice and stays quoted
                        in_literal = !in_literal;
                        sql.push(c);
                    } else if c == '?' && !in_literal {
                        let value = values.next().ok_or_else(|| QueryError::RawParamMismatch {
                            sql: raw.clone(),
                        })?;
                        let placeholder = self.bind(value, params);
                        sql.push_str(&placeholder);
                    } else {
                        sql.push(c);
                    }
                }
                if values.next().is_some() {
                    return Err(QueryError::RawParamMismatch { sql: raw.clone() });
                }
            }
        }
        Ok(())
    }

    fn append_order(&self, sql: &mut String) -> Result<(), QueryError> {
        if self.order.is_empty() {
            return Ok(());
        }
        sql.push_str(" ORDER BY ");
        let mut clauses = Vec::with_capacity(self.order.len());
        for term in &self.order {
            match term {
                OrderTerm::Column { field, direction } => {
                    let col = self.format_identifier(field, "order column")?;
                    clauses.push(format!("{col} {direction}"));
                }
                OrderTerm::Expr(expr) => clauses.push(expr.clone()),
            }
        }
        sql.push_str(&clauses.join(", "));
        Ok(())
    }

    /// Values above `i64::MAX` are rendered as `i64::MAX`; stores reject
    /// anything wider than a signed 64-bit integer.
    fn append_limit_offset(&self, sql: &mut String) {
        let max = i64::MAX as u64;
        if let Some(limit) = self.limit_val {
            sql.push_str(&format!(" LIMIT {}", limit.min(max)));
        }
        if let Some(offset) = self.offset_val {
            sql.push_str(&format!(" OFFSET {}", offset.min(max)));
        }
    }

    fn format_identifier(&self, ident: &str, kind: &'static str) -> Result<String, QueryError> {
        if !is_valid_identifier(ident) {
            return Err(QueryError::InvalidIdentifier {
                kind,
                ident: ident.to_string(),
            });
        }
        match self.identifier_policy {
            IdentifierPolicy::Quote => Ok(quote_identifier(ident, self.dialect)),
            IdentifierPolicy::Validate => Ok(ident.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    InvalidIdentifier { kind: &'static str, ident: String },
    /// A raw condition's `?` markers and parameters don't line up.
    RawParamMismatch { sql: String },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InvalidIdentifier { kind, ident } => {
                write!(f, "Invalid {kind} identifier: {ident}")
            }
            QueryError::RawParamMismatch { sql } => {
                write!(f, "Placeholder count does not match parameters in: {sql}")
            }
        }
    }
}

impl std::error::Error for QueryError {}

fn is_valid_identifier(ident: &str) -> bool {
    !ident.is_empty() && ident.split('.').all(is_valid_segment)
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quote_identifier(ident: &str, dialect: Dialect) -> String {
    let quote = dialect.quote_char();
    ident
        .split('.')
        .map(|part| format!("{quote}{part}{quote}"))
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{Direction, NullsOrder, SortDir};

    #[test]
    fn test_simple_select() {
        let (sql, params) = QueryBuilder::new("users").build_select().unwrap();
        assert_eq!(sql, "SELECT * FROM users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_where_eq() {
        let (sql, params) = QueryBuilder::new("users")
            .where_eq("email", "a@b.com")
            .build_select()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE email = ?");
        assert_eq!(params, vec![Value::from("a@b.com")]);
    }

    #[test]
    fn test_complex_query() {
        let (sql, params) = QueryBuilder::new("users")
            .select(&["id", "name"])
            .where_eq("status", "active")
            .where_like("name", "%alice%")
            .order_by("id", true)
            .limit(10)
            .offset(20)
            .build_select()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT id, name FROM users WHERE status = ? AND name LIKE ? ORDER BY id ASC LIMIT 10 OFFSET 20"
        );
        assert_eq!(params, vec![Value::from("active"), Value::from("%alice%")]);
    }

    #[test]
    fn test_count_query() {
        let (sql, params) = QueryBuilder::new("users")
            .where_eq("active", true)
            .order_by("id", true)
            .limit(5)
            .build_count()
            .unwrap();
        assert_eq!(sql, "SELECT COUNT(*) FROM users WHERE active = ?");
        assert_eq!(params, vec![Value::Bool(true)]);
    }

    #[test]
    fn test_count_distinct_with_join() {
        let q = QueryBuilder::new("events")
            .join(JoinKind::Left, "participants", "participants.event_id = events.id")
            .select(&["events.*"])
            .group_by(&["events.id"])
            .count_distinct("events.id")
            .where_gt("participants.age", 30i64);
        let (sql, _) = q.build_count().unwrap();
        assert_eq!(
            sql,
            "SELECT COUNT(DISTINCT events.id) FROM events LEFT JOIN participants ON participants.event_id = events.id WHERE participants.age > ?"
        );
        let (sql, _) = q.build_select().unwrap();
        assert_eq!(
            sql,
            "SELECT events.* FROM events LEFT JOIN participants ON participants.event_id = events.id WHERE participants.age > ? GROUP BY events.id"
        );
    }

    #[test]
    fn test_count_grouped_without_distinct_field() {
        let (sql, _) = QueryBuilder::new("events")
            .join(JoinKind::Inner, "laps", "laps.event_id = events.id")
            .group_by(&["events.id"])
            .build_count()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM (SELECT 1 FROM events INNER JOIN laps ON laps.event_id = events.id GROUP BY events.id) AS grouped_rows"
        );
    }

    #[test]
    fn test_postgres_placeholders() {
        let (sql, params) = QueryBuilder::new_with_dialect("users", Dialect::Postgres)
            .where_eq("status", "active")
            .where_in("role", vec!["admin".into(), "user".into()])
            .where_raw("age BETWEEN ? AND ?", vec![Value::Int(18), Value::Int(65)])
            .build_select()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM users WHERE status = $1 AND role IN ($2, $3) AND age BETWEEN $4 AND $5"
        );
        assert_eq!(params.len(), 5);
    }

    #[test]
    fn test_ilike_rendering() {
        let cond = Condition::compare("name", CompareOp::ILike, "%foo%");
        let (sql, _) = QueryBuilder::new("users").and_where(cond.clone()).build_select().unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE LOWER(name) LIKE LOWER(?)");
        let (sql, _) = QueryBuilder::new_with_dialect("users", Dialect::Postgres)
            .and_where(cond)
            .build_select()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE name ILIKE $1");
    }

    #[test]
    fn test_null_equality_becomes_is_null() {
        let (sql, params) = QueryBuilder::new("users")
            .where_eq("deleted_at", Value::Null)
            .where_not_eq("email", Value::Null)
            .build_select()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE deleted_at IS NULL AND email IS NOT NULL");
        assert!(params.is_empty());
    }

    #[test]
    fn test_any_of_and_empty_in() {
        let (sql, params) = QueryBuilder::new("users")
            .and_where(Condition::AnyOf(vec![
                Condition::compare("name", CompareOp::Like, "%a%"),
                Condition::compare("city", CompareOp::Like, "%a%"),
            ]))
            .where_in("id", vec![])
            .build_select()
            .unwrap();
        assert_eq!(sql, "SELECT * FROM users WHERE (name LIKE ? OR city LIKE ?) AND 1 = 0");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_order_terms_keep_nulls_and_expressions() {
        let (sql, _) = QueryBuilder::new("events")
            .order_by_term(OrderTerm::expr("MIN(laps.time) ASC"))
            .order_by_term(OrderTerm::column("startsAt", Direction::DESC.nulls(NullsOrder::Last)))
            .order_by_term(OrderTerm::column("id", SortDir::Asc))
            .build_select()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM events ORDER BY MIN(laps.time) ASC, startsAt DESC NULLS LAST, id ASC"
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        let (sql, params) = QueryBuilder::new("users")
            .dialect(Dialect::Postgres)
            .identifier_policy(IdentifierPolicy::Quote)
            .where_eq("users.email", "a@b.com")
            .order_by("updatedAt", false)
            .build_select()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"users\" WHERE \"users\".\"email\" = $1 ORDER BY \"updatedAt\" DESC"
        );
        assert_eq!(params, vec![Value::from("a@b.com")]);
    }

    #[test]
    fn test_invalid_identifier() {
        let err = QueryBuilder::new("users;drop").build_select().unwrap_err();
        assert!(matches!(err, QueryError::InvalidIdentifier { kind: "table", .. }));

        let err = QueryBuilder::new("users")
            .where_eq("name = name OR 1", "x")
            .build_count()
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidIdentifier { kind: "column", .. }));
    }

    #[test]
    fn test_raw_param_mismatch() {
        let err = QueryBuilder::new("users")
            .where_raw("age > ?", vec![])
            .build_select()
            .unwrap_err();
        assert!(matches!(err, QueryError::RawParamMismatch { .. }));
    }

    #[test]
    fn test_raw_question_mark_inside_literal_is_not_a_marker() {
        let (sql, params) = QueryBuilder::new_with_dialect("events", Dialect::Postgres)
            .where_eq("city", "Lyon")
            .where_raw("name <> '?' AND note <> 'it''s ?' AND age > ?", vec![Value::Int(18)])
            .build_select()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM events WHERE city = $1 AND name <> '?' AND note <> 'it''s ?' AND age > $2"
        );
        assert_eq!(params, vec![Value::from("Lyon"), Value::Int(18)]);
    }

    #[test]
    fn test_limit_and_offset_never_exceed_i64_max() {
        let (sql, _) = QueryBuilder::new("events")
            .limit(u64::MAX)
            .offset(u64::MAX)
            .build_select()
            .unwrap();
        assert_eq!(
            sql,
            format!("SELECT * FROM events LIMIT {max} OFFSET {max}", max = i64::MAX)
        );
    }

    #[test]
    fn test_mysql_dialect_uses_backticks() {
        let (sql, params) = QueryBuilder::new_with_dialect("events", Dialect::MySql)
            .identifier_policy(IdentifierPolicy::Quote)
            .where_eq("events.city", "Lyon")
            .order_by("updatedAt", false)
            .build_select()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM `events` WHERE `events`.`city` = ? ORDER BY `updatedAt` DESC"
        );
        assert_eq!(params.len(), 1);
    }
}

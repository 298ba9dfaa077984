use serde::{Deserialize, Serialize};

/// A scalar bound into a query as a parameter.
///
/// Deserialises from any JSON scalar. Integers are tried before floats so
/// that `30` stays an integer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Wrap the value in `%` markers for a substring match.
    ///
    /// Non-text scalars are rendered first, so `contains 30` matches `%30%`.
    pub fn to_contains_pattern(&self) -> Value {
        let inner = match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
        };
        Value::Text(format!("%{inner}%"))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_scalars() {
        let vals: Vec<Value> = serde_json::from_str(r#"[null, true, 30, 1.5, "Foo"]"#).unwrap();
        assert_eq!(
            vals,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Int(30),
                Value::Float(1.5),
                Value::Text("Foo".into()),
            ]
        );
    }

    #[test]
    fn test_contains_pattern() {
        assert_eq!(Value::from("30").to_contains_pattern(), Value::from("%30%"));
        assert_eq!(Value::Int(30).to_contains_pattern(), Value::from("%30%"));
    }
}

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Result, SyncError};

/// Scalar cell type for core-record fields.
///
/// Core records carry entity-specific scalars and foreign keys as a field
/// map; this enum is the cell type of that map. Comparison follows the
/// relational conventions the filter layer relies on: NULL sorts last,
/// integers and floats coerce to each other, everything else is a type
/// mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
}

impl Value {
    pub fn compare(&self, other: &Value) -> Result<Ordering> {
        match (self, other) {
            // NULL handling: NULL is "greater" than all values (NULL LAST)
            (Value::Null, Value::Null) => Ok(Ordering::Equal),
            (Value::Null, _) => Ok(Ordering::Greater),
            (_, Value::Null) => Ok(Ordering::Less),

            (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),

            (Value::Float(a), Value::Float(b)) => Ok(compare_floats(*a, *b)),

            (Value::Text(a), Value::Text(b)) => Ok(a.cmp(b)),

            (Value::Boolean(a), Value::Boolean(b)) => Ok(a.cmp(b)),

            // Mixed numeric types (implicit coercion)
            (Value::Integer(a), Value::Float(b)) => Ok(compare_floats(*a as f64, *b)),
            (Value::Float(a), Value::Integer(b)) => Ok(compare_floats(*a, *b as f64)),

            _ => Err(SyncError::TypeMismatch(format!(
                "Cannot compare incompatible types: {} and {}",
                self.type_name(),
                other.type_name()
            ))),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Integer(_) => "INTEGER",
            Self::Float(_) => "FLOAT",
            Self::Text(_) => "TEXT",
            Self::Boolean(_) => "BOOLEAN",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view used by the aggregator; NULL and non-numeric cells
    /// yield None.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// NaN is considered equal to NaN and greater than all other values.
fn compare_floats(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "{}", s),
            Self::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_sorts_last() {
        assert_eq!(
            Value::Null.compare(&Value::Integer(1)).unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            Value::Integer(1).compare(&Value::Null).unwrap(),
            Ordering::Less
        );
        assert_eq!(Value::Null.compare(&Value::Null).unwrap(), Ordering::Equal);
    }

    #[test]
    fn mixed_numeric_coercion() {
        assert_eq!(
            Value::Integer(2).compare(&Value::Float(2.0)).unwrap(),
            Ordering::Equal
        );
        assert_eq!(
            Value::Float(1.5).compare(&Value::Integer(2)).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn incompatible_types_error() {
        assert!(Value::Text("a".into()).compare(&Value::Integer(1)).is_err());
        assert!(Value::Boolean(true).compare(&Value::Float(1.0)).is_err());
    }

    #[test]
    fn json_round_trip() {
        let values = vec![
            Value::Null,
            Value::Integer(42),
            Value::Float(3.5),
            Value::Text("stop 12".into()),
            Value::Boolean(true),
        ];
        for value in values {
            let encoded = serde_json::to_string(&value).unwrap();
            let decoded: Value = serde_json::from_str(&encoded).unwrap();
            assert_eq!(value, decoded);
        }
    }
}

use std::fmt;

use chrono::DateTime;
use chrono_tz::Tz;
use serde_json::Value;

/// A single scalar cell of a [`LabeledTable`](crate::table::LabeledTable).
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing value: JSON `null`, an absent key, padding, or a failed timestamp parse.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer that fits in `i64`.
    Integer(i64),
    /// Any other JSON number.
    Float(f64),
    /// Text, including the JSON encoding of nested arrays and objects.
    Text(String),
    /// Timezone-aware timestamp produced by temporal normalization.
    Timestamp(DateTime<Tz>),
}

impl CellValue {
    /// True for [`CellValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&Value> for CellValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => n.as_f64().map_or(Self::Null, Self::Float),
            },
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => Self::Text(value.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%:z")),
        }
    }
}

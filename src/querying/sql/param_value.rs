use std::fmt::{self, Display};

use chrono::NaiveDateTime;
use ordered_float::NotNan;
use serde_json::Value;
use uuid::Uuid;

use crate::structures::StructureId;

/// Value bound to a query parameter.
///
/// Floats are `NotNan` so values are `Eq + Hash` and parameter lists can be
/// deduplicated by value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(NotNan<f64>),
    String(String),
    Guid(Uuid),
    DateTime(NaiveDateTime),
    /// Set of values, materialized by the executor as a one-column
    /// (`[Value]`) table.
    Array(Vec<ParamValue>),
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(n) => write!(f, "{}", n.into_inner()),
            ParamValue::String(s) => write!(f, "\"{s}\""),
            ParamValue::Guid(g) => write!(f, "{g}"),
            ParamValue::DateTime(d) => write!(f, "{}", d.format("%Y-%m-%dT%H:%M:%S%.f")),
            ParamValue::Array(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(_) => write!(f, "Bool({})", self),
            ParamValue::Int(_) => write!(f, "Int({})", self),
            ParamValue::Float(_) => write!(f, "Float({})", self),
            ParamValue::String(_) => write!(f, "String({})", self),
            ParamValue::Guid(_) => write!(f, "Guid({})", self),
            ParamValue::DateTime(_) => write!(f, "DateTime({})", self),
            ParamValue::Array(_) => write!(f, "Array({})", self),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value as i64)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<NotNan<f64>> for ParamValue {
    fn from(value: NotNan<f64>) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<Uuid> for ParamValue {
    fn from(value: Uuid) -> Self {
        ParamValue::Guid(value)
    }
}

impl From<NaiveDateTime> for ParamValue {
    fn from(value: NaiveDateTime) -> Self {
        ParamValue::DateTime(value)
    }
}

impl From<StructureId> for ParamValue {
    fn from(value: StructureId) -> Self {
        match value {
            StructureId::Identity(id) => ParamValue::Int(id),
            StructureId::Guid(id) => ParamValue::Guid(id),
        }
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl ParamValue {
    pub fn is_array(&self) -> bool {
        matches!(self, ParamValue::Array(_))
    }

    /// Convert a JSON scalar or array of scalars. `null`, objects and `NaN`
    /// have no parameter representation.
    pub fn from_json(value: &Value) -> Option<ParamValue> {
        match value {
            Value::Bool(b) => Some(ParamValue::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(ParamValue::Int(i)),
                None => n.as_f64().and_then(|f| NotNan::new(f).ok()).map(ParamValue::Float),
            },
            Value::String(s) => Some(ParamValue::String(s.clone())),
            Value::Array(values) => values
                .iter()
                .map(ParamValue::from_json)
                .collect::<Option<Vec<_>>>()
                .map(ParamValue::Array),
            Value::Null | Value::Object(_) => None,
        }
    }
}

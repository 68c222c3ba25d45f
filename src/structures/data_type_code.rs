use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coarse classification of an indexed member's declared type.
///
/// The code decides which index table a member's values live in and
/// therefore which table a query joins for it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataTypeCode {
    #[default]
    Unknown,
    IntegerNumber,
    UnsignedIntegerNumber,
    FractalNumber,
    Bool,
    DateTime,
    Guid,
    String,
    Enum,
    /// Long strings stored in the texts table.
    Text,
}

impl DataTypeCode {
    /// Classify a JSON scalar. Objects, arrays and nulls are `Unknown`.
    pub fn of_value(v: &Value) -> DataTypeCode {
        match v {
            Value::Bool(_) => DataTypeCode::Bool,
            Value::Number(n) => {
                if n.is_u64() && !n.is_i64() {
                    DataTypeCode::UnsignedIntegerNumber
                } else if n.is_i64() {
                    DataTypeCode::IntegerNumber
                } else {
                    DataTypeCode::FractalNumber
                }
            }
            Value::String(_) => DataTypeCode::String,
            Value::Null | Value::Array(_) | Value::Object(_) => DataTypeCode::Unknown,
        }
    }

    /// Suffix of the index table holding values of this type.
    pub fn index_table_suffix(&self) -> &'static str {
        match self {
            DataTypeCode::IntegerNumber | DataTypeCode::UnsignedIntegerNumber => "Integers",
            DataTypeCode::FractalNumber => "Fractals",
            DataTypeCode::Bool => "Booleans",
            DataTypeCode::DateTime => "Dates",
            DataTypeCode::Guid => "Guids",
            DataTypeCode::Text => "Texts",
            DataTypeCode::String | DataTypeCode::Enum | DataTypeCode::Unknown => "Strings",
        }
    }

    pub fn all_index_table_suffixes() -> [&'static str; 7] {
        ["Integers", "Fractals", "Booleans", "Dates", "Guids", "Strings", "Texts"]
    }
}

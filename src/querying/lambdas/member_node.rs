use crate::{querying::sql::ParamValue, structures::DataTypeCode};

/// How a member reference takes part in a predicate.
///
/// `Plain` members are followed by operator/value nodes in the stream; the
/// other kinds carry their operand and are lowered to a complete comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberKind {
    Plain,
    InSet(Vec<ParamValue>),
    NotInSet(Vec<ParamValue>),
    Like(String),
    StringContains(String),
    StringStartsWith(String),
    StringEndsWith(String),
    StringExactMatch(String),
    /// Compares `lower(member)` with whatever follows.
    ToLower,
    /// Compares `upper(member)` with whatever follows.
    ToUpper,
    /// Date member on the same calendar day as the value.
    SameDay(ParamValue),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberNode {
    /// Dotted member path, e.g. `Address.City`.
    pub path: String,
    /// Declared type name of the member.
    pub data_type: String,
    pub data_type_code: DataTypeCode,
    pub kind: MemberKind,
    /// Set when a boolean member is used as a predicate on its own
    /// (`x => x.IsActive`); computed when the where-lambda is built.
    pub is_standalone_bool: bool,
}

impl MemberNode {
    pub fn new(path: &str, data_type: &str, data_type_code: DataTypeCode) -> Self {
        Self {
            path: path.to_string(),
            data_type: data_type.to_string(),
            data_type_code,
            kind: MemberKind::Plain,
            is_standalone_bool: false,
        }
    }

    pub fn with_kind(mut self, kind: MemberKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_bool(&self) -> bool {
        self.data_type_code == DataTypeCode::Bool
    }

    /// String operations compare against the `[StringValue]` column.
    pub fn uses_string_column(&self) -> bool {
        matches!(
            self.kind,
            MemberKind::Like(_)
                | MemberKind::StringContains(_)
                | MemberKind::StringStartsWith(_)
                | MemberKind::StringEndsWith(_)
                | MemberKind::StringExactMatch(_)
                | MemberKind::ToLower
                | MemberKind::ToUpper
        )
    }
}

use std::fmt::Display;

use serde_json::Value;
use uuid::Uuid;

use crate::structures::StructureIdType;

/// The identity value of one stored structure.
///
/// Ordering follows the storage order of the structure table: integer ids
/// ascending, GUIDs by their byte order. The migrator relies on this order
/// to delete old rows by contiguous id range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StructureId {
    Identity(i64),
    Guid(Uuid),
}

impl Display for StructureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureId::Identity(id) => write!(f, "{id}"),
            StructureId::Guid(guid) => write!(f, "{guid}"),
        }
    }
}

impl From<i64> for StructureId {
    fn from(value: i64) -> Self {
        StructureId::Identity(value)
    }
}

impl From<Uuid> for StructureId {
    fn from(value: Uuid) -> Self {
        StructureId::Guid(value)
    }
}

impl StructureId {
    pub fn id_type(&self) -> StructureIdType {
        match self {
            StructureId::Identity(_) => StructureIdType::Identity,
            StructureId::Guid(_) => StructureIdType::Guid,
        }
    }

    /// `true` for the values an unassigned id defaults to (`0`, nil GUID).
    pub fn is_default(&self) -> bool {
        match self {
            StructureId::Identity(id) => *id == 0,
            StructureId::Guid(guid) => guid.is_nil(),
        }
    }

    /// Parse the textual form of an id, as read from a result column.
    pub fn parse(raw: &str, id_type: StructureIdType) -> Option<StructureId> {
        let raw = raw.trim();
        match id_type {
            StructureIdType::Identity => raw.parse::<i64>().ok().map(StructureId::Identity),
            StructureIdType::Guid => Uuid::parse_str(raw).ok().map(StructureId::Guid),
        }
    }

    /// Read an id of the given type from a JSON value.
    ///
    /// Identity ids accept JSON integers and numeric strings, GUID ids accept
    /// strings in any format `uuid` parses. Anything else yields `None`.
    pub fn from_json(value: &Value, id_type: StructureIdType) -> Option<StructureId> {
        match (id_type, value) {
            (StructureIdType::Identity, Value::Number(n)) => n.as_i64().map(StructureId::Identity),
            (_, Value::String(s)) => Self::parse(s, id_type),
            _ => None,
        }
    }

    /// Read the id member `id_member` of a JSON object.
    pub fn from_json_member(item: &Value, id_member: &str, id_type: StructureIdType) -> Option<StructureId> {
        item.get(id_member).and_then(|v| Self::from_json(v, id_type))
    }

    pub fn to_json(&self) -> Value {
        match self {
            StructureId::Identity(id) => Value::from(*id),
            StructureId::Guid(guid) => Value::String(guid.to_string()),
        }
    }
}

use crate::structures::DataTypeCode;

/// A reference from the queried structure to another structure set whose
/// JSON is merged into each result under `object_reference_path`.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeNode {
    pub referenced_structure_name: String,
    /// Member holding the referenced structure's id, e.g. `CustomerId`.
    pub id_reference_path: String,
    /// JSON member the referenced structure is merged into, e.g. `Customer`.
    pub object_reference_path: String,
    pub data_type: String,
    /// Type code of the id reference member.
    pub data_type_code: DataTypeCode,
}

impl IncludeNode {
    pub fn new(referenced_structure_name: &str, id_reference_path: &str, object_reference_path: &str, data_type_code: DataTypeCode) -> Self {
        Self {
            referenced_structure_name: referenced_structure_name.to_string(),
            id_reference_path: id_reference_path.to_string(),
            object_reference_path: object_reference_path.to_string(),
            data_type: String::new(),
            data_type_code,
        }
    }
}

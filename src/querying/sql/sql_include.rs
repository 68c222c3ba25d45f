use crate::structures::DataTypeCode;

/// Column of the structure table holding the document.
pub const STRUCTURE_JSON_COLUMN: &str = "Json";

/// A join to another structure set whose JSON is merged into each result.
///
/// The referenced structure is joined as `alias` (`cs{index}`) on the value
/// of the id reference member, itself joined as `mem{member_index}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlInclude {
    pub index: usize,
    pub member_index: usize,
    pub referenced_structure_name: String,
    pub alias: String,
    pub value_column_name: String,
    pub id_reference_path: String,
    pub object_reference_path: String,
    pub data_type: String,
    pub data_type_code: DataTypeCode,
}

impl SqlInclude {
    pub fn new(
        index: usize,
        member_index: usize,
        referenced_structure_name: &str,
        id_reference_path: &str,
        object_reference_path: &str,
        data_type: &str,
        data_type_code: DataTypeCode,
    ) -> Self {
        Self {
            index,
            member_index,
            referenced_structure_name: referenced_structure_name.to_string(),
            alias: format!("cs{index}"),
            value_column_name: STRUCTURE_JSON_COLUMN.to_string(),
            id_reference_path: id_reference_path.to_string(),
            object_reference_path: object_reference_path.to_string(),
            data_type: data_type.to_string(),
            data_type_code,
        }
    }

    /// `cs0.[Json] as [Customer]`
    pub fn to_select_column(&self) -> String {
        format!("{}.[{}] as [{}]", self.alias, self.value_column_name, self.object_reference_path)
    }
}

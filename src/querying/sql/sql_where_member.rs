use crate::structures::DataTypeCode;

/// A member referenced by the where-predicate; joined as `mem{index}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlWhereMember {
    pub index: usize,
    pub member_path: String,
    pub data_type: String,
    pub data_type_code: DataTypeCode,
}

impl SqlWhereMember {
    pub fn new(index: usize, member_path: &str, data_type: &str, data_type_code: DataTypeCode) -> Self {
        Self {
            index,
            member_path: member_path.to_string(),
            data_type: data_type.to_string(),
            data_type_code,
        }
    }
}

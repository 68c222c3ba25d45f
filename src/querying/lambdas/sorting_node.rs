use std::fmt;

use crate::structures::DataTypeCode;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "Asc"),
            SortDirection::Desc => write!(f, "Desc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortingNode {
    pub member_path: String,
    pub data_type: String,
    pub data_type_code: DataTypeCode,
    pub direction: SortDirection,
}

impl SortingNode {
    pub fn new(member_path: &str, data_type: &str, data_type_code: DataTypeCode, direction: SortDirection) -> Self {
        Self {
            member_path: member_path.to_string(),
            data_type: data_type.to_string(),
            data_type_code,
            direction,
        }
    }

    pub fn asc(member_path: &str, data_type_code: DataTypeCode) -> Self {
        Self::new(member_path, "", data_type_code, SortDirection::Asc)
    }

    pub fn desc(member_path: &str, data_type_code: DataTypeCode) -> Self {
        Self::new(member_path, "", data_type_code, SortDirection::Desc)
    }
}

use crate::{querying::lambdas::SortDirection, structures::DataTypeCode};

/// Column of the index tables that sorting reads.
pub const INDEX_VALUE_COLUMN: &str = "Value";

/// A member the result is ordered by; joined as `mem{index}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlSortingMember {
    pub index: usize,
    pub member_path: String,
    pub alias: String,
    pub index_storage_column_name: String,
    pub direction: SortDirection,
    pub data_type: String,
    pub data_type_code: DataTypeCode,
}

impl SqlSortingMember {
    pub fn new(index: usize, member_path: &str, data_type: &str, data_type_code: DataTypeCode, direction: SortDirection) -> Self {
        Self {
            index,
            member_path: member_path.to_string(),
            alias: format!("mem{index}"),
            index_storage_column_name: INDEX_VALUE_COLUMN.to_string(),
            direction,
            data_type: data_type.to_string(),
            data_type_code,
        }
    }

    /// `min(mem0.[Value]) Asc` or `max(mem0.[Value]) Desc`. Rows are grouped
    /// per structure, so a member with several values sorts by its smallest
    /// value ascending and its largest descending.
    pub fn to_order_by(&self) -> String {
        let aggregate = match self.direction {
            SortDirection::Asc => "min",
            SortDirection::Desc => "max",
        };
        format!("{aggregate}({}.[{}]) {}", self.alias, self.index_storage_column_name, self.direction)
    }
}

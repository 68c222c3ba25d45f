use indexmap::IndexMap;

use crate::{
    querying::{
        lambdas::{IncludeNode, SortingNode},
        sql::{SqlInclude, SqlSortingMember, SqlWhereMember, WhereCriteria},
    },
    structures::DataTypeCode,
};

/// Everything a query generator needs from one translated query.
///
/// Member indexes are allocated per distinct member path, first occurrence
/// wins: a path used in both the predicate and the sorting is joined once.
/// Created fresh for every translation.
#[derive(Debug, Default)]
pub struct SqlExpression {
    /// member path -> data type code; the position is the member index
    member_paths: IndexMap<String, DataTypeCode>,
    where_members: Vec<SqlWhereMember>,
    sorting_members: Vec<SqlSortingMember>,
    includes: Vec<SqlInclude>,
    where_criteria: WhereCriteria,
}

impl SqlExpression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `member_path`, allocating the next one on first use.
    pub fn get_existing_or_new_member_index_for(&mut self, member_path: &str, data_type_code: DataTypeCode) -> usize {
        match self.member_paths.get_index_of(member_path) {
            Some(index) => index,
            None => {
                self.member_paths.insert(member_path.to_string(), data_type_code);
                self.member_paths.len() - 1
            }
        }
    }

    /// Register a where member unless its path is already registered.
    /// Returns the member index either way.
    pub fn add_where_member(&mut self, member_path: &str, data_type: &str, data_type_code: DataTypeCode) -> usize {
        let index = self.get_existing_or_new_member_index_for(member_path, data_type_code);
        if !self.where_members.iter().any(|m| m.member_path == member_path) {
            self.where_members
                .push(SqlWhereMember::new(index, member_path, data_type, data_type_code));
        }
        index
    }

    pub fn contains_sorting_member(&self, member_path: &str) -> bool {
        self.sorting_members.iter().any(|m| m.member_path == member_path)
    }

    /// Register a sorting member unless its path is already sorted on.
    pub fn add_sorting_member(&mut self, node: &SortingNode) {
        if self.contains_sorting_member(&node.member_path) {
            return;
        }

        let index = self.get_existing_or_new_member_index_for(&node.member_path, node.data_type_code);
        self.sorting_members.push(SqlSortingMember::new(
            index,
            &node.member_path,
            &node.data_type,
            node.data_type_code,
            node.direction,
        ));
    }

    pub fn add_include(&mut self, node: &IncludeNode) {
        let member_index = self.get_existing_or_new_member_index_for(&node.id_reference_path, node.data_type_code);
        self.includes.push(SqlInclude::new(
            self.includes.len(),
            member_index,
            &node.referenced_structure_name,
            &node.id_reference_path,
            &node.object_reference_path,
            &node.data_type,
            node.data_type_code,
        ));
    }

    pub fn set_where_criteria(&mut self, where_criteria: WhereCriteria) {
        self.where_criteria = where_criteria;
    }

    pub fn where_criteria(&self) -> &WhereCriteria {
        &self.where_criteria
    }

    pub fn where_members(&self) -> &[SqlWhereMember] {
        &self.where_members
    }

    pub fn sorting_members(&self) -> &[SqlSortingMember] {
        &self.sorting_members
    }

    pub fn includes(&self) -> &[SqlInclude] {
        &self.includes
    }

    /// Every distinct member to join, in index order: `(index, path, type)`.
    pub fn joined_members(&self) -> impl Iterator<Item = (usize, &str, DataTypeCode)> {
        self.member_paths
            .iter()
            .enumerate()
            .map(|(index, (path, code))| (index, path.as_str(), *code))
    }
}

use crate::{
    querying::{
        lambdas::{IncludeLambda, SortingLambda, WhereLambda},
        Paging,
    },
    structures::StructureSchema,
};

/// A query against one structure set, as handed over by the session layer.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCommand {
    pub structure_schema: StructureSchema,
    pub where_lambda: Option<WhereLambda>,
    pub sortings: Option<SortingLambda>,
    pub includes: Vec<IncludeLambda>,
    pub take_num: Option<usize>,
    pub paging: Option<Paging>,
}

impl QueryCommand {
    pub fn new(structure_schema: StructureSchema) -> Self {
        Self {
            structure_schema,
            where_lambda: None,
            sortings: None,
            includes: vec![],
            take_num: None,
            paging: None,
        }
    }

    pub fn with_where(mut self, where_lambda: WhereLambda) -> Self {
        self.where_lambda = Some(where_lambda);
        self
    }

    pub fn with_sortings(mut self, sortings: SortingLambda) -> Self {
        self.sortings = Some(sortings);
        self
    }

    pub fn with_include(mut self, include: IncludeLambda) -> Self {
        self.includes.push(include);
        self
    }

    pub fn with_take(mut self, take_num: usize) -> Self {
        self.take_num = Some(take_num);
        self
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = Some(paging);
        self
    }

    pub fn has_where(&self) -> bool {
        self.where_lambda.as_ref().is_some_and(|w| !w.is_empty())
    }

    pub fn has_sortings(&self) -> bool {
        self.sortings.as_ref().is_some_and(|s| !s.is_empty())
    }

    pub fn has_includes(&self) -> bool {
        self.includes.iter().any(|i| !i.is_empty())
    }

    pub fn has_take(&self) -> bool {
        self.take_num.is_some()
    }

    pub fn has_paging(&self) -> bool {
        self.paging.is_some()
    }

    /// No predicate, sorting, includes, take or paging.
    pub fn is_empty(&self) -> bool {
        !self.has_where() && !self.has_sortings() && !self.has_includes() && !self.has_take() && !self.has_paging()
    }
}

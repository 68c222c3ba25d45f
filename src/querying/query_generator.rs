use tracing::debug;

use crate::{
    database::{
        SqlStatements, DELETE_BY_ID_RANGE, DELETE_BY_QUERY, GET_ALL_JSON_ORDERED_BY_ID, QUERY, QUERY_COUNT,
        QUERY_PAGED, QUERY_STRUCTURE_IDS, WHERE_ONLY,
    },
    querying::{
        sql::{DacParameter, ParamValue, SqlExpression, SqlExpressionBuilder},
        Paging, QueryCommand, QueryError, SqlQuery, SqlQueryFormatter,
    },
    structures::{StructureId, StructureSchema},
};

pub const PAGING_FROM_PARAM: &str = "@pagingFrom";
pub const PAGING_TO_PARAM: &str = "@pagingTo";
pub const ID_FROM_PARAM: &str = "@idFrom";
pub const ID_TO_PARAM: &str = "@idTo";

/// Ordering of a paged query without explicit sortings.
const DEFAULT_PAGING_ORDER: &str = "s.[StructureId]";

pub trait QueryGenerator {
    /// Select the JSON of every matching structure, merged with includes.
    /// Paged when the command has paging, otherwise honours take.
    fn generate_query(&self, query: &QueryCommand) -> Result<SqlQuery, QueryError>;

    /// The `[table] s joins where ...` fragment of a bulk operation.
    fn generate_where_query(&self, query: &QueryCommand) -> Result<SqlQuery, QueryError>;

    fn generate_query_returning_structure_ids(&self, query: &QueryCommand) -> Result<SqlQuery, QueryError>;

    fn generate_count_query(&self, query: &QueryCommand) -> Result<SqlQuery, QueryError>;

    fn generate_delete_by_query(&self, query: &QueryCommand) -> Result<SqlQuery, QueryError>;

    fn generate_get_all_json_ordered_by_id(&self, schema: &StructureSchema) -> Result<SqlQuery, QueryError>;

    /// One delete per table of the set, index tables first.
    fn generate_delete_by_id_range(
        &self,
        schema: &StructureSchema,
        from: StructureId,
        to: StructureId,
    ) -> Result<Vec<SqlQuery>, QueryError>;
}

/// Renders queries from the injected statement templates.
#[derive(Debug, Clone, Default)]
pub struct DbQueryGenerator {
    statements: SqlStatements,
}

impl QueryGenerator for DbQueryGenerator {
    fn generate_query(&self, query: &QueryCommand) -> Result<SqlQuery, QueryError> {
        let expression = SqlExpressionBuilder::process(query);

        match &query.paging {
            Some(paging) => self.paged_query(query, &expression, paging),
            None => self.plain_query(query, &expression),
        }
    }

    fn generate_where_query(&self, query: &QueryCommand) -> Result<SqlQuery, QueryError> {
        let expression = Self::where_expression(query)?;
        let sql = self.render_where_only(&query.structure_schema, &expression)?;

        Ok(self.to_query(WHERE_ONLY, sql, expression.where_criteria().parameters().to_vec()))
    }

    fn generate_query_returning_structure_ids(&self, query: &QueryCommand) -> Result<SqlQuery, QueryError> {
        let expression = SqlExpressionBuilder::process_without_includes(query);
        let template = self.statements.get(QUERY_STRUCTURE_IDS)?;

        let sql = SqlQueryFormatter::new(QUERY_STRUCTURE_IDS, template)
            .with("Take", Self::take(query))
            .with("MainStructureTable", query.structure_schema.structure_table_name())
            .with("Joins", Self::joins(&query.structure_schema, &expression))
            .with("WhereCriteria", Self::where_clause(&expression))
            .with("GroupBy", Self::group_by(&expression, false))
            .with("OrderBy", Self::order_by(&expression))
            .format()?;

        Ok(self.to_query(QUERY_STRUCTURE_IDS, sql, expression.where_criteria().parameters().to_vec()))
    }

    fn generate_count_query(&self, query: &QueryCommand) -> Result<SqlQuery, QueryError> {
        let mut expression = SqlExpression::new();
        if let Some(where_lambda) = &query.where_lambda {
            SqlExpressionBuilder::process_where(where_lambda, &mut expression);
        }
        let template = self.statements.get(QUERY_COUNT)?;

        let sql = SqlQueryFormatter::new(QUERY_COUNT, template)
            .with("MainStructureTable", query.structure_schema.structure_table_name())
            .with("Joins", Self::joins(&query.structure_schema, &expression))
            .with("WhereCriteria", Self::where_clause(&expression))
            .format()?;

        Ok(self.to_query(QUERY_COUNT, sql, expression.where_criteria().parameters().to_vec()))
    }

    fn generate_delete_by_query(&self, query: &QueryCommand) -> Result<SqlQuery, QueryError> {
        let expression = Self::where_expression(query)?;
        let where_only = self.render_where_only(&query.structure_schema, &expression)?;
        let template = self.statements.get(DELETE_BY_QUERY)?;

        let sql = SqlQueryFormatter::new(DELETE_BY_QUERY, template)
            .with("MainStructureTable", query.structure_schema.structure_table_name())
            .with("WhereOnly", where_only)
            .format()?;

        Ok(self.to_query(DELETE_BY_QUERY, sql, expression.where_criteria().parameters().to_vec()))
    }

    fn generate_get_all_json_ordered_by_id(&self, schema: &StructureSchema) -> Result<SqlQuery, QueryError> {
        let template = self.statements.get(GET_ALL_JSON_ORDERED_BY_ID)?;

        let sql = SqlQueryFormatter::new(GET_ALL_JSON_ORDERED_BY_ID, template)
            .with("MainStructureTable", schema.structure_table_name())
            .format()?;

        Ok(self.to_query(GET_ALL_JSON_ORDERED_BY_ID, sql, vec![]))
    }

    fn generate_delete_by_id_range(
        &self,
        schema: &StructureSchema,
        from: StructureId,
        to: StructureId,
    ) -> Result<Vec<SqlQuery>, QueryError> {
        let template = self.statements.get(DELETE_BY_ID_RANGE)?;
        let parameters = vec![
            DacParameter::new(ID_FROM_PARAM, from.into()),
            DacParameter::new(ID_TO_PARAM, to.into()),
        ];

        let mut tables = schema.index_table_names();
        tables.push(schema.structure_table_name());

        tables
            .iter()
            .map(|table| -> Result<SqlQuery, QueryError> {
                let sql = SqlQueryFormatter::new(DELETE_BY_ID_RANGE, template).with("Table", table.as_str()).format()?;
                Ok(self.to_query(DELETE_BY_ID_RANGE, sql, parameters.clone()))
            })
            .collect()
    }
}

impl DbQueryGenerator {
    pub fn new(statements: SqlStatements) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> &SqlStatements {
        &self.statements
    }

    fn plain_query(&self, query: &QueryCommand, expression: &SqlExpression) -> Result<SqlQuery, QueryError> {
        let template = self.statements.get(QUERY)?;

        let sql = SqlQueryFormatter::new(QUERY, template)
            .with("Take", Self::take(query))
            .with("IncludedJsonMembers", Self::included_json_members(expression))
            .with("MainStructureTable", query.structure_schema.structure_table_name())
            .with("Joins", Self::joins(&query.structure_schema, expression))
            .with("WhereCriteria", Self::where_clause(expression))
            .with("GroupBy", Self::group_by(expression, true))
            .with("OrderBy", Self::order_by(expression))
            .format()?;

        Ok(self.to_query(QUERY, sql, expression.where_criteria().parameters().to_vec()))
    }

    fn paged_query(&self, query: &QueryCommand, expression: &SqlExpression, paging: &Paging) -> Result<SqlQuery, QueryError> {
        let template = self.statements.get(QUERY_PAGED)?;

        let order_by_members = if expression.sorting_members().is_empty() {
            DEFAULT_PAGING_ORDER.to_string()
        } else {
            Self::order_by_members(expression)
        };

        let sql = SqlQueryFormatter::new(QUERY_PAGED, template)
            .with("IncludedJsonMembers", Self::included_json_members(expression))
            .with("OrderByMembers", order_by_members)
            .with("MainStructureTable", query.structure_schema.structure_table_name())
            .with("Joins", Self::joins(&query.structure_schema, expression))
            .with("WhereCriteria", Self::where_clause(expression))
            .with("GroupBy", Self::group_by(expression, true))
            .with("IncludedJsonAliases", Self::included_json_aliases(expression))
            .format()?;

        let mut parameters = expression.where_criteria().parameters().to_vec();
        parameters.push(DacParameter::new(PAGING_FROM_PARAM, ParamValue::Int(paging.from_row())));
        parameters.push(DacParameter::new(PAGING_TO_PARAM, ParamValue::Int(paging.to_row())));

        Ok(self.to_query(QUERY_PAGED, sql, parameters))
    }

    fn where_expression(query: &QueryCommand) -> Result<SqlExpression, QueryError> {
        let where_lambda = query
            .where_lambda
            .as_ref()
            .filter(|w| !w.is_empty())
            .ok_or(QueryError::WhereOnlyQueryRequiresWhere)?;

        let mut expression = SqlExpression::new();
        SqlExpressionBuilder::process_where(where_lambda, &mut expression);

        if expression.where_criteria().is_empty() {
            return Err(QueryError::WhereOnlyQueryRequiresWhere);
        }
        Ok(expression)
    }

    fn render_where_only(&self, schema: &StructureSchema, expression: &SqlExpression) -> Result<String, QueryError> {
        let template = self.statements.get(WHERE_ONLY)?;

        SqlQueryFormatter::new(WHERE_ONLY, template)
            .with("MainStructureTable", schema.structure_table_name())
            .with("Joins", Self::joins(schema, expression))
            .with("WhereCriteria", Self::where_clause(expression))
            .format()
    }

    fn to_query(&self, statement: &str, sql: String, parameters: Vec<DacParameter>) -> SqlQuery {
        let query = SqlQuery::new(sql, parameters);
        debug!(statement, parameters = query.parameters().len(), "rendered sql statement");
        query
    }

    fn take(query: &QueryCommand) -> String {
        match query.take_num {
            Some(take) if !query.has_paging() => format!("top({take}) "),
            _ => String::new(),
        }
    }

    /// One join per distinct member, then one per include.
    fn joins(schema: &StructureSchema, expression: &SqlExpression) -> String {
        let mut joins = String::new();

        for (index, path, data_type_code) in expression.joined_members() {
            joins.push_str(&format!(
                " left join [{}] mem{index} on mem{index}.[StructureId] = s.[StructureId] and mem{index}.[MemberPath] = '{}'",
                schema.index_table_name(data_type_code),
                path.replace('\'', "''"),
            ));
        }

        for include in expression.includes() {
            joins.push_str(&format!(
                " left join [{}Structure] {alias} on {alias}.[StructureId] = mem{}.[Value]",
                include.referenced_structure_name,
                include.member_index,
                alias = include.alias,
            ));
        }

        joins
    }

    fn where_clause(expression: &SqlExpression) -> String {
        let criteria = expression.where_criteria();
        if criteria.is_empty() {
            String::new()
        } else {
            format!(" where {}", criteria.criteria_string())
        }
    }

    /// A member with several values joins one index row per value; grouping
    /// returns each structure once. Selected JSON columns join the key.
    fn group_by(expression: &SqlExpression, with_json: bool) -> String {
        if expression.joined_members().next().is_none() {
            return String::new();
        }
        if !with_json {
            return " group by s.[StructureId]".to_string();
        }

        let mut group_by = " group by s.[StructureId], s.[Json]".to_string();
        for include in expression.includes() {
            group_by.push_str(&format!(", {}.[Json]", include.alias));
        }
        group_by
    }

    fn order_by_members(expression: &SqlExpression) -> String {
        expression
            .sorting_members()
            .iter()
            .map(|m| m.to_order_by())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn order_by(expression: &SqlExpression) -> String {
        if expression.sorting_members().is_empty() {
            String::new()
        } else {
            format!(" order by {}", Self::order_by_members(expression))
        }
    }

    fn included_json_members(expression: &SqlExpression) -> String {
        expression
            .includes()
            .iter()
            .map(|include| format!(", {}", include.to_select_column()))
            .collect()
    }

    fn included_json_aliases(expression: &SqlExpression) -> String {
        expression
            .includes()
            .iter()
            .map(|include| format!(", [{}]", include.object_reference_path))
            .collect()
    }
}

use crate::{
    querying::{DataRecord, JsonRowStream, QueryCommand, QueryError, QueryGenerator, SqlQuery},
    structures::StructureId,
};

/// Forward-only rows produced by one command execution.
pub type RecordStream<'a, R> = Box<dyn Iterator<Item = Result<R, QueryError>> + 'a>;

/// Lazy, single-pass sequence of structure JSON. Re-run the query to read again.
pub type QueryJsonStream<'a> = Box<dyn Iterator<Item = Result<String, QueryError>> + 'a>;

/// Runs parameterized SQL against a database connection.
pub trait CommandExecutor {
    type Record: DataRecord;

    fn execute_reader<'a>(&'a self, query: &SqlQuery) -> Result<RecordStream<'a, Self::Record>, QueryError>;

    /// Returns the number of affected rows.
    fn execute_non_query(&self, query: &SqlQuery) -> Result<usize, QueryError>;
}

/// Generates SQL for query commands and runs it on an executor.
pub struct QueryRunner<G, E> {
    generator: G,
    executor: E,
}

impl<G, E> QueryRunner<G, E>
where
    G: QueryGenerator,
    E: CommandExecutor,
{
    pub fn new(generator: G, executor: E) -> Self {
        Self { generator, executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// JSON of every matching structure. No matching rows give an empty
    /// stream.
    pub fn query_json<'a>(&'a self, query: &QueryCommand) -> Result<QueryJsonStream<'a>, QueryError>
    where
        E::Record: 'a,
    {
        let sql = self.generator.generate_query(query)?;
        let rows = self.executor.execute_reader(&sql)?;
        Ok(Box::new(JsonRowStream::new(rows)))
    }

    pub fn query_structure_ids(&self, query: &QueryCommand) -> Result<Vec<StructureId>, QueryError> {
        let sql = self.generator.generate_query_returning_structure_ids(query)?;
        let id_type = query.structure_schema.id_type;
        self.executor
            .execute_reader(&sql)?
            .map(|row| {
                let record = row?;
                record
                    .get_str(0)
                    .and_then(|raw| StructureId::parse(raw, id_type))
                    .ok_or_else(|| QueryError::Execution(format!("invalid structure id {:?}", record.get_str(0))))
            })
            .collect()
    }

    pub fn count(&self, query: &QueryCommand) -> Result<usize, QueryError> {
        let sql = self.generator.generate_count_query(query)?;
        let mut rows = self.executor.execute_reader(&sql)?;
        match rows.next() {
            Some(row) => {
                let record = row?;
                record
                    .get_str(0)
                    .and_then(|raw| raw.trim().parse::<usize>().ok())
                    .ok_or_else(|| QueryError::Execution(format!("invalid count {:?}", record.get_str(0))))
            }
            None => Ok(0),
        }
    }

    pub fn delete_by_query(&self, query: &QueryCommand) -> Result<usize, QueryError> {
        let sql = self.generator.generate_delete_by_query(query)?;
        self.executor.execute_non_query(&sql)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::VecDeque};

    use super::*;
    use crate::{
        querying::{
            test_records::TestRecord,
            lambdas::{MemberNode, Operator, WhereLambda, WhereNode},
            DbQueryGenerator,
        },
        structures::{DataTypeCode, StructureSchema},
    };

    /// Answers each execution with the next scripted result set and records
    /// the SQL it was given.
    #[derive(Default)]
    struct ScriptedExecutor {
        results: RefCell<VecDeque<Vec<TestRecord>>>,
        executed: RefCell<Vec<SqlQuery>>,
    }

    impl ScriptedExecutor {
        fn returning(results: Vec<Vec<TestRecord>>) -> Self {
            Self {
                results: RefCell::new(results.into()),
                executed: RefCell::default(),
            }
        }
    }

    impl CommandExecutor for ScriptedExecutor {
        type Record = TestRecord;

        fn execute_reader<'a>(&'a self, query: &SqlQuery) -> Result<RecordStream<'a, TestRecord>, QueryError> {
            self.executed.borrow_mut().push(query.clone());
            let rows = self.results.borrow_mut().pop_front().unwrap_or_default();
            Ok(Box::new(rows.into_iter().map(Ok)))
        }

        fn execute_non_query(&self, query: &SqlQuery) -> Result<usize, QueryError> {
            self.executed.borrow_mut().push(query.clone());
            Ok(2)
        }
    }

    fn adults() -> QueryCommand {
        QueryCommand::new(StructureSchema::identity("Person")).with_where(WhereLambda::where_nodes(vec![
            WhereNode::member(MemberNode::new("Age", "i32", DataTypeCode::IntegerNumber)),
            WhereNode::op(Operator::GreaterThanOrEqual),
            WhereNode::value(18),
        ]))
    }

    #[test]
    fn test_query_json_streams_rows() {
        let executor = ScriptedExecutor::returning(vec![vec![TestRecord::json(r#"{"Age":20}"#), TestRecord::json(r#"{"Age":30}"#)]]);
        let runner = QueryRunner::new(DbQueryGenerator::default(), executor);

        let json = runner.query_json(&adults()).unwrap().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(json, vec![r#"{"Age":20}"#, r#"{"Age":30}"#]);

        let executed = runner.executor().executed.borrow();
        assert_eq!(executed.len(), 1);
        assert!(executed[0].sql().contains("where (mem0.[Value] >= @p0)"));
    }

    #[test]
    fn test_query_matching_nothing_is_empty_not_error() {
        let runner = QueryRunner::new(DbQueryGenerator::default(), ScriptedExecutor::returning(vec![vec![]]));
        let mut json = runner.query_json(&adults()).unwrap();
        assert!(json.next().is_none());
    }

    #[test]
    fn test_structure_ids_and_count() {
        let executor = ScriptedExecutor::returning(vec![
            vec![TestRecord::new(&[("StructureId", Some("4"))]), TestRecord::new(&[("StructureId", Some("9"))])],
            vec![TestRecord::new(&[("Count", Some("2"))])],
        ]);
        let runner = QueryRunner::new(DbQueryGenerator::default(), executor);

        let ids = runner.query_structure_ids(&adults()).unwrap();
        assert_eq!(ids, vec![StructureId::Identity(4), StructureId::Identity(9)]);
        assert_eq!(runner.count(&adults()).unwrap(), 2);
    }

    #[test]
    fn test_invalid_id_is_reported() {
        let executor = ScriptedExecutor::returning(vec![vec![TestRecord::new(&[("StructureId", Some("abc"))])]]);
        let runner = QueryRunner::new(DbQueryGenerator::default(), executor);
        assert!(matches!(runner.query_structure_ids(&adults()), Err(QueryError::Execution(_))));
    }

    #[test]
    fn test_delete_by_query_requires_where() {
        let runner = QueryRunner::new(DbQueryGenerator::default(), ScriptedExecutor::default());
        let everything = QueryCommand::new(StructureSchema::identity("Person"));

        assert!(matches!(runner.delete_by_query(&everything), Err(QueryError::WhereOnlyQueryRequiresWhere)));
        assert!(runner.executor().executed.borrow().is_empty());

        assert_eq!(runner.delete_by_query(&adults()).unwrap(), 2);
        assert!(runner.executor().executed.borrow()[0].sql().starts_with("delete from [PersonStructure]"));
    }
}

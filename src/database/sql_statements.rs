use std::{ffi::OsString, fs};

use indexmap::IndexMap;

use crate::database::ConfigError;

pub const QUERY: &str = "Query";
pub const QUERY_PAGED: &str = "QueryPaged";
pub const QUERY_STRUCTURE_IDS: &str = "QueryStructureIds";
pub const QUERY_COUNT: &str = "QueryCount";
pub const WHERE_ONLY: &str = "WhereOnly";
pub const DELETE_BY_QUERY: &str = "DeleteByQuery";
pub const GET_ALL_JSON_ORDERED_BY_ID: &str = "GetAllJsonOrderedById";
pub const DELETE_BY_ID_RANGE: &str = "DeleteByIdRange";

const DEFAULT_STATEMENTS: [(&str, &str); 8] = [
    (
        QUERY,
        "select {Take}s.[Json]{IncludedJsonMembers} from [{MainStructureTable}] s{Joins}{WhereCriteria}{GroupBy}{OrderBy};",
    ),
    (
        QUERY_PAGED,
        "with pagedRs as (select s.[Json]{IncludedJsonMembers}, row_number() over (order by {OrderByMembers}) as RowNum from [{MainStructureTable}] s{Joins}{WhereCriteria}{GroupBy}) select Json{IncludedJsonAliases} from pagedRs where RowNum between @pagingFrom and @pagingTo;",
    ),
    (
        QUERY_STRUCTURE_IDS,
        "select {Take}s.[StructureId] from [{MainStructureTable}] s{Joins}{WhereCriteria}{GroupBy}{OrderBy};",
    ),
    (
        QUERY_COUNT,
        "select count(distinct s.[StructureId]) from [{MainStructureTable}] s{Joins}{WhereCriteria};",
    ),
    (WHERE_ONLY, "[{MainStructureTable}] s{Joins}{WhereCriteria}"),
    (
        DELETE_BY_QUERY,
        "delete from [{MainStructureTable}] where [StructureId] in (select s.[StructureId] from {WhereOnly});",
    ),
    (
        GET_ALL_JSON_ORDERED_BY_ID,
        "select [Json] from [{MainStructureTable}] order by [StructureId];",
    ),
    (
        DELETE_BY_ID_RANGE,
        "delete from [{Table}] where [StructureId] between @idFrom and @idTo;",
    ),
];

/// Named SQL templates used by the query generator.
///
/// Templates use `{Slot}` placeholders that `SqlQueryFormatter` fills in.
/// The defaults cover every statement the generator renders; overrides are
/// layered on top from JSON (`{ "Query": "select ..." }`).
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatements {
    statements: IndexMap<String, String>,
}

impl Default for SqlStatements {
    fn default() -> Self {
        let statements = DEFAULT_STATEMENTS
            .iter()
            .map(|(name, sql)| (name.to_string(), sql.to_string()))
            .collect();

        Self { statements }
    }
}

impl SqlStatements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the template registered under `name`.
    pub fn get(&self, name: &str) -> Result<&str, ConfigError> {
        self.statements
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::UnknownStatement(name.to_string()))
    }

    /// Register or replace a single template.
    pub fn set(&mut self, name: &str, template: &str) {
        self.statements.insert(name.to_string(), template.to_string());
    }

    pub fn names(&self) -> Vec<String> {
        self.statements.keys().cloned().collect()
    }

    /// Defaults overlaid with the statements in a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let overrides = serde_json::from_str::<IndexMap<String, String>>(json)?;
        let mut statements = Self::default();
        for (name, template) in overrides {
            statements.statements.insert(name, template);
        }
        Ok(statements)
    }

    /// Defaults overlaid with the statements in a JSON file.
    pub fn load_from_file(file_path: &OsString) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(file_path).map_err(|source| ConfigError::Read {
            path: file_path.to_string_lossy().to_string(),
            source,
        })?;

        Self::from_json_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_cover_every_statement() {
        let statements = SqlStatements::default();
        for (name, _) in DEFAULT_STATEMENTS {
            assert!(statements.get(name).is_ok(), "missing {name}");
        }
        assert_eq!(statements.names().len(), DEFAULT_STATEMENTS.len());
    }

    #[test]
    fn test_unknown_statement() {
        let statements = SqlStatements::default();
        match statements.get("Nope") {
            Err(ConfigError::UnknownStatement(name)) => assert_eq!(name, "Nope"),
            other => panic!("expected UnknownStatement, got {other:?}"),
        }
    }

    #[test]
    fn test_from_json_overrides_and_adds() {
        let statements = SqlStatements::from_json_str(r#"{ "QueryCount": "select 1;", "Custom": "select 2;" }"#).unwrap();
        assert_eq!(statements.get(QUERY_COUNT).unwrap(), "select 1;");
        assert_eq!(statements.get("Custom").unwrap(), "select 2;");
        assert!(statements.get(QUERY).unwrap().starts_with("select {Take}"));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        assert!(matches!(
            SqlStatements::from_json_str("[1, 2]"),
            Err(ConfigError::InvalidStatements(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "Query": "select s.[Json] from [{{MainStructureTable}}] s;" }}"#).unwrap();

        let path = file.path().as_os_str().to_os_string();
        let statements = SqlStatements::load_from_file(&path).unwrap();
        assert_eq!(statements.get(QUERY).unwrap(), "select s.[Json] from [{MainStructureTable}] s;");
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json").into_os_string();
        assert!(matches!(SqlStatements::load_from_file(&path), Err(ConfigError::Read { .. })));
    }
}

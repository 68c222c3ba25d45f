use crate::querying::sql::DacParameter;

/// Final SQL text and the parameters it binds.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    sql: String,
    parameters: Vec<DacParameter>,
}

impl SqlQuery {
    /// Duplicate parameters are dropped, keeping the first occurrence.
    pub fn new(sql: String, parameters: Vec<DacParameter>) -> Self {
        Self {
            sql,
            parameters: DacParameter::distinct(parameters),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &[DacParameter] {
        &self.parameters
    }
}

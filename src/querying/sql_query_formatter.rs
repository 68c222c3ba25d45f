use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::querying::QueryError;

static SLOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([A-Za-z]+)\}").expect("valid slot regex"));

/// Fills the `{Slot}` placeholders of a named statement template.
///
/// Every slot used by the template must be given a value, an empty string
/// included; a missing one is reported instead of being left in the SQL.
pub struct SqlQueryFormatter<'a> {
    statement: &'a str,
    template: &'a str,
    slots: IndexMap<&'static str, String>,
}

impl<'a> SqlQueryFormatter<'a> {
    pub fn new(statement: &'a str, template: &'a str) -> Self {
        Self {
            statement,
            template,
            slots: IndexMap::new(),
        }
    }

    pub fn with(mut self, slot: &'static str, value: impl Into<String>) -> Self {
        self.slots.insert(slot, value.into());
        self
    }

    pub fn format(&self) -> Result<String, QueryError> {
        let mut sql = String::with_capacity(self.template.len());
        let mut last = 0;

        for captures in SLOT.captures_iter(self.template) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let value = self.slots.get(name.as_str()).ok_or_else(|| QueryError::UnknownTemplateSlot {
                statement: self.statement.to_string(),
                slot: name.as_str().to_string(),
            })?;

            sql.push_str(&self.template[last..whole.start()]);
            sql.push_str(value);
            last = whole.end();
        }

        sql.push_str(&self.template[last..]);
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_slots() {
        let sql = SqlQueryFormatter::new("Query", "select {Take}s.[Json] from [{MainStructureTable}] s{Joins};")
            .with("Take", "top(3) ")
            .with("MainStructureTable", "OrderStructure")
            .with("Joins", "")
            .format()
            .unwrap();
        assert_eq!(sql, "select top(3) s.[Json] from [OrderStructure] s;");
    }

    #[test]
    fn test_bracketed_columns_are_not_slots() {
        let sql = SqlQueryFormatter::new("X", "select [Json] from [{Table}]").with("Table", "T").format().unwrap();
        assert_eq!(sql, "select [Json] from [T]");
    }

    #[test]
    fn test_missing_slot_is_an_error() {
        let result = SqlQueryFormatter::new("Custom", "select {Nope}").format();
        match result {
            Err(QueryError::UnknownTemplateSlot { statement, slot }) => {
                assert_eq!(statement, "Custom");
                assert_eq!(slot, "Nope");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

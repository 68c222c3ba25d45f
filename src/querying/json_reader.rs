use crate::querying::QueryError;

/// One row of a forward-only result set, read by column ordinal.
pub trait DataRecord {
    fn field_count(&self) -> usize;

    fn field_name(&self, index: usize) -> &str;

    /// `None` when the column is null.
    fn get_str(&self, index: usize) -> Option<&str>;
}

/// Turns result rows into structure JSON, one string per row.
///
/// Rows with a single column are passed through. When the first row has
/// more columns, every further column is an included structure and is
/// merged into the primary JSON as `"{column name}": {column json}` before
/// its closing brace. Null include columns are left out. The primary JSON
/// is expected to be an object; included columns are not parsed.
pub struct JsonRowStream<I> {
    rows: I,
    merge_includes: Option<bool>,
}

impl<I, R> JsonRowStream<I>
where
    I: Iterator<Item = Result<R, QueryError>>,
    R: DataRecord,
{
    pub fn new(rows: I) -> Self {
        Self { rows, merge_includes: None }
    }

    fn read(&mut self, record: &R) -> Result<String, QueryError> {
        let merge = *self.merge_includes.get_or_insert_with(|| record.field_count() > 1);
        let json = record
            .get_str(0)
            .ok_or_else(|| QueryError::Execution("row has no structure json".to_string()))?;

        if !merge {
            return Ok(json.to_string());
        }

        Ok(Self::merge(json, record))
    }

    fn merge(json: &str, record: &R) -> String {
        let trimmed = json.trim_end();
        let body = trimmed.strip_suffix('}').unwrap_or(trimmed);

        let mut merged = String::with_capacity(json.len());
        merged.push_str(body);
        let mut needs_separator = !body.trim_end().ends_with('{');

        for index in 1..record.field_count() {
            let Some(included) = record.get_str(index) else {
                continue;
            };
            if needs_separator {
                merged.push(',');
            }
            merged.push_str(&format!("\"{}\":{}", record.field_name(index), included));
            needs_separator = true;
        }

        merged.push('}');
        merged
    }
}

impl<I, R> Iterator for JsonRowStream<I>
where
    I: Iterator<Item = Result<R, QueryError>>,
    R: DataRecord,
{
    type Item = Result<String, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        Some(row.and_then(|record| self.read(&record)))
    }
}

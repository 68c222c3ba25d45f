use crate::querying::DataRecord;

/// In-memory row used by reader and runner tests.
#[derive(Debug, Clone)]
pub struct TestRecord {
    pub names: Vec<String>,
    pub values: Vec<Option<String>>,
}

impl TestRecord {
    pub fn new(columns: &[(&str, Option<&str>)]) -> Self {
        Self {
            names: columns.iter().map(|(name, _)| name.to_string()).collect(),
            values: columns.iter().map(|(_, value)| value.map(str::to_string)).collect(),
        }
    }

    pub fn json(json: &str) -> Self {
        Self::new(&[("Json", Some(json))])
    }
}

impl DataRecord for TestRecord {
    fn field_count(&self) -> usize {
        self.values.len()
    }

    fn field_name(&self, index: usize) -> &str {
        &self.names[index]
    }

    fn get_str(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }
}

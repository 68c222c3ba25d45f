use crate::querying::sql::DacParameter;

/// Rendered predicate text and its parameters.
///
/// `WhereCriteria::empty()` means "no predicate", so callers can leave the
/// `where` clause out entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereCriteria {
    criteria_string: String,
    parameters: Vec<DacParameter>,
    is_empty: bool,
}

impl WhereCriteria {
    pub fn new(criteria_string: String, parameters: Vec<DacParameter>) -> Self {
        Self { criteria_string, parameters, is_empty: false }
    }

    pub fn empty() -> Self {
        Self {
            criteria_string: String::new(),
            parameters: vec![],
            is_empty: true,
        }
    }

    pub fn criteria_string(&self) -> &str {
        &self.criteria_string
    }

    pub fn parameters(&self) -> &[DacParameter] {
        &self.parameters
    }

    pub fn is_empty(&self) -> bool {
        self.is_empty
    }
}

impl Default for WhereCriteria {
    fn default() -> Self {
        Self::empty()
    }
}

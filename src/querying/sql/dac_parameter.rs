use crate::querying::sql::ParamValue;

/// A named, immutable query parameter.
///
/// Names include the `@` prefix used in the SQL text (`@p0`, `@pagingFrom`).
/// Two parameters are equal when both name and value are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DacParameter {
    name: String,
    value: ParamValue,
}

impl DacParameter {
    pub fn new(name: &str, value: ParamValue) -> Self {
        Self { name: name.to_string(), value }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ParamValue {
        &self.value
    }

    pub fn is_array(&self) -> bool {
        self.value.is_array()
    }

    /// Keep the first occurrence of every parameter, preserving order.
    pub fn distinct(parameters: impl IntoIterator<Item = DacParameter>) -> Vec<DacParameter> {
        let mut distinct: Vec<DacParameter> = Vec::new();
        for parameter in parameters {
            if !distinct.contains(&parameter) {
                distinct.push(parameter);
            }
        }
        distinct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_uses_name_and_value() {
        assert_eq!(DacParameter::new("@p0", 1.into()), DacParameter::new("@p0", 1.into()));
        assert_ne!(DacParameter::new("@p0", 1.into()), DacParameter::new("@p1", 1.into()));
        assert_ne!(DacParameter::new("@p0", 1.into()), DacParameter::new("@p0", 2.into()));
    }

    #[test]
    fn test_distinct_keeps_first_occurrence_order() {
        let parameters = vec![
            DacParameter::new("@p0", 1.into()),
            DacParameter::new("@p1", "a".into()),
            DacParameter::new("@p0", 1.into()),
        ];
        let distinct = DacParameter::distinct(parameters);
        assert_eq!(distinct.len(), 2);
        assert_eq!(distinct[0].name(), "@p0");
        assert_eq!(distinct[1].name(), "@p1");
    }
}

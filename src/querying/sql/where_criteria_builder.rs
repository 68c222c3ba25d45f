use indexmap::IndexSet;

use crate::querying::{
    lambdas::Operator,
    sql::{DacParameter, ParamValue, WhereCriteria},
};

/// Placeholder in member and value formats replaced by the rendered reference.
pub const FORMAT_ARG: &str = "{0}";

#[derive(Debug, Clone, PartialEq)]
enum CriteriaFragment {
    Raw(String),
    /// `(member op value)`; `op` and `value` arrive after the member.
    Comparison {
        member: String,
        op: Option<String>,
        value: Option<String>,
    },
}

/// Assembles one boolean SQL expression from a linear stream of tokens.
///
/// A member token opens a comparison; the next operator and value tokens
/// fill it in, and the value closes it. Tokens arriving while no comparison
/// is open are appended as they are, which is how `and`/`or`/`not` and
/// grouping join comparisons together. The fragments are rendered once in
/// `to_criteria`.
#[derive(Debug, Default)]
pub struct WhereCriteriaBuilder {
    fragments: Vec<CriteriaFragment>,
    open_comparison: Option<usize>,
    parameters: IndexSet<DacParameter>,
    last_parameter: Option<String>,
}

impl WhereCriteriaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn member_ref(index: usize, use_string_column: bool) -> String {
        let column = if use_string_column { "StringValue" } else { "Value" };
        format!("mem{index}.[{column}]")
    }

    pub fn add_member(&mut self, index: usize, use_string_column: bool) {
        self.add_member_text(Self::member_ref(index, use_string_column));
    }

    /// Add a member reference wrapped by `format`, e.g. `lower({0})`.
    pub fn add_member_with_format(&mut self, index: usize, use_string_column: bool, format: &str) {
        self.add_member_text(format.replace(FORMAT_ARG, &Self::member_ref(index, use_string_column)));
    }

    fn add_member_text(&mut self, member: String) {
        match self.open_comparison {
            // member compared with member: the second reference is the value
            Some(_) => self.add_value_text(member),
            None => {
                self.fragments.push(CriteriaFragment::Comparison { member, op: None, value: None });
                self.open_comparison = Some(self.fragments.len() - 1);
            }
        }
    }

    pub fn add_op(&mut self, op: Operator) {
        let sql = op.to_sql();
        if let Some(index) = self.open_comparison {
            if let Some(CriteriaFragment::Comparison { op: slot @ None, .. }) = self.fragments.get_mut(index) {
                *slot = Some(sql);
                return;
            }
        }
        self.fragments.push(CriteriaFragment::Raw(sql));
    }

    pub fn add_value(&mut self, value: ParamValue) {
        let name = self.next_parameter(value);
        self.add_value_text(name);
    }

    /// Add a value whose parameter reference is wrapped by `format`,
    /// e.g. `cast({0} as date)`.
    pub fn add_value_with_format(&mut self, value: ParamValue, format: &str) {
        let name = self.next_parameter(value);
        self.add_value_text(format.replace(FORMAT_ARG, &name));
    }

    /// Reference the most recently added parameter again, wrapped by
    /// `format`, without allocating a new one. Does nothing before the first
    /// value.
    pub fn repeat_last_value(&mut self, format: &str) {
        if let Some(name) = self.last_parameter.clone() {
            self.add_value_text(format.replace(FORMAT_ARG, &name));
        }
    }

    pub fn add_null(&mut self) {
        self.add_value_text("null".to_string());
    }

    /// Add an array parameter compared through a subquery over the set.
    pub fn add_set_of_values(&mut self, values: Vec<ParamValue>) {
        let name = self.next_parameter(ParamValue::Array(values));
        self.add_value_text(format!("(select [Value] from {name})"));
    }

    pub fn add_raw(&mut self, text: &str) {
        self.fragments.push(CriteriaFragment::Raw(text.to_string()));
    }

    fn next_parameter(&mut self, value: ParamValue) -> String {
        let name = format!("@p{}", self.parameters.len());
        self.parameters.insert(DacParameter::new(&name, value));
        self.last_parameter = Some(name.clone());
        name
    }

    fn add_value_text(&mut self, text: String) {
        match self.open_comparison.take() {
            Some(index) => {
                if let Some(CriteriaFragment::Comparison { value, .. }) = self.fragments.get_mut(index) {
                    *value = Some(text);
                }
            }
            None => self.fragments.push(CriteriaFragment::Raw(text)),
        }
    }

    fn render(&self) -> String {
        let mut sql = String::new();
        for fragment in &self.fragments {
            match fragment {
                CriteriaFragment::Raw(text) => sql.push_str(text),
                CriteriaFragment::Comparison { member, op, value } => {
                    sql.push('(');
                    sql.push_str(member);
                    sql.push_str(op.as_deref().unwrap_or(""));
                    sql.push_str(value.as_deref().unwrap_or(""));
                    sql.push(')');
                }
            }
        }
        sql
    }

    pub fn to_criteria(&self) -> WhereCriteria {
        if self.is_empty() {
            return WhereCriteria::empty();
        }

        WhereCriteria::new(self.render(), self.parameters.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_builder_gives_empty_criteria() {
        let builder = WhereCriteriaBuilder::new();
        let criteria = builder.to_criteria();
        assert!(criteria.is_empty());
        assert_eq!(criteria.criteria_string(), "");
    }

    #[test]
    fn test_member_op_value() {
        let mut builder = WhereCriteriaBuilder::new();
        builder.add_member(0, false);
        builder.add_op(Operator::Equal);
        builder.add_value(42.into());

        let criteria = builder.to_criteria();
        assert_eq!(criteria.criteria_string(), "(mem0.[Value] = @p0)");
        assert_eq!(criteria.parameters(), &[DacParameter::new("@p0", 42.into())]);
    }

    #[test]
    fn test_comparisons_joined_by_logical_operators() {
        let mut builder = WhereCriteriaBuilder::new();
        builder.add_raw("(");
        builder.add_member(0, false);
        builder.add_op(Operator::GreaterThan);
        builder.add_value(1.into());
        builder.add_op(Operator::OrElse);
        builder.add_member(1, true);
        builder.add_op(Operator::Like);
        builder.add_value("a%".into());
        builder.add_raw(")");
        builder.add_op(Operator::AndAlso);
        builder.add_op(Operator::Not);
        builder.add_member(2, false);
        builder.add_op(Operator::Is);
        builder.add_null();

        let criteria = builder.to_criteria();
        assert_eq!(
            criteria.criteria_string(),
            "((mem0.[Value] > @p0) or (mem1.[StringValue] like @p1)) and not (mem2.[Value] is null)"
        );
        assert_eq!(criteria.parameters().len(), 2);
    }

    #[test]
    fn test_member_compared_to_member_is_flat() {
        let mut builder = WhereCriteriaBuilder::new();
        builder.add_member(0, false);
        builder.add_op(Operator::LessThan);
        builder.add_member(1, false);
        builder.add_op(Operator::AndAlso);
        builder.add_member(2, false);
        builder.add_op(Operator::Equal);
        builder.add_value(true.into());

        assert_eq!(
            builder.to_criteria().criteria_string(),
            "(mem0.[Value] < mem1.[Value]) and (mem2.[Value] = @p0)"
        );
    }

    #[test]
    fn test_set_of_values_uses_array_parameter() {
        let mut builder = WhereCriteriaBuilder::new();
        builder.add_member(0, false);
        builder.add_op(Operator::InSet);
        builder.add_set_of_values(vec![1.into(), 2.into()]);

        let criteria = builder.to_criteria();
        assert_eq!(criteria.criteria_string(), "(mem0.[Value] in (select [Value] from @p0))");
        assert!(criteria.parameters()[0].is_array());
    }

    #[test]
    fn test_formatted_and_repeated_values() {
        let mut builder = WhereCriteriaBuilder::new();
        builder.add_member(0, false);
        builder.add_op(Operator::GreaterThanOrEqual);
        builder.add_value_with_format(7.into(), "cast({0} as date)");
        builder.add_op(Operator::AndAlso);
        builder.add_member(0, false);
        builder.add_op(Operator::LessThan);
        builder.repeat_last_value("dateadd(day, 1, cast({0} as date))");

        let criteria = builder.to_criteria();
        assert_eq!(
            criteria.criteria_string(),
            "(mem0.[Value] >= cast(@p0 as date)) and (mem0.[Value] < dateadd(day, 1, cast(@p0 as date)))"
        );
        assert_eq!(criteria.parameters().len(), 1);
    }

    #[test]
    fn test_member_with_format() {
        let mut builder = WhereCriteriaBuilder::new();
        builder.add_member_with_format(3, true, "lower({0})");
        builder.add_op(Operator::Equal);
        builder.add_value("abc".into());

        assert_eq!(builder.to_criteria().criteria_string(), "(lower(mem3.[StringValue]) = @p0)");
    }

    #[test]
    fn test_repeat_before_any_value_does_nothing() {
        let mut builder = WhereCriteriaBuilder::new();
        builder.repeat_last_value("{0}");
        assert!(builder.is_empty());
    }

    #[test]
    fn test_parameter_names_follow_allocation_order() {
        let mut builder = WhereCriteriaBuilder::new();
        for i in 0..3 {
            builder.add_member(i, false);
            builder.add_op(Operator::Equal);
            builder.add_value((i as i64).into());
        }
        let names = builder
            .to_criteria()
            .parameters()
            .iter()
            .map(|p| p.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["@p0", "@p1", "@p2"]);
    }
}

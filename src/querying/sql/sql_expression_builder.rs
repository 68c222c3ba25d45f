use once_cell::sync::Lazy;
use regex::Regex;

use crate::querying::{
    lambdas::{IncludeLambda, MemberKind, MemberNode, Operator, SortingLambda, WhereLambda, WhereNode},
    sql::{ParamValue, SqlExpression, WhereCriteriaBuilder},
    QueryCommand,
};

static WILDCARD_RUN: Lazy<Regex> = Lazy::new(|| Regex::new("%{2,}").expect("valid wildcard regex"));

/// Translates the parsed lambdas of a query into an `SqlExpression`.
pub struct SqlExpressionBuilder;

impl SqlExpressionBuilder {
    /// Where first, then sorting, then includes: member indexes are
    /// allocated in that order.
    pub fn process(query: &QueryCommand) -> SqlExpression {
        let mut expression = Self::process_without_includes(query);

        if query.has_includes() {
            Self::process_includes(&query.includes, &mut expression);
        }

        expression
    }

    /// Predicate and sorting only, for shapes that never select includes.
    pub fn process_without_includes(query: &QueryCommand) -> SqlExpression {
        let mut expression = SqlExpression::new();

        if let Some(where_lambda) = &query.where_lambda {
            Self::process_where(where_lambda, &mut expression);
        }

        if let Some(sortings) = &query.sortings {
            Self::process_sortings(sortings, &mut expression);
        }

        expression
    }

    pub fn process_where(where_lambda: &WhereLambda, expression: &mut SqlExpression) {
        let mut builder = WhereCriteriaBuilder::new();

        for node in &where_lambda.nodes {
            match node {
                WhereNode::Member(member) => Self::on_member(member, expression, &mut builder),
                WhereNode::Operator(op) => builder.add_op(*op),
                WhereNode::Value(value) => builder.add_value(value.clone()),
                WhereNode::Null => builder.add_null(),
                WhereNode::StartGroup | WhereNode::EndGroup | WhereNode::Raw(_) => builder.add_raw(&node.to_string()),
            }
        }

        expression.set_where_criteria(builder.to_criteria());
    }

    fn on_member(member: &MemberNode, expression: &mut SqlExpression, builder: &mut WhereCriteriaBuilder) {
        let index = expression.add_where_member(&member.path, &member.data_type, member.data_type_code);
        let string_column = member.uses_string_column();

        match &member.kind {
            MemberKind::Plain if member.is_standalone_bool => {
                builder.add_member(index, false);
                builder.add_op(Operator::Equal);
                builder.add_value(ParamValue::Bool(true));
            }
            MemberKind::Plain => builder.add_member(index, false),
            MemberKind::InSet(values) => {
                builder.add_member(index, false);
                builder.add_op(Operator::InSet);
                builder.add_set_of_values(values.clone());
            }
            MemberKind::NotInSet(values) => {
                builder.add_member(index, false);
                builder.add_op(Operator::NotInSet);
                builder.add_set_of_values(values.clone());
            }
            MemberKind::Like(pattern) => Self::add_like(builder, index, pattern.clone()),
            MemberKind::StringContains(value) => Self::add_wildcarded(builder, index, format!("%{value}%")),
            MemberKind::StringStartsWith(value) => Self::add_wildcarded(builder, index, format!("{value}%")),
            MemberKind::StringEndsWith(value) => Self::add_wildcarded(builder, index, format!("%{value}")),
            MemberKind::StringExactMatch(value) => {
                builder.add_member(index, string_column);
                builder.add_op(Operator::Equal);
                builder.add_value(ParamValue::String(value.clone()));
            }
            MemberKind::ToLower => builder.add_member_with_format(index, string_column, "lower({0})"),
            MemberKind::ToUpper => builder.add_member_with_format(index, string_column, "upper({0})"),
            MemberKind::SameDay(value) => {
                builder.add_raw("(");
                builder.add_member(index, false);
                builder.add_op(Operator::GreaterThanOrEqual);
                builder.add_value_with_format(value.clone(), "cast({0} as date)");
                builder.add_op(Operator::AndAlso);
                builder.add_member(index, false);
                builder.add_op(Operator::LessThan);
                builder.repeat_last_value("dateadd(day, 1, cast({0} as date))");
                builder.add_raw(")");
            }
        }
    }

    fn add_like(builder: &mut WhereCriteriaBuilder, index: usize, pattern: String) {
        builder.add_member(index, true);
        builder.add_op(Operator::Like);
        builder.add_value(ParamValue::String(pattern));
    }

    fn add_wildcarded(builder: &mut WhereCriteriaBuilder, index: usize, pattern: String) {
        Self::add_like(builder, index, Self::collapse_wildcards(&pattern));
    }

    /// Collapse runs of `%` so pre-wildcarded input does not double up.
    pub fn collapse_wildcards(pattern: &str) -> String {
        WILDCARD_RUN.replace_all(pattern, "%").into_owned()
    }

    pub fn process_sortings(sortings: &SortingLambda, expression: &mut SqlExpression) {
        for node in &sortings.nodes {
            expression.add_sorting_member(node);
        }
    }

    pub fn process_includes(includes: &[IncludeLambda], expression: &mut SqlExpression) {
        let merged = IncludeLambda::merge_all(includes);
        for node in &merged.nodes {
            expression.add_include(node);
        }
    }
}

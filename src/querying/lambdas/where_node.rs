use std::fmt;

use crate::querying::{lambdas::{MemberNode, Operator}, sql::ParamValue};

/// One node of a parsed where-lambda, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereNode {
    Member(MemberNode),
    Operator(Operator),
    Value(ParamValue),
    Null,
    StartGroup,
    EndGroup,
    /// Text with no structured representation; emitted verbatim.
    Raw(String),
}

impl WhereNode {
    pub fn member(node: MemberNode) -> Self {
        WhereNode::Member(node)
    }

    pub fn op(op: Operator) -> Self {
        WhereNode::Operator(op)
    }

    pub fn value(value: impl Into<ParamValue>) -> Self {
        WhereNode::Value(value.into())
    }
}

impl fmt::Display for WhereNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WhereNode::Member(member) => write!(f, "{}", member.path),
            WhereNode::Operator(op) => write!(f, "{op}"),
            WhereNode::Value(value) => write!(f, "{value}"),
            WhereNode::Null => write!(f, "null"),
            WhereNode::StartGroup => write!(f, "("),
            WhereNode::EndGroup => write!(f, ")"),
            WhereNode::Raw(text) => write!(f, "{text}"),
        }
    }
}

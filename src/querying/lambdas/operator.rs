use std::fmt;

/// Operators a parsed where-lambda can contain.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    AndAlso,
    OrElse,
    Not,
    Like,
    InSet,
    NotInSet,
    Is,
    IsNot,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Equal => write!(f, "="),
            Operator::NotEqual => write!(f, "<>"),
            Operator::LessThan => write!(f, "<"),
            Operator::LessThanOrEqual => write!(f, "<="),
            Operator::GreaterThan => write!(f, ">"),
            Operator::GreaterThanOrEqual => write!(f, ">="),
            Operator::AndAlso => write!(f, "and"),
            Operator::OrElse => write!(f, "or"),
            Operator::Not => write!(f, "not"),
            Operator::Like => write!(f, "like"),
            Operator::InSet => write!(f, "in"),
            Operator::NotInSet => write!(f, "not in"),
            Operator::Is => write!(f, "is"),
            Operator::IsNot => write!(f, "is not"),
        }
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Operator({})", self)
    }
}

impl Operator {
    /// SQL text as it is placed between operands. A leading `not` only gets
    /// a trailing space.
    pub fn to_sql(&self) -> String {
        match self {
            Operator::Not => format!("{self} "),
            op => format!(" {op} "),
        }
    }

    /// `true` for operators that compare a member with something, as opposed
    /// to the logical `and`/`or`/`not`.
    pub fn is_comparison(&self) -> bool {
        !matches!(self, Operator::AndAlso | Operator::OrElse | Operator::Not)
    }
}

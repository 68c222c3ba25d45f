use crate::querying::lambdas::{IncludeNode, SortingNode, WhereNode};

/// Ordered nodes produced by parsing one lambda expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLambda<T> {
    pub nodes: Vec<T>,
}

pub type WhereLambda = ParsedLambda<WhereNode>;
pub type SortingLambda = ParsedLambda<SortingNode>;
pub type IncludeLambda = ParsedLambda<IncludeNode>;

impl<T: Clone> ParsedLambda<T> {
    pub fn new(nodes: Vec<T>) -> Self {
        Self { nodes }
    }

    pub fn empty() -> Self {
        Self { nodes: vec![] }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A new lambda holding this lambda's nodes followed by `other`'s.
    pub fn merge_as_new(&self, other: &ParsedLambda<T>) -> ParsedLambda<T> {
        let mut nodes = self.nodes.clone();
        nodes.extend(other.nodes.iter().cloned());
        ParsedLambda { nodes }
    }

    /// Merge several lambdas into one, earlier lambdas first.
    pub fn merge_all<'a, I>(lambdas: I) -> ParsedLambda<T>
    where
        I: IntoIterator<Item = &'a ParsedLambda<T>>,
        T: 'a,
    {
        lambdas
            .into_iter()
            .fold(ParsedLambda::empty(), |merged, lambda| merged.merge_as_new(lambda))
    }
}

impl ParsedLambda<WhereNode> {
    /// Build a where-lambda, flagging boolean members that are used as a
    /// predicate on their own.
    ///
    /// A boolean member is standalone when neither neighbour is a comparison
    /// operator: `x.IsActive`, `!x.IsActive` and `x.IsActive && x.Age > 3`
    /// all test the member against `true`, `x.IsActive == false` does not.
    pub fn where_nodes(mut nodes: Vec<WhereNode>) -> Self {
        let compares = |node: Option<&WhereNode>| matches!(node, Some(WhereNode::Operator(op)) if op.is_comparison());

        let flags = (0..nodes.len())
            .map(|i| match &nodes[i] {
                WhereNode::Member(member) if member.is_bool() => {
                    let previous = if i == 0 { None } else { nodes.get(i - 1) };
                    !compares(previous) && !compares(nodes.get(i + 1))
                }
                _ => false,
            })
            .collect::<Vec<_>>();

        for (node, flag) in nodes.iter_mut().zip(flags) {
            if let WhereNode::Member(member) = node {
                member.is_standalone_bool = flag;
            }
        }

        Self { nodes }
    }
}

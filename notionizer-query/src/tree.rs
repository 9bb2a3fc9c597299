use crate::condition::FilterCondition;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt;

/// Connective of a filter node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolOp {
    And,
    #[default]
    Or,
}

impl BoolOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Child of a [`FilterTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Condition(FilterCondition),
    Tree(FilterTree),
}

impl From<FilterCondition> for FilterNode {
    fn from(condition: FilterCondition) -> Self {
        Self::Condition(condition)
    }
}

impl From<FilterTree> for FilterNode {
    fn from(tree: FilterTree) -> Self {
        Self::Tree(tree)
    }
}

impl Serialize for FilterNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Condition(c) => c.serialize(serializer),
            Self::Tree(t) => t.serialize(serializer),
        }
    }
}

/// Boolean composition of conditions with one connective per node.
///
/// Serializes to `{"and"|"or": [...]}`. Mixed logic is expressed by nesting
/// trees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterTree {
    op: BoolOp,
    nodes: Vec<FilterNode>,
}

impl FilterTree {
    pub fn new(op: BoolOp) -> Self {
        Self {
            op,
            nodes: Vec::new(),
        }
    }

    pub fn and() -> Self {
        Self::new(BoolOp::And)
    }

    pub fn or() -> Self {
        Self::new(BoolOp::Or)
    }

    /// Appends a condition or subtree, builder style.
    #[must_use]
    pub fn with(mut self, node: impl Into<FilterNode>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn push(&mut self, node: impl Into<FilterNode>) {
        self.nodes.push(node.into());
    }

    /// Removes every node, keeping the connective.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn op(&self) -> BoolOp {
        self.op
    }

    pub fn nodes(&self) -> &[FilterNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for FilterTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.op.as_str(), &self.nodes)?;
        map.end()
    }
}

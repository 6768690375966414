use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::Visitor;
use crate::ir::thorium_node::{NodeType, ThoriumNode};

/// Returns the same value for every node, whatever its kind or content.
#[derive(Debug, Clone)]
pub struct MappingVisitor<T: Clone> {
    value: T,
}

impl<T: Clone> MappingVisitor<T> {
    pub fn new(value: T) -> Self {
        MappingVisitor { value }
    }
}

impl<T: Clone> Visitor for MappingVisitor<T> {
    type Output = T;

    fn visit_default(&self, _node: &Arc<ThoriumNode>) -> T {
        self.value.clone()
    }
}

/// Boolean-valued visitor: a default answer plus per-kind overrides.
///
/// ```ignore
/// let is_value = PredicateVisitor::new(false)
///     .when(NodeType::StringValue, true)
///     .when(NodeType::NumberValue, true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PredicateVisitor {
    default: bool,
    overrides: FxHashMap<NodeType, bool>,
}

impl PredicateVisitor {
    pub fn new(default: bool) -> Self {
        PredicateVisitor { default, overrides: FxHashMap::default() }
    }

    /// Answers `answer` for nodes of type `node_type`.
    pub fn when(mut self, node_type: NodeType, answer: bool) -> Self {
        self.overrides.insert(node_type, answer);
        self
    }

    pub fn test(&self, node: &Arc<ThoriumNode>) -> bool {
        self.visit_node(node)
    }
}

impl Visitor for PredicateVisitor {
    type Output = bool;

    fn visit_default(&self, node: &Arc<ThoriumNode>) -> bool {
        self.overrides.get(&node.node_type()).copied().unwrap_or(self.default)
    }
}

//! Ready-made node filters, for use with
//! [`nodes_matching`](crate::ir::visitor::nodes_matching) and friends.

use std::sync::Arc;

use crate::ir::thorium_node::{NodeType, ThoriumNode};
use crate::ir::visitor::PredicateVisitor;

/// A predicate answering true for nodes of `node_type` only.
pub fn of_type(node_type: NodeType) -> PredicateVisitor {
    PredicateVisitor::new(false).when(node_type, true)
}

pub fn is_type_spec_inferred(node: &Arc<ThoriumNode>) -> bool {
    of_type(NodeType::TypeSpecInferred).test(node)
}

pub fn is_direct_assignment_value(node: &Arc<ThoriumNode>) -> bool {
    of_type(NodeType::DirectAssignmentValue).test(node)
}

pub fn is_attribute(node: &Arc<ThoriumNode>) -> bool {
    of_type(NodeType::Attribute).test(node)
}

pub fn is_class(node: &Arc<ThoriumNode>) -> bool {
    of_type(NodeType::Class).test(node)
}

use std::sync::Arc;

use super::Visitor;
use crate::ir::thorium_node::ThoriumNode;

/// Returns every node as is, without descending.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityVisitor;

impl Visitor for IdentityVisitor {
    type Output = Arc<ThoriumNode>;

    fn visit_default(&self, node: &Arc<ThoriumNode>) -> Arc<ThoriumNode> {
        Arc::clone(node)
    }
}

use std::sync::Arc;

use parking_lot::Mutex;

use super::Visitor;
use crate::ir::context::ContextStore;
use crate::ir::node_id::NodeId;
use crate::ir::thorium_node::{NodeFactory, ThoriumNode};

/// Deep copy of a subtree.
///
/// Every node of the output is a new allocation with a fresh id minted by
/// `factory`; the output is structurally equal to the input. The visitor
/// remembers which id each copy was made from so that side-table facts can be
/// carried over afterwards.
pub struct CopyVisitor<'a> {
    factory: &'a NodeFactory,
    copies: Mutex<Vec<(NodeId, NodeId)>>,
}

impl<'a> CopyVisitor<'a> {
    pub fn new(factory: &'a NodeFactory) -> Self {
        CopyVisitor { factory, copies: Mutex::new(Vec::new()) }
    }

    /// `(original, copy)` id pairs in the order the copies were minted.
    pub fn into_copies(self) -> Vec<(NodeId, NodeId)> {
        self.copies.into_inner()
    }
}

impl Visitor for CopyVisitor<'_> {
    type Output = Arc<ThoriumNode>;

    fn visit_default(&self, node: &Arc<ThoriumNode>) -> Arc<ThoriumNode> {
        let kind = node.kind().map_children(|child| self.visit_node(child));
        let copy = self.factory.mint(kind);
        self.copies.lock().push((node.id(), copy.id()));
        copy
    }
}

/// Copies `node` and gives every copy the context entries of its original.
///
/// Entries are carried verbatim: a carried `Relatives` still describes the
/// original tree until relatives are injected into the copy.
pub fn copy_with_context(
    node: &Arc<ThoriumNode>,
    factory: &NodeFactory,
    contexts: &mut ContextStore,
) -> Arc<ThoriumNode> {
    let visitor = CopyVisitor::new(factory);
    let copy = node.accept(&visitor);
    for (original, copied) in visitor.into_copies() {
        contexts.copy_all(original, copied);
    }
    copy
}

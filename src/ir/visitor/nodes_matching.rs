use std::sync::Arc;

use super::Visitor;
use crate::ir::thorium_node::ThoriumNode;

/// Collects, in pre-order, every descendant of the visited node that satisfies
/// the predicate. The visited node itself is never part of the result.
pub struct NodesMatchingVisitor<P> {
    predicate: P,
}

impl<P> NodesMatchingVisitor<P>
where
    P: Fn(&Arc<ThoriumNode>) -> bool,
{
    pub fn new(predicate: P) -> Self {
        NodesMatchingVisitor { predicate }
    }
}

impl<P> Visitor for NodesMatchingVisitor<P>
where
    P: Fn(&Arc<ThoriumNode>) -> bool,
{
    type Output = Vec<Arc<ThoriumNode>>;

    fn visit_default(&self, node: &Arc<ThoriumNode>) -> Vec<Arc<ThoriumNode>> {
        let mut matches = Vec::new();
        node.kind().for_each_child(|child| {
            if (self.predicate)(child) {
                matches.push(Arc::clone(child));
            }
            matches.extend(self.visit_node(child));
        });
        matches
    }
}

pub fn nodes_matching<P>(node: &Arc<ThoriumNode>, predicate: P) -> Vec<Arc<ThoriumNode>>
where
    P: Fn(&Arc<ThoriumNode>) -> bool,
{
    node.accept(&NodesMatchingVisitor::new(predicate))
}

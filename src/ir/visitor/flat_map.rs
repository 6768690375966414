use std::sync::Arc;

use super::Visitor;
use crate::ir::thorium_node::ThoriumNode;

/// Pre-order linearization: applies `f` to a node, then to each child in
/// declaration order, recursively, concatenating the results.
pub struct FlatMapVisitor<F> {
    f: F,
}

impl<T, F> FlatMapVisitor<F>
where
    F: Fn(&Arc<ThoriumNode>) -> Vec<T>,
{
    pub fn new(f: F) -> Self {
        FlatMapVisitor { f }
    }
}

impl<T, F> Visitor for FlatMapVisitor<F>
where
    F: Fn(&Arc<ThoriumNode>) -> Vec<T>,
{
    type Output = Vec<T>;

    fn visit_default(&self, node: &Arc<ThoriumNode>) -> Vec<T> {
        let mut out = (self.f)(node);
        node.kind().for_each_child(|child| out.extend(self.visit_node(child)));
        out
    }
}

/// Runs a [`FlatMapVisitor`] from `node` and returns a one-shot iterator over the results.
pub fn flat_map<T, F>(node: &Arc<ThoriumNode>, f: F) -> std::vec::IntoIter<T>
where
    F: Fn(&Arc<ThoriumNode>) -> Vec<T>,
{
    node.accept(&FlatMapVisitor::new(f)).into_iter()
}

/// Number of nodes in the subtree rooted at `node`, itself included.
pub fn count_nodes(node: &Arc<ThoriumNode>) -> usize {
    flat_map(node, |_| vec![()]).count()
}

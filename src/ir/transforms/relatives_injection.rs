use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::ir::compilation_unit::CompilationUnit;
use crate::ir::context::ContextStore;
use crate::ir::errors::PassError;
use crate::ir::pipeline::Pass;
use crate::ir::relatives::Relatives;
use crate::ir::thorium_node::ThoriumNode;
use crate::ir::visitor::Visitor;

/// Attaches a [`Relatives`] entry to every node of a tree, top-down.
///
/// The entry point gets a `Relatives` without parent; every other node's
/// entry links to the entry of the node it was reached from.
pub struct RelativesInjectionVisitor<'a> {
    contexts: Mutex<&'a mut ContextStore>,
    parent: Mutex<Option<Arc<Relatives>>>,
}

impl<'a> RelativesInjectionVisitor<'a> {
    pub fn new(contexts: &'a mut ContextStore) -> Self {
        RelativesInjectionVisitor { contexts: Mutex::new(contexts), parent: Mutex::new(None) }
    }
}

impl Visitor for RelativesInjectionVisitor<'_> {
    type Output = ();

    fn visit_default(&self, node: &Arc<ThoriumNode>) {
        let parent = self.parent.lock().clone();
        let relatives = Arc::new(Relatives::new(Arc::clone(node), parent.clone()));
        self.contexts.lock().put_arc(node.id(), Arc::clone(&relatives));

        *self.parent.lock() = Some(relatives);
        node.kind().for_each_child(|child| self.visit_node(child));
        *self.parent.lock() = parent;
    }
}

pub fn inject_relatives(root: &Arc<ThoriumNode>, contexts: &mut ContextStore) {
    root.accept(&RelativesInjectionVisitor::new(contexts));
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RelativesInjectionPass;

impl Pass for RelativesInjectionPass {
    fn run(&self, unit: &mut CompilationUnit) -> Result<(), PassError> {
        inject_relatives(&unit.root, &mut unit.contexts);
        debug!("Injected relatives into {} nodes", unit.contexts.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::relatives::{ChildrenExtractor, StatementsExtractor};
    use crate::ir::thorium_node::{NodeFactory, Visibility};

    #[test]
    fn test_parent_links_follow_the_tree() {
        let factory = NodeFactory::new();
        let ret = factory.type_spec_inferred();
        let sig = factory
            .method_signature(Visibility::Public, "m", vec![], vec![], Arc::clone(&ret))
            .unwrap();
        let first = factory.statement(factory.none_value(), false).unwrap();
        let second = factory.statement(factory.boolean_value(true), true).unwrap();
        let method = factory
            .method(Arc::clone(&sig), vec![Arc::clone(&first), Arc::clone(&second)])
            .unwrap();

        let mut contexts = ContextStore::new();
        inject_relatives(&method, &mut contexts);

        let root = contexts.require::<Relatives>(method.id()).unwrap();
        assert!(root.parent().is_none());
        let ret_relatives = contexts.require::<Relatives>(ret.id()).unwrap();
        assert_eq!(ret_relatives.parent().unwrap().node().id(), sig.id());

        let first_relatives = contexts.require::<Relatives>(first.id()).unwrap();
        let next = first_relatives.next_sibling(&StatementsExtractor, &contexts).unwrap().unwrap();
        assert_eq!(next.node().id(), second.id());
        assert_eq!(root.children(&ChildrenExtractor, &contexts).unwrap().len(), 3);
    }
}

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use super::relatives_injection::inject_relatives;
use crate::ir::compilation_unit::CompilationUnit;
use crate::ir::context::ContextStore;
use crate::ir::errors::PassError;
use crate::ir::node_id::NodeId;
use crate::ir::pipeline::Pass;
use crate::ir::source_position::SourcePosition;
use crate::ir::thorium_node::*;
use crate::ir::visitor::{Visitor, flat_map};

/// Copies a tree while normalizing unions and intersections.
///
/// For each union (intersection), after its members have been normalized:
/// members of the same kind are inlined in place until none remain, duplicate
/// members are dropped keeping the first occurrence, and a wrapper left with a
/// single member is replaced by that member. The result carries the source
/// position of the node it replaces.
///
/// Every output node is new; it inherits all context entries of the input
/// node it was made from, and the input id maps to it in [`Self::into_rebuilt`].
pub struct TypeFlatteningVisitor<'a> {
    factory: &'a NodeFactory,
    contexts: Mutex<&'a mut ContextStore>,
    rebuilt: Mutex<FxHashMap<NodeId, Arc<ThoriumNode>>>,
}

impl<'a> TypeFlatteningVisitor<'a> {
    pub fn new(factory: &'a NodeFactory, contexts: &'a mut ContextStore) -> Self {
        TypeFlatteningVisitor {
            factory,
            contexts: Mutex::new(contexts),
            rebuilt: Mutex::new(FxHashMap::default()),
        }
    }

    /// Input node ids mapped to the nodes that replace them.
    pub fn into_rebuilt(self) -> FxHashMap<NodeId, Arc<ThoriumNode>> {
        self.rebuilt.into_inner()
    }

    fn record(&self, from: &Arc<ThoriumNode>, to: &Arc<ThoriumNode>) {
        self.rebuilt.lock().insert(from.id(), Arc::clone(to));
    }

    fn flatten(&self, node: &Arc<ThoriumNode>, list: &TypeSpecList) -> Arc<ThoriumNode> {
        let node_type = node.node_type();
        let mut worklist: VecDeque<Arc<ThoriumNode>> =
            list.types.iter().map(|member| self.visit_node(member)).collect();

        let mut members: Vec<Arc<ThoriumNode>> = Vec::with_capacity(worklist.len());
        while let Some(member) = worklist.pop_front() {
            match same_kind_members(&member, node_type) {
                Some(inner) => {
                    trace!("Inlining {} members of nested {}", inner.len(), node_type);
                    for nested in inner.iter().rev() {
                        worklist.push_front(Arc::clone(nested));
                    }
                }
                None => members.push(member),
            }
        }

        let mut unique: Vec<Arc<ThoriumNode>> = Vec::with_capacity(members.len());
        for member in members {
            if !unique.contains(&member) {
                unique.push(member);
            }
        }

        if unique.len() == 1 {
            if let Some(single) = unique.pop() {
                trace!("Collapsing {} {} to its only member", node_type, node.id());
                self.move_position(node, &single);
                self.record(node, &single);
                return single;
            }
        }

        let types = unique.into_iter().collect::<NodeVector>();
        let kind = match node_type {
            NodeType::TypeSpecUnion => NodeKind::TypeSpecUnion(TypeSpecList { types }),
            _ => NodeKind::TypeSpecIntersection(TypeSpecList { types }),
        };
        let flattened = self.factory.mint(kind);
        self.contexts.lock().copy_all(node.id(), flattened.id());
        self.record(node, &flattened);
        flattened
    }

    /// Gives `to` the source position of `from`, or none if `from` has none.
    fn move_position(&self, from: &Arc<ThoriumNode>, to: &Arc<ThoriumNode>) {
        let mut contexts = self.contexts.lock();
        match contexts.get::<SourcePosition>(from.id()) {
            Some(position) => {
                contexts.put_arc(to.id(), position);
            }
            None => {
                contexts.remove::<SourcePosition>(to.id());
            }
        }
    }
}

fn same_kind_members(node: &Arc<ThoriumNode>, node_type: NodeType) -> Option<NodeVector> {
    match (node.kind(), node_type) {
        (NodeKind::TypeSpecUnion(list), NodeType::TypeSpecUnion)
        | (NodeKind::TypeSpecIntersection(list), NodeType::TypeSpecIntersection) => Some(list.types.clone()),
        _ => None,
    }
}

impl Visitor for TypeFlatteningVisitor<'_> {
    type Output = Arc<ThoriumNode>;

    fn visit_default(&self, node: &Arc<ThoriumNode>) -> Arc<ThoriumNode> {
        let kind = node.kind().map_children(|child| self.visit_node(child));
        let copy = self.factory.mint(kind);
        self.contexts.lock().copy_all(node.id(), copy.id());
        self.record(node, &copy);
        copy
    }

    fn visit_type_spec_union(&self, node: &Arc<ThoriumNode>, list: &TypeSpecList) -> Arc<ThoriumNode> {
        self.flatten(node, list)
    }

    fn visit_type_spec_intersection(&self, node: &Arc<ThoriumNode>, list: &TypeSpecList) -> Arc<ThoriumNode> {
        self.flatten(node, list)
    }
}

/// Returns the normalized copy of `node`.
pub fn flatten_types(
    node: &Arc<ThoriumNode>,
    factory: &NodeFactory,
    contexts: &mut ContextStore,
) -> Arc<ThoriumNode> {
    node.accept(&TypeFlatteningVisitor::new(factory, contexts))
}

/// Replaces the unit's tree with its normalized copy.
///
/// Symbols of the unit's scopes are rebound to the rebuilt declarations,
/// contexts of nodes no longer in the tree are dropped and relatives are
/// injected again so that they describe the new tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeFlatteningPass;

impl Pass for TypeFlatteningPass {
    fn run(&self, unit: &mut CompilationUnit) -> Result<(), PassError> {
        let before = unit.factory.minted();
        let visitor = TypeFlatteningVisitor::new(&unit.factory, &mut unit.contexts);
        let root = unit.root.accept(&visitor);
        let rebuilt = visitor.into_rebuilt();

        if let Some(global) = &unit.global_scope {
            let rebound = global.rebind(&|node: &Arc<ThoriumNode>| rebuilt.get(&node.id()).cloned());
            trace!("Rebound {} symbols to rebuilt declarations", rebound);
        }

        let reachable: FxHashSet<_> = flat_map(&root, |node| vec![node.id()]).collect();
        unit.contexts.retain(|id| reachable.contains(&id));
        inject_relatives(&root, &mut unit.contexts);

        debug!(
            "Flattened types: {} nodes rebuilt, {} in the new tree",
            unit.factory.minted() - before,
            reachable.len()
        );
        unit.root = root;
        Ok(())
    }
}

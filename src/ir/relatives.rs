//! Parent, child and sibling navigation.
//!
//! [`Relatives`] links a node to its parent's `Relatives`; it is attached to
//! every node by
//! [`RelativesInjectionVisitor`](crate::ir::transforms::relatives_injection::RelativesInjectionVisitor).
//! Links only point upwards, so the structure never forms a cycle.
//!
//! Navigation is parametrized by a child extractor, a visitor returning the
//! children of interest of a node (all of them, only methods, only
//! statements, ...). Results are looked up in the [`ContextStore`] so that
//! callers get the very `Relatives` values attached to the children.

use std::sync::Arc;

use crate::ir::context::ContextStore;
use crate::ir::errors::ContextError;
use crate::ir::thorium_node::*;
use crate::ir::visitor::Visitor;

/// A node together with its parent's relatives, `None` for the tree root.
#[derive(Debug, Clone)]
pub struct Relatives {
    node: Arc<ThoriumNode>,
    parent: Option<Arc<Relatives>>,
}

/// Relatives compare by node identity, up the whole parent chain.
impl PartialEq for Relatives {
    fn eq(&self, other: &Self) -> bool {
        self.node.id() == other.node.id()
            && match (&self.parent, &other.parent) {
                (Some(a), Some(b)) => a == b,
                (None, None) => true,
                _ => false,
            }
    }
}

impl Eq for Relatives {}

impl Relatives {
    pub fn new(node: Arc<ThoriumNode>, parent: Option<Arc<Relatives>>) -> Self {
        Relatives { node, parent }
    }

    pub fn node(&self) -> &Arc<ThoriumNode> {
        &self.node
    }

    pub fn parent(&self) -> Option<&Arc<Relatives>> {
        self.parent.as_ref()
    }

    /// Relatives of the children `extractor` selects from this node.
    pub fn children<V>(&self, extractor: &V, contexts: &ContextStore) -> Result<Vec<Arc<Relatives>>, ContextError>
    where
        V: Visitor<Output = Vec<Arc<ThoriumNode>>>,
    {
        self.node
            .accept(extractor)
            .iter()
            .map(|child| contexts.require::<Relatives>(child.id()))
            .collect()
    }

    /// This node's generation, itself included; empty for the root.
    pub fn siblings<V>(&self, extractor: &V, contexts: &ContextStore) -> Result<Vec<Arc<Relatives>>, ContextError>
    where
        V: Visitor<Output = Vec<Arc<ThoriumNode>>>,
    {
        match &self.parent {
            Some(parent) => parent.children(extractor, contexts),
            None => Ok(Vec::new()),
        }
    }

    /// Sibling at zero-based `index` of the extracted list.
    pub fn sibling<V>(
        &self,
        index: usize,
        extractor: &V,
        contexts: &ContextStore,
    ) -> Result<Option<Arc<Relatives>>, ContextError>
    where
        V: Visitor<Output = Vec<Arc<ThoriumNode>>>,
    {
        Ok(self.siblings(extractor, contexts)?.get(index).cloned())
    }

    /// Sibling `offset` places after (or, when negative, before) this node.
    ///
    /// `None` when this node is not among the extracted siblings or when the
    /// target falls outside the list.
    pub fn sibling_at_offset<V>(
        &self,
        offset: isize,
        extractor: &V,
        contexts: &ContextStore,
    ) -> Result<Option<Arc<Relatives>>, ContextError>
    where
        V: Visitor<Output = Vec<Arc<ThoriumNode>>>,
    {
        let siblings = self.siblings(extractor, contexts)?;
        let id = self.node.id();
        let target = siblings
            .iter()
            .position(|sibling| sibling.node.id() == id)
            .and_then(|own| own.checked_add_signed(offset));
        Ok(target.and_then(|index| siblings.get(index).cloned()))
    }

    pub fn next_sibling<V>(&self, extractor: &V, contexts: &ContextStore) -> Result<Option<Arc<Relatives>>, ContextError>
    where
        V: Visitor<Output = Vec<Arc<ThoriumNode>>>,
    {
        self.sibling_at_offset(1, extractor, contexts)
    }

    pub fn previous_sibling<V>(
        &self,
        extractor: &V,
        contexts: &ContextStore,
    ) -> Result<Option<Arc<Relatives>>, ContextError>
    where
        V: Visitor<Output = Vec<Arc<ThoriumNode>>>,
    {
        self.sibling_at_offset(-1, extractor, contexts)
    }

    /// Closest ancestor (this node excluded) of the given type.
    pub fn ancestor(&self, node_type: NodeType) -> Option<Arc<Relatives>> {
        let mut current = self.parent.clone();
        while let Some(relatives) = current {
            if relatives.node.node_type() == node_type {
                return Some(relatives);
            }
            current = relatives.parent.clone();
        }
        None
    }
}

/// All direct children, in canonical order.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChildrenExtractor;

impl Visitor for ChildrenExtractor {
    type Output = Vec<Arc<ThoriumNode>>;

    fn visit_default(&self, node: &Arc<ThoriumNode>) -> Self::Output {
        node.children()
    }
}

/// Methods of a `Type` (signatures) or a `Class`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MethodsExtractor;

impl Visitor for MethodsExtractor {
    type Output = Vec<Arc<ThoriumNode>>;

    fn visit_default(&self, _node: &Arc<ThoriumNode>) -> Self::Output {
        Vec::new()
    }

    fn visit_type(&self, _node: &Arc<ThoriumNode>, decl: &TypeDecl) -> Self::Output {
        decl.methods.iter().cloned().collect()
    }

    fn visit_class(&self, _node: &Arc<ThoriumNode>, decl: &ClassDecl) -> Self::Output {
        decl.methods.iter().cloned().collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AttributesExtractor;

impl Visitor for AttributesExtractor {
    type Output = Vec<Arc<ThoriumNode>>;

    fn visit_default(&self, _node: &Arc<ThoriumNode>) -> Self::Output {
        Vec::new()
    }

    fn visit_class(&self, _node: &Arc<ThoriumNode>, decl: &ClassDecl) -> Self::Output {
        decl.attributes.iter().cloned().collect()
    }
}

/// Statements of a `Method` or a `FunctionValue` body.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatementsExtractor;

impl Visitor for StatementsExtractor {
    type Output = Vec<Arc<ThoriumNode>>;

    fn visit_default(&self, _node: &Arc<ThoriumNode>) -> Self::Output {
        Vec::new()
    }

    fn visit_method(&self, _node: &Arc<ThoriumNode>, method: &Method) -> Self::Output {
        method.statements.iter().cloned().collect()
    }

    fn visit_function_value(&self, _node: &Arc<ThoriumNode>, value: &FunctionValue) -> Self::Output {
        value.statements.iter().cloned().collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ParametersExtractor;

impl Visitor for ParametersExtractor {
    type Output = Vec<Arc<ThoriumNode>>;

    fn visit_default(&self, _node: &Arc<ThoriumNode>) -> Self::Output {
        Vec::new()
    }

    fn visit_method_signature(&self, _node: &Arc<ThoriumNode>, sig: &MethodSignature) -> Self::Output {
        sig.parameters.iter().cloned().collect()
    }

    fn visit_function_value(&self, _node: &Arc<ThoriumNode>, value: &FunctionValue) -> Self::Output {
        value.parameters.iter().cloned().collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TypeParametersExtractor;

impl Visitor for TypeParametersExtractor {
    type Output = Vec<Arc<ThoriumNode>>;

    fn visit_default(&self, _node: &Arc<ThoriumNode>) -> Self::Output {
        Vec::new()
    }

    fn visit_type(&self, _node: &Arc<ThoriumNode>, decl: &TypeDecl) -> Self::Output {
        decl.type_parameters.iter().cloned().collect()
    }

    fn visit_class(&self, _node: &Arc<ThoriumNode>, decl: &ClassDecl) -> Self::Output {
        decl.type_parameters.iter().cloned().collect()
    }

    fn visit_method_signature(&self, _node: &Arc<ThoriumNode>, sig: &MethodSignature) -> Self::Output {
        sig.type_parameters.iter().cloned().collect()
    }

    fn visit_function_value(&self, _node: &Arc<ThoriumNode>, value: &FunctionValue) -> Self::Output {
        value.type_parameters.iter().cloned().collect()
    }
}

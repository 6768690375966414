//! Validated construction of AST nodes.
//!
//! [`NodeFactory`] is the only way to obtain a [`ThoriumNode`] outside this
//! crate. Every constructor checks required text fields and the kinds of the
//! children placed in each slot before an id is minted, so an invalid node is
//! never partially built.

use std::sync::Arc;

use archery::ArcK;
use rpds::Vector;
use tracing::trace;

use super::node_types::*;
use crate::ir::errors::ConstructionError;
use crate::ir::node_id::{NodeId, NodeIdGenerator};

type Nodes = Vec<Arc<ThoriumNode>>;

/// Builds the nodes of one compilation unit and owns its id generator.
#[derive(Debug, Default)]
pub struct NodeFactory {
    ids: NodeIdGenerator,
}

impl NodeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes minted so far.
    pub fn minted(&self) -> u64 {
        self.ids.minted()
    }

    pub fn next_id(&self) -> NodeId {
        self.ids.next_id()
    }

    /// Validates `kind` and wraps it in a node with a fresh id.
    pub fn build(&self, kind: NodeKind) -> Result<Arc<ThoriumNode>, ConstructionError> {
        validate(&kind)?;
        Ok(self.mint(kind))
    }

    /// Assigns a fresh id without validation; `kind` must come from valid nodes.
    pub(crate) fn mint(&self, kind: NodeKind) -> Arc<ThoriumNode> {
        let node = Arc::new(ThoriumNode::new(self.ids.next_id(), kind));
        trace!("Minted {} {}", node.node_type(), node.id());
        node
    }

    pub fn root(
        &self,
        namespace: impl Into<String>,
        uses: Nodes,
        top_level: Arc<ThoriumNode>,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::Root(Root {
            namespace: namespace.into(),
            uses: vector(uses),
            top_level,
        }))
    }

    /// `use a.b.c`, bound to its last path segment `c`.
    pub fn use_(&self, from: impl Into<String>) -> Result<Arc<ThoriumNode>, ConstructionError> {
        let from = from.into();
        let to = from.rsplit('.').next().unwrap_or_default().to_string();
        self.use_alias(from, to)
    }

    pub fn use_alias(
        &self,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::Use(Use { from: from.into(), to: to.into() }))
    }

    pub fn type_decl(
        &self,
        visibility: Visibility,
        name: impl Into<String>,
        type_parameters: Nodes,
        super_type: Arc<ThoriumNode>,
        methods: Nodes,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::Type(TypeDecl {
            visibility,
            name: name.into(),
            type_parameters: vector(type_parameters),
            super_type,
            methods: vector(methods),
        }))
    }

    pub fn class(
        &self,
        visibility: Visibility,
        name: impl Into<String>,
        type_parameters: Nodes,
        super_type: Arc<ThoriumNode>,
        methods: Nodes,
        attributes: Nodes,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::Class(ClassDecl {
            visibility,
            name: name.into(),
            type_parameters: vector(type_parameters),
            super_type,
            methods: vector(methods),
            attributes: vector(attributes),
        }))
    }

    pub fn method_signature(
        &self,
        visibility: Visibility,
        name: impl Into<String>,
        type_parameters: Nodes,
        parameters: Nodes,
        return_type: Arc<ThoriumNode>,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::MethodSignature(MethodSignature {
            visibility,
            name: name.into(),
            type_parameters: vector(type_parameters),
            parameters: vector(parameters),
            return_type,
        }))
    }

    pub fn method(
        &self,
        signature: Arc<ThoriumNode>,
        statements: Nodes,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::Method(Method { signature, statements: vector(statements) }))
    }

    pub fn parameter(
        &self,
        name: impl Into<String>,
        type_spec: Arc<ThoriumNode>,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::Parameter(Parameter { name: name.into(), type_spec }))
    }

    pub fn type_parameter(&self, name: impl Into<String>) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::TypeParameter(TypeParameter { name: name.into() }))
    }

    pub fn attribute(
        &self,
        name: impl Into<String>,
        type_spec: Arc<ThoriumNode>,
        value: Arc<ThoriumNode>,
        mode: Mode,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::Attribute(Attribute { name: name.into(), type_spec, value, mode }))
    }

    pub fn statement(&self, value: Arc<ThoriumNode>, last: bool) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::Statement(Statement { value, last }))
    }

    pub fn type_spec_simple(
        &self,
        type_name: impl Into<String>,
        arguments: Nodes,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::TypeSpecSimple(TypeSpecSimple {
            type_name: type_name.into(),
            arguments: vector(arguments),
        }))
    }

    pub fn type_spec_union(&self, types: Nodes) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::TypeSpecUnion(TypeSpecList { types: vector(types) }))
    }

    pub fn type_spec_intersection(&self, types: Nodes) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::TypeSpecIntersection(TypeSpecList { types: vector(types) }))
    }

    pub fn type_spec_function(
        &self,
        arguments: Nodes,
        return_type: Arc<ThoriumNode>,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::TypeSpecFunction(TypeSpecFunction {
            arguments: vector(arguments),
            return_type,
        }))
    }

    pub fn type_spec_inferred(&self) -> Arc<ThoriumNode> {
        self.mint(NodeKind::TypeSpecInferred)
    }

    pub fn string_value(&self, value: impl Into<String>) -> Arc<ThoriumNode> {
        self.mint(NodeKind::StringValue(value.into()))
    }

    /// Numbers keep their decimal source text.
    pub fn number_value(&self, text: impl Into<String>) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::NumberValue(text.into()))
    }

    pub fn boolean_value(&self, value: bool) -> Arc<ThoriumNode> {
        self.mint(NodeKind::BooleanValue(value))
    }

    pub fn none_value(&self) -> Arc<ThoriumNode> {
        self.mint(NodeKind::NoneValue)
    }

    pub fn reference(
        &self,
        name: impl Into<String>,
        allow_forward_reference: bool,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::Reference(Reference { name: name.into(), allow_forward_reference }))
    }

    pub fn identifier_value(&self, reference: Arc<ThoriumNode>) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::IdentifierValue(IdentifierValue { reference }))
    }

    /// Shorthand for an identifier wrapping a plain (non call-site) reference.
    pub fn identifier(&self, name: impl Into<String>) -> Result<Arc<ThoriumNode>, ConstructionError> {
        let reference = self.reference(name, false)?;
        self.identifier_value(reference)
    }

    pub fn new_assignment_value(
        &self,
        mode: Mode,
        name: impl Into<String>,
        type_spec: Arc<ThoriumNode>,
        value: Arc<ThoriumNode>,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::NewAssignmentValue(NewAssignmentValue {
            mode,
            name: name.into(),
            type_spec,
            value,
        }))
    }

    pub fn direct_assignment_value(
        &self,
        reference: Arc<ThoriumNode>,
        value: Arc<ThoriumNode>,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::DirectAssignmentValue(DirectAssignmentValue { reference, value }))
    }

    pub fn indirect_assignment_value(
        &self,
        indirect_value: Arc<ThoriumNode>,
        reference: Arc<ThoriumNode>,
        value: Arc<ThoriumNode>,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::IndirectAssignmentValue(IndirectAssignmentValue {
            indirect_value,
            reference,
            value,
        }))
    }

    pub fn method_call_value(
        &self,
        method_reference: Arc<ThoriumNode>,
        type_arguments: Nodes,
        method_arguments: Nodes,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::MethodCallValue(MethodCallValue {
            method_reference,
            type_arguments: vector(type_arguments),
            method_arguments: vector(method_arguments),
        }))
    }

    pub fn nested_value(
        &self,
        outer: Arc<ThoriumNode>,
        inner: Arc<ThoriumNode>,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::NestedValue(NestedValue { outer, inner }))
    }

    pub fn function_value(
        &self,
        type_parameters: Nodes,
        parameters: Nodes,
        return_type: Arc<ThoriumNode>,
        statements: Nodes,
    ) -> Result<Arc<ThoriumNode>, ConstructionError> {
        self.build(NodeKind::FunctionValue(FunctionValue {
            type_parameters: vector(type_parameters),
            parameters: vector(parameters),
            return_type,
            statements: vector(statements),
        }))
    }
}

fn vector(nodes: Nodes) -> NodeVector {
    nodes.into_iter().collect::<Vector<_, ArcK>>()
}

const TOP_LEVEL: &str = "Type or Class";
const TYPE_SPEC: &str = "type spec";
const VALUE: &str = "value";

struct Checker {
    node: NodeType,
}

impl Checker {
    fn text(&self, field: &'static str, value: &str) -> Result<(), ConstructionError> {
        if value.is_empty() {
            return Err(ConstructionError::EmptyField { node: self.node, field });
        }
        Ok(())
    }

    fn child(
        &self,
        field: &'static str,
        child: &Arc<ThoriumNode>,
        expected: &'static str,
        admissible: impl Fn(NodeType) -> bool,
    ) -> Result<(), ConstructionError> {
        let found = child.node_type();
        if admissible(found) {
            Ok(())
        } else {
            Err(ConstructionError::UnexpectedKind { node: self.node, field, expected, found })
        }
    }

    fn children(
        &self,
        field: &'static str,
        children: &NodeVector,
        expected: &'static str,
        admissible: impl Fn(NodeType) -> bool,
    ) -> Result<(), ConstructionError> {
        children
            .iter()
            .try_for_each(|child| self.child(field, child, expected, &admissible))
    }

    fn non_empty(&self, field: &'static str, children: &NodeVector) -> Result<(), ConstructionError> {
        if children.is_empty() {
            return Err(ConstructionError::EmptyField { node: self.node, field });
        }
        Ok(())
    }

    fn type_spec(&self, field: &'static str, child: &Arc<ThoriumNode>) -> Result<(), ConstructionError> {
        self.child(field, child, TYPE_SPEC, NodeType::is_type_spec)
    }

    fn type_specs(&self, field: &'static str, children: &NodeVector) -> Result<(), ConstructionError> {
        self.children(field, children, TYPE_SPEC, NodeType::is_type_spec)
    }

    fn value(&self, field: &'static str, child: &Arc<ThoriumNode>) -> Result<(), ConstructionError> {
        self.child(field, child, VALUE, NodeType::is_value)
    }

    fn of(&self, field: &'static str, child: &Arc<ThoriumNode>, kind: NodeType) -> Result<(), ConstructionError> {
        self.child(field, child, type_label(kind), |found| found == kind)
    }

    fn all_of(&self, field: &'static str, children: &NodeVector, kind: NodeType) -> Result<(), ConstructionError> {
        self.children(field, children, type_label(kind), |found| found == kind)
    }
}

fn type_label(kind: NodeType) -> &'static str {
    match kind {
        NodeType::Use => "Use",
        NodeType::MethodSignature => "MethodSignature",
        NodeType::Method => "Method",
        NodeType::Parameter => "Parameter",
        NodeType::TypeParameter => "TypeParameter",
        NodeType::Attribute => "Attribute",
        NodeType::Statement => "Statement",
        NodeType::Reference => "Reference",
        _ => "node",
    }
}

/// Checks the invariants of a node about to be built.
pub fn validate(kind: &NodeKind) -> Result<(), ConstructionError> {
    let check = Checker { node: kind.node_type() };
    match kind {
        NodeKind::Root(root) => {
            check.text("namespace", &root.namespace)?;
            check.all_of("uses", &root.uses, NodeType::Use)?;
            check.child("top_level", &root.top_level, TOP_LEVEL, NodeType::is_top_level)
        }
        NodeKind::Use(use_) => {
            check.text("from", &use_.from)?;
            check.text("to", &use_.to)
        }
        NodeKind::Type(decl) => {
            check.text("name", &decl.name)?;
            check.all_of("type_parameters", &decl.type_parameters, NodeType::TypeParameter)?;
            check.type_spec("super_type", &decl.super_type)?;
            check.all_of("methods", &decl.methods, NodeType::MethodSignature)
        }
        NodeKind::Class(decl) => {
            check.text("name", &decl.name)?;
            check.all_of("type_parameters", &decl.type_parameters, NodeType::TypeParameter)?;
            check.type_spec("super_type", &decl.super_type)?;
            check.all_of("methods", &decl.methods, NodeType::Method)?;
            check.all_of("attributes", &decl.attributes, NodeType::Attribute)
        }
        NodeKind::MethodSignature(sig) => {
            check.text("name", &sig.name)?;
            check.all_of("type_parameters", &sig.type_parameters, NodeType::TypeParameter)?;
            check.all_of("parameters", &sig.parameters, NodeType::Parameter)?;
            check.type_spec("return_type", &sig.return_type)
        }
        NodeKind::Method(method) => {
            check.of("signature", &method.signature, NodeType::MethodSignature)?;
            check.all_of("statements", &method.statements, NodeType::Statement)
        }
        NodeKind::Parameter(param) => {
            check.text("name", &param.name)?;
            check.type_spec("type_spec", &param.type_spec)
        }
        NodeKind::TypeParameter(param) => check.text("name", &param.name),
        NodeKind::Attribute(attr) => {
            check.text("name", &attr.name)?;
            check.type_spec("type_spec", &attr.type_spec)?;
            check.value("value", &attr.value)
        }
        NodeKind::Statement(stmt) => check.value("value", &stmt.value),
        NodeKind::TypeSpecSimple(spec) => {
            check.text("type_name", &spec.type_name)?;
            check.type_specs("arguments", &spec.arguments)
        }
        NodeKind::TypeSpecUnion(list) | NodeKind::TypeSpecIntersection(list) => {
            check.non_empty("types", &list.types)?;
            check.type_specs("types", &list.types)
        }
        NodeKind::TypeSpecFunction(spec) => {
            check.type_specs("arguments", &spec.arguments)?;
            check.type_spec("return_type", &spec.return_type)
        }
        NodeKind::NumberValue(text) => check.text("value", text),
        NodeKind::IdentifierValue(value) => check.of("reference", &value.reference, NodeType::Reference),
        NodeKind::NewAssignmentValue(value) => {
            check.text("name", &value.name)?;
            check.type_spec("type_spec", &value.type_spec)?;
            check.value("value", &value.value)
        }
        NodeKind::DirectAssignmentValue(value) => {
            check.of("reference", &value.reference, NodeType::Reference)?;
            check.value("value", &value.value)
        }
        NodeKind::IndirectAssignmentValue(value) => {
            check.value("indirect_value", &value.indirect_value)?;
            check.of("reference", &value.reference, NodeType::Reference)?;
            check.value("value", &value.value)
        }
        NodeKind::MethodCallValue(value) => {
            check.of("method_reference", &value.method_reference, NodeType::Reference)?;
            check.type_specs("type_arguments", &value.type_arguments)?;
            check.children("method_arguments", &value.method_arguments, VALUE, NodeType::is_value)
        }
        NodeKind::NestedValue(value) => {
            check.value("outer", &value.outer)?;
            check.value("inner", &value.inner)
        }
        NodeKind::FunctionValue(value) => {
            check.all_of("type_parameters", &value.type_parameters, NodeType::TypeParameter)?;
            check.all_of("parameters", &value.parameters, NodeType::Parameter)?;
            check.type_spec("return_type", &value.return_type)?;
            check.all_of("statements", &value.statements, NodeType::Statement)
        }
        NodeKind::Reference(reference) => check.text("name", &reference.name),
        NodeKind::TypeSpecInferred
        | NodeKind::StringValue(_)
        | NodeKind::BooleanValue(_)
        | NodeKind::NoneValue => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_derives_alias_from_last_segment() {
        let factory = NodeFactory::new();
        let use_ = factory.use_("org.thorium.Collections").unwrap();
        match use_.kind() {
            NodeKind::Use(u) => {
                assert_eq!(u.from, "org.thorium.Collections");
                assert_eq!(u.to, "Collections");
            }
            other => panic!("unexpected kind {:?}", other.node_type()),
        }
        assert_eq!(
            factory.use_("org.").unwrap_err(),
            ConstructionError::EmptyField { node: NodeType::Use, field: "to" }
        );
    }

    #[test]
    fn test_empty_name_names_the_field() {
        let factory = NodeFactory::new();
        let error = factory.type_parameter("").unwrap_err();
        assert_eq!(error, ConstructionError::EmptyField { node: NodeType::TypeParameter, field: "name" });
        assert_eq!(error.to_string(), "TypeParameter: name cannot be empty");
    }

    #[test]
    fn test_rejects_child_of_wrong_kind() {
        let factory = NodeFactory::new();
        let not_a_type = factory.string_value("x");
        let error = factory.parameter("p", not_a_type).unwrap_err();
        assert_eq!(
            error,
            ConstructionError::UnexpectedKind {
                node: NodeType::Parameter,
                field: "type_spec",
                expected: "type spec",
                found: NodeType::StringValue,
            }
        );
    }

    #[test]
    fn test_root_requires_type_or_class() {
        let factory = NodeFactory::new();
        let error = factory.root("ns", vec![], factory.none_value()).unwrap_err();
        assert!(matches!(error, ConstructionError::UnexpectedKind { field: "top_level", .. }));
    }

    #[test]
    fn test_type_methods_must_be_signatures() {
        let factory = NodeFactory::new();
        let sig = factory
            .method_signature(Visibility::Public, "m", vec![], vec![], factory.type_spec_inferred())
            .unwrap();
        let method = factory.method(sig, vec![]).unwrap();
        let error = factory
            .type_decl(Visibility::Public, "T", vec![], factory.type_spec_inferred(), vec![method])
            .unwrap_err();
        assert!(matches!(
            error,
            ConstructionError::UnexpectedKind { field: "methods", found: NodeType::Method, .. }
        ));
    }

    #[test]
    fn test_union_requires_members() {
        let factory = NodeFactory::new();
        assert_eq!(
            factory.type_spec_union(vec![]).unwrap_err(),
            ConstructionError::EmptyField { node: NodeType::TypeSpecUnion, field: "types" }
        );
    }

    #[test]
    fn test_failed_construction_mints_no_id() {
        let factory = NodeFactory::new();
        let before = factory.minted();
        assert!(factory.number_value("").is_err());
        assert_eq!(factory.minted(), before);
        assert!(factory.number_value("3.14").is_ok());
        assert_eq!(factory.minted(), before + 1);
    }
}

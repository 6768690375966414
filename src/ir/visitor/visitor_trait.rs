use std::sync::Arc;

use crate::ir::thorium_node::*;

/// A per-kind operation over the AST.
///
/// `visit_node` performs the dispatch: it matches the node's kind and calls
/// the `visit_*` method for that kind with the node and its payload. Every
/// per-kind method defaults to [`Visitor::visit_default`], the only method an
/// implementation has to provide, so visitors override just the kinds they
/// care about.
///
/// Methods take `&self`; visitors that accumulate state keep it behind
/// interior mutability.
pub trait Visitor {
    type Output;

    fn visit_node(&self, node: &Arc<ThoriumNode>) -> Self::Output {
        match node.kind() {
            NodeKind::Root(root) => self.visit_root(node, root),
            NodeKind::Use(use_) => self.visit_use(node, use_),
            NodeKind::Type(decl) => self.visit_type(node, decl),
            NodeKind::Class(decl) => self.visit_class(node, decl),
            NodeKind::MethodSignature(sig) => self.visit_method_signature(node, sig),
            NodeKind::Method(method) => self.visit_method(node, method),
            NodeKind::Parameter(param) => self.visit_parameter(node, param),
            NodeKind::TypeParameter(param) => self.visit_type_parameter(node, param),
            NodeKind::Attribute(attr) => self.visit_attribute(node, attr),
            NodeKind::Statement(stmt) => self.visit_statement(node, stmt),
            NodeKind::TypeSpecSimple(spec) => self.visit_type_spec_simple(node, spec),
            NodeKind::TypeSpecUnion(list) => self.visit_type_spec_union(node, list),
            NodeKind::TypeSpecIntersection(list) => self.visit_type_spec_intersection(node, list),
            NodeKind::TypeSpecFunction(spec) => self.visit_type_spec_function(node, spec),
            NodeKind::TypeSpecInferred => self.visit_type_spec_inferred(node),
            NodeKind::StringValue(value) => self.visit_string_value(node, value),
            NodeKind::NumberValue(text) => self.visit_number_value(node, text),
            NodeKind::BooleanValue(value) => self.visit_boolean_value(node, *value),
            NodeKind::NoneValue => self.visit_none_value(node),
            NodeKind::IdentifierValue(value) => self.visit_identifier_value(node, value),
            NodeKind::NewAssignmentValue(value) => self.visit_new_assignment_value(node, value),
            NodeKind::DirectAssignmentValue(value) => self.visit_direct_assignment_value(node, value),
            NodeKind::IndirectAssignmentValue(value) => self.visit_indirect_assignment_value(node, value),
            NodeKind::MethodCallValue(value) => self.visit_method_call_value(node, value),
            NodeKind::NestedValue(value) => self.visit_nested_value(node, value),
            NodeKind::FunctionValue(value) => self.visit_function_value(node, value),
            NodeKind::Reference(reference) => self.visit_reference(node, reference),
        }
    }

    /// Fallback for every kind whose method is not overridden.
    fn visit_default(&self, node: &Arc<ThoriumNode>) -> Self::Output;

    fn visit_root(&self, node: &Arc<ThoriumNode>, _root: &Root) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_use(&self, node: &Arc<ThoriumNode>, _use: &Use) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_type(&self, node: &Arc<ThoriumNode>, _decl: &TypeDecl) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_class(&self, node: &Arc<ThoriumNode>, _decl: &ClassDecl) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_method_signature(&self, node: &Arc<ThoriumNode>, _sig: &MethodSignature) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_method(&self, node: &Arc<ThoriumNode>, _method: &Method) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_parameter(&self, node: &Arc<ThoriumNode>, _param: &Parameter) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_type_parameter(&self, node: &Arc<ThoriumNode>, _param: &TypeParameter) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_attribute(&self, node: &Arc<ThoriumNode>, _attr: &Attribute) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_statement(&self, node: &Arc<ThoriumNode>, _stmt: &Statement) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_type_spec_simple(&self, node: &Arc<ThoriumNode>, _spec: &TypeSpecSimple) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_type_spec_union(&self, node: &Arc<ThoriumNode>, _list: &TypeSpecList) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_type_spec_intersection(&self, node: &Arc<ThoriumNode>, _list: &TypeSpecList) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_type_spec_function(&self, node: &Arc<ThoriumNode>, _spec: &TypeSpecFunction) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_type_spec_inferred(&self, node: &Arc<ThoriumNode>) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_string_value(&self, node: &Arc<ThoriumNode>, _value: &str) -> Self::Output {
        self.visit_default(node)
    }

    /// `text` is the verbatim decimal source text.
    fn visit_number_value(&self, node: &Arc<ThoriumNode>, _text: &str) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_boolean_value(&self, node: &Arc<ThoriumNode>, _value: bool) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_none_value(&self, node: &Arc<ThoriumNode>) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_identifier_value(&self, node: &Arc<ThoriumNode>, _value: &IdentifierValue) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_new_assignment_value(&self, node: &Arc<ThoriumNode>, _value: &NewAssignmentValue) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_direct_assignment_value(
        &self,
        node: &Arc<ThoriumNode>,
        _value: &DirectAssignmentValue,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_indirect_assignment_value(
        &self,
        node: &Arc<ThoriumNode>,
        _value: &IndirectAssignmentValue,
    ) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_method_call_value(&self, node: &Arc<ThoriumNode>, _value: &MethodCallValue) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_nested_value(&self, node: &Arc<ThoriumNode>, _value: &NestedValue) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_function_value(&self, node: &Arc<ThoriumNode>, _value: &FunctionValue) -> Self::Output {
        self.visit_default(node)
    }

    fn visit_reference(&self, node: &Arc<ThoriumNode>, _reference: &Reference) -> Self::Output {
        self.visit_default(node)
    }
}

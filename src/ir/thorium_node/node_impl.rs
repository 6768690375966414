use std::fmt;
use std::sync::Arc;

use archery::ArcK;
use rpds::Vector;

use super::node_types::*;
use crate::ir::node_id::NodeId;
use crate::ir::visitor::Visitor;

impl ThoriumNode {
    pub(crate) fn new(id: NodeId, kind: NodeKind) -> Self {
        ThoriumNode { id, kind }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Dispatches to the visitor method matching this node's kind.
    pub fn accept<V: Visitor + ?Sized>(self: &Arc<Self>, visitor: &V) -> V::Output {
        visitor.visit_node(self)
    }

    /// Direct children in canonical declaration order.
    pub fn children(&self) -> Vec<Arc<ThoriumNode>> {
        self.kind.children()
    }

    /// Declared name of the node, for the kinds that carry one.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Root(root) => Some(&root.namespace),
            NodeKind::Use(use_) => Some(&use_.to),
            NodeKind::Type(decl) => Some(&decl.name),
            NodeKind::Class(decl) => Some(&decl.name),
            NodeKind::MethodSignature(sig) => Some(&sig.name),
            NodeKind::Method(method) => method.signature.name(),
            NodeKind::Parameter(param) => Some(&param.name),
            NodeKind::TypeParameter(param) => Some(&param.name),
            NodeKind::Attribute(attr) => Some(&attr.name),
            NodeKind::TypeSpecSimple(spec) => Some(&spec.type_name),
            NodeKind::NewAssignmentValue(value) => Some(&value.name),
            NodeKind::Reference(reference) => Some(&reference.name),
            _ => None,
        }
    }
}

impl PartialEq for ThoriumNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for ThoriumNode {}

impl MethodSignature {
    /// `name(T1,T2)`: distinguishes overloads sharing a name.
    pub fn overload_key(&self) -> String {
        let types: Vec<String> = self
            .parameters
            .iter()
            .map(|param| match &param.kind {
                NodeKind::Parameter(p) => p.type_spec.to_string(),
                _ => param.to_string(),
            })
            .collect();
        format!("{}({})", self.name, types.join(","))
    }
}

fn map_vector<F>(nodes: &NodeVector, f: &mut F) -> NodeVector
where
    F: FnMut(&Arc<ThoriumNode>) -> Arc<ThoriumNode>,
{
    nodes.iter().map(|node| f(node)).collect::<Vector<_, ArcK>>()
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Root(_) => NodeType::Root,
            NodeKind::Use(_) => NodeType::Use,
            NodeKind::Type(_) => NodeType::Type,
            NodeKind::Class(_) => NodeType::Class,
            NodeKind::MethodSignature(_) => NodeType::MethodSignature,
            NodeKind::Method(_) => NodeType::Method,
            NodeKind::Parameter(_) => NodeType::Parameter,
            NodeKind::TypeParameter(_) => NodeType::TypeParameter,
            NodeKind::Attribute(_) => NodeType::Attribute,
            NodeKind::Statement(_) => NodeType::Statement,
            NodeKind::TypeSpecSimple(_) => NodeType::TypeSpecSimple,
            NodeKind::TypeSpecUnion(_) => NodeType::TypeSpecUnion,
            NodeKind::TypeSpecIntersection(_) => NodeType::TypeSpecIntersection,
            NodeKind::TypeSpecFunction(_) => NodeType::TypeSpecFunction,
            NodeKind::TypeSpecInferred => NodeType::TypeSpecInferred,
            NodeKind::StringValue(_) => NodeType::StringValue,
            NodeKind::NumberValue(_) => NodeType::NumberValue,
            NodeKind::BooleanValue(_) => NodeType::BooleanValue,
            NodeKind::NoneValue => NodeType::NoneValue,
            NodeKind::IdentifierValue(_) => NodeType::IdentifierValue,
            NodeKind::NewAssignmentValue(_) => NodeType::NewAssignmentValue,
            NodeKind::DirectAssignmentValue(_) => NodeType::DirectAssignmentValue,
            NodeKind::IndirectAssignmentValue(_) => NodeType::IndirectAssignmentValue,
            NodeKind::MethodCallValue(_) => NodeType::MethodCallValue,
            NodeKind::NestedValue(_) => NodeType::NestedValue,
            NodeKind::FunctionValue(_) => NodeType::FunctionValue,
            NodeKind::Reference(_) => NodeType::Reference,
        }
    }

    /// Direct children in canonical declaration order.
    pub fn children(&self) -> Vec<Arc<ThoriumNode>> {
        let mut out = Vec::new();
        self.for_each_child(|child| out.push(Arc::clone(child)));
        out
    }

    /// Calls `f` on every direct child, in canonical declaration order.
    pub fn for_each_child<F: FnMut(&Arc<ThoriumNode>)>(&self, mut f: F) {
        match self {
            NodeKind::Root(root) => {
                root.uses.iter().for_each(&mut f);
                f(&root.top_level);
            }
            NodeKind::Type(decl) => {
                decl.type_parameters.iter().for_each(&mut f);
                f(&decl.super_type);
                decl.methods.iter().for_each(&mut f);
            }
            NodeKind::Class(decl) => {
                decl.type_parameters.iter().for_each(&mut f);
                f(&decl.super_type);
                decl.methods.iter().for_each(&mut f);
                decl.attributes.iter().for_each(&mut f);
            }
            NodeKind::MethodSignature(sig) => {
                sig.type_parameters.iter().for_each(&mut f);
                sig.parameters.iter().for_each(&mut f);
                f(&sig.return_type);
            }
            NodeKind::Method(method) => {
                f(&method.signature);
                method.statements.iter().for_each(&mut f);
            }
            NodeKind::Parameter(param) => f(&param.type_spec),
            NodeKind::Attribute(attr) => {
                f(&attr.type_spec);
                f(&attr.value);
            }
            NodeKind::Statement(stmt) => f(&stmt.value),
            NodeKind::TypeSpecSimple(spec) => spec.arguments.iter().for_each(&mut f),
            NodeKind::TypeSpecUnion(list) | NodeKind::TypeSpecIntersection(list) => {
                list.types.iter().for_each(&mut f)
            }
            NodeKind::TypeSpecFunction(spec) => {
                spec.arguments.iter().for_each(&mut f);
                f(&spec.return_type);
            }
            NodeKind::IdentifierValue(value) => f(&value.reference),
            NodeKind::NewAssignmentValue(value) => {
                f(&value.type_spec);
                f(&value.value);
            }
            NodeKind::DirectAssignmentValue(value) => {
                f(&value.reference);
                f(&value.value);
            }
            NodeKind::IndirectAssignmentValue(value) => {
                f(&value.indirect_value);
                f(&value.reference);
                f(&value.value);
            }
            NodeKind::MethodCallValue(value) => {
                f(&value.method_reference);
                value.type_arguments.iter().for_each(&mut f);
                value.method_arguments.iter().for_each(&mut f);
            }
            NodeKind::NestedValue(value) => {
                f(&value.outer);
                f(&value.inner);
            }
            NodeKind::FunctionValue(value) => {
                value.type_parameters.iter().for_each(&mut f);
                value.parameters.iter().for_each(&mut f);
                f(&value.return_type);
                value.statements.iter().for_each(&mut f);
            }
            NodeKind::Use(_)
            | NodeKind::TypeParameter(_)
            | NodeKind::TypeSpecInferred
            | NodeKind::StringValue(_)
            | NodeKind::NumberValue(_)
            | NodeKind::BooleanValue(_)
            | NodeKind::NoneValue
            | NodeKind::Reference(_) => {}
        }
    }

    /// Rebuilds this kind with every direct child replaced by `f(child)`.
    ///
    /// `f` is called in canonical declaration order; scalar fields are cloned.
    pub fn map_children<F>(&self, mut f: F) -> NodeKind
    where
        F: FnMut(&Arc<ThoriumNode>) -> Arc<ThoriumNode>,
    {
        let f = &mut f;
        match self {
            NodeKind::Root(root) => NodeKind::Root(Root {
                namespace: root.namespace.clone(),
                uses: map_vector(&root.uses, f),
                top_level: f(&root.top_level),
            }),
            NodeKind::Type(decl) => NodeKind::Type(TypeDecl {
                visibility: decl.visibility,
                name: decl.name.clone(),
                type_parameters: map_vector(&decl.type_parameters, f),
                super_type: f(&decl.super_type),
                methods: map_vector(&decl.methods, f),
            }),
            NodeKind::Class(decl) => NodeKind::Class(ClassDecl {
                visibility: decl.visibility,
                name: decl.name.clone(),
                type_parameters: map_vector(&decl.type_parameters, f),
                super_type: f(&decl.super_type),
                methods: map_vector(&decl.methods, f),
                attributes: map_vector(&decl.attributes, f),
            }),
            NodeKind::MethodSignature(sig) => NodeKind::MethodSignature(MethodSignature {
                visibility: sig.visibility,
                name: sig.name.clone(),
                type_parameters: map_vector(&sig.type_parameters, f),
                parameters: map_vector(&sig.parameters, f),
                return_type: f(&sig.return_type),
            }),
            NodeKind::Method(method) => NodeKind::Method(Method {
                signature: f(&method.signature),
                statements: map_vector(&method.statements, f),
            }),
            NodeKind::Parameter(param) => NodeKind::Parameter(Parameter {
                name: param.name.clone(),
                type_spec: f(&param.type_spec),
            }),
            NodeKind::Attribute(attr) => NodeKind::Attribute(Attribute {
                name: attr.name.clone(),
                type_spec: f(&attr.type_spec),
                value: f(&attr.value),
                mode: attr.mode,
            }),
            NodeKind::Statement(stmt) => NodeKind::Statement(Statement {
                value: f(&stmt.value),
                last: stmt.last,
            }),
            NodeKind::TypeSpecSimple(spec) => NodeKind::TypeSpecSimple(TypeSpecSimple {
                type_name: spec.type_name.clone(),
                arguments: map_vector(&spec.arguments, f),
            }),
            NodeKind::TypeSpecUnion(list) => NodeKind::TypeSpecUnion(TypeSpecList {
                types: map_vector(&list.types, f),
            }),
            NodeKind::TypeSpecIntersection(list) => NodeKind::TypeSpecIntersection(TypeSpecList {
                types: map_vector(&list.types, f),
            }),
            NodeKind::TypeSpecFunction(spec) => NodeKind::TypeSpecFunction(TypeSpecFunction {
                arguments: map_vector(&spec.arguments, f),
                return_type: f(&spec.return_type),
            }),
            NodeKind::IdentifierValue(value) => NodeKind::IdentifierValue(IdentifierValue {
                reference: f(&value.reference),
            }),
            NodeKind::NewAssignmentValue(value) => NodeKind::NewAssignmentValue(NewAssignmentValue {
                mode: value.mode,
                name: value.name.clone(),
                type_spec: f(&value.type_spec),
                value: f(&value.value),
            }),
            NodeKind::DirectAssignmentValue(value) => {
                NodeKind::DirectAssignmentValue(DirectAssignmentValue {
                    reference: f(&value.reference),
                    value: f(&value.value),
                })
            }
            NodeKind::IndirectAssignmentValue(value) => {
                NodeKind::IndirectAssignmentValue(IndirectAssignmentValue {
                    indirect_value: f(&value.indirect_value),
                    reference: f(&value.reference),
                    value: f(&value.value),
                })
            }
            NodeKind::MethodCallValue(value) => NodeKind::MethodCallValue(MethodCallValue {
                method_reference: f(&value.method_reference),
                type_arguments: map_vector(&value.type_arguments, f),
                method_arguments: map_vector(&value.method_arguments, f),
            }),
            NodeKind::NestedValue(value) => NodeKind::NestedValue(NestedValue {
                outer: f(&value.outer),
                inner: f(&value.inner),
            }),
            NodeKind::FunctionValue(value) => NodeKind::FunctionValue(FunctionValue {
                type_parameters: map_vector(&value.type_parameters, f),
                parameters: map_vector(&value.parameters, f),
                return_type: f(&value.return_type),
                statements: map_vector(&value.statements, f),
            }),
            NodeKind::Use(_)
            | NodeKind::TypeParameter(_)
            | NodeKind::TypeSpecInferred
            | NodeKind::StringValue(_)
            | NodeKind::NumberValue(_)
            | NodeKind::BooleanValue(_)
            | NodeKind::NoneValue
            | NodeKind::Reference(_) => self.clone(),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, nodes: &NodeVector, separator: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", separator)?;
        }
        write!(f, "{}", node)?;
    }
    Ok(())
}

fn write_type_arguments(f: &mut fmt::Formatter<'_>, nodes: &NodeVector) -> fmt::Result {
    if !nodes.is_empty() {
        write!(f, "[")?;
        write_joined(f, nodes, ", ")?;
        write!(f, "]")?;
    }
    Ok(())
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.visibility, self.name)?;
        write_type_arguments(f, &self.type_parameters)?;
        write!(f, "(")?;
        write_joined(f, &self.parameters, ", ")?;
        write!(f, "): {}", self.return_type)
    }
}

/// Compact source-like rendering, used for overload keys and debugging.
impl fmt::Display for ThoriumNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Root(root) => write!(f, "namespace {}", root.namespace),
            NodeKind::Use(use_) => write!(f, "use {}: {}", use_.from, use_.to),
            NodeKind::Type(decl) => write!(f, "{} type {}", decl.visibility, decl.name),
            NodeKind::Class(decl) => write!(f, "{} class {}", decl.visibility, decl.name),
            NodeKind::MethodSignature(sig) => write!(f, "{}", sig),
            NodeKind::Method(method) => write!(f, "{}", method.signature),
            NodeKind::Parameter(param) => write!(f, "{}: {}", param.name, param.type_spec),
            NodeKind::TypeParameter(param) => write!(f, "{}", param.name),
            NodeKind::Attribute(attr) => {
                write!(f, "{} {}: {} = {}", attr.mode, attr.name, attr.type_spec, attr.value)
            }
            NodeKind::Statement(stmt) => write!(f, "{}", stmt.value),
            NodeKind::TypeSpecSimple(spec) => {
                write!(f, "{}", spec.type_name)?;
                write_type_arguments(f, &spec.arguments)
            }
            NodeKind::TypeSpecUnion(list) => {
                write!(f, "(")?;
                write_joined(f, &list.types, " | ")?;
                write!(f, ")")
            }
            NodeKind::TypeSpecIntersection(list) => {
                write!(f, "(")?;
                write_joined(f, &list.types, " & ")?;
                write!(f, ")")
            }
            NodeKind::TypeSpecFunction(spec) => {
                write!(f, "(")?;
                write_joined(f, &spec.arguments, ", ")?;
                write!(f, "): {}", spec.return_type)
            }
            NodeKind::TypeSpecInferred => write!(f, "_"),
            NodeKind::StringValue(value) => write!(f, "{:?}", value),
            NodeKind::NumberValue(value) => write!(f, "{}", value),
            NodeKind::BooleanValue(value) => write!(f, "{}", value),
            NodeKind::NoneValue => write!(f, "none"),
            NodeKind::IdentifierValue(value) => write!(f, "{}", value.reference),
            NodeKind::NewAssignmentValue(value) => {
                write!(f, "{} {}: {} = {}", value.mode, value.name, value.type_spec, value.value)
            }
            NodeKind::DirectAssignmentValue(value) => {
                write!(f, "{} = {}", value.reference, value.value)
            }
            NodeKind::IndirectAssignmentValue(value) => {
                write!(f, "{}.{} = {}", value.indirect_value, value.reference, value.value)
            }
            NodeKind::MethodCallValue(value) => {
                write!(f, "{}", value.method_reference)?;
                write_type_arguments(f, &value.type_arguments)?;
                write!(f, "(")?;
                write_joined(f, &value.method_arguments, ", ")?;
                write!(f, ")")
            }
            NodeKind::NestedValue(value) => write!(f, "{}.{}", value.outer, value.inner),
            NodeKind::FunctionValue(value) => {
                write_type_arguments(f, &value.type_parameters)?;
                write!(f, "(")?;
                write_joined(f, &value.parameters, ", ")?;
                write!(f, "): {} => {{ {} statements }}", value.return_type, value.statements.len())
            }
            NodeKind::Reference(reference) => write!(f, "{}", reference.name),
        }
    }
}

use std::fmt;
use std::sync::Arc;

use archery::ArcK;
use rpds::Vector;
use serde::Serialize;

use crate::ir::node_id::NodeId;

/// Ordered, persistent list of child nodes.
pub type NodeVector = Vector<Arc<ThoriumNode>, ArcK>;

/// A node of the Thorium AST.
///
/// Nodes are immutable and shared through `Arc`. Equality is structural: it
/// compares [`NodeKind`]s and ignores the id, so two independently built but
/// identical subtrees are equal while remaining distinct allocations.
#[derive(Debug, Clone)]
pub struct ThoriumNode {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Visibility {
    Namespace,
    Public,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Namespace => write!(f, "namespace"),
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// Whether a binding may be reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Mode {
    Val,
    Var,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Val => write!(f, "val"),
            Mode::Var => write!(f, "var"),
        }
    }
}

/// Discriminator for the node kinds, one member per [`NodeKind`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum NodeType {
    Root,
    Use,
    Type,
    Class,
    MethodSignature,
    Method,
    Parameter,
    TypeParameter,
    Attribute,
    Statement,
    TypeSpecSimple,
    TypeSpecUnion,
    TypeSpecIntersection,
    TypeSpecFunction,
    TypeSpecInferred,
    StringValue,
    NumberValue,
    BooleanValue,
    NoneValue,
    IdentifierValue,
    NewAssignmentValue,
    DirectAssignmentValue,
    IndirectAssignmentValue,
    MethodCallValue,
    NestedValue,
    FunctionValue,
    Reference,
}

impl NodeType {
    pub const ALL: [NodeType; 27] = [
        NodeType::Root,
        NodeType::Use,
        NodeType::Type,
        NodeType::Class,
        NodeType::MethodSignature,
        NodeType::Method,
        NodeType::Parameter,
        NodeType::TypeParameter,
        NodeType::Attribute,
        NodeType::Statement,
        NodeType::TypeSpecSimple,
        NodeType::TypeSpecUnion,
        NodeType::TypeSpecIntersection,
        NodeType::TypeSpecFunction,
        NodeType::TypeSpecInferred,
        NodeType::StringValue,
        NodeType::NumberValue,
        NodeType::BooleanValue,
        NodeType::NoneValue,
        NodeType::IdentifierValue,
        NodeType::NewAssignmentValue,
        NodeType::DirectAssignmentValue,
        NodeType::IndirectAssignmentValue,
        NodeType::MethodCallValue,
        NodeType::NestedValue,
        NodeType::FunctionValue,
        NodeType::Reference,
    ];

    pub fn is_top_level(self) -> bool {
        matches!(self, NodeType::Type | NodeType::Class)
    }

    pub fn is_type_spec(self) -> bool {
        matches!(
            self,
            NodeType::TypeSpecSimple
                | NodeType::TypeSpecUnion
                | NodeType::TypeSpecIntersection
                | NodeType::TypeSpecFunction
                | NodeType::TypeSpecInferred
        )
    }

    pub fn is_value(self) -> bool {
        matches!(
            self,
            NodeType::StringValue
                | NodeType::NumberValue
                | NodeType::BooleanValue
                | NodeType::NoneValue
                | NodeType::IdentifierValue
                | NodeType::NewAssignmentValue
                | NodeType::DirectAssignmentValue
                | NodeType::IndirectAssignmentValue
                | NodeType::MethodCallValue
                | NodeType::NestedValue
                | NodeType::FunctionValue
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    pub namespace: String,
    pub uses: NodeVector,
    pub top_level: Arc<ThoriumNode>,
}

/// `use from` or `use from: to`; `to` is the name the import is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Use {
    pub from: String,
    pub to: String,
}

/// Interface-like declaration: method signatures only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub visibility: Visibility,
    pub name: String,
    pub type_parameters: NodeVector,
    pub super_type: Arc<ThoriumNode>,
    pub methods: NodeVector,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub visibility: Visibility,
    pub name: String,
    pub type_parameters: NodeVector,
    pub super_type: Arc<ThoriumNode>,
    pub methods: NodeVector,
    pub attributes: NodeVector,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub visibility: Visibility,
    pub name: String,
    pub type_parameters: NodeVector,
    pub parameters: NodeVector,
    pub return_type: Arc<ThoriumNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub signature: Arc<ThoriumNode>,
    pub statements: NodeVector,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_spec: Arc<ThoriumNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub type_spec: Arc<ThoriumNode>,
    pub value: Arc<ThoriumNode>,
    pub mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub value: Arc<ThoriumNode>,
    /// Set on the statement whose value is the result of the enclosing body.
    pub last: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpecSimple {
    pub type_name: String,
    pub arguments: NodeVector,
}

/// Members of a union or an intersection, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpecList {
    pub types: NodeVector,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpecFunction {
    pub arguments: NodeVector,
    pub return_type: Arc<ThoriumNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierValue {
    pub reference: Arc<ThoriumNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignmentValue {
    pub mode: Mode,
    pub name: String,
    pub type_spec: Arc<ThoriumNode>,
    pub value: Arc<ThoriumNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectAssignmentValue {
    pub reference: Arc<ThoriumNode>,
    pub value: Arc<ThoriumNode>,
}

/// `indirect_value.reference = value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndirectAssignmentValue {
    pub indirect_value: Arc<ThoriumNode>,
    pub reference: Arc<ThoriumNode>,
    pub value: Arc<ThoriumNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCallValue {
    pub method_reference: Arc<ThoriumNode>,
    pub type_arguments: NodeVector,
    pub method_arguments: NodeVector,
}

/// `outer.inner`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedValue {
    pub outer: Arc<ThoriumNode>,
    pub inner: Arc<ThoriumNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionValue {
    pub type_parameters: NodeVector,
    pub parameters: NodeVector,
    pub return_type: Arc<ThoriumNode>,
    pub statements: NodeVector,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    /// Set for call-site references, which may name a method declared later.
    pub allow_forward_reference: bool,
}

/// The closed set of node kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root(Root),
    Use(Use),
    Type(TypeDecl),
    Class(ClassDecl),
    MethodSignature(MethodSignature),
    Method(Method),
    Parameter(Parameter),
    TypeParameter(TypeParameter),
    Attribute(Attribute),
    Statement(Statement),
    TypeSpecSimple(TypeSpecSimple),
    TypeSpecUnion(TypeSpecList),
    TypeSpecIntersection(TypeSpecList),
    TypeSpecFunction(TypeSpecFunction),
    TypeSpecInferred,
    StringValue(String),
    NumberValue(String),
    BooleanValue(bool),
    NoneValue,
    IdentifierValue(IdentifierValue),
    NewAssignmentValue(NewAssignmentValue),
    DirectAssignmentValue(DirectAssignmentValue),
    IndirectAssignmentValue(IndirectAssignmentValue),
    MethodCallValue(MethodCallValue),
    NestedValue(NestedValue),
    FunctionValue(FunctionValue),
    Reference(Reference),
}

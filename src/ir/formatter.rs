//! Debug renderings of the tree and of the scope chain.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value, json};

use super::context::ContextStore;
use super::source_position::SourcePosition;
use super::symbol_table::SymbolTable;
use super::thorium_node::*;
use super::visitor::Visitor;

/// Renders a subtree as JSON: one object per node with its kind, id, scalar
/// fields, source position (when known) and children in canonical order.
pub struct JsonVisitor<'a> {
    contexts: Option<&'a ContextStore>,
}

impl<'a> JsonVisitor<'a> {
    pub fn new(contexts: Option<&'a ContextStore>) -> Self {
        JsonVisitor { contexts }
    }
}

fn scalar_fields(kind: &NodeKind, object: &mut Map<String, Value>) {
    let mut put = |key: &str, value: Value| {
        object.insert(key.to_string(), value);
    };
    match kind {
        NodeKind::Root(root) => put("namespace", json!(root.namespace)),
        NodeKind::Use(use_) => {
            put("from", json!(use_.from));
            put("to", json!(use_.to));
        }
        NodeKind::Type(TypeDecl { visibility, name, .. })
        | NodeKind::Class(ClassDecl { visibility, name, .. })
        | NodeKind::MethodSignature(MethodSignature { visibility, name, .. }) => {
            put("visibility", json!(visibility));
            put("name", json!(name));
        }
        NodeKind::Parameter(Parameter { name, .. }) | NodeKind::TypeParameter(TypeParameter { name }) => {
            put("name", json!(name))
        }
        NodeKind::Attribute(attr) => {
            put("name", json!(attr.name));
            put("mode", json!(attr.mode));
        }
        NodeKind::Statement(stmt) => put("last", json!(stmt.last)),
        NodeKind::TypeSpecSimple(spec) => put("type_name", json!(spec.type_name)),
        NodeKind::StringValue(value) | NodeKind::NumberValue(value) => put("value", json!(value)),
        NodeKind::BooleanValue(value) => put("value", json!(value)),
        NodeKind::NewAssignmentValue(value) => {
            put("mode", json!(value.mode));
            put("name", json!(value.name));
        }
        NodeKind::Reference(reference) => {
            put("name", json!(reference.name));
            put("allow_forward_reference", json!(reference.allow_forward_reference));
        }
        _ => {}
    }
}

impl Visitor for JsonVisitor<'_> {
    type Output = Value;

    fn visit_default(&self, node: &Arc<ThoriumNode>) -> Value {
        let mut object = Map::new();
        object.insert("kind".to_string(), json!(node.node_type()));
        object.insert("id".to_string(), json!(node.id()));
        scalar_fields(node.kind(), &mut object);

        if let Some(position) = self.contexts.and_then(|c| c.get::<SourcePosition>(node.id())) {
            object.insert("position".to_string(), json!(position.to_string()));
        }

        let children: Vec<Value> = node.children().iter().map(|child| self.visit_node(child)).collect();
        if !children.is_empty() {
            object.insert("children".to_string(), Value::Array(children));
        }
        Value::Object(object)
    }
}

pub fn to_json(node: &Arc<ThoriumNode>, contexts: Option<&ContextStore>) -> Value {
    node.accept(&JsonVisitor::new(contexts))
}

/// Indented listing of a scope, its symbols and, recursively, its live nested scopes.
pub struct ScopeDump<'a>(pub &'a SymbolTable);

impl ScopeDump<'_> {
    fn write_scope(f: &mut fmt::Formatter<'_>, table: &SymbolTable, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        writeln!(f, "{}{}", indent, table.name())?;
        for symbol in table.symbols() {
            writeln!(f, "{}  - {}: {:?}", indent, symbol.name, symbol.kind)?;
        }
        for scope in table.scopes() {
            Self::write_scope(f, &scope, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ScopeDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::write_scope(f, self.0, 0)
    }
}

pub fn dump_scopes(table: &SymbolTable) -> String {
    ScopeDump(table).to_string()
}

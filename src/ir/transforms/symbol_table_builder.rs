use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::ir::compilation_unit::CompilationUnit;
use crate::ir::context::ContextStore;
use crate::ir::errors::{PassError, SymbolTableError};
use crate::ir::pipeline::Pass;
use crate::ir::source_position::SourcePosition;
use crate::ir::symbol_table::{DuplicatePolicy, Symbol, SymbolKind, SymbolTable};
use crate::ir::thorium_node::*;
use crate::ir::visitor::Visitor;

/// Name of the scope holding the statements of a method or function body.
pub const BODY_SCOPE: &str = "[body]";

type BuildResult = Result<(), SymbolTableError>;

/// Builds the scope chain of a tree and records, for every node, the scope
/// it resolves names in.
///
/// - `Root` opens the namespace scope under the global table; uses and the
///   top-level declaration are registered there.
/// - `Type`/`Class` open a scope of their own for type parameters, methods
///   (keyed by overload) and attributes.
/// - Each method and each function value opens a signature scope holding its
///   type parameters and parameters, and under it a body scope for its
///   statements. The signature node records the signature scope, the
///   method/function node records the body scope.
/// - Every other node records the scope current at the point it is reached.
pub struct SymbolTableBuilder<'a> {
    contexts: Mutex<&'a mut ContextStore>,
    global_table: Arc<SymbolTable>,
    current_table: RwLock<Arc<SymbolTable>>,
}

impl<'a> SymbolTableBuilder<'a> {
    pub fn new(contexts: &'a mut ContextStore, global_table: Arc<SymbolTable>) -> Self {
        Self {
            contexts: Mutex::new(contexts),
            current_table: RwLock::new(Arc::clone(&global_table)),
            global_table,
        }
    }

    fn current(&self) -> Arc<SymbolTable> {
        self.current_table.read().clone()
    }

    /// Makes `scope` current and returns the scope it replaces.
    fn push_scope(&self, scope: Arc<SymbolTable>) -> Arc<SymbolTable> {
        trace!("Entering scope '{}'", scope.fq_name());
        std::mem::replace(&mut *self.current_table.write(), scope)
    }

    fn pop_scope(&self, previous: Arc<SymbolTable>) {
        *self.current_table.write() = previous;
    }

    /// Runs `f` with `scope` current, restoring the previous scope afterwards.
    fn within<F>(&self, scope: &Arc<SymbolTable>, f: F) -> BuildResult
    where
        F: FnOnce() -> BuildResult,
    {
        let previous = self.push_scope(Arc::clone(scope));
        let result = f();
        self.pop_scope(previous);
        result
    }

    fn record(&self, node: &Arc<ThoriumNode>, scope: &Arc<SymbolTable>) {
        self.contexts.lock().put_arc(node.id(), Arc::clone(scope));
    }

    fn register(&self, name: &str, kind: SymbolKind, node: &Arc<ThoriumNode>) -> BuildResult {
        let scope = self.current();
        trace!("Registering {:?} '{}' in '{}'", kind, name, scope.fq_name());
        scope.register(Symbol::new(name, kind, Arc::clone(node)))
    }

    fn visit_all(&self, nodes: &NodeVector) -> BuildResult {
        nodes.iter().try_for_each(|node| self.visit_node(node))
    }

    fn visit_children(&self, node: &Arc<ThoriumNode>) -> BuildResult {
        node.children().iter().try_for_each(|child| self.visit_node(child))
    }

    /// Opens the signature scope of a method and fills it.
    fn visit_signature(&self, node: &Arc<ThoriumNode>, sig: &MethodSignature) -> Result<Arc<SymbolTable>, SymbolTableError> {
        let scope = self.current().create_scope(sig.overload_key());
        self.record(node, &scope);
        self.within(&scope, || {
            self.visit_all(&sig.type_parameters)?;
            self.visit_all(&sig.parameters)?;
            self.visit_node(&sig.return_type)
        })?;
        Ok(scope)
    }

    fn anonymous_scope_name(&self, node: &Arc<ThoriumNode>) -> String {
        match self.contexts.lock().get::<SourcePosition>(node.id()) {
            Some(position) => format!("[anon:{}]", position.start_line()),
            None => "[anon:?]".to_string(),
        }
    }
}

impl Visitor for SymbolTableBuilder<'_> {
    type Output = BuildResult;

    fn visit_default(&self, node: &Arc<ThoriumNode>) -> BuildResult {
        self.record(node, &self.current());
        self.visit_children(node)
    }

    fn visit_root(&self, node: &Arc<ThoriumNode>, root: &Root) -> BuildResult {
        let scope = self.global_table.create_scope(root.namespace.as_str());
        self.record(node, &scope);
        self.within(&scope, || self.visit_children(node))
    }

    fn visit_use(&self, node: &Arc<ThoriumNode>, use_: &Use) -> BuildResult {
        self.register(&use_.to, SymbolKind::Import, node)?;
        self.record(node, &self.current());
        Ok(())
    }

    fn visit_type(&self, node: &Arc<ThoriumNode>, decl: &TypeDecl) -> BuildResult {
        self.register(&decl.name, SymbolKind::Type, node)?;
        let scope = self.current().create_scope(decl.name.as_str());
        self.record(node, &scope);
        self.within(&scope, || self.visit_children(node))
    }

    fn visit_class(&self, node: &Arc<ThoriumNode>, decl: &ClassDecl) -> BuildResult {
        self.register(&decl.name, SymbolKind::Class, node)?;
        let scope = self.current().create_scope(decl.name.as_str());
        self.record(node, &scope);
        self.within(&scope, || self.visit_children(node))
    }

    /// Reached for the signatures of a `Type`; a `Method` handles its own.
    fn visit_method_signature(&self, node: &Arc<ThoriumNode>, sig: &MethodSignature) -> BuildResult {
        self.register(&sig.overload_key(), SymbolKind::Method, node)?;
        self.visit_signature(node, sig).map(|_| ())
    }

    fn visit_method(&self, node: &Arc<ThoriumNode>, method: &Method) -> BuildResult {
        let NodeKind::MethodSignature(sig) = method.signature.kind() else {
            return self.visit_default(node);
        };
        self.register(&sig.overload_key(), SymbolKind::Method, node)?;
        let signature_scope = self.visit_signature(&method.signature, sig)?;
        let body = signature_scope.create_scope(BODY_SCOPE);
        self.record(node, &body);
        self.within(&body, || self.visit_all(&method.statements))
    }

    fn visit_parameter(&self, node: &Arc<ThoriumNode>, param: &Parameter) -> BuildResult {
        self.register(&param.name, SymbolKind::Parameter, node)?;
        self.visit_default(node)
    }

    fn visit_type_parameter(&self, node: &Arc<ThoriumNode>, param: &TypeParameter) -> BuildResult {
        self.register(&param.name, SymbolKind::TypeParameter, node)?;
        self.visit_default(node)
    }

    fn visit_attribute(&self, node: &Arc<ThoriumNode>, attr: &Attribute) -> BuildResult {
        self.register(&attr.name, SymbolKind::Attribute, node)?;
        self.visit_default(node)
    }

    fn visit_new_assignment_value(&self, node: &Arc<ThoriumNode>, value: &NewAssignmentValue) -> BuildResult {
        self.register(&value.name, SymbolKind::Variable, node)?;
        self.visit_default(node)
    }

    fn visit_function_value(&self, node: &Arc<ThoriumNode>, value: &FunctionValue) -> BuildResult {
        let signature_scope = self.current().create_scope(self.anonymous_scope_name(node));
        self.within(&signature_scope, || {
            self.visit_all(&value.type_parameters)?;
            self.visit_all(&value.parameters)?;
            self.visit_node(&value.return_type)
        })?;
        let body = signature_scope.create_scope(BODY_SCOPE);
        self.record(node, &body);
        self.within(&body, || self.visit_all(&value.statements))
    }
}

/// Builds the scope chain of the unit's tree under a fresh global table.
#[derive(Debug, Clone)]
pub struct SymbolTablePass {
    pub duplicate_policy: DuplicatePolicy,
    pub global_scope_name: String,
}

impl Default for SymbolTablePass {
    fn default() -> Self {
        SymbolTablePass { duplicate_policy: DuplicatePolicy::default(), global_scope_name: "global".to_string() }
    }
}

impl Pass for SymbolTablePass {
    fn run(&self, unit: &mut CompilationUnit) -> Result<(), PassError> {
        let global = SymbolTable::new(self.global_scope_name.as_str(), self.duplicate_policy);
        unit.root.accept(&SymbolTableBuilder::new(&mut unit.contexts, Arc::clone(&global)))?;
        debug!("Built symbol tables under '{}'", global.name());
        unit.global_scope = Some(global);
        Ok(())
    }
}

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ir::errors::SymbolTableError;
use crate::ir::thorium_node::ThoriumNode;

/// Represents the kind of declaration a symbol stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolKind {
    Import,
    Type,
    Class,
    TypeParameter,
    Parameter,
    Method,
    Attribute,
    Variable,
}

/// A name bound to the node declaring it.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub node: Arc<ThoriumNode>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind, node: Arc<ThoriumNode>) -> Self {
        Symbol { name: name.into(), kind, node }
    }
}

/// What happens when a name is registered twice in the same scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with [`SymbolTableError::AlreadyDefined`].
    #[default]
    Reject,
    /// Replace the earlier binding.
    Shadow,
}

/// A lexical scope: its own bindings plus a link to the enclosing scope.
///
/// Scopes also keep weak links to their nested scopes, in creation order, so
/// that the live part of the chain can be dumped from the outermost one.
#[derive(Debug)]
pub struct SymbolTable {
    name: String,
    symbols: RwLock<FxHashMap<String, Symbol>>,
    enclosing: Option<Arc<SymbolTable>>,
    scopes: RwLock<Vec<Weak<SymbolTable>>>,
    duplicate_policy: DuplicatePolicy,
}

impl SymbolTable {
    /// Creates an outermost scope.
    pub fn new(name: impl Into<String>, duplicate_policy: DuplicatePolicy) -> Arc<Self> {
        Arc::new(SymbolTable {
            name: name.into(),
            symbols: RwLock::new(FxHashMap::default()),
            enclosing: None,
            scopes: RwLock::new(Vec::new()),
            duplicate_policy,
        })
    }

    /// Creates a new scope nested in this one. Each call yields a distinct
    /// scope, even for a name already used.
    pub fn create_scope(self: &Arc<Self>, name: impl Into<String>) -> Arc<SymbolTable> {
        let scope = Arc::new(SymbolTable {
            name: name.into(),
            symbols: RwLock::new(FxHashMap::default()),
            enclosing: Some(Arc::clone(self)),
            scopes: RwLock::new(Vec::new()),
            duplicate_policy: self.duplicate_policy,
        });
        self.scopes.write().push(Arc::downgrade(&scope));
        scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the enclosing scope, `None` for the outermost one.
    pub fn enclosing_scope(&self) -> Option<Arc<SymbolTable>> {
        self.enclosing.clone()
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    /// Binds `symbol.name` in this scope.
    pub fn register(&self, symbol: Symbol) -> Result<(), SymbolTableError> {
        let mut symbols = self.symbols.write();
        if symbols.contains_key(&symbol.name) {
            match self.duplicate_policy {
                DuplicatePolicy::Reject => {
                    return Err(SymbolTableError::AlreadyDefined {
                        name: symbol.name,
                        scope: self.fq_name(),
                    });
                }
                DuplicatePolicy::Shadow => {
                    debug!("Shadowing '{}' in scope '{}'", symbol.name, self.fq_name());
                }
            }
        }
        symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Looks up a symbol by name, climbing the enclosing scopes.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.lookup_in_current_scope(name)
            .or_else(|| self.enclosing.as_ref().and_then(|e| e.lookup(name)))
    }

    pub fn lookup_in_current_scope(&self, name: &str) -> Option<Symbol> {
        self.symbols.read().get(name).cloned()
    }

    pub fn in_scope(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Symbols bound in this scope, sorted by name.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.symbols.read().values().cloned().collect();
        symbols.sort_by(|a, b| a.name.cmp(&b.name));
        symbols
    }

    /// Points every symbol of this scope and of its live nested scopes at the
    /// node `replacement` returns for its declaration, if any. Returns the
    /// number of symbols rebound.
    pub fn rebind<F>(&self, replacement: &F) -> usize
    where
        F: Fn(&Arc<ThoriumNode>) -> Option<Arc<ThoriumNode>>,
    {
        let mut rebound = 0;
        for symbol in self.symbols.write().values_mut() {
            if let Some(node) = replacement(&symbol.node) {
                symbol.node = node;
                rebound += 1;
            }
        }
        rebound + self.scopes().iter().map(|scope| scope.rebind(replacement)).sum::<usize>()
    }

    /// Nested scopes still referenced elsewhere, in creation order.
    pub fn scopes(&self) -> Vec<Arc<SymbolTable>> {
        self.scopes.read().iter().filter_map(Weak::upgrade).collect()
    }

    /// Dot-separated names from the outermost scope (excluded) down to this one.
    pub fn fq_name(&self) -> String {
        match &self.enclosing {
            None => String::new(),
            Some(enclosing) if enclosing.enclosing.is_none() => self.name.clone(),
            Some(enclosing) => format!("{}.{}", enclosing.fq_name(), self.name),
        }
    }

    /// Number of scopes between this one and the outermost scope.
    pub fn depth(&self) -> usize {
        self.enclosing.as_ref().map_or(0, |e| e.depth() + 1)
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.symbols().into_iter().map(|s| s.name).collect();
        write!(f, "{} [{}]", self.fq_name(), names.join(", "))
    }
}

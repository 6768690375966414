use std::sync::Arc;

use super::context::ContextStore;
use super::symbol_table::SymbolTable;
use super::thorium_node::{NodeFactory, ThoriumNode};

/// One tree together with everything derived from it.
///
/// The factory that built the tree stays with it so that passes rewriting the
/// tree mint ids from the same generator.
#[derive(Debug)]
pub struct CompilationUnit {
    pub factory: NodeFactory,
    pub root: Arc<ThoriumNode>,
    pub contexts: ContextStore,
    /// Outermost scope, set once symbol tables are built.
    pub global_scope: Option<Arc<SymbolTable>>,
}

impl CompilationUnit {
    pub fn new(factory: NodeFactory, root: Arc<ThoriumNode>) -> Self {
        CompilationUnit { factory, root, contexts: ContextStore::new(), global_scope: None }
    }

    /// Same as [`new`](Self::new), keeping facts the adapter already attached
    /// (typically source positions).
    pub fn with_contexts(factory: NodeFactory, root: Arc<ThoriumNode>, contexts: ContextStore) -> Self {
        CompilationUnit { factory, root, contexts, global_scope: None }
    }
}

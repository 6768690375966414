//! Per-node side tables holding facts derived by the passes.
//!
//! Nodes stay immutable: everything a pass learns about a node (its
//! [`Relatives`](super::relatives::Relatives), the
//! [`SymbolTable`](super::symbol_table::SymbolTable) it resolves names in,
//! its [`SourcePosition`](super::source_position::SourcePosition)) lives in a
//! [`Context`] keyed by the node's [`NodeId`] inside a [`ContextStore`].
//!
//! A context holds at most one value per Rust type. Keys are static types and
//! values always exist, so the "null key / null value" cases of a dynamically
//! typed side table cannot be expressed.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::errors::ContextError;
use super::node_id::NodeId;

#[derive(Clone)]
struct Entry {
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

/// Type-indexed facts attached to one node.
#[derive(Clone)]
pub struct Context {
    node: NodeId,
    entries: FxHashMap<TypeId, Entry>,
}

impl Context {
    pub fn new(node: NodeId) -> Self {
        Context { node, entries: FxHashMap::default() }
    }

    /// The node this context describes.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Stores `value`, replacing any previous value of the same type.
    pub fn put<T: Any + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.put_arc(Arc::new(value))
    }

    /// Stores an already shared value so that readers observe the same allocation.
    pub fn put_arc<T: Any + Send + Sync>(&mut self, value: Arc<T>) -> &mut Self {
        self.entries.insert(
            TypeId::of::<T>(),
            Entry { type_name: short_type_name::<T>(), value },
        );
        self
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|entry| Arc::clone(&entry.value).downcast::<T>().ok())
    }

    pub fn require<T: Any + Send + Sync>(&self) -> Result<Arc<T>, ContextError> {
        self.get::<T>().ok_or(ContextError::Missing {
            node: self.node,
            type_name: short_type_name::<T>(),
        })
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Returns the stored value, storing `value` first when none is present.
    pub fn put_if_absent_and_get<T: Any + Send + Sync>(&mut self, value: T) -> Arc<T> {
        if let Some(existing) = self.get::<T>() {
            return existing;
        }
        let value = Arc::new(value);
        self.put_arc(Arc::clone(&value));
        value
    }

    pub fn remove<T: Any + Send + Sync>(&mut self) -> bool {
        self.entries.remove(&TypeId::of::<T>()).is_some()
    }

    /// Sorted names of the stored types.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.entries.values().map(|e| e.type_name).collect();
        keys.sort_unstable();
        keys
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies every entry of `other` into this context, overwriting same-typed values.
    pub fn copy_from(&mut self, other: &Context) -> &mut Self {
        for (key, entry) in &other.entries {
            self.entries.insert(*key, entry.clone());
        }
        self
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("node", &self.node)
            .field("keys", &self.keys())
            .finish()
    }
}

fn short_type_name<T>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Arena of contexts keyed by node id, owned by one compilation unit.
#[derive(Debug, Default, Clone)]
pub struct ContextStore {
    contexts: FxHashMap<NodeId, Context>,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self, node: NodeId) -> Option<&Context> {
        self.contexts.get(&node)
    }

    /// Returns the context of `node`, creating an empty one on first access.
    pub fn context_mut(&mut self, node: NodeId) -> &mut Context {
        self.contexts.entry(node).or_insert_with(|| Context::new(node))
    }

    pub fn put<T: Any + Send + Sync>(&mut self, node: NodeId, value: T) -> &mut Context {
        self.context_mut(node).put(value)
    }

    pub fn put_arc<T: Any + Send + Sync>(&mut self, node: NodeId, value: Arc<T>) -> &mut Context {
        self.context_mut(node).put_arc(value)
    }

    pub fn get<T: Any + Send + Sync>(&self, node: NodeId) -> Option<Arc<T>> {
        self.contexts.get(&node).and_then(Context::get::<T>)
    }

    pub fn require<T: Any + Send + Sync>(&self, node: NodeId) -> Result<Arc<T>, ContextError> {
        match self.contexts.get(&node) {
            Some(context) => context.require::<T>(),
            None => Err(ContextError::Missing { node, type_name: short_type_name::<T>() }),
        }
    }

    pub fn contains<T: Any + Send + Sync>(&self, node: NodeId) -> bool {
        self.contexts.get(&node).is_some_and(Context::contains::<T>)
    }

    pub fn remove<T: Any + Send + Sync>(&mut self, node: NodeId) -> bool {
        self.contexts.get_mut(&node).is_some_and(Context::remove::<T>)
    }

    /// Copies the `T` entry of `from` onto `to`. Returns whether anything was copied.
    pub fn copy_entry<T: Any + Send + Sync>(&mut self, from: NodeId, to: NodeId) -> bool {
        match self.get::<T>(from) {
            Some(value) => {
                self.put_arc(to, value);
                true
            }
            None => false,
        }
    }

    /// Copies every entry of `from` onto `to`.
    pub fn copy_all(&mut self, from: NodeId, to: NodeId) {
        if from == to {
            return;
        }
        if let Some(source) = self.contexts.get(&from).cloned() {
            self.context_mut(to).copy_from(&source);
        }
    }

    /// Drops the contexts of nodes for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.contexts.retain(|id, _| keep(*id));
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::node_id::NodeIdGenerator;

    #[derive(Debug, PartialEq)]
    struct Marker(&'static str);

    #[test]
    fn test_put_get_and_chaining() {
        let id = NodeIdGenerator::new().next_id();
        let mut context = Context::new(id);
        context.put(Marker("a")).put(42_u32);
        assert_eq!(context.get::<Marker>().as_deref(), Some(&Marker("a")));
        assert_eq!(context.get::<u32>().as_deref(), Some(&42));
        assert!(context.contains::<u32>());
        assert!(!context.contains::<String>());
        assert_eq!(context.node(), id);
        assert_eq!(context.keys(), vec!["Marker", "u32"]);
    }

    #[test]
    fn test_put_overwrites_same_type() {
        let mut context = Context::new(NodeIdGenerator::new().next_id());
        context.put(Marker("a")).put(Marker("b"));
        assert_eq!(context.get::<Marker>().as_deref(), Some(&Marker("b")));
    }

    #[test]
    fn test_require_names_the_missing_type() {
        let id = NodeIdGenerator::new().next_id();
        let context = Context::new(id);
        let error = context.require::<Marker>().unwrap_err();
        assert_eq!(error, ContextError::Missing { node: id, type_name: "Marker" });
        assert_eq!(error.to_string(), "no Marker found for node #1");
    }

    #[test]
    fn test_put_if_absent_keeps_existing_value() {
        let mut context = Context::new(NodeIdGenerator::new().next_id());
        let first = context.put_if_absent_and_get(Marker("first"));
        let second = context.put_if_absent_and_get(Marker("second"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second, Marker("first"));
    }

    #[test]
    fn test_put_arc_shares_allocation() {
        let mut context = Context::new(NodeIdGenerator::new().next_id());
        let value = Arc::new(Marker("shared"));
        context.put_arc(Arc::clone(&value));
        assert!(Arc::ptr_eq(&value, &context.require::<Marker>().unwrap()));
    }

    #[test]
    fn test_store_copy_and_retain() {
        let generator = NodeIdGenerator::new();
        let (a, b, c) = (generator.next_id(), generator.next_id(), generator.next_id());
        let mut store = ContextStore::new();
        store.put(a, Marker("a")).put(1_u8);

        assert!(store.copy_entry::<Marker>(a, b));
        assert!(!store.copy_entry::<String>(a, b));
        assert!(store.contains::<Marker>(b));
        assert!(!store.contains::<u8>(b));

        store.copy_all(a, c);
        assert!(store.contains::<u8>(c));
        assert!(store.require::<u8>(generator.next_id()).is_err());

        store.retain(|id| id != a);
        assert!(store.context(a).is_none());
        assert_eq!(store.len(), 2);
    }
}

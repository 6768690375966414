//! Visitor pattern for Thorium AST traversal and transformation
//!
//! The [`Visitor`] trait has one method per node kind and an associated
//! `Output` type, so the same dispatch serves transformations (output is a
//! node), analyses (a boolean, a list) and side-effecting passes (a `Result`).
//!
//! # Architecture
//!
//! - `visitor_trait`: the Visitor trait and its `visit_node` dispatch
//! - `identity`: returns every node unchanged
//! - `copy`: deep copy with fresh node ids
//! - `mapping`: constant and boolean-valued visitors
//! - `flat_map`: pre-order linearization
//! - `nodes_matching`: pre-order search over descendants
//!
//! # Usage
//!
//! ```ignore
//! use thorium_frontend::ir::visitor::Visitor;
//!
//! struct CountClasses;
//!
//! impl Visitor for CountClasses {
//!     type Output = usize;
//!
//!     fn visit_default(&self, node: &Arc<ThoriumNode>) -> usize {
//!         node.children().iter().map(|c| self.visit_node(c)).sum()
//!     }
//!
//!     fn visit_class(&self, node: &Arc<ThoriumNode>, _decl: &ClassDecl) -> usize {
//!         1 + self.visit_default(node)
//!     }
//! }
//! ```
//!
//! None of the reusable visitors mutate their input: they either return
//! existing nodes, read them, or mint new ones.

mod visitor_trait;

pub mod copy;
pub mod flat_map;
pub mod identity;
pub mod mapping;
pub mod nodes_matching;

pub use copy::CopyVisitor;
pub use flat_map::{FlatMapVisitor, count_nodes, flat_map};
pub use identity::IdentityVisitor;
pub use mapping::{MappingVisitor, PredicateVisitor};
pub use nodes_matching::{NodesMatchingVisitor, nodes_matching};
pub use visitor_trait::Visitor;

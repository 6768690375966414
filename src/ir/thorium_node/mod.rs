// Thorium AST Node Module
//
// - node_types: ThoriumNode, the closed NodeKind enum and its payload structs
// - node_impl: child access, child mapping, structural equality and display
// - factory: NodeFactory, the validated construction entry point

pub mod factory;
pub mod node_impl;
pub mod node_types;

pub use factory::NodeFactory;
pub use node_types::*;

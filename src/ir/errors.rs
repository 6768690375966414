//! Error types raised by the front end.
//!
//! Every failure here is a deterministic programming error: nothing is retried
//! and each error is expected to terminate the pass that raised it.

use thiserror::Error;

use super::node_id::NodeId;
use super::source_position::Position;
use super::thorium_node::NodeType;

/// Raised by [`NodeFactory`](super::thorium_node::NodeFactory) when a node
/// would violate the tree invariants. No node is minted on failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("{node}: {field} cannot be empty")]
    EmptyField { node: NodeType, field: &'static str },

    #[error("{node}: {field} expects {expected}, found {found}")]
    UnexpectedKind {
        node: NodeType,
        field: &'static str,
        expected: &'static str,
        found: NodeType,
    },

    #[error("source position ends at {end} before it starts at {start}")]
    InvalidSourcePosition { start: Position, end: Position },

    #[error("source position {position} is not 1-based")]
    ZeroPosition { position: Position },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("no {type_name} found for node {node}")]
    Missing { node: NodeId, type_name: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolTableError {
    #[error("symbol '{name}' is already defined in scope '{scope}'")]
    AlreadyDefined { name: String, scope: String },
}

/// Failure of a single compilation pass.
#[derive(Debug, Error)]
pub enum PassError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    SymbolTable(#[from] SymbolTableError),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("transform '{id}' is part of a dependency cycle")]
    Cycle { id: String },

    #[error("transform '{id}' failed: {source}")]
    Pass {
        id: String,
        #[source]
        source: PassError,
    },
}

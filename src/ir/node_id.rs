use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Identity of a node within one compilation unit.
///
/// Ids are minted by a [`NodeIdGenerator`] and never reused by that generator,
/// so they double as keys for every side table attached to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source owned by a single compilation unit.
///
/// The counter is atomic only so that a finished tree and its factory are
/// `Send + Sync`; there is no process-wide instance.
#[derive(Debug, Default)]
pub struct NodeIdGenerator {
    last: AtomicU64,
}

impl NodeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id; the first id of a fresh generator is `#1`.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Number of ids handed out so far.
    pub fn minted(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}

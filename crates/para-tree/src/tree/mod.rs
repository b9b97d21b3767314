//! Core tree abstraction for the navigation panel
//!
//! [`Tree`] is the generic navigation interface, [`ParaTree`] the concrete
//! arena-backed tree holding the four buckets.

mod node;
mod para;
mod traits;

pub use node::{Node, NodeId, NodeKey, NodeKind};
pub use para::{OutlineEntry, ParaTree};
pub use traits::{Tree, TreeTraversal, TreeWalker};

/// Resolve a stable key within `tree`
///
/// Returns `None` when the key is stale, which callers treat as a no-op.
pub fn locate<T: Tree>(tree: &T, key: &NodeKey) -> Option<NodeId> {
    tree.locate(key)
}

/// Re-export common types for convenience
pub mod prelude {
    pub use super::{
        locate, Node, NodeId, NodeKey, NodeKind, OutlineEntry, ParaTree, Tree, TreeTraversal,
    };
}

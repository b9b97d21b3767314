//! Core tree traits for hierarchical navigation structures

use crate::tree::{Node, NodeId, NodeKey, NodeKind};

/// A rooted hierarchy of folders and documents
///
/// Implementations provide the basic navigation primitives; everything else is
/// derived from them.
///
/// # Type Parameters
///
/// * `Document` - the opaque document handle carried by leaf nodes
///
/// # Example
///
/// ```ignore
/// fn print_tree<T: Tree>(tree: &T) {
///     for id in tree.walk() {
///         let node = tree.get(id).unwrap();
///         let depth = tree.depth(id);
///         println!("{:indent$}{}", "", node.name, indent = depth * 2);
///     }
/// }
/// ```
pub trait Tree {
    /// Handle stored on document nodes
    type Document;

    /// Get the root node ID (always exists)
    fn root(&self) -> NodeId;

    /// Get a node by its ID
    ///
    /// Returns `None` if the ID is invalid.
    fn get(&self, id: NodeId) -> Option<&Node<Self::Document>>;

    /// Get the parent of a node
    ///
    /// Returns `None` for the root node.
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// Iterate over children of a node in stored order
    ///
    /// Returns an empty iterator for leaf nodes or invalid IDs.
    fn children(&self, id: NodeId) -> Box<dyn Iterator<Item = NodeId> + '_>;

    /// Count total nodes in the tree
    fn node_count(&self) -> usize;

    /// Resolve a stable key to the node carrying it
    ///
    /// Depth-first search that stops at the first match. Returns `None` for keys
    /// that no longer exist, e.g. a gesture that outlived a rebuild.
    fn locate(&self, key: &NodeKey) -> Option<NodeId> {
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if self.key(id) == Some(key) {
                return Some(id);
            }
            let children: Vec<_> = self.children(id).collect();
            stack.extend(children.into_iter().rev());
        }
        None
    }

    /// Get the stable key of a node
    fn key(&self, id: NodeId) -> Option<&NodeKey> {
        self.get(id).map(|n| &n.key)
    }

    /// Check if a node is a document
    ///
    /// Returns false for invalid IDs.
    fn is_leaf(&self, id: NodeId) -> bool {
        self.get(id)
            .map(|n| n.kind == NodeKind::Leaf)
            .unwrap_or(false)
    }

    /// Check if a node is a folder
    ///
    /// Returns false for invalid IDs.
    fn is_container(&self, id: NodeId) -> bool {
        self.get(id)
            .map(|n| n.kind == NodeKind::Container)
            .unwrap_or(false)
    }

    /// Get the name of a node
    fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| n.name.as_str())
    }

    /// Names from the root down to this node, both included
    ///
    /// Returns an empty vector if the ID is invalid.
    fn path(&self, id: NodeId) -> Vec<String> {
        let mut components = Vec::new();
        let mut current = Some(id);

        while let Some(node_id) = current {
            if let Some(name) = self.name(node_id) {
                components.push(name.to_string());
            }
            current = self.parent(node_id);
        }

        components.reverse();
        components
    }

    /// Get the depth of a node (root = 0)
    fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent_id) = current {
            depth += 1;
            current = self.parent(parent_id);
        }
        depth
    }

    /// Count children of a node
    fn child_count(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Get all ancestors of a node, from parent to root
    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent_id) = current {
            ancestors.push(parent_id);
            current = self.parent(parent_id);
        }
        ancestors
    }

    /// Check if a node is a strict ancestor of another
    fn is_ancestor_of(&self, ancestor: NodeId, descendant: NodeId) -> bool {
        let mut current = self.parent(descendant);
        while let Some(parent_id) = current {
            if parent_id == ancestor {
                return true;
            }
            current = self.parent(parent_id);
        }
        false
    }
}

/// Extension trait providing traversal and search utilities
///
/// Automatically implemented for all types that implement `Tree`.
pub trait TreeTraversal: Tree {
    /// Walk the tree from the root, parents before children
    fn walk(&self) -> TreeWalker<'_, Self>
    where
        Self: Sized,
    {
        TreeWalker::new(self, self.root())
    }

    /// Walk the subtree starting at a specific node
    fn walk_from(&self, start: NodeId) -> TreeWalker<'_, Self>
    where
        Self: Sized,
    {
        TreeWalker::new(self, start)
    }

    /// Get all document nodes
    fn leaves(&self) -> Vec<NodeId>
    where
        Self: Sized,
    {
        self.walk().filter(|&id| self.is_leaf(id)).collect()
    }

    /// Get all folder nodes, the root included
    fn containers(&self) -> Vec<NodeId>
    where
        Self: Sized,
    {
        self.walk().filter(|&id| self.is_container(id)).collect()
    }

    /// Find a folder by its slash-separated name path below the root
    ///
    /// `"Project/Alpha"` resolves the folder `Alpha` in the `Project` bucket.
    /// Only folders are matched, since folder names are unique among siblings.
    fn find_by_path(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root();

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = self
                .children(current)
                .find(|&id| self.is_container(id) && self.name(id) == Some(segment))?;
        }

        Some(current)
    }
}

// Blanket implementation for all Tree types
impl<T: Tree> TreeTraversal for T {}

/// Pre-order iterator over a subtree, in stored child order
pub struct TreeWalker<'a, T: Tree + ?Sized> {
    tree: &'a T,
    stack: Vec<NodeId>,
}

impl<'a, T: Tree + ?Sized> TreeWalker<'a, T> {
    /// Create a new tree walker starting from the given node
    pub fn new(tree: &'a T, start: NodeId) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a, T: Tree + ?Sized> Iterator for TreeWalker<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Push children in reverse so the first child is popped next
        let children: Vec<_> = self.tree.children(current).collect();
        self.stack.extend(children.into_iter().rev());

        Some(current)
    }
}

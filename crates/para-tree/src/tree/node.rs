//! Core node types for the navigation tree

use std::fmt;

use crate::categorization::Bucket;

/// Arena slot of a node within one [`ParaTree`](crate::tree::ParaTree)
///
/// Slots are only meaningful for the tree that issued them. A rebuild produces
/// a fresh arena, so anything that must survive a rebuild uses [`NodeKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node always occupies slot 0
    pub const ROOT: NodeId = NodeId(0);

    /// Create a new NodeId from a usize
    pub const fn new(id: usize) -> Self {
        NodeId(id)
    }

    /// Get the inner usize value
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(id: usize) -> Self {
        NodeId(id)
    }
}

/// Stable, globally unique identity of a node
///
/// Keys are derived from path identity for folders and from the persistent
/// document identifier for documents, so the same vault contents always yield
/// the same keys. They are the addresses used by drag sources and drop targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(String);

impl NodeKey {
    /// Prefix separating document keys from folder paths
    pub const DOCUMENT_PREFIX: &'static str = "doc:";

    /// Key of the tree root
    pub fn root() -> Self {
        NodeKey("root".to_string())
    }

    /// Key of a top-level bucket folder
    pub fn bucket(bucket: Bucket) -> Self {
        NodeKey(bucket.name().to_string())
    }

    /// Key of a folder below `bucket`, addressed by its folder segments
    pub fn folder<S: AsRef<str>>(bucket: Bucket, segments: &[S]) -> Self {
        let mut key = bucket.name().to_string();
        for segment in segments {
            key.push('/');
            key.push_str(segment.as_ref());
        }
        NodeKey(key)
    }

    /// Key of a document node, from its persistent identifier
    pub fn document(id: impl AsRef<str>) -> Self {
        NodeKey(format!("{}{}", Self::DOCUMENT_PREFIX, id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(key: &str) -> Self {
        NodeKey(key.to_string())
    }
}

impl From<String> for NodeKey {
    fn from(key: String) -> Self {
        NodeKey(key)
    }
}

impl AsRef<str> for NodeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The type/kind of a node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A folder - root, bucket, or a categorization path segment
    Container,
    /// A document
    Leaf,
}

impl NodeKind {
    /// Returns true if this is a container node
    pub const fn is_container(self) -> bool {
        matches!(self, NodeKind::Container)
    }

    /// Returns true if this is a leaf node
    pub const fn is_leaf(self) -> bool {
        matches!(self, NodeKind::Leaf)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Container => write!(f, "Folder"),
            NodeKind::Leaf => write!(f, "Document"),
        }
    }
}

/// A single node in the tree
///
/// Generic over the document handle `D`. The handle is opaque to the tree: it is
/// only stored on document nodes and handed back to the document store.
#[derive(Debug, Clone)]
pub struct Node<D> {
    /// Stable identity
    pub key: NodeKey,
    /// Display label: a path segment for folders, the base name for documents
    pub name: String,
    /// Whether this is a folder or a document
    pub kind: NodeKind,
    /// Underlying document, present exactly when `kind` is `Leaf`
    pub document: Option<D>,
}

impl<D> Node<D> {
    /// Create a new folder node
    pub fn folder(key: NodeKey, name: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            kind: NodeKind::Container,
            document: None,
        }
    }

    /// Create a new document node
    pub fn document(key: NodeKey, name: impl Into<String>, document: D) -> Self {
        Self {
            key,
            name: name.into(),
            kind: NodeKind::Leaf,
            document: Some(document),
        }
    }

    /// Returns true if this is a folder node
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// Returns true if this is a document node
    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }
}

impl<D> PartialEq for Node<D> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<D> Eq for Node<D> {}

impl<D> fmt::Display for Node<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - {}", self.name, self.kind, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        assert_eq!(NodeId::ROOT, NodeId(0));
        assert_eq!(NodeId::new(5).get(), 5);
        assert_eq!(NodeId::from(10), NodeId(10));
    }

    #[test]
    fn test_node_keys() {
        assert_eq!(NodeKey::root().as_str(), "root");
        assert_eq!(NodeKey::bucket(Bucket::Area).as_str(), "Area");
        assert_eq!(
            NodeKey::folder(Bucket::Project, &["Alpha", "Beta"]).as_str(),
            "Project/Alpha/Beta"
        );
        let doc = NodeKey::document("notes/Note1.md");
        assert_eq!(doc.as_str(), "doc:notes/Note1.md");
    }

    #[test]
    fn test_node_kind() {
        assert!(NodeKind::Container.is_container());
        assert!(!NodeKind::Container.is_leaf());
        assert!(NodeKind::Leaf.is_leaf());
        assert!(!NodeKind::Leaf.is_container());
    }

    #[test]
    fn test_node() {
        let folder: Node<u32> = Node::folder(NodeKey::from("Project/Alpha"), "Alpha");
        assert_eq!(folder.name, "Alpha");
        assert!(folder.is_container());
        assert!(folder.document.is_none());

        let doc = Node::document(NodeKey::document("a.md"), "a", 7u32);
        assert!(doc.is_leaf());
        assert_eq!(doc.document, Some(7));
    }

    #[test]
    fn test_equality_is_by_key() {
        let a = Node::document(NodeKey::document("a.md"), "a", 1u32);
        let renamed = Node::document(NodeKey::document("a.md"), "other", 2u32);
        let b = Node::document(NodeKey::document("b.md"), "a", 1u32);
        assert_eq!(a, renamed);
        assert_ne!(a, b);
    }
}

//! Arena-backed navigation tree with the four fixed buckets

use std::collections::HashMap;

use crate::builder::ExcludedDocument;
use crate::categorization::{Bucket, Categorization};
use crate::tree::{Node, NodeId, NodeKey, NodeKind, Tree, TreeTraversal};

/// Internal node storage with exclusive parent linkage
#[derive(Debug, Clone)]
struct Slot<D> {
    node: Node<D>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// One line of a pre-order outline, see [`ParaTree::outline`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub depth: usize,
    pub key: NodeKey,
    pub name: String,
    pub kind: NodeKind,
}

/// The navigation tree: a root holding the four bucket folders
///
/// Nodes live in an arena and are never freed; moves only relink slots, so a
/// `NodeId` stays valid for the lifetime of the tree. A side index maps every
/// [`NodeKey`] to its slot for constant-time [`Tree::locate`].
///
/// # Example
///
/// ```
/// use para_tree::prelude::*;
///
/// let tree: ParaTree<()> = ParaTree::new("Vault");
/// assert_eq!(tree.child_count(tree.root()), 4);
/// assert!(tree.locate(&NodeKey::bucket(Bucket::Archive)).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct ParaTree<D> {
    slots: Vec<Slot<D>>,
    index: HashMap<NodeKey, NodeId>,
    buckets: [NodeId; 4],
    excluded: Vec<ExcludedDocument>,
}

impl<D> ParaTree<D> {
    /// Create a tree holding only the root and the four empty buckets
    pub fn new(root_label: impl Into<String>) -> Self {
        let mut tree = Self {
            slots: vec![Slot {
                node: Node::folder(NodeKey::root(), root_label),
                parent: None,
                children: Vec::new(),
            }],
            index: HashMap::from([(NodeKey::root(), NodeId::ROOT)]),
            buckets: [NodeId::ROOT; 4],
            excluded: Vec::new(),
        };

        for (slot, bucket) in Bucket::ALL.into_iter().enumerate() {
            let node = Node::folder(NodeKey::bucket(bucket), bucket.name());
            tree.buckets[slot] = tree.push_slot(NodeId::ROOT, node);
        }

        tree
    }

    /// Label shown for the root, typically the vault name
    pub fn root_label(&self) -> &str {
        &self.slots[NodeId::ROOT.get()].node.name
    }

    /// The folder node of a bucket
    pub fn bucket(&self, bucket: Bucket) -> NodeId {
        self.buckets[bucket as usize]
    }

    /// The bucket a node belongs to, `None` for the root or invalid IDs
    pub fn bucket_of(&self, id: NodeId) -> Option<Bucket> {
        let mut current = id;
        loop {
            if let Some(bucket) = self.as_bucket(current) {
                return Some(bucket);
            }
            current = self.parent(current)?;
        }
    }

    /// The bucket this node is the folder of, if it is one
    pub fn as_bucket(&self, id: NodeId) -> Option<Bucket> {
        Bucket::ALL
            .into_iter()
            .find(|&bucket| self.bucket(bucket) == id)
    }

    /// True for the root and the four bucket folders
    pub fn is_protected(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.as_bucket(id).is_some()
    }

    /// Look up a node by its stable key
    pub fn node(&self, key: &NodeKey) -> Option<&Node<D>> {
        self.locate(key).and_then(|id| self.get(id))
    }

    /// Find a child folder by name
    pub fn child_folder(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .find(|&id| self.is_container(id) && self.name(id) == Some(name))
    }

    /// Append a node at the end of a folder's children
    ///
    /// Returns `None`, leaving the tree untouched, if `parent` is not a folder or
    /// the node's key is already in use.
    pub fn append_child(&mut self, parent: NodeId, node: Node<D>) -> Option<NodeId> {
        if !self.is_container(parent) || self.index.contains_key(&node.key) {
            return None;
        }
        Some(self.push_slot(parent, node))
    }

    /// Children in display order: folders first, then documents
    ///
    /// Stored order is kept within each group.
    pub fn display_children(&self, id: NodeId) -> Vec<NodeId> {
        let (mut folders, documents): (Vec<_>, Vec<_>) =
            self.children(id).partition(|&child| self.is_container(child));
        folders.extend(documents);
        folders
    }

    /// Index of a node within its parent's children
    pub fn position(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.slots[parent.get()]
            .children
            .iter()
            .position(|&child| child == id)
    }

    /// The categorization implied by a node's position
    ///
    /// For a folder this is the value a document placed directly inside it
    /// carries; for a document it is the value of its parent folder. `None`
    /// for the root and invalid IDs.
    pub fn categorization_of(&self, id: NodeId) -> Option<Categorization> {
        let folder = if self.is_leaf(id) { self.parent(id)? } else { id };

        let mut folders = Vec::new();
        let mut current = folder;
        loop {
            if let Some(bucket) = self.as_bucket(current) {
                folders.reverse();
                return Some(Categorization { bucket, folders });
            }
            folders.push(self.name(current)?.to_string());
            current = self.parent(current)?;
        }
    }

    /// Total number of document nodes
    pub fn document_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_leaf()).count()
    }

    /// Document nodes inside a subtree in pre-order, the start node included
    pub fn documents_under(&self, id: NodeId) -> Vec<NodeId> {
        self.walk_from(id)
            .filter(|&node| self.is_leaf(node))
            .collect()
    }

    /// Pre-order listing of the whole tree in stored order
    pub fn outline(&self) -> Vec<OutlineEntry> {
        let mut entries = Vec::with_capacity(self.slots.len());
        let mut stack = vec![(NodeId::ROOT, 0)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.slots[id.get()].node;
            entries.push(OutlineEntry {
                depth,
                key: node.key.clone(),
                name: node.name.clone(),
                kind: node.kind,
            });
            for &child in self.slots[id.get()].children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        entries
    }

    /// Documents left out of the tree by the last build
    pub fn excluded(&self) -> &[ExcludedDocument] {
        &self.excluded
    }

    pub(crate) fn record_excluded(&mut self, excluded: ExcludedDocument) {
        self.excluded.push(excluded);
    }

    /// Unlink a node from its parent, returning where it was
    pub(crate) fn detach(&mut self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.slots.get(id.get())?.parent?;
        let index = self.position(id)?;
        self.slots[parent.get()].children.remove(index);
        self.slots[id.get()].parent = None;
        Some((parent, index))
    }

    /// Link a detached node into `parent` at `index`, clamped to the child count
    pub(crate) fn attach(&mut self, id: NodeId, parent: NodeId, index: usize) -> usize {
        let children = &mut self.slots[parent.get()].children;
        let index = index.min(children.len());
        children.insert(index, id);
        self.slots[id.get()].parent = Some(parent);
        index
    }

    fn push_slot(&mut self, parent: NodeId, node: Node<D>) -> NodeId {
        let id = NodeId::new(self.slots.len());
        self.index.insert(node.key.clone(), id);
        self.slots.push(Slot {
            node,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.slots[parent.get()].children.push(id);
        id
    }
}

impl<D> Tree for ParaTree<D> {
    type Document = D;

    fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn get(&self, id: NodeId) -> Option<&Node<D>> {
        self.slots.get(id.get()).map(|slot| &slot.node)
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id.get())?.parent
    }

    fn children(&self, id: NodeId) -> Box<dyn Iterator<Item = NodeId> + '_> {
        match self.slots.get(id.get()) {
            Some(slot) => Box::new(slot.children.iter().copied()),
            None => Box::new(std::iter::empty()),
        }
    }

    fn node_count(&self) -> usize {
        self.slots.len()
    }

    fn locate(&self, key: &NodeKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> (ParaTree<&'static str>, NodeId, NodeId) {
        let mut tree = ParaTree::new("Vault");
        let project = tree.bucket(Bucket::Project);
        let alpha = tree
            .append_child(
                project,
                Node::folder(NodeKey::folder(Bucket::Project, &["Alpha"]), "Alpha"),
            )
            .unwrap();
        let note = tree
            .append_child(alpha, Node::document(NodeKey::document("n.md"), "n", "n.md"))
            .unwrap();
        (tree, alpha, note)
    }

    #[test]
    fn test_new_tree_has_four_buckets() {
        let tree: ParaTree<()> = ParaTree::new("Vault");
        let names: Vec<_> = tree
            .children(tree.root())
            .map(|id| tree.name(id).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Project", "Area", "Resource", "Archive"]);
        assert_eq!(tree.root_label(), "Vault");
        assert_eq!(tree.document_count(), 0);
        for bucket in Bucket::ALL {
            assert!(tree.is_protected(tree.bucket(bucket)));
            assert_eq!(tree.as_bucket(tree.bucket(bucket)), Some(bucket));
        }
        assert!(tree.is_protected(tree.root()));
    }

    #[test]
    fn test_append_child_rejects_duplicates_and_leaf_parents() {
        let (mut tree, alpha, note) = sample();
        let count = tree.node_count();

        let dup = Node::folder(NodeKey::folder(Bucket::Project, &["Alpha"]), "Alpha");
        assert_eq!(tree.append_child(alpha, dup), None);

        let under_leaf = Node::document(NodeKey::document("x.md"), "x", "x.md");
        assert_eq!(tree.append_child(note, under_leaf), None);
        assert_eq!(tree.node_count(), count);
    }

    #[test]
    fn test_locate_and_child_folder() {
        let (tree, alpha, note) = sample();
        assert_eq!(tree.locate(&NodeKey::from("Project/Alpha")), Some(alpha));
        assert_eq!(tree.locate(&NodeKey::document("n.md")), Some(note));
        assert_eq!(tree.child_folder(tree.bucket(Bucket::Project), "Alpha"), Some(alpha));
        assert_eq!(tree.child_folder(alpha, "n"), None);
        assert_eq!(tree.node(&NodeKey::document("n.md")).unwrap().document, Some("n.md"));
    }

    #[test]
    fn test_categorization_of() {
        let (tree, alpha, note) = sample();
        assert_eq!(tree.categorization_of(note).unwrap().to_string(), "Project/Alpha");
        assert_eq!(tree.categorization_of(alpha).unwrap().to_string(), "Project/Alpha");
        assert_eq!(
            tree.categorization_of(tree.bucket(Bucket::Area)).unwrap().to_string(),
            "Area"
        );
        assert_eq!(tree.categorization_of(tree.root()), None);
        assert_eq!(tree.bucket_of(note), Some(Bucket::Project));
        assert_eq!(tree.bucket_of(tree.root()), None);
    }

    #[test]
    fn test_display_children_puts_folders_first() {
        let mut tree = ParaTree::new("Vault");
        let area = tree.bucket(Bucket::Area);
        let d1 = tree
            .append_child(area, Node::document(NodeKey::document("1"), "one", 1))
            .unwrap();
        let f1 = tree
            .append_child(area, Node::folder(NodeKey::folder(Bucket::Area, &["F"]), "F"))
            .unwrap();
        let d2 = tree
            .append_child(area, Node::document(NodeKey::document("2"), "two", 2))
            .unwrap();

        assert_eq!(tree.display_children(area), vec![f1, d1, d2]);
        let stored: Vec<_> = tree.children(area).collect();
        assert_eq!(stored, vec![d1, f1, d2]);
    }

    #[test]
    fn test_detach_and_attach_clamp() {
        let (mut tree, alpha, note) = sample();
        assert_eq!(tree.detach(note), Some((alpha, 0)));
        assert_eq!(tree.parent(note), None);
        assert_eq!(tree.child_count(alpha), 0);

        let area = tree.bucket(Bucket::Area);
        assert_eq!(tree.attach(note, area, 42), 0);
        assert_eq!(tree.parent(note), Some(area));
        assert_eq!(tree.position(note), Some(0));
    }

    #[test]
    fn test_outline() {
        let (tree, _, _) = sample();
        let keys: Vec<_> = tree
            .outline()
            .into_iter()
            .map(|entry| (entry.depth, entry.key.to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (0, "root".to_string()),
                (1, "Project".to_string()),
                (2, "Project/Alpha".to_string()),
                (3, "doc:n.md".to_string()),
                (1, "Area".to_string()),
                (1, "Resource".to_string()),
                (1, "Archive".to_string()),
            ]
        );
    }
}

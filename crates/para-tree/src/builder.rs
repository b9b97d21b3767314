//! Folding flat document metadata into a [`ParaTree`]

use derive_more::Display;
use log::{debug, info, warn};

use crate::categorization::{Categorization, CategorizationError};
use crate::tree::{Node, NodeId, NodeKey, ParaTree, Tree};

/// Root label used when none is configured
pub const DEFAULT_ROOT_LABEL: &str = "Vault";

/// What the builder needs to know about one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary<D> {
    /// Persistent document identifier, the source of the document's [`NodeKey`]
    pub key: String,
    /// Display name of the document
    pub base_name: String,
    /// Raw categorization property, if the document has one
    pub categorization: Option<String>,
    /// Opaque handle handed back to the document store
    pub document: D,
}

impl<D> DocumentSummary<D> {
    pub fn new(key: impl Into<String>, base_name: impl Into<String>, document: D) -> Self {
        Self {
            key: key.into(),
            base_name: base_name.into(),
            categorization: None,
            document,
        }
    }

    /// Set the categorization property
    pub fn categorization(mut self, value: impl Into<String>) -> Self {
        self.categorization = Some(value.into());
        self
    }
}

/// Why a document was left out of the tree
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ExclusionReason {
    /// No categorization property
    #[display(fmt = "no categorization")]
    Uncategorized,
    /// The property could not be parsed into a bucket path
    #[display(fmt = "{}", _0)]
    Invalid(CategorizationError),
    /// Another document with the same identifier was already placed
    #[display(fmt = "duplicate document identifier")]
    DuplicateKey,
}

/// A document the builder did not place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedDocument {
    pub key: NodeKey,
    pub base_name: String,
    pub reason: ExclusionReason,
}

/// Builds navigation trees from document summaries
///
/// The output depends only on the input sequence: folders are created in
/// first-seen order and documents keep their input order, so building the same
/// input twice yields identical shapes and keys.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    root_label: String,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            root_label: DEFAULT_ROOT_LABEL.to_string(),
        }
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label shown on the root node
    pub fn root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = label.into();
        self
    }

    /// Build a tree from the given documents
    pub fn build<D, I>(&self, documents: I) -> ParaTree<D>
    where
        I: IntoIterator<Item = DocumentSummary<D>>,
    {
        let mut tree = ParaTree::new(self.root_label.clone());

        for summary in documents {
            let key = NodeKey::document(&summary.key);

            let categorization = match Self::parse(summary.categorization.as_deref()) {
                Ok(categorization) => categorization,
                Err(reason) => {
                    debug!("Excluding {}: {}", key, reason);
                    tree.record_excluded(ExcludedDocument {
                        key,
                        base_name: summary.base_name,
                        reason,
                    });
                    continue;
                }
            };

            if tree.locate(&key).is_some() {
                warn!("Skipping {}: identifier already placed", key);
                tree.record_excluded(ExcludedDocument {
                    key,
                    base_name: summary.base_name,
                    reason: ExclusionReason::DuplicateKey,
                });
                continue;
            }

            let Some(folder) = Self::ensure_folder(&mut tree, &categorization) else {
                warn!("Could not create folders for {} ({})", key, categorization);
                continue;
            };

            let node = Node::document(key, summary.base_name, summary.document);
            tree.append_child(folder, node);
        }

        info!(
            "Built navigation tree: {} documents placed, {} excluded",
            tree.document_count(),
            tree.excluded().len()
        );
        tree
    }

    fn parse(raw: Option<&str>) -> Result<Categorization, ExclusionReason> {
        raw.ok_or(ExclusionReason::Uncategorized)?
            .parse()
            .map_err(ExclusionReason::Invalid)
    }

    /// Walk the folder segments below the bucket, creating missing folders
    fn ensure_folder<D>(tree: &mut ParaTree<D>, categorization: &Categorization) -> Option<NodeId> {
        let bucket = categorization.bucket;
        let mut current = tree.bucket(bucket);

        for (depth, segment) in categorization.folders.iter().enumerate() {
            current = match tree.child_folder(current, segment) {
                Some(existing) => existing,
                None => {
                    let key = NodeKey::folder(bucket, &categorization.folders[..=depth]);
                    tree.append_child(current, Node::folder(key, segment.clone()))?
                }
            };
        }

        Some(current)
    }
}

/// Build a tree with the default root label
pub fn build<D, I>(documents: I) -> ParaTree<D>
where
    I: IntoIterator<Item = DocumentSummary<D>>,
{
    TreeBuilder::default().build(documents)
}

//! Drag-and-drop reorganization of the navigation tree
//!
//! A move relinks one node (and its subtree) under another folder and reports
//! the categorization values the affected documents must be given so that the
//! store agrees with the new position. The engine never touches storage.

use derive_more::Display;
use log::debug;

use crate::categorization::Categorization;
use crate::tree::{NodeId, NodeKey, ParaTree, Tree};

/// Move `source` into the folder `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub source: NodeKey,
    pub target: NodeKey,
    /// Position among the target's children once the source is detached.
    /// Clamped to the child count; `None` appends.
    pub index: Option<usize>,
}

impl MoveRequest {
    pub fn new(source: impl Into<NodeKey>, target: impl Into<NodeKey>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            index: None,
        }
    }

    /// Insert at a specific position instead of appending
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Why a move was refused. The tree is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MoveError {
    /// The dragged node no longer exists
    #[display(fmt = "node {} not found", _0)]
    NodeNotFound(NodeKey),
    /// The drop target is missing or is not a folder
    #[display(fmt = "{} is not a valid drop target", _0)]
    InvalidTarget(NodeKey),
    /// The target is the source itself or lies inside it
    #[display(fmt = "cannot move {} into {}", source, target)]
    CyclicMove { source: NodeKey, target: NodeKey },
    /// The root and the bucket folders cannot be moved, and the root takes no children
    #[display(fmt = "{} is protected", _0)]
    ProtectedNode(NodeKey),
    /// The target already holds another folder with the same name
    #[display(fmt = "{} already contains a folder named {:?}", target, name)]
    NameConflict { target: NodeKey, name: String },
}

impl std::error::Error for MoveError {}

/// A categorization value to persist for one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataUpdate<D> {
    pub key: NodeKey,
    pub document: D,
    /// Value implied by the position before the move
    pub previous: Categorization,
    /// Value implied by the position after the move
    pub categorization: Categorization,
}

/// Outcome of a successful move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult<D> {
    pub moved: NodeKey,
    /// Parent the node was detached from
    pub origin: NodeKey,
    /// Index it held there
    pub origin_index: usize,
    pub destination: NodeKey,
    /// Index it holds now, after clamping
    pub index: usize,
    /// Documents whose categorization changed, in pre-order
    pub updates: Vec<MetadataUpdate<D>>,
}

impl<D> MoveResult<D> {
    /// The request that puts the node back where it was
    pub fn rollback(&self) -> MoveRequest {
        MoveRequest {
            source: self.moved.clone(),
            target: self.origin.clone(),
            index: Some(self.origin_index),
        }
    }

    /// True when no document needs a write, e.g. a reorder within one folder
    pub fn is_reorder_only(&self) -> bool {
        self.updates.is_empty()
    }
}

impl<D: Clone> ParaTree<D> {
    /// Validate and apply a move
    ///
    /// Checks run in a fixed order: source exists, target is an existing folder,
    /// no cycle, nothing protected, no folder name clash. The first failing check
    /// is reported.
    pub fn move_node(&mut self, request: &MoveRequest) -> Result<MoveResult<D>, MoveError> {
        let source = self
            .locate(&request.source)
            .ok_or_else(|| MoveError::NodeNotFound(request.source.clone()))?;

        let target = self
            .locate(&request.target)
            .filter(|&id| self.is_container(id))
            .ok_or_else(|| MoveError::InvalidTarget(request.target.clone()))?;

        if source == target || self.is_ancestor_of(source, target) {
            return Err(MoveError::CyclicMove {
                source: request.source.clone(),
                target: request.target.clone(),
            });
        }

        if self.is_protected(source) {
            return Err(MoveError::ProtectedNode(request.source.clone()));
        }
        if target == self.root() {
            return Err(MoveError::ProtectedNode(request.target.clone()));
        }

        if self.is_container(source) {
            let name = self.name(source).unwrap_or_default();
            if self.child_folder(target, name).is_some_and(|id| id != source) {
                return Err(MoveError::NameConflict {
                    target: request.target.clone(),
                    name: name.to_string(),
                });
            }
        }

        let before = self.categorized_documents(source);

        let Some((origin, origin_index)) = self.detach(source) else {
            // Every non-root node has a parent and the root was rejected above
            return Err(MoveError::ProtectedNode(request.source.clone()));
        };
        let index = self.attach(source, target, request.index.unwrap_or(usize::MAX));

        let updates: Vec<_> = before
            .into_iter()
            .filter_map(|(id, previous)| {
                let categorization = self.categorization_of(id)?;
                if categorization == previous {
                    return None;
                }
                let node = self.get(id)?;
                Some(MetadataUpdate {
                    key: node.key.clone(),
                    document: node.document.clone()?,
                    previous,
                    categorization,
                })
            })
            .collect();

        let origin = self.key(origin).cloned().unwrap_or_else(NodeKey::root);
        debug!(
            "Moved {} from {}[{}] to {}[{}], {} document(s) to update",
            request.source,
            origin,
            origin_index,
            request.target,
            index,
            updates.len()
        );

        Ok(MoveResult {
            moved: request.source.clone(),
            origin,
            origin_index,
            destination: request.target.clone(),
            index,
            updates,
        })
    }

    fn categorized_documents(&self, id: NodeId) -> Vec<(NodeId, Categorization)> {
        self.documents_under(id)
            .into_iter()
            .filter_map(|doc| Some((doc, self.categorization_of(doc)?)))
            .collect()
    }
}

/// Validate and apply a move on `tree`
pub fn move_node<D: Clone>(
    tree: &mut ParaTree<D>,
    request: &MoveRequest,
) -> Result<MoveResult<D>, MoveError> {
    tree.move_node(request)
}

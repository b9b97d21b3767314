//! Headless navigation panel
//!
//! Holds everything a front end needs to present the PARA tree: the current tree,
//! per-folder collapse state, the drag gesture in progress and the active
//! document. Gestures arrive one at a time from the UI event loop.

use anyhow::Result;
use log::{debug, info, warn};
use std::collections::HashMap;

use para_tree::prelude::*;
use vault::DocumentStore;

use crate::config::{NavConfig, WriteFailurePolicy};
use crate::render;
use crate::workspace::{OpenMode, PaneHandle, Workspace};

/// Read every document's summary from the store
///
/// A document whose property cannot be read is kept as uncategorized so one
/// broken file does not empty the panel.
pub fn load_summaries<S: DocumentStore>(store: &S) -> Result<Vec<DocumentSummary<S::Handle>>> {
    let handles = store.list_documents()?;
    let mut summaries = Vec::with_capacity(handles.len());

    for handle in handles {
        let categorization = match store.categorization(&handle) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not read categorization of {:?}: {:#}", handle, e);
                None
            }
        };
        summaries.push(DocumentSummary {
            key: store.document_id(&handle),
            base_name: store.base_name(&handle),
            categorization,
            document: handle,
        });
    }

    Ok(summaries)
}

/// Where a dragged node was released
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub container: NodeKey,
    pub index: Option<usize>,
}

impl DropTarget {
    pub fn new(container: impl Into<NodeKey>) -> Self {
        Self {
            container: container.into(),
            index: None,
        }
    }

    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// A categorization write that did not go through
#[derive(Debug, Clone)]
pub struct WriteFailure<H> {
    pub document: H,
    pub value: String,
    pub error: String,
}

/// What happened when a move was persisted
#[derive(Debug, Clone)]
pub struct MoveReport<H> {
    pub result: MoveResult<H>,
    /// Updates written to the store (and reverted again if `rolled_back`)
    pub written: Vec<MetadataUpdate<H>>,
    pub failed: Vec<WriteFailure<H>>,
    /// The tree move was undone because a write failed
    pub rolled_back: bool,
    /// Why the tree move could not be undone; the written documents are then
    /// left at their new value
    pub undo_error: Option<MoveError>,
    /// Written documents whose previous value could not be restored
    pub restore_failed: Vec<WriteFailure<H>>,
}

impl<H> MoveReport<H> {
    /// True when every affected document was written
    pub fn is_persisted(&self) -> bool {
        self.failed.is_empty()
    }

    /// True when the store agrees with the tree after the move or its rollback
    pub fn is_consistent(&self) -> bool {
        (self.failed.is_empty() || self.rolled_back) && self.restore_failed.is_empty()
    }
}

/// Result of ending a drag gesture
#[derive(Debug, Clone)]
pub enum GestureOutcome<H> {
    /// Released outside any drop target, or no gesture was pending
    Cancelled,
    /// The move was refused; nothing changed
    Ignored(MoveError),
    Moved(MoveReport<H>),
}

/// Result of clicking a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A folder was clicked; carries its new expanded state
    Toggled(bool),
    /// A document was opened
    Opened(PaneHandle),
    /// The key no longer exists
    Stale,
}

/// The document shown in the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDocument<H> {
    pub key: NodeKey,
    pub document: H,
    pub pane: PaneHandle,
}

/// Navigation panel over a document store
pub struct NavPanel<S: DocumentStore> {
    store: S,
    config: NavConfig,
    tree: ParaTree<S::Handle>,
    /// Folders with an explicit state; absent means expanded
    expanded: HashMap<NodeKey, bool>,
    dragging: Option<NodeKey>,
    generation: u64,
    active: Option<ActiveDocument<S::Handle>>,
}

impl<S: DocumentStore> NavPanel<S> {
    /// Create a panel and build its first tree
    pub fn new(store: S, config: NavConfig) -> Result<Self> {
        let tree = Self::build_tree(&store, &config)?;
        Ok(Self {
            store,
            config,
            tree,
            expanded: HashMap::new(),
            dragging: None,
            generation: 0,
            active: None,
        })
    }

    fn build_tree(store: &S, config: &NavConfig) -> Result<ParaTree<S::Handle>> {
        let label = config
            .root_label
            .clone()
            .unwrap_or_else(|| store.name().to_string());
        let summaries = load_summaries(store)?;
        Ok(TreeBuilder::new().root_label(label).build(summaries))
    }

    /// Rebuild the tree from the store
    ///
    /// Any drag in progress is cancelled. Collapse state is kept for folders
    /// that still exist.
    pub fn reload(&mut self) -> Result<()> {
        let tree = Self::build_tree(&self.store, &self.config)?;

        if let Some(key) = self.dragging.take() {
            info!("Cancelled drag of {} due to rebuild", key);
        }
        self.expanded.retain(|key, _| tree.locate(key).is_some());
        self.tree = tree;
        self.generation += 1;

        debug!("Rebuilt panel tree, generation {}", self.generation);
        Ok(())
    }

    /// Replace the configuration and rebuild
    pub fn set_config(&mut self, config: NavConfig) -> Result<()> {
        self.config = config;
        self.reload()
    }

    pub fn tree(&self) -> &ParaTree<S::Handle> {
        &self.tree
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the store, e.g. for out-of-band edits
    ///
    /// The tree is not rebuilt automatically; call [`NavPanel::reload`].
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// Number of rebuilds since creation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn active(&self) -> Option<&ActiveDocument<S::Handle>> {
        self.active.as_ref()
    }

    /// Whether a folder shows its children. Unknown keys count as expanded.
    pub fn is_expanded(&self, key: &NodeKey) -> bool {
        self.expanded.get(key).copied().unwrap_or(true)
    }

    /// Set a folder's state, returning false if `key` is not a folder
    pub fn set_expanded(&mut self, key: &NodeKey, expanded: bool) -> bool {
        match self.tree.locate(key) {
            Some(id) if self.tree.is_container(id) => {
                self.expanded.insert(key.clone(), expanded);
                true
            }
            _ => false,
        }
    }

    /// Flip a folder's state, returning the new state
    pub fn toggle(&mut self, key: &NodeKey) -> Option<bool> {
        let expanded = !self.is_expanded(key);
        self.set_expanded(key, expanded).then_some(expanded)
    }

    /// Start dragging a node; false if the key is stale
    pub fn begin_drag(&mut self, key: &NodeKey) -> bool {
        if self.tree.locate(key).is_none() {
            debug!("Ignoring drag of unknown node {}", key);
            return false;
        }
        self.dragging = Some(key.clone());
        true
    }

    /// The node being dragged, if any
    pub fn pending_drag(&self) -> Option<&NodeKey> {
        self.dragging.as_ref()
    }

    /// Finish the current drag gesture
    ///
    /// `None` means the node was released outside any drop target, in which
    /// case no move is attempted.
    pub fn end_drag(&mut self, target: Option<DropTarget>) -> GestureOutcome<S::Handle> {
        let Some(source) = self.dragging.take() else {
            return GestureOutcome::Cancelled;
        };
        let Some(target) = target else {
            debug!("Drag of {} released outside any target", source);
            return GestureOutcome::Cancelled;
        };

        let request = MoveRequest {
            source,
            target: target.container,
            index: target.index,
        };
        match self.apply_move(&request) {
            Ok(report) => GestureOutcome::Moved(report),
            Err(e) => {
                debug!("Ignoring move: {}", e);
                GestureOutcome::Ignored(e)
            }
        }
    }

    /// Move a node and persist the new categorization of affected documents
    pub fn apply_move(&mut self, request: &MoveRequest) -> Result<MoveReport<S::Handle>, MoveError> {
        let result = self.tree.move_node(request)?;
        let policy = self.config.write_failure_policy;

        let mut written = Vec::new();
        let mut failed = Vec::new();
        for update in &result.updates {
            let value = update.categorization.to_string();
            match self.store.set_categorization(&update.document, &value) {
                Ok(()) => written.push(update.clone()),
                Err(e) => {
                    warn!("Failed to persist {} for {}: {:#}", value, update.key, e);
                    failed.push(WriteFailure {
                        document: update.document.clone(),
                        value,
                        error: format!("{:#}", e),
                    });
                    if policy == WriteFailurePolicy::Rollback {
                        break;
                    }
                }
            }
        }

        let mut report = MoveReport {
            result,
            written,
            failed,
            rolled_back: false,
            undo_error: None,
            restore_failed: Vec::new(),
        };
        if !report.failed.is_empty() && policy == WriteFailurePolicy::Rollback {
            self.roll_back(&mut report);
        }
        Ok(report)
    }

    /// Undo the tree move, then restore the documents already written
    ///
    /// If the tree cannot be undone the documents keep their new value so that
    /// they still match the tree.
    fn roll_back(&mut self, report: &mut MoveReport<S::Handle>) {
        if let Err(e) = self.tree.move_node(&report.result.rollback()) {
            warn!("Could not undo move of {}: {}", report.result.moved, e);
            report.undo_error = Some(e);
            return;
        }
        report.rolled_back = true;

        for update in &report.written {
            let previous = update.previous.to_string();
            if let Err(e) = self.store.set_categorization(&update.document, &previous) {
                warn!("Could not restore {} for {}: {:#}", previous, update.key, e);
                report.restore_failed.push(WriteFailure {
                    document: update.document.clone(),
                    value: previous,
                    error: format!("{:#}", e),
                });
            }
        }

        if report.restore_failed.is_empty() {
            info!("Rolled back move of {}", report.result.moved);
        } else {
            warn!(
                "Rolled back move of {}, {} document(s) still carry the new value",
                report.result.moved,
                report.restore_failed.len()
            );
        }
    }

    /// Handle a click: folders toggle, documents open in the workspace
    pub fn activate<W>(&mut self, key: &NodeKey, mode: OpenMode, workspace: &mut W) -> Result<Activation>
    where
        W: Workspace<S::Handle>,
    {
        let Some(node) = self.tree.node(key) else {
            return Ok(Activation::Stale);
        };

        let Some(document) = node.document.clone() else {
            let expanded = self.toggle(key).unwrap_or(true);
            return Ok(Activation::Toggled(expanded));
        };

        let pane = workspace.open(&document, mode)?;
        self.active = Some(ActiveDocument {
            key: key.clone(),
            document,
            pane,
        });
        Ok(Activation::Opened(pane))
    }

    /// Plain-text outline honoring the collapse state
    pub fn render(&self, show_keys: bool) -> String {
        render::render_outline(&self.tree, |key| self.is_expanded(key), show_keys)
    }
}

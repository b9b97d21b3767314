//! Headless PARA navigation panel
//!
//! Connects the [`para_tree`] core to a [`vault::DocumentStore`]: builds the tree
//! from the store, tracks collapse and drag state, persists moves, and renders
//! an outline.

pub mod config;
pub mod panel;
pub mod render;
pub mod watcher;
pub mod workspace;

pub use config::{NavConfig, WriteFailurePolicy, CONFIG_FILE};
pub use panel::{
    load_summaries, Activation, ActiveDocument, DropTarget, GestureOutcome, MoveReport, NavPanel,
    WriteFailure,
};
pub use watcher::{ChangeKind, VaultWatcher};
pub use workspace::{EditorWorkspace, OpenMode, PaneHandle, Workspace};

//! Opening documents into editor panes

use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::process::Command;
use vault::DocumentHandle;

/// Where an opened document should appear
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OpenMode {
    /// Replace the content of the current pane
    #[default]
    Current,
    /// Open in a new tab
    NewTab,
    /// Split the current pane
    Split,
}

/// Identifies a pane returned by the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaneHandle(pub u64);

/// The editor side of the panel: turns a document into an open pane
pub trait Workspace<H> {
    fn open(&mut self, document: &H, mode: OpenMode) -> Result<PaneHandle>;
}

/// Opens vault documents with an external editor command
///
/// Every launch is a new pane as far as the panel is concerned.
pub struct EditorWorkspace {
    program: String,
    vault_root: PathBuf,
    launched: u64,
}

impl EditorWorkspace {
    pub fn new(program: impl Into<String>, vault_root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            vault_root: vault_root.into(),
            launched: 0,
        }
    }
}

impl Workspace<DocumentHandle> for EditorWorkspace {
    fn open(&mut self, document: &DocumentHandle, mode: OpenMode) -> Result<PaneHandle> {
        let path = self.vault_root.join(&document.path);
        info!("Opening {} with {} ({:?})", path.display(), self.program, mode);

        let status = Command::new(&self.program)
            .arg(&path)
            .status()
            .with_context(|| format!("Failed to launch editor {}", self.program))?;
        if !status.success() {
            anyhow::bail!("Editor {} exited with {}", self.program, status);
        }

        self.launched += 1;
        Ok(PaneHandle(self.launched))
    }
}

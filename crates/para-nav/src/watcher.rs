//! File system watcher for out-of-band vault edits
//!
//! Watches the vault directory and reports when the tree must be rebuilt.

use log::{debug, info, trace, warn};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

use crate::config::CONFIG_FILE;

/// What changed on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Documents were added, removed or edited
    Documents,
    /// The navigator configuration file changed
    Config,
    /// Both of the above
    All,
}

impl ChangeKind {
    /// Whether the configuration must be reloaded
    pub fn affects_config(self) -> bool {
        matches!(self, ChangeKind::Config | ChangeKind::All)
    }
}

/// Watches a vault directory for changes
pub struct VaultWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<Result<Event, notify::Error>>,
    root: PathBuf,
}

impl VaultWatcher {
    /// Create a new watcher for the given vault root
    pub fn new(root: &Path, poll_interval: Duration) -> anyhow::Result<Self> {
        info!("Creating VaultWatcher for: {:?}", root);
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default().with_poll_interval(poll_interval),
        )?;

        watcher.watch(root, RecursiveMode::Recursive)?;

        info!("VaultWatcher initialized successfully");
        Ok(Self {
            _watcher: watcher,
            rx,
            root: root.to_path_buf(),
        })
    }

    /// Drain pending events and report whether a rebuild is due
    pub fn poll_changes(&self) -> Option<ChangeKind> {
        let mut result: Option<ChangeKind> = None;

        while let Ok(event) = self.rx.try_recv() {
            match event {
                Ok(event) => {
                    // Reads do not change the tree
                    if matches!(event.kind, EventKind::Access(_)) {
                        trace!("Ignoring access event: {:?}", event);
                        continue;
                    }

                    for path in &event.paths {
                        debug!("File event {:?}: {}", event.kind, path.display());
                    }
                    if let Some(kind) = classify_paths(&self.root, &event.paths) {
                        debug!("Classified event as: {:?}", kind);
                        result = Some(merge_kinds(result, kind));
                    }
                }
                Err(e) => {
                    warn!("File watcher error: {:?}", e);
                }
            }
        }

        if let Some(ref kind) = result {
            info!("poll_changes returning: {:?}", kind);
        }

        result
    }
}

/// Classify the paths of one event
///
/// Paths inside hidden entries (`.obsidian`, `.git`, ...) are ignored, except
/// for the configuration file itself.
pub fn classify_paths(root: &Path, paths: &[PathBuf]) -> Option<ChangeKind> {
    let mut result = None;

    for path in paths {
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };

        let kind = if relative == Path::new(CONFIG_FILE) {
            ChangeKind::Config
        } else if relative
            .components()
            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
        {
            trace!("Ignoring hidden path: {}", path.display());
            continue;
        } else {
            ChangeKind::Documents
        };

        result = Some(merge_kinds(result, kind));
    }

    result
}

/// Merge two change kinds, preferring All if they differ
fn merge_kinds(current: Option<ChangeKind>, new: ChangeKind) -> ChangeKind {
    match current {
        None => new,
        Some(ChangeKind::All) => ChangeKind::All,
        Some(current_kind) if current_kind == new => current_kind,
        Some(_) => ChangeKind::All,
    }
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::thread;

use para_nav::{
    Activation, EditorWorkspace, NavConfig, NavPanel, OpenMode, VaultWatcher,
};
use para_tree::prelude::*;
use vault::MarkdownVault;

/// Browse and reorganize a vault by its PARA categorization
#[derive(Debug, Parser)]
#[command(name = "para-nav", version)]
struct Cli {
    /// Vault root directory
    vault: PathBuf,

    /// Front matter property holding the categorization (overrides the config file)
    #[arg(long)]
    property: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the navigation tree
    Tree {
        /// Show node keys next to names
        #[arg(long)]
        keys: bool,
        /// Folder keys to show collapsed
        #[arg(long, value_name = "KEY")]
        collapse: Vec<String>,
    },
    /// Move a document or folder into another folder and update front matter
    Move {
        /// Key of the node to move
        source: String,
        /// Key of the destination folder
        target: String,
        /// Position within the destination folder
        #[arg(long)]
        index: Option<usize>,
    },
    /// List documents that are not shown in the tree
    Unsorted,
    /// Open a document with an editor
    Open {
        /// Key of the document
        key: String,
        /// Editor command
        #[arg(long, env = "EDITOR", default_value = "vi")]
        editor: String,
        /// Ask for a split pane
        #[arg(long)]
        split: bool,
    },
    /// Print the tree again whenever the vault changes
    Watch,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = NavConfig::load(&cli.vault)?;
    if let Some(property) = cli.property.clone() {
        config = config.property(property);
    }

    let store = MarkdownVault::open(&cli.vault, config.vault.clone())?;
    let root = store.root().to_path_buf();
    let mut panel = NavPanel::new(store, config)?;

    match cli.command.unwrap_or(Command::Tree {
        keys: false,
        collapse: Vec::new(),
    }) {
        Command::Tree { keys, collapse } => {
            for key in collapse {
                if !panel.set_expanded(&NodeKey::from(key.as_str()), false) {
                    eprintln!("No folder with key {}", key);
                }
            }
            println!("{}", panel.render(keys));
        }
        Command::Move {
            source,
            target,
            index,
        } => {
            let request = MoveRequest {
                source: source.into(),
                target: target.into(),
                index,
            };
            let report = panel.apply_move(&request).context("Move refused")?;

            for update in &report.written {
                println!(
                    "{}: {} -> {}",
                    update.document, update.previous, update.categorization
                );
            }
            for failure in &report.failed {
                eprintln!(
                    "{}: could not write {} ({})",
                    failure.document, failure.value, failure.error
                );
            }
            for failure in &report.restore_failed {
                eprintln!(
                    "{}: could not restore {} ({})",
                    failure.document, failure.value, failure.error
                );
            }
            if let Some(e) = &report.undo_error {
                anyhow::bail!("Move could not be undone after a failed write: {}", e);
            }
            if !report.is_consistent() {
                anyhow::bail!("Vault no longer matches the tree; run again after fixing the files above");
            }
            if report.rolled_back {
                anyhow::bail!("Move rolled back after a failed write");
            }
            if report.result.is_reorder_only() {
                println!("Order changed; no front matter to update");
            }
        }
        Command::Unsorted => {
            for excluded in panel.tree().excluded() {
                println!("{}  ({})", excluded.key, excluded.reason);
            }
        }
        Command::Open { key, editor, split } => {
            let mode = if split {
                OpenMode::Split
            } else {
                OpenMode::Current
            };
            let mut workspace = EditorWorkspace::new(editor, root);
            match panel.activate(&NodeKey::from(key.as_str()), mode, &mut workspace)? {
                Activation::Opened(pane) => info!("Opened {} in pane {:?}", key, pane),
                Activation::Toggled(_) => eprintln!("{} is a folder", key),
                Activation::Stale => anyhow::bail!("No node with key {}", key),
            }
        }
        Command::Watch => {
            let interval = panel.config().poll_interval_duration();
            let watcher = VaultWatcher::new(&root, interval)?;
            println!("{}", panel.render(false));

            loop {
                thread::sleep(interval);
                let Some(change) = watcher.poll_changes() else {
                    continue;
                };
                if change.affects_config() {
                    let mut config = NavConfig::load(&root)?;
                    if let Some(property) = cli.property.clone() {
                        config = config.property(property);
                    }
                    panel.store_mut().set_options(config.vault.clone());
                    panel.set_config(config)?;
                } else {
                    panel.reload()?;
                }
                println!();
                println!("{}", panel.render(false));
            }
        }
    }

    Ok(())
}

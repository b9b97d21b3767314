//! Navigator configuration
//!
//! Settings come from an optional `.para-nav.yml` at the vault root; anything
//! missing falls back to the defaults below. Command line flags are applied on
//! top by the binary.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use vault::VaultOptions;

/// Name of the per-vault configuration file
pub const CONFIG_FILE: &str = ".para-nav.yml";

/// What to do when persisting a move fails part way
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteFailurePolicy {
    /// Undo the move in the tree and restore documents already written
    #[default]
    Rollback,
    /// Keep the moved tree and report the documents that could not be written
    Keep,
}

/// Configuration of the navigation panel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Which files form the vault and which property holds the categorization
    #[serde(flatten)]
    pub vault: VaultOptions,

    /// Label of the root node; the vault name when unset
    pub root_label: Option<String>,

    /// Poll interval of the vault watcher in milliseconds
    pub poll_interval_ms: u64,

    /// Behavior when a categorization write fails after a move
    pub write_failure_policy: WriteFailurePolicy,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            vault: VaultOptions::default(),
            root_label: None,
            poll_interval_ms: 500,
            write_failure_policy: WriteFailurePolicy::default(),
        }
    }
}

impl NavConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `.para-nav.yml` from the vault root, or the defaults if it is absent
    pub fn load(vault_root: &Path) -> Result<Self> {
        let path = vault_root.join(CONFIG_FILE);
        if !path.exists() {
            debug!("No {} in {}, using defaults", CONFIG_FILE, vault_root.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_yaml(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Set the front matter property holding the categorization.
    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.vault.property = property.into();
        self
    }

    /// Set the root label.
    pub fn root_label(mut self, label: impl Into<String>) -> Self {
        self.root_label = Some(label.into());
        self
    }

    /// Set the watcher poll interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Set the write failure policy.
    pub fn write_failure_policy(mut self, policy: WriteFailurePolicy) -> Self {
        self.write_failure_policy = policy;
        self
    }

    pub fn poll_interval_duration(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = NavConfig::default();
        assert_eq!(config.vault.property, "PARA");
        assert_eq!(config.vault.extensions, vec!["md"]);
        assert_eq!(config.poll_interval_duration(), Duration::from_millis(500));
        assert_eq!(config.write_failure_policy, WriteFailurePolicy::Rollback);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = NavConfig::from_yaml(
            "property: Category\nroot_label: Notes\nwrite_failure_policy: keep\n",
        )
        .unwrap();
        assert_eq!(config.vault.property, "Category");
        assert_eq!(config.vault.extensions, vec!["md"]);
        assert_eq!(config.root_label.as_deref(), Some("Notes"));
        assert_eq!(config.write_failure_policy, WriteFailurePolicy::Keep);
        assert_eq!(config.poll_interval_ms, 500);
    }

    #[test]
    fn test_load_from_vault() {
        let temp = TempDir::new().unwrap();
        assert_eq!(NavConfig::load(temp.path()).unwrap(), NavConfig::default());

        fs::write(
            temp.path().join(CONFIG_FILE),
            "extensions: [md, markdown]\npoll_interval_ms: 250\n",
        )
        .unwrap();
        let config = NavConfig::load(temp.path()).unwrap();
        assert_eq!(config.vault.extensions, vec!["md", "markdown"]);
        assert_eq!(config.poll_interval_ms, 250);

        fs::write(temp.path().join(CONFIG_FILE), "poll_interval_ms: soon\n").unwrap();
        assert!(NavConfig::load(temp.path()).is_err());
    }

    #[test]
    fn test_builder() {
        let config = NavConfig::new()
            .property("Bucket")
            .root_label("Brain")
            .poll_interval(Duration::from_secs(2))
            .write_failure_policy(WriteFailurePolicy::Keep);
        assert_eq!(config.vault.property, "Bucket");
        assert_eq!(config.root_label.as_deref(), Some("Brain"));
        assert_eq!(config.poll_interval_ms, 2000);
        assert_eq!(config.write_failure_policy, WriteFailurePolicy::Keep);
    }
}

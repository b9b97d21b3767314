use anyhow::{anyhow, Context, Result};
use log::{debug, trace};
use path_clean::PathClean;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::document::DocumentHandle;
use crate::frontmatter;
use crate::options::VaultOptions;
use crate::store::DocumentStore;

/// A directory of markdown notes carrying their categorization in front matter
pub struct MarkdownVault {
    /// The vault's root directory
    root: PathBuf,
    /// Display name, the root directory's name
    name: String,
    options: VaultOptions,
}

impl MarkdownVault {
    /// Open the vault rooted at the given directory
    pub fn open<P: AsRef<Path>>(path: P, options: VaultOptions) -> Result<Self> {
        let path = path.as_ref();
        let root = if path.is_absolute() {
            path.clean()
        } else {
            std::env::current_dir()
                .context("Failed to resolve the current directory")?
                .join(path)
                .clean()
        };

        let metadata = fs::metadata(&root)
            .with_context(|| format!("Failed to open vault at {}", root.display()))?;
        if !metadata.is_dir() {
            return Err(anyhow!("Vault path {} is not a directory", root.display()));
        }

        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Vault")
            .to_string();

        debug!("Opened vault {:?} at {}", name, root.display());
        Ok(Self {
            root,
            name,
            options,
        })
    }

    /// Get the vault's root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &VaultOptions {
        &self.options
    }

    /// Replace the options, e.g. after the configuration file changed
    pub fn set_options(&mut self, options: VaultOptions) {
        self.options = options;
    }

    /// Absolute path of a document
    pub fn full_path(&self, handle: &DocumentHandle) -> PathBuf {
        self.root.join(&handle.path)
    }

    /// Map an absolute path inside the vault to a document handle
    ///
    /// Returns `None` for paths outside the vault or not matching the options.
    pub fn handle_for(&self, path: &Path) -> Option<DocumentHandle> {
        let relative = pathdiff::diff_paths(path, &self.root)?;
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_str()?.to_string()),
                _ => return None,
            }
        }

        let file_name = segments.last()?;
        if !self.options.include_hidden && segments.iter().any(|s| s.starts_with('.')) {
            return None;
        }
        let extension = Path::new(file_name).extension()?.to_str()?;
        if !self.options.is_document_extension(extension) {
            return None;
        }

        Some(DocumentHandle::new(segments.join("/")))
    }

    fn collect(&self, dir: &Path, documents: &mut Vec<DocumentHandle>) -> Result<()> {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;

        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if hidden && !self.options.include_hidden {
                trace!("Skipping hidden entry {}", path.display());
                continue;
            }

            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                self.collect(&path, documents)?;
            } else if file_type.is_file() {
                if let Some(handle) = self.handle_for(&path) {
                    documents.push(handle);
                }
            }
        }

        Ok(())
    }
}

impl DocumentStore for MarkdownVault {
    type Handle = DocumentHandle;

    fn name(&self) -> &str {
        &self.name
    }

    fn list_documents(&self) -> Result<Vec<DocumentHandle>> {
        let mut documents = Vec::new();
        self.collect(&self.root, &mut documents)?;
        documents.sort();
        debug!("Found {} documents in {}", documents.len(), self.root.display());
        Ok(documents)
    }

    fn document_id(&self, handle: &DocumentHandle) -> String {
        handle.path.clone()
    }

    fn base_name(&self, handle: &DocumentHandle) -> String {
        handle.base_name().to_string()
    }

    fn categorization(&self, handle: &DocumentHandle) -> Result<Option<String>> {
        let full_path = self.full_path(handle);
        let content = fs::read_to_string(&full_path)
            .with_context(|| format!("Failed to read file {}", full_path.display()))?;

        frontmatter::get_property(&content, &self.options.property)
            .with_context(|| format!("Invalid front matter in {}", handle))
    }

    fn set_categorization(&mut self, handle: &DocumentHandle, value: &str) -> Result<()> {
        let full_path = self.full_path(handle);
        let content = fs::read_to_string(&full_path)
            .with_context(|| format!("Failed to read file {}", full_path.display()))?;

        let updated = frontmatter::set_property(&content, &self.options.property, value)
            .with_context(|| format!("Invalid front matter in {}", handle))?;

        fs::write(&full_path, updated)
            .with_context(|| format!("Failed to write file {}", full_path.display()))?;

        debug!("Set {} of {} to {:?}", self.options.property, handle, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_vault() -> (TempDir, MarkdownVault) {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        // vault/
        //   Note1.md          PARA: Project/Sprint1
        //   Note2.md          (no front matter)
        //   drawing.excalidraw
        //   sub/Deep.md       PARA: Area
        //   .obsidian/cfg.md

        fs::write(root.join("Note1.md"), "---\nPARA: Project/Sprint1\n---\nplan\n").unwrap();
        fs::write(root.join("Note2.md"), "loose note\n").unwrap();
        fs::write(root.join("drawing.excalidraw"), "{}").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub/Deep.md"), "---\nPARA: Area\n---\n").unwrap();
        fs::create_dir(root.join(".obsidian")).unwrap();
        fs::write(root.join(".obsidian/cfg.md"), "---\nPARA: Archive\n---\n").unwrap();

        let vault = MarkdownVault::open(root, VaultOptions::default()).unwrap();
        (temp, vault)
    }

    #[test]
    fn test_list_documents_skips_hidden_and_foreign_files() {
        let (_temp, vault) = create_test_vault();
        let docs = vault.list_documents().unwrap();
        let paths: Vec<_> = docs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["Note1.md", "Note2.md", "sub/Deep.md"]);
    }

    #[test]
    fn test_include_hidden() {
        let (temp, _) = create_test_vault();
        let vault =
            MarkdownVault::open(temp.path(), VaultOptions::default().include_hidden(true)).unwrap();
        let docs = vault.list_documents().unwrap();
        assert!(docs.contains(&DocumentHandle::new(".obsidian/cfg.md")));
    }

    #[test]
    fn test_read_and_write_categorization() {
        let (_temp, mut vault) = create_test_vault();
        let note1 = DocumentHandle::new("Note1.md");
        let note2 = DocumentHandle::new("Note2.md");

        assert_eq!(
            vault.categorization(&note1).unwrap(),
            Some("Project/Sprint1".to_string())
        );
        assert_eq!(vault.categorization(&note2).unwrap(), None);

        vault.set_categorization(&note2, "Resource/Y").unwrap();
        assert_eq!(vault.categorization(&note2).unwrap(), Some("Resource/Y".to_string()));

        let content = fs::read_to_string(vault.full_path(&note2)).unwrap();
        assert!(content.ends_with("---\nloose note\n"));
    }

    #[test]
    fn test_missing_document_is_an_error() {
        let (_temp, mut vault) = create_test_vault();
        let gone = DocumentHandle::new("Gone.md");
        assert!(vault.categorization(&gone).is_err());
        assert!(vault.set_categorization(&gone, "Area").is_err());
    }

    #[test]
    fn test_open_rejects_files() {
        let (temp, _) = create_test_vault();
        assert!(MarkdownVault::open(temp.path().join("Note1.md"), VaultOptions::default()).is_err());
        assert!(MarkdownVault::open(temp.path().join("missing"), VaultOptions::default()).is_err());
    }

    #[test]
    fn test_handle_for() {
        let (temp, vault) = create_test_vault();
        assert_eq!(
            vault.handle_for(&temp.path().join("sub/Deep.md")),
            Some(DocumentHandle::new("sub/Deep.md"))
        );
        assert_eq!(vault.handle_for(&temp.path().join("drawing.excalidraw")), None);
        assert_eq!(vault.handle_for(&temp.path().join(".obsidian/cfg.md")), None);
    }

    #[test]
    fn test_name_and_base_name() {
        let (temp, vault) = create_test_vault();
        let expected = temp.path().file_name().unwrap().to_str().unwrap();
        assert_eq!(vault.name(), expected);
        assert_eq!(vault.base_name(&DocumentHandle::new("sub/Deep.md")), "Deep");
        assert_eq!(vault.document_id(&DocumentHandle::new("sub/Deep.md")), "sub/Deep.md");
    }
}

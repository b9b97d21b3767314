use anyhow::{bail, Result};
use std::collections::{BTreeMap, HashSet};

use crate::document::DocumentHandle;
use crate::store::DocumentStore;

/// A document store held entirely in memory
///
/// Useful for demos and tests: documents can be edited "out of band" and writes
/// to selected documents can be made to fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    name: String,
    documents: BTreeMap<DocumentHandle, Option<String>>,
    failing_writes: HashSet<DocumentHandle>,
    /// Successful writes left before every write fails
    write_budget: Option<usize>,
    writes: Vec<(DocumentHandle, String)>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a document, builder style
    pub fn with_document(mut self, path: &str, categorization: Option<&str>) -> Self {
        self.insert(path, categorization);
        self
    }

    /// Add or replace a document without going through `set_categorization`
    pub fn insert(&mut self, path: &str, categorization: Option<&str>) {
        self.documents
            .insert(DocumentHandle::new(path), categorization.map(str::to_string));
    }

    /// Remove a document
    pub fn remove(&mut self, path: &str) -> bool {
        self.documents.remove(&DocumentHandle::new(path)).is_some()
    }

    /// Make every write to `path` fail until [`MemoryStore::heal`] is called
    pub fn fail_writes_to(&mut self, path: &str) {
        self.failing_writes.insert(DocumentHandle::new(path));
    }

    /// Let `count` more writes succeed, then fail every write until healed
    pub fn fail_writes_after(&mut self, count: usize) {
        self.write_budget = Some(count);
    }

    /// Stop failing writes
    pub fn heal(&mut self) {
        self.failing_writes.clear();
        self.write_budget = None;
    }

    /// Successful writes, in order
    pub fn writes(&self) -> &[(DocumentHandle, String)] {
        &self.writes
    }

    /// Current categorization of a document, `None` if unset or unknown
    pub fn get(&self, path: &str) -> Option<&str> {
        self.documents
            .get(&DocumentHandle::new(path))
            .and_then(|value| value.as_deref())
    }
}

impl DocumentStore for MemoryStore {
    type Handle = DocumentHandle;

    fn name(&self) -> &str {
        &self.name
    }

    fn list_documents(&self) -> Result<Vec<DocumentHandle>> {
        Ok(self.documents.keys().cloned().collect())
    }

    fn document_id(&self, handle: &DocumentHandle) -> String {
        handle.path.clone()
    }

    fn base_name(&self, handle: &DocumentHandle) -> String {
        handle.base_name().to_string()
    }

    fn categorization(&self, handle: &DocumentHandle) -> Result<Option<String>> {
        match self.documents.get(handle) {
            Some(value) => Ok(value.clone()),
            None => bail!("Document {} does not exist", handle),
        }
    }

    fn set_categorization(&mut self, handle: &DocumentHandle, value: &str) -> Result<()> {
        if self.failing_writes.contains(handle) || self.write_budget == Some(0) {
            bail!("Write to {} refused", handle);
        }
        let Some(slot) = self.documents.get_mut(handle) else {
            bail!("Document {} does not exist", handle);
        };
        *slot = Some(value.to_string());
        if let Some(budget) = self.write_budget.as_mut() {
            *budget -= 1;
        }
        self.writes.push((handle.clone(), value.to_string()));
        Ok(())
    }
}

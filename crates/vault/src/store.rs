use anyhow::Result;
use std::fmt;

/// The source of truth for documents and their categorization
///
/// The navigation tree is derived from what a store reports and every move is
/// persisted back through [`DocumentStore::set_categorization`].
pub trait DocumentStore {
    /// Opaque reference to one document
    type Handle: Clone + fmt::Debug;

    /// Display name of the store, shown as the tree's root label
    fn name(&self) -> &str;

    /// Enumerate all documents, in a deterministic order
    fn list_documents(&self) -> Result<Vec<Self::Handle>>;

    /// Persistent identifier of a document, stable across enumerations
    fn document_id(&self, handle: &Self::Handle) -> String;

    /// Display name of a document
    fn base_name(&self, handle: &Self::Handle) -> String;

    /// Read the categorization property
    ///
    /// `Ok(None)` when the document has no such property.
    fn categorization(&self, handle: &Self::Handle) -> Result<Option<String>>;

    /// Write the categorization property
    fn set_categorization(&mut self, handle: &Self::Handle, value: &str) -> Result<()>;
}

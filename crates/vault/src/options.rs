//! Options controlling which files form a vault and where categorization lives

use serde::{Deserialize, Serialize};

/// Front matter property holding the categorization by default
pub const DEFAULT_PROPERTY: &str = "PARA";

/// Options for opening a vault
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultOptions {
    /// Front matter key holding the categorization string
    pub property: String,

    /// File extensions (without dot) treated as documents
    pub extensions: Vec<String>,

    /// Whether to descend into hidden entries such as `.obsidian` or `.git`
    pub include_hidden: bool,
}

impl Default for VaultOptions {
    fn default() -> Self {
        Self {
            property: DEFAULT_PROPERTY.to_string(),
            extensions: vec!["md".to_string()],
            include_hidden: false,
        }
    }
}

impl VaultOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the front matter key holding the categorization.
    pub fn property(mut self, property: impl Into<String>) -> Self {
        self.property = property.into();
        self
    }

    /// Set the document file extensions.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Include or skip hidden files and directories.
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Whether a file with this extension is a document
    pub fn is_document_extension(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(extension))
    }
}

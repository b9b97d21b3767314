use derive_more::{Display, From};

/// A note in a vault, addressed by its vault-relative path
///
/// Paths always use `/` as separator regardless of platform, so handles are
/// stable identifiers across machines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From)]
#[display(fmt = "{}", path)]
pub struct DocumentHandle {
    /// Path relative to the vault root
    pub path: String,
}

impl DocumentHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The file name without directories or extension
    pub fn base_name(&self) -> &str {
        let file_name = self.path.rsplit('/').next().unwrap_or(&self.path);
        match file_name.rfind('.') {
            Some(dot) if dot > 0 => &file_name[..dot],
            _ => file_name,
        }
    }
}

impl From<&str> for DocumentHandle {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

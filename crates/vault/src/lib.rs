// Document store access for the PARA navigator
// This crate reads and writes the categorization property of notes in a vault

mod document;
pub mod frontmatter;
mod markdown;
mod memory;
mod options;
mod store;

pub use document::DocumentHandle;
pub use markdown::MarkdownVault;
pub use memory::MemoryStore;
pub use options::VaultOptions;
pub use store::DocumentStore;

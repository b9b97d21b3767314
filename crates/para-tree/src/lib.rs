//! PARA navigation tree
//!
//! Folds a flat set of notes into a navigation tree grouped by the four PARA
//! buckets (Project, Area, Resource, Archive), using each note's categorization
//! property rather than its storage path, and reorganizes that tree through
//! drag-and-drop moves.
//!
//! # Core Concepts
//!
//! - **ParaTree**: the tree itself; root, four protected buckets, folders, documents
//! - **NodeKey**: stable identity used to address nodes across rebuilds
//! - **TreeBuilder**: turns [`DocumentSummary`](builder::DocumentSummary) values into a tree
//! - **MoveRequest**: a validated relocation yielding the metadata to persist
//!
//! # Example
//!
//! ```
//! use para_tree::prelude::*;
//!
//! let mut tree = build(vec![
//!     DocumentSummary::new("Note1.md", "Note1", "Note1.md").categorization("Project/Sprint1"),
//!     DocumentSummary::new("Note2.md", "Note2", "Note2.md"),
//! ]);
//! assert_eq!(tree.document_count(), 1);
//!
//! let result = tree
//!     .move_node(&MoveRequest::new(NodeKey::document("Note1.md"), "Resource"))
//!     .unwrap();
//! assert_eq!(result.updates[0].categorization.to_string(), "Resource");
//! ```

pub mod builder;
pub mod categorization;
pub mod reorganize;
pub mod tree;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::builder::{
        build, DocumentSummary, ExcludedDocument, ExclusionReason, TreeBuilder,
    };
    pub use crate::categorization::{Bucket, Categorization, CategorizationError};
    pub use crate::reorganize::{move_node, MetadataUpdate, MoveError, MoveRequest, MoveResult};
    pub use crate::tree::prelude::*;
}

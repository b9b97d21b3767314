//! Buckets and the slash-separated categorization property
//!
//! A categorization string such as `"Project/Sprint1/Backend"` names a bucket
//! followed by the folder segments below it.

use derive_more::Display;
use std::fmt;
use std::str::FromStr;

/// One of the four fixed top-level folders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum Bucket {
    #[display(fmt = "Project")]
    Project,
    #[display(fmt = "Area")]
    Area,
    #[display(fmt = "Resource")]
    Resource,
    #[display(fmt = "Archive")]
    Archive,
}

impl Bucket {
    /// All buckets in display order
    pub const ALL: [Bucket; 4] = [
        Bucket::Project,
        Bucket::Area,
        Bucket::Resource,
        Bucket::Archive,
    ];

    /// The bucket name as it appears in the categorization property
    pub const fn name(self) -> &'static str {
        match self {
            Bucket::Project => "Project",
            Bucket::Area => "Area",
            Bucket::Resource => "Resource",
            Bucket::Archive => "Archive",
        }
    }

    /// Look up a bucket by its exact name
    pub fn from_name(name: &str) -> Option<Bucket> {
        Bucket::ALL.into_iter().find(|b| b.name() == name)
    }
}

/// Why a categorization string could not be placed in the tree
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum CategorizationError {
    /// The property is present but holds no segments
    #[display(fmt = "categorization is empty")]
    Empty,
    /// The first segment is not one of the four bucket names
    #[display(fmt = "unknown bucket {:?}", _0)]
    UnknownBucket(String),
}

impl std::error::Error for CategorizationError {}

impl FromStr for Bucket {
    type Err = CategorizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bucket::from_name(s).ok_or_else(|| CategorizationError::UnknownBucket(s.to_string()))
    }
}

/// A parsed categorization: a bucket plus the folder path below it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Categorization {
    pub bucket: Bucket,
    pub folders: Vec<String>,
}

impl Categorization {
    /// Categorization placing a document directly in `bucket`
    pub fn new(bucket: Bucket) -> Self {
        Self {
            bucket,
            folders: Vec::new(),
        }
    }

    /// Append a folder segment
    pub fn folder(mut self, name: impl Into<String>) -> Self {
        self.folders.push(name.into());
        self
    }
}

impl FromStr for Categorization {
    type Err = CategorizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.trim().split('/').filter(|segment| !segment.is_empty());
        let first = segments.next().ok_or(CategorizationError::Empty)?;
        let bucket = first.parse::<Bucket>()?;

        Ok(Self {
            bucket,
            folders: segments.map(str::to_string).collect(),
        })
    }
}

impl fmt::Display for Categorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bucket.name())?;
        for folder in &self.folders {
            write!(f, "/{}", folder)?;
        }
        Ok(())
    }
}

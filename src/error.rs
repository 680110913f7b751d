//! Error types for loading, parsing and indexing content

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while building the article collection
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed front-matter in {path:?}: {reason}")]
    MalformedFrontmatter { path: PathBuf, reason: String },

    #[error("Cannot derive a slug from {path:?}")]
    InvalidSlug { path: PathBuf },

    #[error("Duplicate slug '{slug}' in {path:?} (already used by {existing:?})")]
    DuplicateSlug {
        slug: String,
        path: PathBuf,
        existing: PathBuf,
    },

    #[error("IO error in {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedFrontmatter {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The source file this error is about, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound(_) => None,
            Self::MalformedFrontmatter { path, .. }
            | Self::InvalidSlug { path }
            | Self::DuplicateSlug { path, .. }
            | Self::Io { path, .. } => Some(path.as_path()),
        }
    }
}

/// A body that could not be rendered fully and fell back to plain text.
///
/// This is a warning: the article is still indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDegradation {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for RenderDegradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rendered {:?} as plain text: {}",
            self.path, self.reason
        )
    }
}

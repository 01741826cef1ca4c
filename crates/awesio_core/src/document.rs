//! Document representation.
//!
//! A document is the parsed content of one data file. Mappings keep their
//! source order (`serde_json` is built with `preserve_order`), so a document
//! written back out lists its keys exactly as they were read.

use std::path::{Path, PathBuf};

/// An ordered tree of mappings, sequences and scalars.
pub type Document = serde_json::Value;

/// What a caller hands to the validation entry point.
///
/// A path is loaded (resolving `!include` directives) before validation;
/// an in-memory document bypasses loading entirely.
///
/// # Example
///
/// ```rust
/// use awesio_core::ValidationInput;
/// use serde_json::json;
///
/// let from_path = ValidationInput::from("examples/wind_resource.yml");
/// assert!(from_path.path().is_some());
///
/// let in_memory = ValidationInput::from(json!({"metadata": {"n_clusters": 1}}));
/// assert!(in_memory.path().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationInput {
    /// A data file on disk
    Path(PathBuf),
    /// An already-built document
    Document(Document),
}

impl ValidationInput {
    /// Returns the input path, if this input refers to a file.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ValidationInput::Path(path) => Some(path),
            ValidationInput::Document(_) => None,
        }
    }

    /// Short human-readable label used in logs.
    pub fn describe(&self) -> String {
        match self {
            ValidationInput::Path(path) => path.display().to_string(),
            ValidationInput::Document(_) => "<in-memory document>".to_string(),
        }
    }
}

impl From<PathBuf> for ValidationInput {
    fn from(path: PathBuf) -> Self {
        ValidationInput::Path(path)
    }
}

impl From<&Path> for ValidationInput {
    fn from(path: &Path) -> Self {
        ValidationInput::Path(path.to_path_buf())
    }
}

impl From<&str> for ValidationInput {
    fn from(path: &str) -> Self {
        ValidationInput::Path(PathBuf::from(path))
    }
}

impl From<String> for ValidationInput {
    fn from(path: String) -> Self {
        ValidationInput::Path(PathBuf::from(path))
    }
}

impl From<Document> for ValidationInput {
    fn from(document: Document) -> Self {
        ValidationInput::Document(document)
    }
}

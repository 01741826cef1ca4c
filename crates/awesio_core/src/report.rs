//! Structural error reports.
//!
//! One structural validation pass walks the whole schema against the whole
//! document and collects every violation it finds. The collected violations
//! are surfaced together as an [`ErrorReport`] rather than one at a time.

use serde::{Serialize, Serializer};
use std::fmt;

/// One step in a path through a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Mapping key
    Key(String),
    /// Sequence index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Location of a value inside a document.
///
/// Displayed as dot-joined segments (`clusters.0.u_normalized`); the empty
/// path is displayed as `root`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from its segments.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    /// Parses an RFC 6901 JSON pointer (`/clusters/0/id`).
    ///
    /// Purely numeric tokens become [`PathSegment::Index`]; `~1` and `~0`
    /// escapes are decoded in keys.
    pub fn from_json_pointer(pointer: &str) -> Self {
        let segments = pointer
            .split('/')
            .skip(1)
            .map(|token| {
                let token = token.replace("~1", "/").replace("~0", "~");
                match token.parse::<usize>() {
                    Ok(index) if !token.starts_with('+') => PathSegment::Index(index),
                    _ => PathSegment::Key(token),
                }
            })
            .collect();
        Self { segments }
    }

    /// Returns a new path extended by a mapping key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    /// Returns a new path extended by a sequence index.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns the path segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns true for the document root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("root");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single schema-conformance failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Where in the document the failure was found
    pub path: FieldPath,

    /// What went wrong
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  - At '{}': {}", self.path, self.message)
    }
}

/// Every violation found in one structural validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Identifier of the schema the document was checked against
    pub schema_id: String,

    /// Violations in the order they were discovered
    pub violations: Vec<Violation>,
}

impl ErrorReport {
    /// Creates a report for the given schema.
    pub fn new(schema_id: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            schema_id: schema_id.into(),
            violations,
        }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if the pass found nothing.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns true if some violation points at `path` (dotted form).
    pub fn mentions_path(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path.to_string() == path)
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed for schema '{}':", self.schema_id)?;
        for violation in &self.violations {
            write!(f, "\n{violation}")?;
        }
        Ok(())
    }
}

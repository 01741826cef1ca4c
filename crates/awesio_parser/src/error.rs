//! Error types for loading and writing documents.

use awesio_core::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading or writing a document.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Referenced file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// `!include` target with an extension the loader cannot read
    #[error("Unsupported file extension: {extension} ({})", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Malformed YAML
    #[error("Failed to parse {}{}: {message}", .path.display(), format_location(.line, .column))]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    /// Content that parses as YAML but cannot become a document
    #[error("Invalid content in {}: {message}", .path.display())]
    InvalidContent { path: PathBuf, message: String },

    /// A file includes itself, directly or through other files
    #[error("Include cycle detected: {}", format_chain(.0))]
    IncludeCycle(Vec<PathBuf>),

    /// Columnar data file could not be read
    #[error("Failed to read columnar data from {}: {message}", .path.display())]
    Columnar { path: PathBuf, message: String },

    /// Serialization failed while writing
    #[error("Failed to serialize document: {0}")]
    Serialize(String),

    /// File I/O error
    #[error("File I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParserError {
    /// Maps an I/O failure on `path`, keeping "not found" distinct.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Wraps a YAML syntax error with the file it came from.
    pub fn parse(path: &Path, error: serde_yaml_ng::Error) -> Self {
        let location = error.location();
        Self::Parse {
            path: path.to_path_buf(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
            message: error.to_string(),
        }
    }

    /// Creates an invalid-content error.
    pub fn invalid(path: &Path, message: impl Into<String>) -> Self {
        Self::InvalidContent {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Creates a columnar read error.
    pub fn columnar(path: &Path, message: impl Into<String>) -> Self {
        Self::Columnar {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Returns the taxonomy category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParserError::NotFound(_) => ErrorKind::NotFound,
            ParserError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ParserError::Parse { .. }
            | ParserError::InvalidContent { .. }
            | ParserError::IncludeCycle(_)
            | ParserError::Columnar { .. } => ErrorKind::ParseFailure,
            ParserError::Serialize(_) | ParserError::Io { .. } => ErrorKind::Io,
        }
    }
}

fn format_location(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" at line {line}, column {column}"),
        (Some(line), None) => format!(" at line {line}"),
        _ => String::new(),
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

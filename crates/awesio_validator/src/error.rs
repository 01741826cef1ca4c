//! Error types for validation operations.

use awesio_core::{ErrorKind, ErrorReport};
use awesio_parser::ParserError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// No `<type>.yaml` or `<type>.yml` under the schema directory
    #[error("Schema file for '{schema_type}' not found in {}", .dir.display())]
    SchemaNotFound { schema_type: String, dir: PathBuf },

    /// A `$ref` URI the registry cannot serve
    #[error("No such schema resource: {uri}")]
    NoSuchResource { uri: String },

    /// No schema type given and none declared in `metadata.schema`
    #[error("Cannot determine schema type for {0}: metadata.schema is missing")]
    UnknownSchemaType(String),

    /// Loading the data file or a schema file failed
    #[error(transparent)]
    Load(#[from] ParserError),

    /// The schema document is not itself a valid schema
    #[error("Schema '{schema_id}' is invalid: {message}")]
    SchemaSelfInvalid { schema_id: String, message: String },

    /// The schema is well-formed but could not be compiled
    #[error("Failed to compile schema '{schema_id}': {message}")]
    Compile { schema_id: String, message: String },

    /// One or more schema-conformance failures
    #[error("{0}")]
    Structural(ErrorReport),

    /// A cross-field domain rule failed
    #[error("Consistency check '{rule}' failed: {message}")]
    Consistency { rule: String, message: String },
}

impl ValidationError {
    /// Creates a schema-not-found error.
    pub fn schema_not_found(schema_type: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self::SchemaNotFound {
            schema_type: schema_type.into(),
            dir: dir.into(),
        }
    }

    /// Creates a no-such-resource error.
    pub fn no_such_resource(uri: impl Into<String>) -> Self {
        Self::NoSuchResource { uri: uri.into() }
    }

    /// Creates a schema self-check error.
    pub fn schema_invalid(schema_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaSelfInvalid {
            schema_id: schema_id.into(),
            message: message.into(),
        }
    }

    /// Creates a consistency rule error.
    pub fn consistency(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Consistency {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Returns the taxonomy category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::SchemaNotFound { .. }
            | ValidationError::NoSuchResource { .. }
            | ValidationError::UnknownSchemaType(_) => ErrorKind::NotFound,
            ValidationError::Load(e) => e.kind(),
            ValidationError::SchemaSelfInvalid { .. } | ValidationError::Compile { .. } => {
                ErrorKind::SchemaSelfInvalid
            }
            ValidationError::Structural(_) => ErrorKind::StructuralViolation,
            ValidationError::Consistency { .. } => ErrorKind::ConsistencyViolation,
        }
    }

    /// Returns the structural report, if this is a structural failure.
    pub fn report(&self) -> Option<&ErrorReport> {
        match self {
            ValidationError::Structural(report) => Some(report),
            _ => None,
        }
    }
}

/// Result type alias for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

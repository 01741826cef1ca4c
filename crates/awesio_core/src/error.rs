//! Failure taxonomy.
//!
//! Every error type in the workspace maps onto exactly one [`ErrorKind`], so
//! callers can tell a missing file from a malformed schema from a data
//! failure without matching on crate-specific variants.

use serde::Serialize;
use std::fmt;

/// Category of a validation or loading failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced file or schema does not exist
    NotFound,

    /// An `!include` target has an unrecognised extension
    UnsupportedFormat,

    /// Malformed source syntax
    ParseFailure,

    /// The schema document itself is not a valid schema
    SchemaSelfInvalid,

    /// One or more schema-conformance failures, aggregated
    StructuralViolation,

    /// A cross-field domain rule failed
    ConsistencyViolation,

    /// Reading or writing failed for a reason other than a missing file
    Io,
}

impl ErrorKind {
    /// Returns the snake_case name used in machine-readable output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::ParseFailure => "parse_failure",
            ErrorKind::SchemaSelfInvalid => "schema_self_invalid",
            ErrorKind::StructuralViolation => "structural_violation",
            ErrorKind::ConsistencyViolation => "consistency_violation",
            ErrorKind::Io => "io",
        }
    }

    /// Returns true for failures caused by the data rather than the setup
    /// (missing files, bad schemas).
    pub fn is_data_failure(&self) -> bool {
        matches!(
            self,
            ErrorKind::StructuralViolation | ErrorKind::ConsistencyViolation
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_failures() {
        assert!(ErrorKind::StructuralViolation.is_data_failure());
        assert!(ErrorKind::ConsistencyViolation.is_data_failure());
        assert!(!ErrorKind::SchemaSelfInvalid.is_data_failure());
        assert!(!ErrorKind::NotFound.is_data_failure());
    }

    #[test]
    fn test_serialized_name_matches_display() {
        let json = serde_json::to_value(ErrorKind::SchemaSelfInvalid).unwrap();
        assert_eq!(json, "schema_self_invalid");
        assert_eq!(ErrorKind::SchemaSelfInvalid.to_string(), "schema_self_invalid");
    }
}

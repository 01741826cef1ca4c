//! File format detection for `!include` targets.

use crate::{ParserError, Result};
use std::path::Path;

/// Formats an `!include` directive can splice into a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeFormat {
    /// Nested YAML document (.yaml, .yml), loaded with the same rules
    Yaml,
    /// Columnar text data (.csv), one list per column
    Csv,
    /// Gridded netCDF data (.nc)
    NetCdf,
}

/// Detect the include format from a file path based on its extension.
///
/// Extensions are matched case-insensitively.
///
/// # Errors
///
/// Returns `ParserError::UnsupportedFormat` for a missing or unrecognised
/// extension.
pub fn detect_format(path: &Path) -> Result<IncludeFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "yaml" | "yml" => Ok(IncludeFormat::Yaml),
        "csv" => Ok(IncludeFormat::Csv),
        "nc" => Ok(IncludeFormat::NetCdf),
        _ => Err(ParserError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: if extension.is_empty() {
                "<none>".to_string()
            } else {
                format!(".{extension}")
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_format_yaml() {
        assert_eq!(
            detect_format(Path::new("tether.yaml")).unwrap(),
            IncludeFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("tether.YML")).unwrap(),
            IncludeFormat::Yaml
        );
    }

    #[test]
    fn test_detect_format_columnar() {
        assert_eq!(
            detect_format(Path::new("profiles.csv")).unwrap(),
            IncludeFormat::Csv
        );
        assert_eq!(
            detect_format(Path::new("era5.nc")).unwrap(),
            IncludeFormat::NetCdf
        );
    }

    #[test]
    fn test_detect_format_unsupported() {
        let err = detect_format(Path::new("data.json")).unwrap_err();
        match err {
            ParserError::UnsupportedFormat { extension, .. } => assert_eq!(extension, ".json"),
            other => panic!("Expected UnsupportedFormat, got: {other}"),
        }
    }

    #[test]
    fn test_detect_format_no_extension() {
        let err = detect_format(Path::new("data")).unwrap_err();
        assert!(matches!(err, ParserError::UnsupportedFormat { .. }));
    }
}

//! Schema directory resolution and the batch manifest.

use anyhow::{Context, Result};
use awesio_core::ValidationOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the schema directory.
pub const SCHEMA_DIR_ENV: &str = "AWESIO_SCHEMA_DIR";

/// Schema directory used when nothing else is configured.
pub const DEFAULT_SCHEMA_DIR: &str = "schemas";

/// Picks the schema directory: explicit flag, then environment, then `./schemas`.
pub fn resolve_schema_dir(flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| std::env::var_os(SCHEMA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_DIR))
}

/// A batch of files to validate, read from TOML.
///
/// ```toml
/// schema_dir = "../schemas"
/// restrictive = true
///
/// [[validations]]
/// file = "wind_resource.yml"
/// schema = "wind_resource_schema"
/// ```
///
/// Relative paths are taken from the manifest's directory.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub schema_dir: Option<PathBuf>,

    #[serde(default)]
    pub restrictive: bool,

    #[serde(default)]
    pub defaults: bool,

    #[serde(default)]
    pub validations: Vec<ManifestEntry>,
}

/// One file to validate; without `schema` the type comes from `metadata.schema`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestEntry {
    pub file: PathBuf,
    pub schema: Option<String>,
}

impl Manifest {
    /// Reads a manifest and resolves its paths against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let mut manifest: Manifest = toml::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        manifest.schema_dir = manifest.schema_dir.map(|dir| base.join(dir));
        for entry in &mut manifest.validations {
            entry.file = base.join(&entry.file);
        }
        Ok(manifest)
    }

    pub fn options(&self) -> ValidationOptions {
        ValidationOptions::new()
            .with_restrictive(self.restrictive)
            .with_defaults(self.defaults)
    }
}

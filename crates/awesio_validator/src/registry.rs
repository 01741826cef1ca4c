//! Schema registry.
//!
//! Maps schema-type names to schema files under one root directory and
//! serves `$ref` URIs that point at sibling schema files. Every file is
//! loaded at most once per registry; clones share the cache, independent
//! registries do not.

use crate::{Result, ValidationError};
use awesio_parser::Loader;
use jsonschema::{Retrieve, Uri};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// File extensions accepted for schema files, in lookup order.
pub const SCHEMA_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

type Cache = HashMap<PathBuf, Arc<Value>>;

/// Lazily populated, shareable schema store rooted at one directory.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    root: PathBuf,
    uri_prefix: Option<String>,
    cache: Arc<Mutex<Cache>>,
}

impl SchemaRegistry {
    /// Creates an empty registry over `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            uri_prefix: None,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Strips `prefix` from `$ref` URI paths before resolving them under the root.
    pub fn with_uri_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.uri_prefix = Some(prefix.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of schema files loaded so far.
    pub fn cached(&self) -> usize {
        self.lock().len()
    }

    /// Locates the schema file for `schema_type`, trying each accepted extension.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::SchemaNotFound` if no variant exists.
    pub fn schema_path(&self, schema_type: &str) -> Result<PathBuf> {
        SCHEMA_EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{schema_type}.{ext}")))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ValidationError::schema_not_found(schema_type, &self.root))
    }

    /// Loads the schema for `schema_type`.
    pub fn load_schema(&self, schema_type: &str) -> Result<Arc<Value>> {
        let path = self.schema_path(schema_type)?;
        self.load_path(&path)
    }

    /// Resolves a `$ref` URI (absolute or relative) to a schema document.
    ///
    /// Any fragment is ignored; the whole document is returned.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NoSuchResource` if the URI does not name a
    /// schema file by its suffix, and a not-found load error if it names one
    /// that does not exist.
    pub fn resolve_uri(&self, uri: &str) -> Result<Arc<Value>> {
        let location = uri.split('#').next().unwrap_or(uri);
        if !has_schema_suffix(location) {
            return Err(ValidationError::no_such_resource(uri));
        }

        let path = self.uri_path(location);
        debug!("Resolved schema URI {} to {}", uri, path.display());
        self.load_path(&path)
    }

    fn uri_path(&self, location: &str) -> PathBuf {
        let relative = match location.split_once("://") {
            Some((_, rest)) => rest.split_once('/').map(|(_, path)| path).unwrap_or(""),
            None => location,
        };
        let mut relative = relative.trim_start_matches('/');

        if let Some(prefix) = &self.uri_prefix {
            if let Some(stripped) = relative.strip_prefix(prefix.trim_matches('/')) {
                relative = stripped.trim_start_matches('/');
            }
        }

        let candidate = self.root.join(relative);
        if candidate.is_file() {
            return candidate;
        }

        let file_name = relative.rsplit('/').next().unwrap_or(relative);
        self.root.join(file_name)
    }

    fn load_path(&self, path: &Path) -> Result<Arc<Value>> {
        // Held across the load so concurrent first lookups parse the file once.
        let mut cache = self.lock();
        if let Some(schema) = cache.get(path) {
            debug!("Schema cache hit: {}", path.display());
            return Ok(Arc::clone(schema));
        }

        debug!("Loading schema {}", path.display());
        let schema = Arc::new(Loader::new().load(path)?);
        cache.insert(path.to_path_buf(), Arc::clone(&schema));
        Ok(schema)
    }

    fn lock(&self) -> MutexGuard<'_, Cache> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn retriever(&self) -> RegistryRetriever {
        RegistryRetriever {
            registry: self.clone(),
            misses: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

fn has_schema_suffix(location: &str) -> bool {
    let lower = location.to_lowercase();
    SCHEMA_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}

/// Serves `$ref` lookups for the schema compiler from a [`SchemaRegistry`].
///
/// The compiler only sees an opaque error from a failed lookup, so the URIs
/// that could not be served are recorded for the caller to report.
pub(crate) struct RegistryRetriever {
    registry: SchemaRegistry,
    misses: Arc<Mutex<Vec<String>>>,
}

impl RegistryRetriever {
    pub(crate) fn misses(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.misses)
    }
}

impl Retrieve for RegistryRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> std::result::Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri = uri.as_str();
        match self.registry.resolve_uri(uri) {
            Ok(schema) => Ok(schema.as_ref().clone()),
            Err(e) => {
                self.misses
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(uri.to_string());
                Err(Box::new(e))
            }
        }
    }
}

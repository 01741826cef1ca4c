//! Document loading with `!include` resolution.
//!
//! A scalar tagged `!include` names a file relative to the including file's
//! directory. The tagged node is replaced by that file's parsed content
//! before the parent document is finished: YAML files are loaded
//! recursively with the same options, columnar files are flattened into a
//! mapping of variables.

use crate::columnar::{read_csv, read_netcdf};
use crate::format::{IncludeFormat, detect_format};
use crate::numeric::as_numeric_array;
use crate::{ParserError, Result};
use awesio_core::Document;
use serde_json::{Map, Number, Value};
use serde_yaml_ng::value::{Tag, TaggedValue};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The YAML tag that splices another file into a document.
pub const INCLUDE_TAG: &str = "!include";

/// Options controlling how documents are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Normalise rectangular numeric sequences to a single element type
    pub numeric_arrays: bool,

    /// Resolve `!include` directives (otherwise the tag is rejected)
    pub includes: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            numeric_arrays: false,
            includes: true,
        }
    }
}

impl LoadOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets numeric-array interpretation.
    pub fn with_numeric_arrays(mut self, numeric_arrays: bool) -> Self {
        self.numeric_arrays = numeric_arrays;
        self
    }

    /// Sets `!include` resolution.
    pub fn with_includes(mut self, includes: bool) -> Self {
        self.includes = includes;
        self
    }
}

/// Loads YAML data files into [`Document`]s.
///
/// # Example
///
/// ```rust
/// use awesio_parser::Loader;
/// use std::path::Path;
///
/// let yaml = "metadata:\n    n_clusters: 2\naltitudes: [100, 200]\n";
/// let doc = Loader::new().load_str(yaml, Path::new(".")).unwrap();
/// assert_eq!(doc["metadata"]["n_clusters"], 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: LoadOptions,
}

impl Loader {
    /// Creates a loader with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader with the given options.
    pub fn with_options(options: LoadOptions) -> Self {
        Self { options }
    }

    /// Returns the loader options.
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Loads a document from a file.
    ///
    /// # Errors
    ///
    /// - `ParserError::NotFound` if the file or an included file is missing
    /// - `ParserError::Parse` for malformed YAML (with line/column)
    /// - `ParserError::UnsupportedFormat` for an include with an unknown extension
    /// - `ParserError::IncludeCycle` if a file ends up including itself
    pub fn load(&self, path: &Path) -> Result<Document> {
        let mut chain = Vec::new();
        self.load_file(path, &mut chain)
    }

    /// Loads a document from a string; includes resolve against `base_dir`.
    pub fn load_str(&self, content: &str, base_dir: &Path) -> Result<Document> {
        let origin = base_dir.join("<string>");
        let mut chain = Vec::new();
        self.parse(content, &origin, base_dir, &mut chain)
    }

    fn load_file(&self, path: &Path, chain: &mut Vec<PathBuf>) -> Result<Document> {
        let content = std::fs::read_to_string(path).map_err(|e| ParserError::io(path, e))?;

        let identity = path
            .canonicalize()
            .unwrap_or_else(|_| path.to_path_buf());
        if chain.contains(&identity) {
            let mut cycle = chain.clone();
            cycle.push(identity);
            return Err(ParserError::IncludeCycle(cycle));
        }

        chain.push(identity);
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let document = self.parse(&content, path, base_dir, chain);
        chain.pop();
        document
    }

    fn parse(
        &self,
        content: &str,
        origin: &Path,
        base_dir: &Path,
        chain: &mut Vec<PathBuf>,
    ) -> Result<Document> {
        let mut yaml: serde_yaml_ng::Value =
            serde_yaml_ng::from_str(content).map_err(|e| ParserError::parse(origin, e))?;
        yaml.apply_merge()
            .map_err(|e| ParserError::parse(origin, e))?;
        self.convert(yaml, origin, base_dir, chain)
    }

    fn convert(
        &self,
        value: serde_yaml_ng::Value,
        origin: &Path,
        base_dir: &Path,
        chain: &mut Vec<PathBuf>,
    ) -> Result<Value> {
        use serde_yaml_ng::Value as Yaml;

        match value {
            Yaml::Null => Ok(Value::Null),
            Yaml::Bool(b) => Ok(Value::Bool(b)),
            Yaml::Number(n) => number_to_json(&n).map(Value::Number).ok_or_else(|| {
                ParserError::invalid(origin, format!("number {n} has no finite representation"))
            }),
            Yaml::String(s) => Ok(Value::String(s)),
            Yaml::Sequence(items) => {
                let items = items
                    .into_iter()
                    .map(|item| self.convert(item, origin, base_dir, chain))
                    .collect::<Result<Vec<_>>>()?;
                let array = Value::Array(items);
                if self.options.numeric_arrays {
                    Ok(as_numeric_array(array))
                } else {
                    Ok(array)
                }
            }
            Yaml::Mapping(mapping) => {
                let mut object = Map::new();
                for (key, value) in mapping {
                    let key = mapping_key(key, origin)?;
                    object.insert(key, self.convert(value, origin, base_dir, chain)?);
                }
                Ok(Value::Object(object))
            }
            Yaml::Tagged(tagged) => {
                let TaggedValue { tag, value } = *tagged;
                if self.options.includes && tag == Tag::new(INCLUDE_TAG) {
                    self.include(value, origin, base_dir, chain)
                } else {
                    Err(ParserError::invalid(origin, format!("unsupported tag {tag}")))
                }
            }
        }
    }

    fn include(
        &self,
        target: serde_yaml_ng::Value,
        origin: &Path,
        base_dir: &Path,
        chain: &mut Vec<PathBuf>,
    ) -> Result<Value> {
        let target = match target {
            serde_yaml_ng::Value::String(target) => target,
            other => {
                return Err(ParserError::invalid(
                    origin,
                    format!("{INCLUDE_TAG} expects a file name, found {other:?}"),
                ));
            }
        };

        let path = base_dir.join(&target);
        debug!("Resolving include {} from {}", path.display(), origin.display());

        match detect_format(&path)? {
            IncludeFormat::Yaml => self.load_file(&path, chain),
            IncludeFormat::Csv => read_csv(&path),
            IncludeFormat::NetCdf => read_netcdf(&path),
        }
    }
}

fn number_to_json(number: &serde_yaml_ng::Number) -> Option<Number> {
    if let Some(int) = number.as_i64() {
        Some(Number::from(int))
    } else if let Some(uint) = number.as_u64() {
        Some(Number::from(uint))
    } else {
        number.as_f64().and_then(Number::from_f64)
    }
}

fn mapping_key(key: serde_yaml_ng::Value, origin: &Path) -> Result<String> {
    match key {
        serde_yaml_ng::Value::String(s) => Ok(s),
        serde_yaml_ng::Value::Number(n) => Ok(n.to_string()),
        serde_yaml_ng::Value::Bool(b) => Ok(b.to_string()),
        other => Err(ParserError::invalid(
            origin,
            format!("unsupported mapping key {other:?}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_preserves_key_order() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "tether.yml", "zeta: 1\nalpha: 2\nmid: [1.5, 2]\n");

        let doc = Loader::new().load(&path).unwrap();
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(doc["mid"], json!([1.5, 2]));
    }

    #[test]
    fn test_nested_includes_resolve_relative_to_including_file() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "system.yml",
            "name: pumping kite\ntether: !include parts/tether.yml\n",
        );
        write(
            &dir,
            "parts/tether.yml",
            "diameter_m: 0.01\nmaterial: !include materials/dyneema.yaml\n",
        );
        write(&dir, "parts/materials/dyneema.yaml", "density_kg_m3: 970\n");

        let doc = Loader::new().load(&dir.path().join("system.yml")).unwrap();
        assert_eq!(
            doc,
            json!({
                "name": "pumping kite",
                "tether": {
                    "diameter_m": 0.01,
                    "material": {"density_kg_m3": 970}
                }
            })
        );
    }

    #[test]
    fn test_csv_include() {
        let dir = TempDir::new().unwrap();
        write(&dir, "profiles.csv", "altitude,u\n100,0.5\n200,0.7\n");
        let path = write(&dir, "wind.yml", "profiles: !include profiles.csv\n");

        let doc = Loader::new().load(&path).unwrap();
        assert_eq!(
            doc["profiles"],
            json!({"altitude": [100, 200], "u": [0.5, 0.7]})
        );
    }

    #[test]
    fn test_unsupported_include_extension() {
        let dir = TempDir::new().unwrap();
        write(&dir, "data.json", "{}");
        let path = write(&dir, "root.yml", "data: !include data.json\n");

        let err = Loader::new().load(&path).unwrap_err();
        assert!(
            matches!(err, ParserError::UnsupportedFormat { ref extension, .. } if extension == ".json"),
            "Expected UnsupportedFormat, got: {err}"
        );
        assert_eq!(err.kind(), awesio_core::ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_missing_files() {
        let dir = TempDir::new().unwrap();
        let err = Loader::new()
            .load(&dir.path().join("absent.yml"))
            .unwrap_err();
        assert!(matches!(err, ParserError::NotFound(_)));

        let path = write(&dir, "root.yml", "part: !include absent.yml\n");
        let err = Loader::new().load(&path).unwrap_err();
        match err {
            ParserError::NotFound(missing) => assert!(missing.ends_with("absent.yml")),
            other => panic!("Expected NotFound, got: {other}"),
        }
    }

    #[test]
    fn test_malformed_yaml_reports_location() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.yml", "a: 1\nb: [1, 2\nc: 3\n");

        let err = Loader::new().load(&path).unwrap_err();
        match &err {
            ParserError::Parse { line, .. } => assert!(line.is_some()),
            other => panic!("Expected Parse, got: {other}"),
        }
        assert_eq!(err.kind(), awesio_core::ErrorKind::ParseFailure);
    }

    #[test]
    fn test_include_cycle_detected() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.yml", "b: !include b.yml\n");
        write(&dir, "b.yml", "a: !include a.yml\n");

        let err = Loader::new().load(&dir.path().join("a.yml")).unwrap_err();
        match err {
            ParserError::IncludeCycle(chain) => assert_eq!(chain.len(), 3),
            other => panic!("Expected IncludeCycle, got: {other}"),
        }
    }

    #[test]
    fn test_same_file_included_twice_is_not_a_cycle() {
        let dir = TempDir::new().unwrap();
        write(&dir, "shared.yml", "value: 1\n");
        let path = write(
            &dir,
            "root.yml",
            "first: !include shared.yml\nsecond: !include shared.yml\n",
        );

        let doc = Loader::new().load(&path).unwrap();
        assert_eq!(doc["first"], doc["second"]);
    }

    #[test]
    fn test_numeric_arrays_option() {
        let yaml = "u: [1, 2.5, 3]\nnames: [a, b]\nints: [1, 2]\n";

        let plain = Loader::new().load_str(yaml, Path::new(".")).unwrap();
        assert!(plain["u"][0].is_i64());

        let arrays = Loader::with_options(LoadOptions::new().with_numeric_arrays(true))
            .load_str(yaml, Path::new("."))
            .unwrap();
        assert!(arrays["u"][0].is_f64());
        assert_eq!(arrays["names"], json!(["a", "b"]));
        assert!(arrays["ints"][0].is_i64());
    }

    #[test]
    fn test_merge_keys() {
        let yaml = "base: &base\n  x: 1\n  y: 2\nderived:\n  <<: *base\n  y: 3\n";
        let doc = Loader::new().load_str(yaml, Path::new(".")).unwrap();
        assert_eq!(doc["derived"], json!({"y": 3, "x": 1}));
    }

    #[test]
    fn test_non_string_keys() {
        let doc = Loader::new()
            .load_str("1: one\ntrue: yes\n", Path::new("."))
            .unwrap();
        assert_eq!(doc["1"], "one");
        assert_eq!(doc["true"], "yes");
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        let err = Loader::new()
            .load_str("limit: .inf\n", Path::new("."))
            .unwrap_err();
        assert!(matches!(err, ParserError::InvalidContent { .. }));
    }

    #[test]
    fn test_includes_disabled() {
        let err = Loader::with_options(LoadOptions::new().with_includes(false))
            .load_str("part: !include other.yml\n", Path::new("."))
            .unwrap_err();
        assert!(matches!(err, ParserError::InvalidContent { .. }));
    }
}

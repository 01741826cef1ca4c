//! Main validation engine.
//!
//! [`Validator`] runs the whole pipeline for one input: load the document,
//! load the schema, optionally close it, check structure (optionally filling
//! defaults), then run the consistency rules for the schema type.

use crate::{
    ConsistencyRules, DefaultPolicy, Result, SchemaRegistry, StructuralValidator, ValidationError,
    close_schema, schema_id,
};
use awesio_core::{Document, ValidationInput, ValidationOptions};
use awesio_parser::{LoadOptions, Loader};
use serde_json::Value;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Validation session over one schema directory.
///
/// The registry cache lives as long as the validator (and its clones of the
/// registry); build separate validators for isolated caches.
///
/// # Example
///
/// ```no_run
/// use awesio_core::ValidationOptions;
/// use awesio_validator::Validator;
///
/// let validator = Validator::new("schemas");
/// let options = ValidationOptions::new().with_restrictive(true);
///
/// match validator.validate("data/wind_resource.yml", "wind_resource_schema", &options) {
///     Ok(doc) => println!("valid, {} top-level keys", doc.as_object().map_or(0, |o| o.len())),
///     Err(e) => eprintln!("{} ({})", e, e.kind()),
/// }
/// ```
#[derive(Debug)]
pub struct Validator {
    registry: SchemaRegistry,
    rules: ConsistencyRules,
    load_options: LoadOptions,
}

impl Validator {
    /// Creates a validator with the built-in rules over `schema_dir`.
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self::with_registry(SchemaRegistry::new(schema_dir))
    }

    /// Creates a validator sharing an existing registry.
    pub fn with_registry(registry: SchemaRegistry) -> Self {
        Self {
            registry,
            rules: ConsistencyRules::default(),
            load_options: LoadOptions::default(),
        }
    }

    /// Replaces the consistency rule set.
    pub fn with_rules(mut self, rules: ConsistencyRules) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the options used when the input is a path.
    pub fn with_load_options(mut self, load_options: LoadOptions) -> Self {
        self.load_options = load_options;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn rules_mut(&mut self) -> &mut ConsistencyRules {
        &mut self.rules
    }

    /// Validates `input` against the schema registered as `schema_type`.
    ///
    /// Returns the validated document, including injected defaults when
    /// `options.defaults` is set. An in-memory input is consumed; the
    /// caller's copy is never touched.
    ///
    /// # Errors
    ///
    /// Any [`ValidationError`]; its `kind()` gives the failure category.
    pub fn validate(
        &self,
        input: impl Into<ValidationInput>,
        schema_type: &str,
        options: &ValidationOptions,
    ) -> Result<Document> {
        let input = input.into();
        let started = Instant::now();
        info!("Validating {} against '{}'", input.describe(), schema_type);

        let mut document = self.load_input(input)?;
        self.validate_document(&mut document, schema_type, options)?;

        info!(
            "Validation against '{}' passed in {}ms",
            schema_type,
            started.elapsed().as_millis()
        );
        Ok(document)
    }

    /// Validates `input` against the schema named in its `metadata.schema` field.
    ///
    /// # Errors
    ///
    /// `ValidationError::UnknownSchemaType` when the field is missing, otherwise
    /// as [`Validator::validate`].
    pub fn validate_auto(
        &self,
        input: impl Into<ValidationInput>,
        options: &ValidationOptions,
    ) -> Result<Document> {
        let input = input.into();
        let description = input.describe();

        let mut document = self.load_input(input)?;
        let schema_type = infer_schema_type(&document)
            .ok_or_else(|| ValidationError::UnknownSchemaType(description.clone()))?;

        info!("Validating {} against '{}' (from metadata.schema)", description, schema_type);
        self.validate_document(&mut document, &schema_type, options)?;
        Ok(document)
    }

    /// Validates an already loaded document in place.
    pub fn validate_document(
        &self,
        document: &mut Document,
        schema_type: &str,
        options: &ValidationOptions,
    ) -> Result<()> {
        let schema = self.registry.load_schema(schema_type)?;
        let id = schema_id(&schema, schema_type);

        let schema: Cow<'_, Value> = if options.restrictive {
            debug!("Closing schema '{}'", id);
            Cow::Owned(close_schema(&schema))
        } else {
            Cow::Borrowed(schema.as_ref())
        };

        let policy = if options.defaults {
            DefaultPolicy::Apply
        } else {
            DefaultPolicy::Ignore
        };

        StructuralValidator::new(&self.registry)
            .with_policy(policy)
            .validate(&schema, &id, document)?;

        self.rules.check(schema_type, document)
    }

    fn load_input(&self, input: ValidationInput) -> Result<Document> {
        match input {
            ValidationInput::Path(path) => {
                Ok(Loader::with_options(self.load_options).load(&path)?)
            }
            ValidationInput::Document(document) => Ok(document),
        }
    }
}

/// Schema type declared by a document's `metadata.schema` field.
///
/// The field names a schema file; its stem is the schema type
/// (`schemas/wind_resource_schema.yml` gives `wind_resource_schema`).
pub fn infer_schema_type(document: &Document) -> Option<String> {
    let declared = document.pointer("/metadata/schema")?.as_str()?;
    Path::new(declared)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

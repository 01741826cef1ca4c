//! Structural (schema-conformance) validation.

use crate::{DefaultInjector, Result, SchemaRegistry, ValidationError};
use awesio_core::{Document, ErrorReport, FieldPath, Violation};
use serde_json::Value;
use tracing::debug;

/// Whether schema defaults are filled into the document before checking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DefaultPolicy {
    /// Check the document as given
    #[default]
    Ignore,
    /// Inject declared defaults for absent properties, then check
    Apply,
}

/// Returns the schema's `$id`, or `fallback` when it declares none.
pub fn schema_id(schema: &Value, fallback: &str) -> String {
    schema
        .get("$id")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

/// Checks documents against a schema, reporting every violation at once.
///
/// # Example
///
/// ```rust
/// use awesio_validator::{SchemaRegistry, StructuralValidator};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new("schemas");
/// let schema = json!({
///     "type": "object",
///     "properties": {"n_clusters": {"type": "integer", "minimum": 1}},
///     "required": ["n_clusters"]
/// });
///
/// let mut doc = json!({"n_clusters": 0});
/// let err = StructuralValidator::new(&registry)
///     .validate(&schema, "metadata", &mut doc)
///     .unwrap_err();
/// assert!(err.to_string().starts_with("Validation failed for schema 'metadata':"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct StructuralValidator<'a> {
    registry: &'a SchemaRegistry,
    policy: DefaultPolicy,
}

impl<'a> StructuralValidator<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            policy: DefaultPolicy::Ignore,
        }
    }

    pub fn with_policy(mut self, policy: DefaultPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates `document` against `schema`.
    ///
    /// The schema is checked against its meta-schema first; a malformed
    /// schema fails with `SchemaSelfInvalid` before the document is looked
    /// at. With [`DefaultPolicy::Apply`] the document is modified in place.
    ///
    /// # Errors
    ///
    /// - `ValidationError::SchemaSelfInvalid` for a malformed schema
    /// - `ValidationError::NoSuchResource` for a `$ref` the registry cannot serve
    /// - `ValidationError::Structural` listing every violation found
    pub fn validate(&self, schema: &Value, schema_id: &str, document: &mut Document) -> Result<()> {
        if let Err(e) = jsonschema::meta::validate(schema) {
            return Err(ValidationError::schema_invalid(schema_id, e.to_string()));
        }

        if self.policy == DefaultPolicy::Apply {
            DefaultInjector::new(self.registry).apply(schema, document)?;
        }

        let retriever = self.registry.retriever();
        let misses = retriever.misses();
        let mut options = jsonschema::options();
        options.with_retriever(retriever);

        let validator = options.build(schema).map_err(|e| {
            let misses = misses.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            compile_error(schema_id, &e.to_string(), &misses)
        })?;

        let violations: Vec<Violation> = validator
            .iter_errors(document)
            .map(|error| {
                Violation::new(
                    FieldPath::from_json_pointer(&error.instance_path.to_string()),
                    error.to_string(),
                )
            })
            .collect();

        if violations.is_empty() {
            debug!("Document conforms to '{}'", schema_id);
            Ok(())
        } else {
            debug!(
                "Document violates '{}' in {} place(s)",
                schema_id,
                violations.len()
            );
            Err(ValidationError::Structural(ErrorReport::new(
                schema_id, violations,
            )))
        }
    }
}

/// A compile failure naming a URI the registry could not serve is a missing
/// resource; anything else is reported as a compile error.
fn compile_error(schema_id: &str, message: &str, misses: &[String]) -> ValidationError {
    match misses.iter().find(|uri| message.contains(uri.as_str())) {
        Some(uri) => ValidationError::no_such_resource(uri.as_str()),
        None => ValidationError::Compile {
            schema_id: schema_id.to_string(),
            message: message.to_string(),
        },
    }
}

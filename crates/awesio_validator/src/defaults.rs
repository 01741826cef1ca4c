//! Schema default injection.
//!
//! Walks a schema alongside a document and fills in every absent property
//! whose subschema declares a `default`. Injected values are visited like
//! any other value, so defaults nested inside a default object's subschema
//! apply as well, and later structural checks see the filled-in document.

use crate::{Result, SchemaRegistry};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Caps how deep the walk descends through nested schemas.
const MAX_DEPTH: usize = 128;

/// Schema nodes entered through `$ref` since the walk last stepped into the
/// document. Re-entering one of them cannot fill anything new.
type RefStack = Vec<*const Value>;

/// Fills schema-declared defaults into a document in place.
#[derive(Debug, Clone, Copy)]
pub struct DefaultInjector<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> DefaultInjector<'a> {
    /// Creates an injector resolving external `$ref`s through `registry`.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Injects defaults from `schema` into `instance`.
    ///
    /// Follows `$ref` (local pointers and sibling schema files) and every
    /// `allOf`/`anyOf`/`oneOf` branch. Conditional subschemas are not
    /// visited.
    pub fn apply(&self, schema: &Value, instance: &mut Value) -> Result<()> {
        self.walk(schema, schema, instance, 0, &mut RefStack::new())
    }

    fn walk(
        &self,
        schema: &Value,
        root: &Value,
        instance: &mut Value,
        depth: usize,
        refs: &mut RefStack,
    ) -> Result<()> {
        if depth > MAX_DEPTH {
            return Ok(());
        }
        let Value::Object(keywords) = schema else {
            return Ok(());
        };

        if let Some(reference) = keywords.get("$ref").and_then(Value::as_str) {
            self.follow(reference, root, instance, depth, refs)?;
        }

        for combinator in ["allOf", "anyOf", "oneOf"] {
            if let Some(Value::Array(branches)) = keywords.get(combinator) {
                for branch in branches {
                    self.walk(branch, root, instance, depth + 1, refs)?;
                }
            }
        }

        match instance {
            Value::Object(object) => {
                let properties = keywords.get("properties").and_then(Value::as_object);

                if let Some(properties) = properties {
                    for (name, subschema) in properties {
                        if let Some(default) = subschema.get("default") {
                            if !object.contains_key(name) {
                                debug!("Injecting default for '{}'", name);
                                object.insert(name.clone(), default.clone());
                            }
                        }
                    }
                }

                let patterns: Vec<(Regex, &Value)> = keywords
                    .get("patternProperties")
                    .and_then(Value::as_object)
                    .map(|patterns| {
                        patterns
                            .iter()
                            .filter_map(|(pattern, subschema)| {
                                Regex::new(pattern).ok().map(|regex| (regex, subschema))
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                let additional = keywords.get("additionalProperties").filter(|s| s.is_object());

                for (name, child) in object.iter_mut() {
                    let declared = properties.and_then(|p| p.get(name));
                    if let Some(subschema) = declared {
                        self.walk(subschema, root, child, depth + 1, &mut RefStack::new())?;
                    }

                    let mut matched = false;
                    for (regex, subschema) in &patterns {
                        if regex.is_match(name) {
                            matched = true;
                            self.walk(subschema, root, child, depth + 1, &mut RefStack::new())?;
                        }
                    }

                    if declared.is_none() && !matched {
                        if let Some(subschema) = additional {
                            self.walk(subschema, root, child, depth + 1, &mut RefStack::new())?;
                        }
                    }
                }
            }
            Value::Array(items) => match keywords.get("items") {
                Some(Value::Array(positional)) => {
                    for (subschema, item) in positional.iter().zip(items.iter_mut()) {
                        self.walk(subschema, root, item, depth + 1, &mut RefStack::new())?;
                    }
                    if let Some(subschema) = keywords.get("additionalItems") {
                        for item in items.iter_mut().skip(positional.len()) {
                            self.walk(subschema, root, item, depth + 1, &mut RefStack::new())?;
                        }
                    }
                }
                Some(subschema) => {
                    for item in items.iter_mut() {
                        self.walk(subschema, root, item, depth + 1, &mut RefStack::new())?;
                    }
                }
                None => {}
            },
            _ => {}
        }

        Ok(())
    }

    fn follow(
        &self,
        reference: &str,
        root: &Value,
        instance: &mut Value,
        depth: usize,
        refs: &mut RefStack,
    ) -> Result<()> {
        let (location, fragment) = reference.split_once('#').unwrap_or((reference, ""));

        if location.is_empty() {
            if let Some(target) = root.pointer(fragment) {
                self.enter(target, root, instance, depth, refs)?;
            }
            return Ok(());
        }

        // The registry cache keeps `document` alive, so node addresses stay stable.
        let document = self.registry.resolve_uri(reference)?;
        if let Some(target) = document.pointer(fragment) {
            self.enter(target, &document, instance, depth, refs)?;
        }
        Ok(())
    }

    fn enter(
        &self,
        target: &Value,
        root: &Value,
        instance: &mut Value,
        depth: usize,
        refs: &mut RefStack,
    ) -> Result<()> {
        if refs.iter().any(|seen| std::ptr::eq(*seen, target)) {
            return Ok(());
        }
        refs.push(target);
        let result = self.walk(target, root, instance, depth + 1, refs);
        refs.pop();
        result
    }
}

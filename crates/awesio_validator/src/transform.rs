//! Closed-world schema transformation.
//!
//! Rewrites a schema so every object-shaped subschema that does not state an
//! `additionalProperties` policy forbids undeclared properties. A subschema
//! is object-shaped when it has `type: object` or a `properties` key.

use serde_json::Value;

/// Returns a closed copy of `schema`. The input is never modified.
///
/// Descends into `properties` values, `items`/`additionalItems` (single
/// schema or positional list) and every `oneOf`/`anyOf`/`allOf` branch.
/// Applying it twice gives the same result as applying it once.
pub fn close_schema(schema: &Value) -> Value {
    let mut closed = schema.clone();
    close_in_place(&mut closed);
    closed
}

fn close_in_place(schema: &mut Value) {
    let Value::Object(map) = schema else {
        return;
    };

    let object_shaped = map.get("type").and_then(Value::as_str) == Some("object")
        || map.contains_key("properties");
    if object_shaped && !map.contains_key("additionalProperties") {
        map.insert("additionalProperties".to_string(), Value::Bool(false));
    }

    if let Some(Value::Object(properties)) = map.get_mut("properties") {
        properties.values_mut().for_each(close_in_place);
    }

    for keyword in ["items", "additionalItems"] {
        match map.get_mut(keyword) {
            Some(Value::Array(positional)) => positional.iter_mut().for_each(close_in_place),
            Some(subschema) => close_in_place(subschema),
            None => {}
        }
    }

    for keyword in ["oneOf", "anyOf", "allOf"] {
        if let Some(Value::Array(branches)) = map.get_mut(keyword) {
            branches.iter_mut().for_each(close_in_place);
        }
    }
}

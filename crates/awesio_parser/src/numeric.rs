//! Numeric-array shape detection.
//!
//! A sequence counts as a numeric array when every leaf is a number and every
//! level is rectangular (all siblings share one shape). Booleans are not
//! numbers here.

use serde_json::{Number, Value};

/// Returns the shape of `value` as a numeric array (`[rows, cols, ...]`), or
/// `None` when it is not a rectangular numeric array.
pub(crate) fn numeric_shape(value: &Value) -> Option<Vec<usize>> {
    match value {
        Value::Number(_) => Some(Vec::new()),
        Value::Array(items) => {
            let mut shapes = items.iter().map(numeric_shape);
            let inner = match shapes.next() {
                None => Vec::new(),
                Some(shape) => shape?,
            };
            for shape in shapes {
                if shape? != inner {
                    return None;
                }
            }
            let mut shape = Vec::with_capacity(inner.len() + 1);
            shape.push(items.len());
            shape.extend(inner);
            Some(shape)
        }
        _ => None,
    }
}

/// Returns the number of array dimensions of `value`, or `None` when it is
/// not a rectangular numeric array.
///
/// A bare number has depth 0 and an empty sequence has depth 1.
pub(crate) fn numeric_depth(value: &Value) -> Option<usize> {
    numeric_shape(value).map(|shape| shape.len())
}

/// Returns true if any leaf of a numeric array is a float.
fn has_float(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_f64(),
        Value::Array(items) => items.iter().any(has_float),
        _ => false,
    }
}

fn to_float(value: Value) -> Value {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Number(n)),
        Value::Array(items) => Value::Array(items.into_iter().map(to_float).collect()),
        other => other,
    }
}

/// Interprets a sequence as a numeric array.
///
/// Mixed integer/float arrays take a single float element type, the way an
/// array type with one dtype would hold them. Anything that is not a
/// rectangular numeric array is returned untouched.
pub(crate) fn as_numeric_array(value: Value) -> Value {
    if numeric_depth(&value).is_some() && has_float(&value) {
        to_float(value)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_depths() {
        assert_eq!(numeric_depth(&json!(1.5)), Some(0));
        assert_eq!(numeric_depth(&json!([])), Some(1));
        assert_eq!(numeric_depth(&json!([1, 2.5])), Some(1));
        assert_eq!(numeric_depth(&json!([[1, 2], [3, 4]])), Some(2));
        assert_eq!(numeric_depth(&json!([[]])), Some(2));
    }

    #[test]
    fn test_shape() {
        assert_eq!(numeric_shape(&json!([[1, 2, 3], [4, 5, 6]])), Some(vec![2, 3]));
        assert_eq!(numeric_shape(&json!([[]])), Some(vec![1, 0]));
    }

    #[test]
    fn test_non_numeric_arrays() {
        assert_eq!(numeric_depth(&json!(["a", 1])), None);
        assert_eq!(numeric_depth(&json!([true, false])), None);
        assert_eq!(numeric_depth(&json!([1, [2]])), None);
        assert_eq!(numeric_depth(&json!([[1, 2], [3]])), None);
        assert_eq!(numeric_depth(&json!({"a": 1})), None);
    }

    #[test]
    fn test_mixed_array_becomes_float() {
        let value = as_numeric_array(json!([1, 2.5, 3]));
        assert!(value[0].is_f64());
        assert!(value[2].is_f64());
        assert_eq!(value, json!([1.0, 2.5, 3.0]));
    }

    #[test]
    fn test_integer_array_untouched() {
        let value = as_numeric_array(json!([[1, 2], [3, 4]]));
        assert!(value[0][0].is_i64());
    }

    #[test]
    fn test_ragged_array_untouched() {
        let value = as_numeric_array(json!([[1, 2.5], [3]]));
        assert!(value[1][0].is_i64());
    }
}

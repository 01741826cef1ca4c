//! Cross-field consistency rules.
//!
//! Rules are keyed by schema type and run in registration order after the
//! document has passed structural validation. Unlike the structural pass,
//! the first failing rule stops the check and its message is returned
//! as-is.

use crate::{Result, ValidationError};
use awesio_core::Document;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Schema type of wind resource files.
pub const WIND_RESOURCE_SCHEMA: &str = "wind_resource_schema";

/// Schema type of power curve files.
pub const POWER_CURVES_SCHEMA: &str = "power_curves_schema";

/// Performance arrays sampled at each reference wind speed.
const PERFORMANCE_ARRAYS: [&str; 6] = [
    "cycle_power_w",
    "reel_out_power_w",
    "reel_in_power_w",
    "reel_out_time_s",
    "reel_in_time_s",
    "cycle_time_s",
];

const WEIGHT_TOLERANCE: f64 = 0.001;

/// Outcome of a single rule: `Err` carries the failure message.
pub type RuleResult = std::result::Result<(), String>;

type RuleFn = Box<dyn Fn(&Document) -> RuleResult + Send + Sync>;

struct Rule {
    name: String,
    check: RuleFn,
}

/// Ordered consistency rules per schema type.
///
/// `ConsistencyRules::default()` carries the built-in wind resource and
/// power curve rules; [`ConsistencyRules::empty`] carries none.
///
/// # Example
///
/// ```rust
/// use awesio_validator::ConsistencyRules;
/// use serde_json::json;
///
/// let mut rules = ConsistencyRules::empty();
/// rules.register("tether_schema", "positive_length", |doc| {
///     match doc["length_m"].as_f64() {
///         Some(len) if len > 0.0 => Ok(()),
///         _ => Err("length_m must be positive".to_string()),
///     }
/// });
///
/// assert!(rules.check("tether_schema", &json!({"length_m": 10})).is_ok());
/// assert!(rules.check("tether_schema", &json!({"length_m": 0})).is_err());
/// assert!(rules.check("ground_station_schema", &json!({})).is_ok());
/// ```
pub struct ConsistencyRules {
    rules: HashMap<String, Vec<Rule>>,
}

impl ConsistencyRules {
    /// Creates a rule set with no rules.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Appends a named rule for `schema_type`.
    pub fn register<F>(
        &mut self,
        schema_type: impl Into<String>,
        name: impl Into<String>,
        check: F,
    ) -> &mut Self
    where
        F: Fn(&Document) -> RuleResult + Send + Sync + 'static,
    {
        self.rules.entry(schema_type.into()).or_default().push(Rule {
            name: name.into(),
            check: Box::new(check),
        });
        self
    }

    /// Names of the rules registered for `schema_type`, in run order.
    pub fn rule_names(&self, schema_type: &str) -> Vec<&str> {
        self.rules
            .get(schema_type)
            .map(|rules| rules.iter().map(|r| r.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Runs the rules for `schema_type`, stopping at the first failure.
    ///
    /// Schema types without rules pass.
    pub fn check(&self, schema_type: &str, document: &Document) -> Result<()> {
        let Some(rules) = self.rules.get(schema_type) else {
            debug!("No consistency rules for '{}'", schema_type);
            return Ok(());
        };

        for rule in rules {
            (rule.check)(document)
                .map_err(|message| ValidationError::consistency(&rule.name, message))?;
        }
        debug!("{} consistency rule(s) passed for '{}'", rules.len(), schema_type);
        Ok(())
    }
}

impl Default for ConsistencyRules {
    fn default() -> Self {
        let mut rules = Self::empty();
        rules
            .register(WIND_RESOURCE_SCHEMA, "cluster_count", check_cluster_count)
            .register(WIND_RESOURCE_SCHEMA, "cluster_profile_lengths", check_cluster_profiles)
            .register(WIND_RESOURCE_SCHEMA, "cluster_ids", check_cluster_ids)
            .register(WIND_RESOURCE_SCHEMA, "wind_speed_bin_count", check_bin_count)
            .register(WIND_RESOURCE_SCHEMA, "wind_speed_bin_edges", check_bin_edges)
            .register(POWER_CURVES_SCHEMA, "profile_ids_unique", check_profile_ids)
            .register(POWER_CURVES_SCHEMA, "probability_weights", check_probability_weights)
            .register(POWER_CURVES_SCHEMA, "curve_profile_lengths", check_curve_profiles)
            .register(POWER_CURVES_SCHEMA, "curve_performance_lengths", check_curve_performance);
        rules
    }
}

impl fmt::Debug for ConsistencyRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (schema_type, rules) in &self.rules {
            let names: Vec<&str> = rules.iter().map(|r| r.name.as_str()).collect();
            map.entry(schema_type, &names);
        }
        map.finish()
    }
}

fn seq_len(value: &Value, name: &str) -> std::result::Result<usize, String> {
    value
        .as_array()
        .map(Vec::len)
        .ok_or_else(|| format!("{name} must be a sequence"))
}

/// Length of an optional sequence field; absent counts as empty.
fn field_len(object: &Value, field: &str) -> std::result::Result<usize, String> {
    object.get(field).map_or(Ok(0), |value| seq_len(value, field))
}

fn items<'a>(value: &'a Value, name: &str) -> std::result::Result<&'a [Value], String> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| format!("{name} must be a sequence"))
}

/// Human-readable identifier for an element: its id field, else its 1-based position.
fn label(element: &Value, id_field: &str, position: usize) -> String {
    match element.get(id_field) {
        Some(Value::String(s)) => s.clone(),
        Some(value) => value.to_string(),
        None => (position + 1).to_string(),
    }
}

/// Identifier as compared by the id rules: integral floats (`1.0`) become integers.
fn id_key(value: Option<&Value>) -> Value {
    match value {
        Some(Value::Number(n)) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Value::from(f as i64),
            _ => Value::Number(n.clone()),
        },
        Some(value) => value.clone(),
        None => Value::Null,
    }
}

fn has_duplicates(values: &[Value]) -> bool {
    values
        .iter()
        .enumerate()
        .any(|(i, value)| values[..i].contains(value))
}

fn format_list<T: fmt::Display>(values: &[T]) -> String {
    let joined: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", joined.join(", "))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn check_cluster_count(doc: &Document) -> RuleResult {
    let (Some(expected), Some(clusters)) = (doc.pointer("/metadata/n_clusters"), doc.get("clusters"))
    else {
        return Ok(());
    };

    let actual = seq_len(clusters, "clusters")?;
    if expected.as_f64() != Some(actual as f64) {
        return Err(format!(
            "Cluster count mismatch: expected {expected} from metadata.n_clusters, actual {actual} clusters"
        ));
    }
    Ok(())
}

fn check_cluster_profiles(doc: &Document) -> RuleResult {
    let (Some(clusters), Some(altitudes)) = (doc.get("clusters"), doc.get("altitudes")) else {
        return Ok(());
    };

    let altitude_count = seq_len(altitudes, "altitudes")?;
    for (i, cluster) in items(clusters, "clusters")?.iter().enumerate() {
        let id = label(cluster, "id", i);
        let u_len = field_len(cluster, "u_normalized")?;
        let v_len = field_len(cluster, "v_normalized")?;

        if u_len != altitude_count {
            return Err(format!(
                "Cluster {id}: u_normalized length ({u_len}) does not match altitudes length ({altitude_count})"
            ));
        }
        if v_len != altitude_count {
            return Err(format!(
                "Cluster {id}: v_normalized length ({v_len}) does not match altitudes length ({altitude_count})"
            ));
        }
        if u_len != v_len {
            return Err(format!(
                "Cluster {id}: u_normalized and v_normalized arrays must have the same length"
            ));
        }
    }
    Ok(())
}

fn check_cluster_ids(doc: &Document) -> RuleResult {
    let Some(clusters) = doc.get("clusters") else {
        return Ok(());
    };

    let ids: Vec<Value> = items(clusters, "clusters")?
        .iter()
        .map(|cluster| id_key(cluster.get("id")))
        .collect();
    if has_duplicates(&ids) {
        return Err("Cluster IDs must be unique".to_string());
    }

    let expected: Vec<i64> = (1..=ids.len() as i64).collect();
    let numeric: Option<Vec<i64>> = ids.iter().map(Value::as_i64).collect();
    let actual = match numeric {
        Some(mut numeric) => {
            numeric.sort_unstable();
            if numeric == expected {
                return Ok(());
            }
            format_list(&numeric)
        }
        None => format_list(&ids),
    };

    Err(format!(
        "Cluster IDs must be consecutive starting from 1. Expected {}, got {actual}",
        format_list(&expected)
    ))
}

fn check_bin_count(doc: &Document) -> RuleResult {
    let (Some(bins), Some(metadata)) = (doc.get("wind_speed_bins"), doc.get("metadata")) else {
        return Ok(());
    };
    let Some(expected) = metadata.get("n_wind_speed_bins").filter(|v| is_truthy(v)) else {
        return Ok(());
    };
    let Some(centers) = bins.get("bin_centers_m_s") else {
        return Ok(());
    };

    let actual = seq_len(centers, "bin_centers_m_s")?;
    if expected.as_f64() != Some(actual as f64) {
        return Err(format!(
            "bin_centers_m_s length ({actual}) does not match n_wind_speed_bins ({expected})"
        ));
    }
    Ok(())
}

fn check_bin_edges(doc: &Document) -> RuleResult {
    let Some(bins) = doc.get("wind_speed_bins") else {
        return Ok(());
    };
    let (Some(edges), Some(centers)) = (bins.get("bin_edges_m_s"), bins.get("bin_centers_m_s"))
    else {
        return Ok(());
    };

    let edge_count = seq_len(edges, "bin_edges_m_s")?;
    let center_count = seq_len(centers, "bin_centers_m_s")?;
    if edge_count != center_count + 1 {
        return Err(format!(
            "bin_edges_m_s must have exactly one more element than bin_centers_m_s. \
             Got {edge_count} edges and {center_count} centers"
        ));
    }
    Ok(())
}

/// The curves plus the altitude and wind speed counts, when all three fields are present.
fn power_curve_inputs(doc: &Document) -> std::result::Result<Option<(&[Value], usize, usize)>, String> {
    let (Some(curves), Some(altitudes), Some(speeds)) = (
        doc.get("power_curves"),
        doc.get("altitudes_m"),
        doc.get("reference_wind_speeds_m_s"),
    ) else {
        return Ok(None);
    };

    Ok(Some((
        items(curves, "power_curves")?,
        seq_len(altitudes, "altitudes_m")?,
        seq_len(speeds, "reference_wind_speeds_m_s")?,
    )))
}

fn check_profile_ids(doc: &Document) -> RuleResult {
    let Some((curves, _, _)) = power_curve_inputs(doc)? else {
        return Ok(());
    };

    let ids: Vec<Value> = curves
        .iter()
        .map(|curve| id_key(curve.get("profile_id")))
        .collect();
    if has_duplicates(&ids) {
        return Err("Power curve profile_id values must be unique".to_string());
    }
    Ok(())
}

fn check_probability_weights(doc: &Document) -> RuleResult {
    let Some((curves, _, _)) = power_curve_inputs(doc)? else {
        return Ok(());
    };

    let total: f64 = curves
        .iter()
        .filter_map(|curve| curve.get("probability_weight").and_then(Value::as_f64))
        .sum();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        // Rounded so float summation noise does not leak into the message.
        let shown = (total * 1e10).round() / 1e10;
        return Err(format!(
            "Sum of probability_weight values should equal 1.0, got {shown}"
        ));
    }
    Ok(())
}

fn check_curve_profiles(doc: &Document) -> RuleResult {
    let Some((curves, altitude_count, _)) = power_curve_inputs(doc)? else {
        return Ok(());
    };

    for (i, curve) in curves.iter().enumerate() {
        let id = label(curve, "profile_id", i);
        let u = curve.get("u_normalized").map(|u| seq_len(u, "u_normalized")).transpose()?;
        let v = curve.get("v_normalized").map(|v| seq_len(v, "v_normalized")).transpose()?;

        if let Some(u_len) = u {
            if u_len != altitude_count {
                return Err(format!(
                    "Power curve {id}: u_normalized length ({u_len}) does not match altitudes_m length ({altitude_count})"
                ));
            }
        }
        if let Some(v_len) = v {
            if v_len != altitude_count {
                return Err(format!(
                    "Power curve {id}: v_normalized length ({v_len}) does not match altitudes_m length ({altitude_count})"
                ));
            }
        }
        if let (Some(u_len), Some(v_len)) = (u, v) {
            if u_len != v_len {
                return Err(format!(
                    "Power curve {id}: u_normalized and v_normalized arrays must have the same length"
                ));
            }
        }
    }
    Ok(())
}

fn check_curve_performance(doc: &Document) -> RuleResult {
    let Some((curves, _, speed_count)) = power_curve_inputs(doc)? else {
        return Ok(());
    };

    for (i, curve) in curves.iter().enumerate() {
        let id = label(curve, "profile_id", i);
        for field in PERFORMANCE_ARRAYS {
            let Some(values) = curve.get(field) else {
                continue;
            };
            let len = seq_len(values, field)?;
            if len != speed_count {
                return Err(format!(
                    "Power curve {id}: {field} length ({len}) does not match reference_wind_speeds_m_s length ({speed_count})"
                ));
            }
        }
    }
    Ok(())
}

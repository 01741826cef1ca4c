//! Integration tests for the validation engine.
//!
//! Each test builds a scratch schema directory and data directory, then runs
//! the full pipeline through `Validator`.

use awesio_core::{ErrorKind, ValidationOptions};
use awesio_validator::{ValidationError, Validator};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const WIND_RESOURCE_SCHEMA: &str = r##"$schema: "http://json-schema.org/draft-07/schema#"
$id: "https://awesio.example/schemas/wind_resource_schema.yaml"
title: Wind resource
type: object
required: [metadata, altitudes, clusters]
properties:
    metadata:
        type: object
        required: [n_clusters]
        properties:
            name:
                type: string
            schema:
                type: string
            n_clusters:
                type: integer
                minimum: 1
            n_wind_speed_bins:
                type: integer
            units:
                type: string
                default: SI
    altitudes:
        $ref: "common_schema.yaml#/definitions/number_list"
    clusters:
        type: array
        items:
            type: object
            required: [id, u_normalized, v_normalized]
            properties:
                id:
                    type: integer
                    minimum: 1
                u_normalized:
                    $ref: "common_schema.yaml#/definitions/number_list"
                v_normalized:
                    $ref: "common_schema.yaml#/definitions/number_list"
                frequency:
                    type: number
                    default: 0.0
    wind_speed_bins:
        type: object
        properties:
            bin_edges_m_s:
                $ref: "common_schema.yaml#/definitions/number_list"
            bin_centers_m_s:
                $ref: "common_schema.yaml#/definitions/number_list"
"##;

const COMMON_SCHEMA: &str = r##"$schema: "http://json-schema.org/draft-07/schema#"
definitions:
    number_list:
        type: array
        items:
            type: number
"##;

const POWER_CURVES_SCHEMA: &str = r##"$schema: "http://json-schema.org/draft-07/schema#"
$id: "https://awesio.example/schemas/power_curves_schema.yml"
type: object
required: [power_curves]
properties:
    altitudes_m:
        type: array
    reference_wind_speeds_m_s:
        type: array
    power_curves:
        type: array
        items:
            type: object
            properties:
                profile_id:
                    type: integer
                probability_weight:
                    type: number
                    minimum: 0
                    maximum: 1
"##;

const BAD_REF_SCHEMA: &str = r##"$schema: "http://json-schema.org/draft-07/schema#"
type: object
properties:
    site:
        $ref: "common.json#/definitions/site"
"##;

const BROKEN_SCHEMA: &str = r##"$schema: "http://json-schema.org/draft-07/schema#"
type: object
properties:
    name:
        type: 12
"##;

const WIND_DATA: &str = "\
metadata:
    name: Test site
    schema: ../schemas/wind_resource_schema.yml
    n_clusters: 2
    n_wind_speed_bins: 2
altitudes: !include altitudes.yml
clusters:
   -  id: 1
      u_normalized: [0.8, 1.0, 1.1]
      v_normalized: [0.0, 0.1, 0.1]
   -  id: 2
      u_normalized: [0.9, 1.0, 1.2]
      v_normalized: [0.1, 0.0, 0.0]
wind_speed_bins:
    bin_edges_m_s: [0, 5, 10]
    bin_centers_m_s: [2.5, 7.5]
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().unwrap(),
        };
        fixture.schema("wind_resource_schema.yaml", WIND_RESOURCE_SCHEMA);
        fixture.schema("common_schema.yaml", COMMON_SCHEMA);
        fixture.schema("power_curves_schema.yml", POWER_CURVES_SCHEMA);
        fixture.schema("bad_ref_schema.yaml", BAD_REF_SCHEMA);
        fixture.schema("broken_schema.yaml", BROKEN_SCHEMA);
        fixture.data("altitudes.yml", "[100, 200, 300]\n");
        fixture.data("wind.yml", WIND_DATA);
        fixture
    }

    fn schema_dir(&self) -> PathBuf {
        self.dir.path().join("schemas")
    }

    fn schema(&self, name: &str, content: &str) {
        fs::create_dir_all(self.schema_dir()).unwrap();
        fs::write(self.schema_dir().join(name), content).unwrap();
    }

    fn data(&self, name: &str, content: &str) -> PathBuf {
        let dir = self.dir.path().join("data");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn validator(&self) -> Validator {
        Validator::new(self.schema_dir())
    }
}

fn wind_document() -> serde_json::Value {
    json!({
        "metadata": {"name": "Test site", "n_clusters": 2},
        "altitudes": [100, 200, 300],
        "clusters": [
            {"id": 1, "u_normalized": [0.8, 1.0, 1.1], "v_normalized": [0.0, 0.1, 0.1]},
            {"id": 2, "u_normalized": [0.9, 1.0, 1.2], "v_normalized": [0.1, 0.0, 0.0]}
        ]
    })
}

#[test]
fn test_valid_file_with_include_and_sibling_refs() {
    let fixture = Fixture::new();
    let path = fixture.data("wind.yml", WIND_DATA);

    let doc = fixture
        .validator()
        .validate(path.as_path(), "wind_resource_schema", &ValidationOptions::new())
        .unwrap();

    assert_eq!(doc["altitudes"], json!([100, 200, 300]));
    assert_eq!(doc["clusters"][1]["id"], json!(2));
}

#[test]
fn test_schema_type_inferred_from_metadata() {
    let fixture = Fixture::new();
    let path = fixture.data("wind.yml", WIND_DATA);

    let doc = fixture
        .validator()
        .validate_auto(path.as_path(), &ValidationOptions::new())
        .unwrap();
    assert_eq!(doc["metadata"]["n_clusters"], json!(2));
}

#[test]
fn test_all_structural_violations_reported() {
    let fixture = Fixture::new();
    let mut doc = wind_document();
    doc["metadata"]["n_clusters"] = json!("two");
    doc["clusters"][0]["id"] = json!(0);

    let err = fixture
        .validator()
        .validate(doc, "wind_resource_schema", &ValidationOptions::new())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StructuralViolation);
    let report = err.report().unwrap();
    assert_eq!(
        report.schema_id,
        "https://awesio.example/schemas/wind_resource_schema.yaml"
    );
    assert_eq!(report.len(), 2);
    assert!(report.mentions_path("metadata.n_clusters"));
    assert!(report.mentions_path("clusters.0.id"));

    let message = err.to_string();
    assert!(message.starts_with(
        "Validation failed for schema 'https://awesio.example/schemas/wind_resource_schema.yaml':\n"
    ));
    assert!(message.contains("  - At 'clusters.0.id': "));
}

#[test]
fn test_restrictive_mode_rejects_undeclared_properties() {
    let fixture = Fixture::new();
    let validator = fixture.validator();
    let mut doc = wind_document();
    doc["metadata"]["comment"] = json!("not in the schema");

    validator
        .validate(doc.clone(), "wind_resource_schema", &ValidationOptions::new())
        .unwrap();

    let strict = ValidationOptions::new().with_restrictive(true);
    let err = validator
        .validate(doc.clone(), "wind_resource_schema", &strict)
        .unwrap_err();
    assert!(err.report().unwrap().mentions_path("metadata"));

    // The cached schema stays open for later permissive calls.
    validator
        .validate(doc, "wind_resource_schema", &ValidationOptions::new())
        .unwrap();
}

#[test]
fn test_defaults_injected_at_every_depth() {
    let fixture = Fixture::new();
    let validator = fixture.validator();

    let plain = validator
        .validate(wind_document(), "wind_resource_schema", &ValidationOptions::new())
        .unwrap();
    assert!(plain["metadata"].get("units").is_none());

    let filled = validator
        .validate(
            wind_document(),
            "wind_resource_schema",
            &ValidationOptions::new().with_defaults(true),
        )
        .unwrap();
    assert_eq!(filled["metadata"]["units"], json!("SI"));
    assert_eq!(filled["clusters"][0]["frequency"], json!(0.0));
    assert_eq!(filled["clusters"][1]["frequency"], json!(0.0));
}

#[test]
fn test_restrictive_with_defaults() {
    let fixture = Fixture::new();
    let options = ValidationOptions::new()
        .with_restrictive(true)
        .with_defaults(true);

    let doc = fixture
        .validator()
        .validate(wind_document(), "wind_resource_schema", &options)
        .unwrap();
    assert_eq!(doc["metadata"]["units"], json!("SI"));
}

#[test]
fn test_consistency_runs_after_structure() {
    let fixture = Fixture::new();
    let mut doc = wind_document();
    doc["metadata"]["n_clusters"] = json!(3);

    let err = fixture
        .validator()
        .validate(doc, "wind_resource_schema", &ValidationOptions::new())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConsistencyViolation);
    let message = err.to_string();
    assert!(message.contains("expected 3"), "Got: {message}");
    assert!(message.contains("actual 2"), "Got: {message}");
}

#[test]
fn test_integral_float_ids_pass_both_stages() {
    let fixture = Fixture::new();
    let path = fixture.data("wind_float_ids.yml", &WIND_DATA.replace("id: 1\n", "id: 1.0\n"));

    let doc = fixture
        .validator()
        .validate(path.as_path(), "wind_resource_schema", &ValidationOptions::new())
        .unwrap();
    assert_eq!(doc["clusters"][0]["id"], json!(1.0));
}

#[test]
fn test_power_curve_weights() {
    let fixture = Fixture::new();
    let curves = |weights: &[f64]| {
        let curves: Vec<_> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| json!({"profile_id": i + 1, "probability_weight": w}))
            .collect();
        json!({
            "altitudes_m": [100],
            "reference_wind_speeds_m_s": [5, 10],
            "power_curves": curves
        })
    };
    let validator = fixture.validator();
    let options = ValidationOptions::new();

    validator
        .validate(curves(&[0.5, 0.5]), "power_curves_schema", &options)
        .unwrap();

    let err = validator
        .validate(curves(&[0.3, 0.3, 0.3]), "power_curves_schema", &options)
        .unwrap_err();
    assert!(
        err.to_string()
            .ends_with("Sum of probability_weight values should equal 1.0, got 0.9"),
        "Got: {err}"
    );
}

#[test]
fn test_ref_with_foreign_suffix_is_not_found() {
    let fixture = Fixture::new();
    let err = fixture
        .validator()
        .validate(json!({"site": {}}), "bad_ref_schema", &ValidationOptions::new())
        .unwrap_err();

    assert!(
        matches!(err, ValidationError::NoSuchResource { ref uri } if uri.contains("common.json")),
        "Got: {err:?}"
    );
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_invalid_schema_is_distinct_from_data_failure() {
    let fixture = Fixture::new();
    let err = fixture
        .validator()
        .validate(json!({"name": "fine"}), "broken_schema", &ValidationOptions::new())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::SchemaSelfInvalid);
    assert!(!err.kind().is_data_failure());
}

#[test]
fn test_missing_data_file_and_schema() {
    let fixture = Fixture::new();
    let validator = fixture.validator();

    let err = validator
        .validate(
            fixture.dir.path().join("data/absent.yml"),
            "wind_resource_schema",
            &ValidationOptions::new(),
        )
        .unwrap_err();
    assert!(matches!(err, ValidationError::Load(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = validator
        .validate(wind_document(), "tether_schema", &ValidationOptions::new())
        .unwrap_err();
    assert!(matches!(err, ValidationError::SchemaNotFound { .. }));
}

#[test]
fn test_registry_loads_each_schema_once() {
    let fixture = Fixture::new();
    let validator = fixture.validator();

    for _ in 0..3 {
        validator
            .validate(wind_document(), "wind_resource_schema", &ValidationOptions::new())
            .unwrap();
    }
    assert_eq!(validator.registry().cached(), 2);
}

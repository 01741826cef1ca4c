//! # awesIO Validator
//!
//! Validation engine for awesIO data files. A file is checked in two passes:
//!
//! - Structural validation against a JSON Schema stored as YAML, with
//!   cross-schema `$ref`s served by a [`SchemaRegistry`]; every violation is
//!   collected into one report
//! - Consistency rules per schema type (array lengths, ID numbering, weight
//!   sums); the first failure is returned
//!
//! Schemas can be closed on demand ([`close_schema`]) so undeclared
//! properties are rejected, and declared defaults can be filled into the
//! document while validating.
//!
//! ## Example
//!
//! ```rust
//! use awesio_core::ValidationOptions;
//! use awesio_validator::Validator;
//! use serde_json::json;
//! # let dir = tempfile::TempDir::new().unwrap();
//! # std::fs::write(
//! #     dir.path().join("tether_schema.yaml"),
//! #     "type: object\nproperties:\n    length_m:\n        type: number\n        default: 1000\n",
//! # ).unwrap();
//! # let schema_dir = dir.path();
//!
//! let validator = Validator::new(schema_dir);
//! let options = ValidationOptions::new().with_defaults(true);
//!
//! let doc = validator
//!     .validate(json!({"diameter_m": 0.01}), "tether_schema", &options)
//!     .unwrap();
//! assert_eq!(doc["length_m"], 1000);
//!
//! let strict = ValidationOptions::new().with_restrictive(true);
//! assert!(validator.validate(json!({"colour": "red"}), "tether_schema", &strict).is_err());
//! ```

mod consistency;
mod defaults;
mod engine;
mod error;
mod registry;
mod structural;
mod transform;

pub use consistency::*;
pub use defaults::*;
pub use engine::*;
pub use error::*;
pub use registry::{SCHEMA_EXTENSIONS, SchemaRegistry};
pub use structural::*;
pub use transform::*;

pub use awesio_core::{Document, ValidationInput, ValidationOptions};

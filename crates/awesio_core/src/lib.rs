//! # awesIO Core
//!
//! Shared vocabulary for the awesIO validation engine.
//!
//! awesIO validates engineering-data files describing airborne wind-energy
//! systems (airborne components, tethers, ground stations, wind resource
//! statistics, power curves, operational constraints) against declarative
//! schemas and then runs domain consistency rules over the result.
//!
//! ## Key Concepts
//!
//! - **Document**: an ordered tree of mappings, sequences and scalars loaded from
//!   one data file
//! - **Validation input**: either a path to load or an in-memory document
//! - **Validation options**: closed-world (`restrictive`) and default-injection
//!   (`defaults`) switches
//! - **Error report**: path-annotated violations collected in one structural pass
//! - **Error kind**: the failure taxonomy shared by every crate in the workspace
//!
//! ## Example
//!
//! ```rust
//! use awesio_core::{ErrorReport, FieldPath, ValidationOptions, Violation};
//!
//! let options = ValidationOptions::new().with_restrictive(true);
//! assert!(options.restrictive);
//! assert!(!options.defaults);
//!
//! let report = ErrorReport::new(
//!     "wind_resource_schema",
//!     vec![Violation::new(FieldPath::from_json_pointer("/clusters/0/id"), "0 is less than the minimum of 1")],
//! );
//! assert!(report.to_string().contains("At 'clusters.0.id'"));
//! ```

pub mod document;
pub mod error;
pub mod report;
pub mod validator;

pub use document::*;
pub use error::*;
pub use report::*;
pub use validator::*;

//! YAML document loading and writing for awesIO data files.
//!
//! Loading turns a YAML file into an ordered [`Document`], splicing in any
//! `!include` targets on the way (other YAML files, CSV tables, netCDF grids
//! with the `netcdf` feature). Writing produces the fixed block layout the
//! data files are kept in.
//!
//! # Example
//!
//! ```rust
//! use awesio_parser::{load_str, to_string};
//! use serde_json::json;
//!
//! let doc = load_str("name: kite\naltitudes: [100, 200]\n").unwrap();
//! assert_eq!(doc, json!({"name": "kite", "altitudes": [100, 200]}));
//!
//! let text = to_string(&doc).unwrap();
//! assert_eq!(text, "name: kite\naltitudes: [100, 200]\n");
//! ```

mod columnar;
mod error;
mod format;
mod loader;
mod numeric;
mod writer;

pub use columnar::{read_csv, read_netcdf};
pub use error::{ParserError, Result};
pub use format::{IncludeFormat, detect_format};
pub use loader::{INCLUDE_TAG, LoadOptions, Loader};
pub use writer::{WriteOptions, Writer};

use awesio_core::Document;
use std::path::Path;

/// Loads a document from a file with default options.
///
/// # Example
///
/// ```no_run
/// use awesio_parser::load;
///
/// let doc = load("data/wind_resource.yml").unwrap();
/// println!("{} clusters", doc["clusters"].as_array().map_or(0, |c| c.len()));
/// ```
pub fn load(path: impl AsRef<Path>) -> Result<Document> {
    Loader::new().load(path.as_ref())
}

/// Loads a document from a file with the given options.
pub fn load_with(path: impl AsRef<Path>, options: LoadOptions) -> Result<Document> {
    Loader::with_options(options).load(path.as_ref())
}

/// Loads a document from a string; includes resolve against the working directory.
pub fn load_str(content: &str) -> Result<Document> {
    Loader::new().load_str(content, Path::new("."))
}

/// Renders a document with the default layout.
pub fn to_string(document: &Document) -> Result<String> {
    Writer::new().to_string(document)
}

/// Writes a document to a file with the default layout.
pub fn write(document: &Document, path: impl AsRef<Path>) -> Result<()> {
    Writer::new().write(document, path.as_ref())
}

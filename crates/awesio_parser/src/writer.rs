//! Document writer.
//!
//! Output is block-style YAML in a fixed layout: nested mappings indent by
//! four columns, sequence dashes sit three columns in from their parent and
//! item content starts six columns in. Numeric arrays up to `flow_depth`
//! dimensions are written in flow style on one line (`[1, 2.5]`). Key order
//! is the document's order and non-ASCII text is written as-is.

use crate::numeric::numeric_depth;
use crate::{ParserError, Result};
use awesio_core::Document;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

const MAPPING_INDENT: usize = 4;
const SEQUENCE_DASH_OFFSET: usize = 3;
const SEQUENCE_INDENT: usize = 6;

/// Longer keys must use the explicit `? key` form to reload.
const MAX_IMPLICIT_KEY_LEN: usize = 1024;

/// Options controlling the output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Numeric arrays with at most this many dimensions are written inline
    pub flow_depth: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { flow_depth: 1 }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flow_depth(mut self, flow_depth: usize) -> Self {
        self.flow_depth = flow_depth;
        self
    }
}

/// Serializes [`Document`]s to YAML text.
#[derive(Debug, Clone, Default)]
pub struct Writer {
    options: WriteOptions,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Renders `document` as YAML text.
    pub fn to_string(&self, document: &Document) -> Result<String> {
        let mut out = String::new();
        match document {
            Value::Object(map) if !map.is_empty() => self.emit_mapping(&mut out, map, 0, false)?,
            Value::Array(items) if !self.is_inline(document) => {
                self.emit_sequence(&mut out, items, 0, false)?
            }
            inline => {
                self.emit_inline(&mut out, inline)?;
                out.push('\n');
            }
        }
        Ok(out)
    }

    /// Writes `document` to `path`, replacing any existing file.
    pub fn write(&self, document: &Document, path: &Path) -> Result<()> {
        let text = self.to_string(document)?;
        std::fs::write(path, text).map_err(|e| ParserError::io(path, e))?;
        debug!("Wrote document to {}", path.display());
        Ok(())
    }

    /// Scalars, empty containers and shallow numeric arrays stay on one line.
    fn is_inline(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => {
                items.is_empty()
                    || numeric_depth(value).is_some_and(|depth| depth <= self.options.flow_depth)
            }
            Value::Object(map) => map.is_empty(),
            _ => true,
        }
    }

    fn emit_mapping(
        &self,
        out: &mut String,
        map: &Map<String, Value>,
        indent: usize,
        first_inline: bool,
    ) -> Result<()> {
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 || !first_inline {
                pad(out, indent);
            }
            let key = scalar_string(key)?;
            if key.len() >= MAX_IMPLICIT_KEY_LEN {
                out.push_str("? ");
                out.push_str(&key);
                out.push('\n');
                pad(out, indent);
            } else {
                out.push_str(&key);
            }
            out.push(':');

            if self.is_inline(value) {
                out.push(' ');
                self.emit_inline(out, value)?;
                out.push('\n');
                continue;
            }

            out.push('\n');
            match value {
                Value::Object(nested) => {
                    self.emit_mapping(out, nested, indent + MAPPING_INDENT, false)?
                }
                Value::Array(items) => self.emit_sequence(out, items, indent, false)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn emit_sequence(
        &self,
        out: &mut String,
        items: &[Value],
        indent: usize,
        first_inline: bool,
    ) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 || !first_inline {
                pad(out, indent + SEQUENCE_DASH_OFFSET);
            }
            out.push('-');
            pad(out, SEQUENCE_INDENT - SEQUENCE_DASH_OFFSET - 1);

            if self.is_inline(item) {
                self.emit_inline(out, item)?;
                out.push('\n');
                continue;
            }

            match item {
                Value::Object(map) => self.emit_mapping(out, map, indent + SEQUENCE_INDENT, true)?,
                Value::Array(inner) => {
                    self.emit_sequence(out, inner, indent + SEQUENCE_DASH_OFFSET, true)?
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn emit_inline(&self, out: &mut String, value: &Value) -> Result<()> {
        match value {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => out.push_str(&n.to_string()),
            Value::String(s) => out.push_str(&scalar_string(s)?),
            Value::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.emit_inline(out, item)?;
                }
                out.push(']');
            }
            Value::Object(map) => {
                out.push('{');
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&scalar_string(key)?);
                    out.push_str(": ");
                    self.emit_inline(out, item)?;
                }
                out.push('}');
            }
        }
        Ok(())
    }
}

fn pad(out: &mut String, width: usize) {
    out.extend(std::iter::repeat_n(' ', width));
}

/// Renders a string as a single-line YAML scalar, quoted only when needed.
fn scalar_string(s: &str) -> Result<String> {
    let rendered =
        serde_yaml_ng::to_string(s).map_err(|e| ParserError::Serialize(e.to_string()))?;
    let rendered = rendered.strip_suffix('\n').unwrap_or(&rendered);

    // Block scalars span lines; a double-quoted JSON string is also valid YAML.
    if rendered.contains('\n') || rendered.starts_with("---") {
        serde_json::to_string(s).map_err(|e| ParserError::Serialize(e.to_string()))
    } else {
        Ok(rendered.to_string())
    }
}

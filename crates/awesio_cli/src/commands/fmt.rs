use crate::output;
use anyhow::{Context, Result};
use awesio_parser::{WriteOptions, Writer};
use std::path::Path;
use tracing::info;

/// Loads `file` (resolving includes) and writes it back in the canonical layout.
pub fn execute(file: &Path, output_path: Option<&Path>, flow_depth: usize) -> Result<()> {
    let document = awesio_parser::load(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let writer = Writer::with_options(WriteOptions::new().with_flow_depth(flow_depth));

    match output_path {
        Some(path) => {
            info!("Writing formatted document to {}", path.display());
            writer.write(&document, path)?;
            output::print_success(&format!("Formatted {} -> {}", file.display(), path.display()));
        }
        None => print!("{}", writer.to_string(&document)?),
    }

    Ok(())
}

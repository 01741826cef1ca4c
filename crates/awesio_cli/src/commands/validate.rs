use crate::output;
use anyhow::{Context, Result};
use awesio_core::ValidationOptions;
use awesio_validator::Validator;
use std::path::Path;
use tracing::{debug, info};

pub fn execute(
    file: &Path,
    schema: Option<&str>,
    options: &ValidationOptions,
    format: &str,
    output_path: Option<&Path>,
    schema_dir: &Path,
) -> Result<()> {
    info!("Validating file: {}", file.display());
    debug!(
        "Schema directory: {} (restrictive: {}, defaults: {})",
        schema_dir.display(),
        options.restrictive,
        options.defaults
    );

    let validator = Validator::new(schema_dir);
    let result = match schema {
        Some(schema_type) => validator.validate(file, schema_type, options),
        None => validator.validate_auto(file, options),
    };

    output::print_validation_result(file, schema, &result, format);

    match result {
        Ok(document) => {
            if let Some(path) = output_path {
                awesio_parser::write(&document, path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                if format != "json" {
                    output::print_info(&format!("Document written to {}", path.display()));
                }
            }
            Ok(())
        }
        Err(_) => std::process::exit(1),
    }
}

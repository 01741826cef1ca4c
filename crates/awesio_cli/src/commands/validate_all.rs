use crate::config::{self, Manifest};
use crate::output;
use anyhow::Result;
use awesio_validator::Validator;
use colored::*;
use std::path::Path;
use tracing::info;

/// Validates every manifest entry with one shared validator.
///
/// All entries run even after a failure; the process exits non-zero if any failed.
pub fn execute(manifest_path: &Path, schema_dir: Option<&Path>) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let schema_dir = config::resolve_schema_dir(schema_dir.or(manifest.schema_dir.as_deref()));
    let options = manifest.options();

    info!(
        "Validating {} files from {} (schemas: {})",
        manifest.validations.len(),
        manifest_path.display(),
        schema_dir.display()
    );

    let validator = Validator::new(&schema_dir);
    let mut failures = 0;

    for entry in &manifest.validations {
        let result = match &entry.schema {
            Some(schema_type) => validator.validate(entry.file.as_path(), schema_type, &options),
            None => validator.validate_auto(entry.file.as_path(), &options),
        };

        match result {
            Ok(_) => output::print_success(&format!("Valid: {}", entry.file.display())),
            Err(e) => {
                failures += 1;
                output::print_failure(&format!("Invalid: {}: {}", entry.file.display(), e));
            }
        }
    }

    let total = manifest.validations.len();
    let summary = format!("{}/{} files valid", total - failures, total);
    if failures > 0 {
        println!("\n{}", summary.red().bold());
        std::process::exit(1);
    }

    println!("\n{}", summary.green().bold());
    Ok(())
}

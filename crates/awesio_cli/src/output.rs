use awesio_core::Document;
use awesio_validator::ValidationError;
use colored::*;
use serde_json::json;
use std::path::Path;

/// Prints the outcome of validating one file.
pub fn print_validation_result(
    file: &Path,
    schema: Option<&str>,
    result: &Result<Document, ValidationError>,
    format: &str,
) {
    match format {
        "json" => print_json_result(file, schema, result),
        _ => print_text_result(file, schema, result),
    }
}

fn print_text_result(file: &Path, schema: Option<&str>, result: &Result<Document, ValidationError>) {
    let schema = schema.unwrap_or("metadata.schema");

    match result {
        Ok(_) => {
            print_success(&format!("Valid: {} ({})", file.display(), schema));
        }
        Err(e) => {
            print_failure(&format!("Invalid: {} ({})", file.display(), schema));
            println!("\n{} {}", "Failure:".red().bold(), e.kind());
            for line in e.to_string().lines() {
                println!("  {}", line.red());
            }
        }
    }
}

fn print_json_result(file: &Path, schema: Option<&str>, result: &Result<Document, ValidationError>) {
    let output = match result {
        Ok(_) => json!({
            "file": file.display().to_string(),
            "schema": schema,
            "valid": true,
        }),
        Err(e) => json!({
            "file": file.display().to_string(),
            "schema": schema,
            "valid": false,
            "error": {
                "kind": e.kind(),
                "message": e.to_string(),
                "violations": e.report().map(|r| &r.violations),
            }
        }),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{text}"),
        Err(e) => print_error(&format!("Failed to render JSON output: {e}")),
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_failure(message: &str) {
    println!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

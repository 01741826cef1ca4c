mod commands;
mod config;
mod output;

use anyhow::Result;
use awesio_core::ValidationOptions;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "awesio")]
#[command(version, about = "awesIO data file validator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Schema directory (defaults to $AWESIO_SCHEMA_DIR, then ./schemas)
    #[arg(long, global = true)]
    schema_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a data file against its schema
    Validate {
        /// Path to the data file (YAML)
        file: PathBuf,

        /// Schema type; read from metadata.schema when omitted
        #[arg(short, long)]
        schema: Option<String>,

        /// Reject properties the schema does not declare
        #[arg(short, long)]
        restrictive: bool,

        /// Fill in schema defaults for absent properties
        #[arg(short, long)]
        defaults: bool,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write the validated document (with any defaults) to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate every file listed in a TOML manifest
    ValidateAll {
        /// Path to the manifest file
        manifest: PathBuf,
    },

    /// Rewrite a data file in the canonical layout
    Fmt {
        /// Path to the data file (YAML)
        file: PathBuf,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Numeric arrays up to this many dimensions are written inline
        #[arg(long, default_value_t = 1)]
        flow_depth: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let schema_dir = cli.schema_dir.as_deref();

    match cli.command {
        Commands::Validate {
            file,
            schema,
            restrictive,
            defaults,
            format,
            output,
        } => {
            let options = ValidationOptions::new()
                .with_restrictive(restrictive)
                .with_defaults(defaults);
            commands::validate::execute(
                &file,
                schema.as_deref(),
                &options,
                &format,
                output.as_deref(),
                &config::resolve_schema_dir(schema_dir),
            )
        }

        Commands::ValidateAll { manifest } => commands::validate_all::execute(&manifest, schema_dir),

        Commands::Fmt {
            file,
            output,
            flow_depth,
        } => commands::fmt::execute(&file, output.as_deref(), flow_depth),
    }
}

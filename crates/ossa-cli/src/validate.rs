//! # Validate Subcommand
//!
//! Validates one agent manifest. With `--openapi` the manifest and its API
//! description run through the full dual-format pipeline; without it only
//! manifest checks apply.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ossa_compliance::ValidationOptions;
use ossa_schema::load_document;

use crate::config::CliConfig;
use crate::output::{render_report, OutputFormat};
use crate::{build_engine, EXIT_INVALID, EXIT_VALID};

/// Arguments for the `ossa validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Agent manifest (YAML or JSON).
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// OpenAPI description to validate alongside the manifest.
    #[arg(long, value_name = "FILE")]
    pub openapi: Option<PathBuf>,

    /// Compliance framework to evaluate. Repeatable.
    #[arg(long = "framework", value_name = "ID")]
    pub frameworks: Vec<String>,

    /// Also run the best-practices stage.
    #[arg(long)]
    pub strict: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when valid, 1 when invalid. Unreadable inputs are
/// errors, which the caller maps to 2.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig) -> Result<u8> {
    let engine = build_engine(config.schema_dir.as_deref())?;
    let options = ValidationOptions {
        frameworks: config.frameworks(&args.frameworks),
        strict: config.strict(args.strict),
    };

    let manifest = load_document(&args.manifest)
        .with_context(|| format!("failed to load manifest {}", args.manifest.display()))?;

    let report = match &args.openapi {
        Some(path) => {
            let api = load_document(path)
                .with_context(|| format!("failed to load OpenAPI description {}", path.display()))?;
            engine.validate_dual_format(&manifest, &api, &options)?
        }
        None => engine.validate_agent(&manifest, &options)?,
    };

    tracing::info!(
        manifest = %args.manifest.display(),
        valid = report.valid,
        score = report.overall_score,
        "validation complete"
    );

    let source = args.manifest.display().to_string();
    println!("{}", render_report(&source, &report, args.format)?);

    Ok(if report.valid { EXIT_VALID } else { EXIT_INVALID })
}

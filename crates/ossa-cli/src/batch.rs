//! # Batch Subcommand
//!
//! Validates every manifest found under a directory, pairing each with a
//! sibling `openapi.yaml|yml|json` when present, and prints `N of M valid`.
//! A file that cannot be loaded is reported in the summary and does not
//! stop the run.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;
use ossa_compliance::{BatchEntry, BatchItem, BatchSummary, ComplianceEngine, ValidationOptions};
use ossa_schema::{discover_manifests, load_document, LoadError, ManifestPair};

use crate::config::CliConfig;
use crate::output::{render_summary, OutputFormat};
use crate::{build_engine, EXIT_INVALID, EXIT_VALID};

/// Arguments for the `ossa batch` subcommand.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory searched recursively for manifests.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Compliance framework to evaluate. Repeatable.
    #[arg(long = "framework", value_name = "ID")]
    pub frameworks: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the batch subcommand.
///
/// Returns exit code: 0 when every manifest is valid, 1 otherwise.
pub fn run_batch(args: &BatchArgs, config: &CliConfig) -> Result<u8> {
    if !args.dir.is_dir() {
        bail!("directory not found: {}", args.dir.display());
    }
    let pairs = discover_manifests(&args.dir);
    if pairs.is_empty() {
        bail!("no agent manifests found under {}", args.dir.display());
    }
    tracing::info!(count = pairs.len(), dir = %args.dir.display(), "discovered manifests");

    let engine = build_engine(config.schema_dir.as_deref())?;
    let options = ValidationOptions {
        frameworks: config.frameworks(&args.frameworks),
        strict: config.strict(false),
    };

    let summary = validate_pairs(&engine, &args.dir, &pairs, &options);
    println!("{}", render_summary(&summary, args.format)?);

    Ok(if summary.valid == summary.total {
        EXIT_VALID
    } else {
        EXIT_INVALID
    })
}

/// Validate discovered pairs in path order. Sources are shown relative to
/// `root`.
pub fn validate_pairs(
    engine: &ComplianceEngine,
    root: &Path,
    pairs: &[ManifestPair],
    options: &ValidationOptions,
) -> BatchSummary {
    let entries = pairs
        .iter()
        .map(|pair| {
            let source = pair
                .manifest
                .strip_prefix(root)
                .unwrap_or(&pair.manifest)
                .display()
                .to_string();
            match load_pair(pair, &source) {
                Ok(item) => engine.validate_item(&item, options),
                Err(err) => {
                    tracing::warn!(%source, error = %err, "could not load manifest");
                    BatchEntry::faulted(source, err.to_string())
                }
            }
        })
        .collect();
    BatchSummary::from_entries(entries)
}

fn load_pair(pair: &ManifestPair, source: &str) -> Result<BatchItem, LoadError> {
    let manifest = load_document(&pair.manifest)?;
    let api = pair
        .api_description
        .as_deref()
        .map(load_document)
        .transpose()?;
    Ok(BatchItem {
        source: source.to_string(),
        manifest,
        api,
    })
}

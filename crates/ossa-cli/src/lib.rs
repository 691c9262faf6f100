//! # ossa-cli: Command-Line Validation for OSSA Agents
//!
//! ## Subcommands
//!
//! - `ossa validate`: one manifest, optionally with its OpenAPI description.
//! - `ossa batch`: every manifest under a directory.
//!
//! ```bash
//! ossa validate agents/support/support.ossa.yaml --openapi agents/support/openapi.yaml \
//!     --framework EU_AI_ACT --framework GDPR --strict
//! ossa batch agents/ --format json
//! ```
//!
//! ## Exit Codes
//!
//! `0` valid, `1` invalid, `2` operational error (unreadable file,
//! unusable schema directory, bad configuration).

pub mod batch;
pub mod config;
pub mod output;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use ossa_compliance::ComplianceEngine;

/// Exit code for a run whose inputs all validated.
pub const EXIT_VALID: u8 = 0;
/// Exit code when at least one input failed validation.
pub const EXIT_INVALID: u8 = 1;
/// Exit code for operational errors.
pub const EXIT_ERROR: u8 = 2;

/// Engine over `schema_dir` when given, else the bundled schemas.
pub fn build_engine(schema_dir: Option<&Path>) -> Result<ComplianceEngine> {
    let engine = match schema_dir {
        Some(dir) => ComplianceEngine::from_schema_dir(dir)
            .with_context(|| format!("failed to load schemas from {}", dir.display()))?,
        None => ComplianceEngine::new().context("failed to load bundled schemas")?,
    };
    tracing::info!(
        schema_count = engine.schemas().schema_count(),
        "loaded schema registry"
    );
    Ok(engine)
}

//! # ossa CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ossa_cli::batch::{run_batch, BatchArgs};
use ossa_cli::config::CliConfig;
use ossa_cli::validate::{run_validate, ValidateArgs};
use ossa_cli::EXIT_ERROR;

/// OSSA agent manifest validator.
///
/// Checks manifests and their OpenAPI descriptions for structure,
/// cross-format consistency, security posture and regulatory framework
/// coverage, then assigns a certification tier.
#[derive(Parser, Debug)]
#[command(name = "ossa", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate one agent manifest, optionally with its OpenAPI description.
    Validate(ValidateArgs),

    /// Validate every agent manifest under a directory.
    Batch(BatchArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Validate(args) => run_validate(args, &config),
        Commands::Batch(args) => run_batch(args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ossa_cli::output::OutputFormat;

    #[test]
    fn parses_validate_with_repeated_frameworks() {
        let cli = Cli::try_parse_from([
            "ossa",
            "-vv",
            "validate",
            "agent.yml",
            "--openapi",
            "openapi.yaml",
            "--framework",
            "EU_AI_ACT",
            "--framework",
            "GDPR",
            "--strict",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.manifest, PathBuf::from("agent.yml"));
        assert_eq!(args.openapi, Some(PathBuf::from("openapi.yaml")));
        assert_eq!(args.frameworks, vec!["EU_AI_ACT", "GDPR"]);
        assert!(args.strict);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn parses_batch_with_global_config() {
        let cli = Cli::try_parse_from(["ossa", "batch", "agents/", "--config", "ossa.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("ossa.yaml")));
        let Commands::Batch(args) = cli.command else {
            panic!("expected batch");
        };
        assert_eq!(args.dir, PathBuf::from("agents/"));
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn validate_requires_manifest() {
        assert!(Cli::try_parse_from(["ossa", "validate"]).is_err());
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(Cli::try_parse_from(["ossa", "batch", "d", "--format", "xml"]).is_err());
    }
}

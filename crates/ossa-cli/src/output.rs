//! # Output Rendering
//!
//! Human-readable text or pretty JSON for reports and batch summaries.

use std::fmt::Write as _;

use anyhow::Result;
use clap::ValueEnum;
use ossa_compliance::{BatchOutcome, BatchSummary, ComplianceReport};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_report(source: &str, report: &ComplianceReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Text => Ok(report_text(source, report)),
    }
}

pub fn render_summary(summary: &BatchSummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(summary),
        OutputFormat::Text => Ok(summary_text(summary)),
    }
}

fn verdict(valid: bool) -> &'static str {
    if valid {
        "VALID"
    } else {
        "INVALID"
    }
}

fn report_text(source: &str, report: &ComplianceReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{source}: {} (score {:.2}, certification {})",
        verdict(report.valid),
        report.overall_score,
        report.certification_level
    );

    let frameworks = report
        .framework_results
        .iter()
        .flat_map(|f| f.values().map(|r| &r.result));
    for stage in report.stage_results.values().chain(frameworks) {
        let _ = writeln!(
            out,
            "  {:<28} {:>3}/100  {}",
            stage.stage.label(),
            stage.score,
            if stage.valid { "ok" } else { "FAIL" }
        );
    }

    for issue in report.errors.iter().chain(report.warnings.iter()) {
        let _ = writeln!(out, "  {issue}");
    }

    if !report.recommendations.is_empty() {
        out.push_str("Recommendations:\n");
        for rec in &report.recommendations {
            let _ = writeln!(out, "  - {rec}");
        }
    }
    out
}

fn summary_text(summary: &BatchSummary) -> String {
    let mut out = String::new();
    for entry in &summary.results {
        match &entry.outcome {
            BatchOutcome::Completed { report } => {
                let _ = writeln!(
                    out,
                    "  {}: {} (score {:.2}, certification {})",
                    verdict(report.valid),
                    entry.source,
                    report.overall_score,
                    report.certification_level,
                );
            }
            BatchOutcome::Faulted { error } => {
                let _ = writeln!(out, "  ERROR: {}: {error}", entry.source);
            }
        }
    }
    let _ = writeln!(out, "{}", summary.headline());
    out
}

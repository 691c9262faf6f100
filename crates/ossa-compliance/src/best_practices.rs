//! Opt-in strict checks on manifest hygiene.

use ossa_core::scoring::BEST_PRACTICES_POLICY;
use ossa_core::{Findings, StageId, StageResult};

use crate::document::ManifestView;

/// Accepted sampling temperature range, inclusive.
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

pub fn check(manifest: &ManifestView<'_>) -> StageResult {
    let mut findings = Findings::new(StageId::BestPractices);

    if manifest.role().is_some() {
        findings.passed("BEST_PRACTICE_ROLE", "Agent role is defined");
    } else {
        findings.error("BEST_PRACTICE_ROLE", "Agent must have a 'role' field defined");
    }

    if let Some(temperature) = manifest.temperature() {
        if TEMPERATURE_RANGE.contains(&temperature) {
            findings.passed("BEST_PRACTICE_TEMPERATURE", "LLM temperature within range");
        } else {
            findings.warning(
                "BEST_PRACTICE_TEMPERATURE",
                format!("Unusual temperature value: {temperature}"),
            );
        }
    }

    if manifest.description().is_some() {
        findings.passed("BEST_PRACTICE_DESCRIPTION", "Metadata description present");
    } else {
        findings.warning("BEST_PRACTICE_DESCRIPTION", "Consider adding a description to metadata");
    }

    if manifest.has_labels() {
        findings.passed("BEST_PRACTICE_LABELS", "Metadata labels present");
    } else {
        findings.warning(
            "BEST_PRACTICE_LABELS",
            "Consider adding labels for better organization",
        );
    }

    findings.finish(BEST_PRACTICES_POLICY)
}

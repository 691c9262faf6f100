//! # Report Generation
//!
//! Reduces the stage results of one run into a [`ComplianceReport`]. The
//! reducer is pure: identical stage results always yield an identical report
//! (maps are ordered, nothing reads a clock).
//!
//! - `errors`, `warnings` and `passed` are the union of every stage, in
//!   stage order, then framework results in identifier order.
//! - `overallScore` is the mean score of every stage that ran, frameworks
//!   included.
//! - `valid` requires zero errors overall and `overallScore >= 70`.
//! - The certification tier reads the global counts.

use std::collections::{BTreeMap, BTreeSet};

use ossa_core::certification::{self, CertificationLevel, IssueCounts};
use ossa_core::scoring::{overall_score, DEFAULT_THRESHOLD};
use ossa_core::{FrameworkResult, StageId, StageResult, ValidationIssue};
use serde::{Deserialize, Serialize};

/// The outcome of a validation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub valid: bool,
    pub certification_level: CertificationLevel,
    pub overall_score: f64,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub passed: Vec<ValidationIssue>,
    pub stage_results: BTreeMap<StageId, StageResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_results: Option<BTreeMap<String, FrameworkResult>>,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
}

impl ComplianceReport {
    /// Global error, warning and passed totals.
    pub fn counts(&self) -> IssueCounts {
        IssueCounts {
            errors: self.errors.len(),
            warnings: self.warnings.len(),
            passed: self.passed.len(),
        }
    }
}

/// Compose stage and framework results into a report.
///
/// `frameworks` is `None` when no framework evaluation was requested; the
/// report then omits `frameworkResults`.
pub fn generate(
    stages: Vec<StageResult>,
    frameworks: Option<BTreeMap<String, FrameworkResult>>,
) -> ComplianceReport {
    let stage_results: BTreeMap<StageId, StageResult> = stages
        .into_iter()
        .map(|stage| (stage.stage.clone(), stage))
        .collect();

    let all: Vec<&StageResult> = stage_results
        .values()
        .chain(frameworks.iter().flat_map(|f| f.values().map(|r| &r.result)))
        .collect();

    let errors = union(&all, |s| &s.errors);
    let warnings = union(&all, |s| &s.warnings);
    let passed = union(&all, |s| &s.passed);
    let overall_score = overall_score(all.iter().map(|s| s.score));

    let counts = IssueCounts {
        errors: errors.len(),
        warnings: warnings.len(),
        passed: passed.len(),
    };
    let level = certification::determine(counts);
    let valid = counts.errors == 0 && overall_score >= f64::from(DEFAULT_THRESHOLD);

    let recommendations = recommendations(&all, counts, level, frameworks.is_some());
    let next_steps = next_steps(level);

    ComplianceReport {
        valid,
        certification_level: level,
        overall_score,
        errors,
        warnings,
        passed,
        stage_results,
        framework_results: frameworks,
        recommendations,
        next_steps,
    }
}

fn union(
    stages: &[&StageResult],
    pick: impl Fn(&StageResult) -> &Vec<ValidationIssue>,
) -> Vec<ValidationIssue> {
    stages.iter().flat_map(|s| pick(s).iter().cloned()).collect()
}

fn recommendations(
    stages: &[&StageResult],
    counts: IssueCounts,
    level: CertificationLevel,
    frameworks_requested: bool,
) -> Vec<String> {
    let mut out = Vec::new();

    if counts.errors > 0 {
        out.push(format!(
            "Fix {} validation error(s) to make the agent compliant",
            counts.errors
        ));
    }
    if counts.warnings > 2 {
        out.push(format!(
            "Address {} warnings to qualify for higher certification tiers",
            counts.warnings
        ));
    }

    for stage in stages.iter().filter(|s| !s.valid) {
        out.push(format!(
            "Improve {} compliance (score {}/100)",
            stage.stage.label(),
            stage.score
        ));
    }

    let mut seen = BTreeSet::new();
    for issue in stages
        .iter()
        .flat_map(|s| s.errors.iter().chain(s.warnings.iter()))
    {
        if let Some(advice) = remediation(&issue.code) {
            if seen.insert(issue.code.as_str()) {
                out.push(advice.to_string());
            }
        }
    }

    if let Some(gate) = level.next().and_then(|next| next.gate()) {
        let missing = gate.min_passed.saturating_sub(counts.passed);
        if missing > 0 {
            out.push(format!(
                "Add {missing} more passing check(s) to reach {} certification",
                gate.level
            ));
        }
    }

    if !frameworks_requested {
        out.push(
            "Run compliance framework evaluation (e.g. ISO_42001_2023, EU_AI_ACT) for regulatory coverage"
                .to_string(),
        );
    }

    out
}

/// Fixed advice per finding code.
fn remediation(code: &str) -> Option<&'static str> {
    Some(match code {
        "STRUCTURAL_API_VERSION" => "Set apiVersion to an ossa/ version, e.g. ossa/v0.1.9",
        "CROSS_FORMAT_NO_ENDPOINTS" => {
            "Define API paths in the OpenAPI description or remove HTTP protocols from the manifest"
        }
        "CROSS_FORMAT_NAME_MISMATCH" => "Align the OpenAPI info.title with the agent name",
        "CROSS_FORMAT_VERSION_MISMATCH" => "Keep metadata.version and info.version in step",
        "CROSS_FORMAT_ORCHESTRATION_DENSITY" => {
            "Expose the orchestration steps as separate API operations"
        }
        "SECURITY_NO_AUTH_SCHEME" => {
            "Declare an authentication scheme under components.securitySchemes"
        }
        "SECURITY_NO_GLOBAL_REQUIREMENT" => {
            "Apply a top-level security requirement so every operation is authenticated"
        }
        "SECURITY_NO_AUDIT_METRICS" => "Add an audit metric or enable monitoring.audit_logging",
        "SECURITY_NO_DATA_QUALITY" => "Document data quality controls in a data_quality section",
        "EU_AI_ACT_HUMAN_OVERSIGHT" => {
            "Enable human_oversight.human_in_loop for high-risk deployments"
        }
        "EU_AI_ACT_RISK_CLASSIFICATION" => {
            "Declare risk_classification as minimal, limited, high or unacceptable"
        }
        "GDPR_DATA_PROTECTION" => "Add a data_protection section with a lawful basis",
        "ISO42001_GOVERNANCE" => "Add a governance section naming an accountable owner",
        "NIST_GOVERN" => "Document the NIST AI RMF GOVERN function",
        _ => return None,
    })
}

fn next_steps(level: CertificationLevel) -> Vec<String> {
    let steps: &[&str] = match level {
        CertificationLevel::None => &[
            "Resolve all validation errors",
            "Re-run dual-format validation",
            "Add missing compliance sections to the manifest",
        ],
        CertificationLevel::Bronze => &[
            "Resolve remaining validation errors",
            "Reduce warnings to five or fewer for silver certification",
        ],
        CertificationLevel::Silver => &[
            "Reduce warnings to two or fewer for gold certification",
            "Evaluate additional compliance frameworks",
        ],
        CertificationLevel::Gold => &[
            "Eliminate remaining warnings for platinum certification",
            "Schedule periodic re-validation",
        ],
        CertificationLevel::Platinum => &[
            "Maintain compliance with periodic re-validation",
            "Publish the agent and its API description to the registry",
        ],
    };
    steps.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ossa_core::scoring::{SECURITY_POLICY, STRUCTURAL_POLICY};
    use ossa_core::Findings;

    fn stage(stage: StageId, errors: usize, warnings: usize, passed: usize) -> StageResult {
        let mut findings = Findings::new(stage);
        for _ in 0..errors {
            findings.error("SECURITY_NO_AUTH_SCHEME", "e");
        }
        for _ in 0..warnings {
            findings.warning("W", "w");
        }
        for _ in 0..passed {
            findings.passed("P", "p");
        }
        findings.finish(STRUCTURAL_POLICY)
    }

    #[test]
    fn clean_run_is_valid_with_tier() {
        let report = generate(
            vec![stage(StageId::Structural, 0, 0, 5), stage(StageId::Security, 0, 1, 4)],
            None,
        );
        assert!(report.valid);
        assert_eq!(report.overall_score, 99.0);
        assert_eq!(report.certification_level, CertificationLevel::Gold);
        assert!(report.framework_results.is_none());
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("Add 1 more passing check(s) to reach platinum")));
    }

    #[test]
    fn any_error_invalidates() {
        let report = generate(vec![stage(StageId::Structural, 1, 0, 9)], None);
        assert!(!report.valid);
        assert_eq!(report.overall_score, 90.0);
        assert_eq!(report.certification_level, CertificationLevel::Bronze);
        assert_eq!(
            report.recommendations[0],
            "Fix 1 validation error(s) to make the agent compliant"
        );
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("components.securitySchemes")));
    }

    #[test]
    fn low_score_invalidates_without_errors() {
        let mut findings = Findings::new(StageId::Security);
        for _ in 0..4 {
            findings.warning("W", "w");
        }
        let low = findings.finish(SECURITY_POLICY);
        assert_eq!(low.score, 68);
        let report = generate(vec![low], None);
        assert!(report.errors.is_empty());
        assert!(!report.valid);
    }

    #[test]
    fn frameworks_enter_the_mean_and_union() {
        let mut frameworks = BTreeMap::new();
        frameworks.insert(
            "NOT_REAL".to_string(),
            FrameworkResult {
                framework_id: "NOT_REAL".to_string(),
                result: StageResult::failed(
                    StageId::framework("NOT_REAL"),
                    "FRAMEWORK_UNSUPPORTED",
                    "Unsupported framework: NOT_REAL",
                ),
            },
        );
        let report = generate(vec![stage(StageId::Structural, 0, 0, 3)], Some(frameworks));
        assert_eq!(report.overall_score, 50.0);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].message, "Unsupported framework: NOT_REAL");
        assert!(!report
            .recommendations
            .iter()
            .any(|r| r.starts_with("Run compliance framework evaluation")));
    }

    #[test]
    fn union_follows_stage_order() {
        let report = generate(
            vec![stage(StageId::Security, 0, 1, 0), stage(StageId::Structural, 0, 1, 0)],
            None,
        );
        assert_eq!(report.warnings[0].stage, StageId::Structural);
        assert_eq!(report.warnings[1].stage, StageId::Security);
    }

    #[test]
    fn remediation_is_deduplicated() {
        let report = generate(vec![stage(StageId::Security, 3, 0, 0)], None);
        let hits = report
            .recommendations
            .iter()
            .filter(|r| r.contains("components.securitySchemes"))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn wire_shape_uses_camel_case() {
        let report = generate(vec![stage(StageId::CrossFormat, 0, 0, 1)], None);
        let value = serde_json::to_value(&report).unwrap();
        for key in [
            "valid",
            "certificationLevel",
            "overallScore",
            "errors",
            "warnings",
            "passed",
            "stageResults",
            "recommendations",
            "nextSteps",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert!(value.get("frameworkResults").is_none());
        assert!(value["stageResults"].get("cross_format").is_some());
        assert_eq!(value["certificationLevel"], "none");
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = generate(vec![stage(StageId::Structural, 1, 2, 3)], None);
        let text = serde_json::to_string(&report).unwrap();
        let back: ComplianceReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
    }
}

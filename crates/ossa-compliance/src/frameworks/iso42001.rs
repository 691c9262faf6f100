//! ISO/IEC 42001:2023 AI management system rules.
//!
//! Governance, risk management and monitoring sections are mandatory. Data
//! quality is recommended.

use ossa_core::{FrameworkId, Findings, StageId, ValidationIssue};
use serde_json::Value;

use crate::document::{is_configured, ManifestView};

const OWNER_KEYS: [&str; 3] = ["owner", "accountable", "responsible"];

pub fn evaluate(manifest: &ManifestView<'_>) -> Vec<ValidationIssue> {
    let mut findings = Findings::new(StageId::framework(FrameworkId::Iso42001.as_str()));

    match manifest.section("governance").filter(|v| is_configured(Some(*v))) {
        Some(governance) => {
            findings.passed("ISO42001_GOVERNANCE", "AI governance section present");
            if has_any(governance, &OWNER_KEYS) {
                findings.passed("ISO42001_ACCOUNTABILITY", "Accountable owner assigned");
            } else {
                findings.warning(
                    "ISO42001_ACCOUNTABILITY",
                    "Governance section does not name an accountable owner",
                );
            }
        }
        None => findings.error(
            "ISO42001_GOVERNANCE",
            "ISO 42001 requires an AI governance section (governance)",
        ),
    }

    match manifest.section("risk_management").filter(|v| is_configured(Some(*v))) {
        Some(risk) => {
            findings.passed("ISO42001_RISK_MANAGEMENT", "Risk management section present");
            if is_configured(risk.get("risk_assessment").or_else(|| risk.get("assessment"))) {
                findings.passed("ISO42001_RISK_ASSESSMENT", "Risk assessment documented");
            } else {
                findings.warning(
                    "ISO42001_RISK_ASSESSMENT",
                    "Risk management section does not document a risk assessment",
                );
            }
        }
        None => findings.error(
            "ISO42001_RISK_MANAGEMENT",
            "ISO 42001 requires a risk management section (risk_management)",
        ),
    }

    if is_configured(manifest.section("monitoring")) {
        findings.passed("ISO42001_MONITORING", "Performance monitoring configured");
    } else {
        findings.error(
            "ISO42001_MONITORING",
            "ISO 42001 requires performance monitoring (monitoring)",
        );
    }

    if is_configured(manifest.section("data_quality")) {
        findings.passed("ISO42001_DATA_QUALITY", "Data quality controls documented");
    } else {
        findings.warning(
            "ISO42001_DATA_QUALITY",
            "No data quality controls documented (data_quality)",
        );
    }

    findings.into_issues()
}

fn has_any(section: &Value, keys: &[&str]) -> bool {
    keys.iter().any(|k| is_configured(section.get(*k)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ossa_core::Severity;
    use serde_json::json;

    fn count(issues: &[ValidationIssue], severity: Severity) -> usize {
        issues.iter().filter(|i| i.severity == severity).count()
    }

    #[test]
    fn empty_manifest_misses_mandatory_sections() {
        let doc = json!({});
        let issues = evaluate(&ManifestView::new(&doc));
        assert_eq!(count(&issues, Severity::Error), 3);
        assert_eq!(count(&issues, Severity::Warning), 1);
    }

    #[test]
    fn complete_manifest_passes() {
        let doc = json!({
            "spec": {
                "monitoring": {"metrics": ["latency"]},
                "compliance": {
                    "governance": {"owner": "ml-platform"},
                    "risk_management": {"risk_assessment": "2026-Q3"},
                    "data_quality": {"validation": "schema"}
                }
            }
        });
        let issues = evaluate(&ManifestView::new(&doc));
        assert_eq!(count(&issues, Severity::Error), 0);
        assert_eq!(count(&issues, Severity::Warning), 0);
        assert_eq!(count(&issues, Severity::Passed), 6);
    }

    #[test]
    fn sub_checks_warn() {
        let doc = json!({
            "governance": {"policy": "ai-policy-v2"},
            "risk_management": {"register": []},
            "monitoring": {"enabled": true},
            "data_quality": {"checks": ["nulls"]}
        });
        let issues = evaluate(&ManifestView::new(&doc));
        assert_eq!(count(&issues, Severity::Error), 0);
        assert_eq!(count(&issues, Severity::Warning), 2);
    }
}

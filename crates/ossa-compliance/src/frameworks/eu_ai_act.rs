//! # EU AI Act
//!
//! Risk-tier driven rules:
//!
//! - a risk classification (`minimal`, `limited`, `high`, `unacceptable`)
//!   is required; `unacceptable` is a prohibited practice;
//! - transparency obligations are mandatory for `limited` and `high` risk;
//! - `high` risk requires human oversight with `human_in_loop: true`, and
//!   documented data quality.
//!
//! High risk without human-in-the-loop is always an error, whatever else
//! the manifest declares.

use ossa_core::{FrameworkId, Findings, StageId, ValidationIssue};
use serde_json::Value;

use crate::document::{is_configured, ManifestView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Minimal,
    Limited,
    High,
    Unacceptable,
}

impl RiskLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "minimal" => Some(Self::Minimal),
            "limited" => Some(Self::Limited),
            "high" => Some(Self::High),
            "unacceptable" => Some(Self::Unacceptable),
            _ => None,
        }
    }
}

/// Classification as a bare string, or an object with a `level` field.
fn classification(manifest: &ManifestView<'_>) -> Option<String> {
    match manifest.section("risk_classification")? {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("level").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

pub fn evaluate(manifest: &ManifestView<'_>) -> Vec<ValidationIssue> {
    let mut findings = Findings::new(StageId::framework(FrameworkId::EuAiAct.as_str()));

    let risk = match classification(manifest) {
        None => {
            findings.error(
                "EU_AI_ACT_RISK_CLASSIFICATION",
                "Risk classification is required (minimal, limited, high or unacceptable)",
            );
            None
        }
        Some(raw) => match RiskLevel::parse(&raw) {
            None => {
                findings.error(
                    "EU_AI_ACT_RISK_CLASSIFICATION",
                    format!("Invalid risk classification: {raw}"),
                );
                None
            }
            Some(RiskLevel::Unacceptable) => {
                findings.error(
                    "EU_AI_ACT_PROHIBITED",
                    "Risk classification 'unacceptable' denotes a prohibited AI practice",
                );
                Some(RiskLevel::Unacceptable)
            }
            Some(level) => {
                findings.passed(
                    "EU_AI_ACT_RISK_CLASSIFICATION",
                    format!("Risk classification: {}", raw.trim().to_ascii_lowercase()),
                );
                Some(level)
            }
        },
    };

    let transparency_required = matches!(risk, Some(RiskLevel::High | RiskLevel::Limited));
    if is_configured(manifest.section("transparency")) {
        findings.passed("EU_AI_ACT_TRANSPARENCY", "Transparency obligations documented");
    } else if transparency_required {
        findings.error(
            "EU_AI_ACT_TRANSPARENCY",
            "Transparency obligations are mandatory for limited and high risk systems",
        );
    } else {
        findings.warning(
            "EU_AI_ACT_TRANSPARENCY",
            "No transparency information documented (transparency)",
        );
    }

    let oversight = manifest.section("human_oversight");
    let human_in_loop = oversight
        .and_then(|o| o.get("human_in_loop"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if risk == Some(RiskLevel::High) {
        if human_in_loop {
            findings.passed("EU_AI_ACT_HUMAN_OVERSIGHT", "Human-in-the-loop oversight enabled");
        } else {
            findings.error(
                "EU_AI_ACT_HUMAN_OVERSIGHT",
                "High-risk AI systems require human oversight with human_in_loop enabled",
            );
        }
        if is_configured(manifest.section("data_quality")) {
            findings.passed("EU_AI_ACT_DATA_GOVERNANCE", "Data governance documented");
        } else {
            findings.error(
                "EU_AI_ACT_DATA_GOVERNANCE",
                "High-risk AI systems require documented data quality and governance (data_quality)",
            );
        }
    } else if is_configured(oversight) {
        findings.passed("EU_AI_ACT_HUMAN_OVERSIGHT", "Human oversight measures documented");
    }

    findings.into_issues()
}

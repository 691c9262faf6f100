//! GDPR data-protection rules, read from the `data_protection` section.

use ossa_core::{FrameworkId, Findings, StageId, ValidationIssue};
use serde_json::Value;

use crate::document::{is_configured, ManifestView};

/// Legal bases for processing, GDPR Art. 6(1).
pub const LAWFUL_BASES: [&str; 6] = [
    "consent",
    "contract",
    "legal_obligation",
    "vital_interests",
    "public_task",
    "legitimate_interests",
];

pub fn evaluate(manifest: &ManifestView<'_>) -> Vec<ValidationIssue> {
    let mut findings = Findings::new(StageId::framework(FrameworkId::Gdpr.as_str()));

    let Some(protection) = manifest
        .section("data_protection")
        .filter(|v| v.is_object() && is_configured(Some(*v)))
    else {
        findings.error(
            "GDPR_DATA_PROTECTION",
            "No data protection section found (data_protection)",
        );
        return findings.into_issues();
    };
    findings.passed("GDPR_DATA_PROTECTION", "Data protection section present");

    match protection.get("lawful_basis").and_then(Value::as_str) {
        None => findings.error("GDPR_LAWFUL_BASIS", "No lawful basis for processing declared"),
        Some(basis) if LAWFUL_BASES.contains(&basis.trim().to_ascii_lowercase().as_str()) => {
            findings.passed("GDPR_LAWFUL_BASIS", format!("Lawful basis: {basis}"));
        }
        Some(basis) => findings.error(
            "GDPR_LAWFUL_BASIS",
            format!("Invalid lawful basis: {basis}"),
        ),
    }

    optional(
        &mut findings,
        protection,
        &["retention_period", "retention"],
        "GDPR_RETENTION",
        "Retention period declared",
        "No data retention period declared",
    );
    optional(
        &mut findings,
        protection,
        &["data_subject_rights"],
        "GDPR_SUBJECT_RIGHTS",
        "Data subject rights procedures declared",
        "No data subject rights procedures declared",
    );
    optional(
        &mut findings,
        protection,
        &["dpo", "data_protection_officer"],
        "GDPR_DPO",
        "Data protection officer designated",
        "No data protection officer designated",
    );

    check_transfers(&mut findings, protection);

    findings.into_issues()
}

fn optional(
    findings: &mut Findings,
    protection: &Value,
    keys: &[&str],
    code: &str,
    present: &str,
    missing: &str,
) {
    if keys.iter().any(|k| is_configured(protection.get(*k))) {
        findings.passed(code, present);
    } else {
        findings.warning(code, missing);
    }
}

/// International transfers need safeguards (adequacy decision, SCCs, ...).
fn check_transfers(findings: &mut Findings, protection: &Value) {
    let transfers = protection.get("international_transfers");
    let enabled = match transfers {
        Some(Value::Bool(b)) => *b,
        Some(Value::Object(map)) => map.get("enabled").and_then(Value::as_bool).unwrap_or(true),
        _ => false,
    };
    if !enabled {
        return;
    }
    let safeguards = transfers
        .and_then(|t| t.get("safeguards"))
        .or_else(|| protection.get("safeguards"));
    if is_configured(safeguards) {
        findings.passed("GDPR_TRANSFERS", "International transfers covered by safeguards");
    } else {
        findings.error(
            "GDPR_TRANSFERS",
            "International data transfers declared without safeguards",
        );
    }
}

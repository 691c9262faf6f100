//! # Security Stage
//!
//! Authentication and audit posture across both documents. Every rule is
//! evaluated independently. Manifest rules are skipped when only an API
//! description is validated.

use ossa_core::scoring::SECURITY_POLICY;
use ossa_core::{Findings, StageId, StageResult};

use crate::document::{is_configured, ApiView, ManifestView};

pub fn check(manifest: Option<&ManifestView<'_>>, api: &ApiView<'_>) -> StageResult {
    let mut findings = Findings::new(StageId::Security);

    let schemes = api.security_schemes();
    if schemes.is_empty() {
        findings.error(
            "SECURITY_NO_AUTH_SCHEME",
            "No authentication scheme defined in components.securitySchemes",
        );
    } else {
        findings.passed(
            "SECURITY_AUTH_SCHEME",
            format!("Authentication schemes defined: {}", schemes.join(", ")),
        );
        if api.has_global_security() {
            findings.passed("SECURITY_GLOBAL_REQUIREMENT", "Global security requirement applied");
        } else {
            findings.warning(
                "SECURITY_NO_GLOBAL_REQUIREMENT",
                "Security schemes are defined but no global security requirement is applied",
            );
        }
    }

    if let Some(manifest) = manifest {
        check_audit(manifest, &mut findings);
        if is_configured(manifest.section("data_quality")) {
            findings.passed("SECURITY_DATA_QUALITY", "Data quality configuration present");
        } else {
            findings.warning(
                "SECURITY_NO_DATA_QUALITY",
                "No data quality configuration found",
            );
        }
    }

    findings.finish(SECURITY_POLICY)
}

fn check_audit(manifest: &ManifestView<'_>, findings: &mut Findings) {
    let audited_metric = manifest.monitoring_metrics().map(|metrics| {
        metrics
            .iter()
            .any(|m| m.to_ascii_lowercase().contains("audit"))
    });
    match (audited_metric, manifest.audit_logging()) {
        (Some(true), _) | (_, true) => {
            findings.passed("SECURITY_AUDIT", "Audit events are monitored");
        }
        (Some(false), false) => findings.warning(
            "SECURITY_NO_AUDIT_METRICS",
            "Monitoring metrics are declared but none reference auditing",
        ),
        (None, false) => {}
    }
}

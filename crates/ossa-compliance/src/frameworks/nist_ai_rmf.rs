//! NIST AI RMF 1.0 core functions: GOVERN is mandatory, MAP, MEASURE and
//! MANAGE are expected.
//!
//! Functions are read from a `nist_ai_rmf` section when present, otherwise
//! from sections of the same name.

use ossa_core::{FrameworkId, Findings, StageId, ValidationIssue};

use crate::document::{is_configured, ManifestView};

/// `(key, code, mandatory)` for each core function.
const FUNCTIONS: [(&str, &str, bool); 4] = [
    ("govern", "NIST_GOVERN", true),
    ("map", "NIST_MAP", false),
    ("measure", "NIST_MEASURE", false),
    ("manage", "NIST_MANAGE", false),
];

pub fn evaluate(manifest: &ManifestView<'_>) -> Vec<ValidationIssue> {
    let mut findings = Findings::new(StageId::framework(FrameworkId::NistAiRmf.as_str()));
    let rmf = manifest.section("nist_ai_rmf");

    for (key, code, mandatory) in FUNCTIONS {
        let function = match rmf {
            Some(section) => section.get(key),
            None => manifest.section(key),
        };
        let upper = key.to_ascii_uppercase();
        if is_configured(function) {
            findings.passed(code, format!("{upper} function documented"));
        } else if mandatory {
            findings.error(code, format!("NIST AI RMF {upper} function is not documented ({key})"));
        } else {
            findings.warning(code, format!("NIST AI RMF {upper} function is not documented ({key})"));
        }
    }

    findings.into_issues()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ossa_core::Severity;
    use serde_json::json;

    #[test]
    fn govern_is_mandatory() {
        let doc = json!({"spec": {"nist_ai_rmf": {"map": {"context": "support"}}}});
        let issues = evaluate(&ManifestView::new(&doc));
        let errors: Vec<_> = issues.iter().filter(|i| i.severity == Severity::Error).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "NIST_GOVERN");
        assert_eq!(issues.iter().filter(|i| i.severity == Severity::Warning).count(), 2);
    }

    #[test]
    fn top_level_functions_are_read_without_rmf_section() {
        let doc = json!({
            "govern": {"policies": ["p"]},
            "map": {"c": 1},
            "measure": {"m": 1},
            "manage": {"x": 1}
        });
        let issues = evaluate(&ManifestView::new(&doc));
        assert!(issues.iter().all(|i| i.severity == Severity::Passed));
        assert_eq!(issues.len(), 4);
    }
}

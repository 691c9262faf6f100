//! # Structural Stage
//!
//! Schema conformance of the manifest and the API description, plus the
//! `apiVersion` format rule (`ossa/v<major>.<minor>.<patch>`). One error per schema violation; a conforming
//! document contributes one passed check.

use ossa_core::scoring::STRUCTURAL_POLICY;
use ossa_core::{DocumentKind, Findings, StageId, StageResult};
use ossa_schema::{SchemaValidationError, SchemaValidator, Violation};
use serde_json::Value;

use crate::document::ManifestView;

pub const API_VERSION_PREFIX: &str = "ossa/";

/// Validate `document` against an arbitrary `schema` as a structural stage.
///
/// # Errors
///
/// Fails if `schema` does not compile.
pub fn validate(document: &Value, schema: &Value) -> Result<StageResult, SchemaValidationError> {
    let violations = ossa_schema::validate(document, schema)?;
    let mut findings = Findings::new(StageId::Structural);
    record(&mut findings, &violations, "STRUCTURAL_SCHEMA", "Document conforms to schema");
    Ok(findings.finish(STRUCTURAL_POLICY))
}

/// Run the structural stage over whichever documents are supplied.
pub fn check(
    schemas: &SchemaValidator,
    manifest: Option<&Value>,
    api: Option<&Value>,
) -> Result<StageResult, SchemaValidationError> {
    let mut findings = Findings::new(StageId::Structural);

    if let Some(manifest) = manifest {
        check_api_version(&ManifestView::new(manifest), &mut findings);
        let violations = schemas.check(manifest, DocumentKind::Manifest)?;
        record(
            &mut findings,
            &violations,
            "STRUCTURAL_MANIFEST_SCHEMA",
            "Agent manifest conforms to the OSSA schema",
        );
    }

    if let Some(api) = api {
        let violations = schemas.check(api, DocumentKind::ApiDescription)?;
        record(
            &mut findings,
            &violations,
            "STRUCTURAL_OPENAPI_SCHEMA",
            "API description conforms to the OpenAPI 3.x structure",
        );
    }

    Ok(findings.finish(STRUCTURAL_POLICY))
}

/// Whether `version` reads `ossa/v` followed by three dot-separated
/// numeric components.
pub fn is_valid_api_version(version: &str) -> bool {
    let Some(semver) = version
        .strip_prefix(API_VERSION_PREFIX)
        .and_then(|rest| rest.strip_prefix('v'))
    else {
        return false;
    };
    let parts: Vec<&str> = semver.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}

/// A string `apiVersion` must match [`is_valid_api_version`]. Other types
/// are left to the schema.
fn check_api_version(manifest: &ManifestView<'_>, findings: &mut Findings) {
    let Some(Value::String(version)) = manifest.api_version() else {
        return;
    };
    if is_valid_api_version(version) {
        findings.passed("STRUCTURAL_API_VERSION", format!("apiVersion {version} is valid"));
    } else {
        findings.error(
            "STRUCTURAL_API_VERSION",
            format!("Invalid apiVersion format: {version}"),
        );
    }
}

fn record(findings: &mut Findings, violations: &[Violation], code: &str, ok_message: &str) {
    if violations.is_empty() {
        findings.passed(code, ok_message);
    }
    for violation in violations {
        findings.error(code, violation.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest() -> Value {
        json!({
            "apiVersion": "ossa/v0.1.9",
            "kind": "Agent",
            "metadata": {"name": "support-agent"},
            "spec": {"capabilities": ["triage"]}
        })
    }

    fn api() -> Value {
        json!({
            "openapi": "3.1.0",
            "info": {"title": "Support Agent", "version": "1.0.0"},
            "paths": {"/tickets": {"get": {}}}
        })
    }

    #[test]
    fn clean_documents_pass_three_checks() {
        let schemas = SchemaValidator::bundled().unwrap();
        let result = check(&schemas, Some(&manifest()), Some(&api())).unwrap();
        assert!(result.valid);
        assert_eq!(result.score, 100);
        assert_eq!(result.passed.len(), 3);
    }

    #[test]
    fn bad_api_version_prefix() {
        let schemas = SchemaValidator::bundled().unwrap();
        let mut doc = manifest();
        doc["apiVersion"] = json!("v1");
        let result = check(&schemas, Some(&doc), None).unwrap();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].message, "Invalid apiVersion format: v1");
        assert_eq!(result.score, 90);
        assert!(!result.valid);
    }

    #[test]
    fn api_version_needs_a_semver_tag() {
        for ok in ["ossa/v0.1.9", "ossa/v1.0.0", "ossa/v10.20.30"] {
            assert!(is_valid_api_version(ok), "{ok}");
        }
        for bad in ["ossa/", "ossa/latest", "ossa/v1", "ossa/v1.0", "ossa/v1.0.0-rc1", "ossa/1.0.0", "ossa/v1..0"] {
            assert!(!is_valid_api_version(bad), "{bad}");
        }

        let schemas = SchemaValidator::bundled().unwrap();
        let mut doc = manifest();
        doc["apiVersion"] = json!("ossa/v1");
        let result = check(&schemas, Some(&doc), None).unwrap();
        assert_eq!(result.errors[0].message, "Invalid apiVersion format: ossa/v1");
    }

    #[test]
    fn one_error_per_violation() {
        let schemas = SchemaValidator::bundled().unwrap();
        let mut doc = manifest();
        doc["spec"]["capabilities"] = json!([]);
        doc["kind"] = json!("Robot");
        let result = check(&schemas, Some(&doc), None).unwrap();
        assert_eq!(result.errors.len(), 2);
        assert!(result
            .errors
            .iter()
            .any(|e| e.message == "spec.capabilities: [] has less than 1 item"));
    }

    #[test]
    fn standalone_validate_against_inline_schema() {
        let schema = json!({"type": "object", "required": ["a", "b"]});
        let result = validate(&json!({}), &schema).unwrap();
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.score, 80);

        let result = validate(&json!({"a": 1, "b": 2}), &schema).unwrap();
        assert_eq!(result.passed.len(), 1);
        assert!(result.valid);
    }

    #[test]
    fn broken_schema_fails_fast() {
        let schema = json!({"minItems": "many"});
        assert!(validate(&json!([]), &schema).is_err());
    }
}

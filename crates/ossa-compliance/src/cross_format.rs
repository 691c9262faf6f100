//! # Cross-Format Consistency Stage
//!
//! Checks that the manifest and the API description describe the same
//! agent. Each rule is independent and emits a passed check when satisfied.

use ossa_core::scoring::CROSS_FORMAT_POLICY;
use ossa_core::{Findings, StageId, StageResult};

use crate::document::{normalize_name, ApiView, ManifestView};

/// Minimum operations expected behind a multi-step orchestration capability.
pub const ORCHESTRATION_MIN_ENDPOINTS: usize = 3;

pub fn check(manifest: &ManifestView<'_>, api: &ApiView<'_>) -> StageResult {
    let mut findings = Findings::new(StageId::CrossFormat);
    check_names(manifest, api, &mut findings);
    check_protocols(manifest, api, &mut findings);
    check_orchestration(manifest, api, &mut findings);
    check_versions(manifest, api, &mut findings);
    findings.finish(CROSS_FORMAT_POLICY)
}

fn check_names(manifest: &ManifestView<'_>, api: &ApiView<'_>, findings: &mut Findings) {
    let (Some(name), Some(title)) = (manifest.display_name(), api.title()) else {
        return;
    };
    if normalize_name(title).contains(&normalize_name(name)) {
        findings.passed("CROSS_FORMAT_NAME", format!("API title '{title}' matches agent '{name}'"));
    } else {
        findings.warning(
            "CROSS_FORMAT_NAME_MISMATCH",
            format!("API title '{title}' does not reference agent name '{name}'"),
        );
    }
}

fn protocol_label(protocol: &str) -> Option<&'static str> {
    match protocol.to_ascii_lowercase().as_str() {
        "openapi" => Some("OpenAPI"),
        "rest" => Some("REST"),
        "http" => Some("HTTP"),
        _ => None,
    }
}

/// A single finding for the whole protocol claim, labelled by the first
/// HTTP-backed protocol declared.
fn check_protocols(manifest: &ManifestView<'_>, api: &ApiView<'_>, findings: &mut Findings) {
    let Some(label) = manifest.protocols().into_iter().find_map(protocol_label) else {
        return;
    };
    let paths = api.path_count();
    if paths == 0 {
        findings.error(
            "CROSS_FORMAT_NO_ENDPOINTS",
            format!("{label} protocol specified but no API endpoints found"),
        );
    } else {
        findings.passed(
            "CROSS_FORMAT_PROTOCOL",
            format!("{label} protocol backed by {paths} API path(s)"),
        );
    }
}

fn check_orchestration(manifest: &ManifestView<'_>, api: &ApiView<'_>, findings: &mut Findings) {
    let endpoints = api.endpoint_count();
    for capability in manifest
        .capabilities()
        .into_iter()
        .filter(|c| c.to_ascii_lowercase().contains("orchestrat"))
    {
        if endpoints < ORCHESTRATION_MIN_ENDPOINTS {
            findings.warning(
                "CROSS_FORMAT_ORCHESTRATION_DENSITY",
                format!(
                    "Capability '{capability}' implies multi-step orchestration but only {endpoints} API endpoint(s) are defined"
                ),
            );
        } else {
            findings.passed(
                "CROSS_FORMAT_ORCHESTRATION",
                format!("Capability '{capability}' backed by {endpoints} API endpoints"),
            );
        }
    }
}

fn check_versions(manifest: &ManifestView<'_>, api: &ApiView<'_>, findings: &mut Findings) {
    let (Some(manifest_version), Some(api_version)) = (manifest.version(), api.version()) else {
        return;
    };
    if manifest_version == api_version {
        findings.passed("CROSS_FORMAT_VERSION", format!("Versions aligned at {api_version}"));
    } else {
        findings.warning(
            "CROSS_FORMAT_VERSION_MISMATCH",
            format!("Manifest version {manifest_version} does not match API version {api_version}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn run(manifest: &Value, api: &Value) -> StageResult {
        check(&ManifestView::new(manifest), &ApiView::new(api))
    }

    #[test]
    fn consistent_pair_is_clean() {
        let manifest = json!({
            "metadata": {"name": "support-agent", "version": "1.0.0"},
            "spec": {"protocols": {"supported": ["openapi"]}}
        });
        let api = json!({
            "info": {"title": "Support Agent API", "version": "1.0.0"},
            "paths": {"/tickets": {"get": {}}}
        });
        let result = run(&manifest, &api);
        assert!(result.valid);
        assert_eq!(result.score, 100);
        assert_eq!(result.passed.len(), 3);
    }

    #[test]
    fn openapi_protocol_without_paths_is_an_error() {
        let manifest = json!({"spec": {"protocols": {"supported": ["openapi"]}}});
        let api = json!({"paths": {}});
        let result = run(&manifest, &api);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].message,
            "OpenAPI protocol specified but no API endpoints found"
        );
        assert_eq!(result.score, 80);
    }

    #[test]
    fn protocol_label_follows_claim() {
        let manifest = json!({"spec": {"protocols": ["REST", "mcp"]}});
        let result = run(&manifest, &json!({}));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].message,
            "REST protocol specified but no API endpoints found"
        );
    }

    #[test]
    fn several_http_protocols_cost_one_error() {
        let manifest = json!({"spec": {"protocols": ["mcp", "openapi", "rest", "http"]}});
        let result = run(&manifest, &json!({"paths": {}}));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].message,
            "OpenAPI protocol specified but no API endpoints found"
        );
        assert_eq!(result.score, 80);

        let api = json!({"paths": {"/tickets": {"get": {}}}});
        let result = run(&manifest, &api);
        assert_eq!(result.passed.len(), 1);
    }

    #[test]
    fn name_mismatch_warns() {
        let manifest = json!({"spec": {"agent": {"name": "Billing Bot"}}});
        let api = json!({"info": {"title": "Support Agent API"}});
        let result = run(&manifest, &api);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.score, 95);
        assert!(result.valid);
    }

    #[test]
    fn name_comparison_ignores_case_and_separators() {
        let manifest = json!({"metadata": {"name": "support_agent"}});
        let api = json!({"info": {"title": "SUPPORT-AGENT service"}});
        assert!(run(&manifest, &api).warnings.is_empty());
    }

    #[test]
    fn sparse_orchestration_warns() {
        let manifest = json!({"spec": {"capabilities": [{"name": "multi_agent_orchestration"}]}});
        let api = json!({"paths": {"/run": {"post": {}, "get": {}}}});
        let result = run(&manifest, &api);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("only 2 API endpoint(s)"));

        let api = json!({"paths": {"/run": {"post": {}, "get": {}}, "/status": {"get": {}}}});
        assert!(run(&manifest, &api).warnings.is_empty());
    }

    #[test]
    fn version_drift_warns() {
        let manifest = json!({"metadata": {"version": "1.0.0"}});
        let api = json!({"info": {"version": "2.0.0"}});
        let result = run(&manifest, &api);
        assert_eq!(result.warnings[0].code, "CROSS_FORMAT_VERSION_MISMATCH");
    }
}

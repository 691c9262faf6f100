//! File-based loading and schema override tests.

use std::fs;

use ossa_core::DocumentKind;
use ossa_schema::{
    discover_manifests, load_document, load_document_with, Expansion, LoadError, SchemaValidator,
    MANIFEST_SCHEMA,
};

#[test]
fn loads_yaml_manifest_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("support.ossa.yaml");
    fs::write(
        &path,
        "apiVersion: ossa/v0.1.9\nkind: Agent\nmetadata:\n  name: support-agent\nspec:\n  role: triage\n  capabilities: [triage]\n",
    )
    .unwrap();

    let doc = load_document(&path).unwrap();
    assert_eq!(doc["metadata"]["name"], "support-agent");

    let validator = SchemaValidator::bundled().unwrap();
    assert!(validator.check(&doc, DocumentKind::Manifest).unwrap().is_empty());
}

#[test]
fn loads_json_description_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openapi.json");
    fs::write(
        &path,
        r#"{"openapi":"3.0.3","info":{"title":"T","version":"1"},"paths":{}}"#,
    )
    .unwrap();
    let doc = load_document(&path).unwrap();
    assert_eq!(doc["info"]["title"], "T");
}

#[test]
fn default_expansion_applies_before_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agent.yml");
    fs::write(
        &path,
        "spec:\n  llm:\n    provider: ${OSSA_TEST_UNSET_PROVIDER_VAR:-anthropic}\n",
    )
    .unwrap();
    let doc = load_document(&path).unwrap();
    assert_eq!(doc["spec"]["llm"]["provider"], "anthropic");
}

#[test]
fn verbatim_loading_keeps_references() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openapi.yaml");
    fs::write(&path, "info:\n  title: \"${PATH}\"\n  version: ${VERSION:-1.0.0}\n").unwrap();
    let doc = load_document_with(&path, Expansion::None).unwrap();
    assert_eq!(doc["info"]["title"], "${PATH}");
    assert_eq!(doc["info"]["version"], "${VERSION:-1.0.0}");
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_document(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, LoadError::Read { .. }));
}

#[test]
fn malformed_yaml_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "a: [1, 2\n").unwrap();
    let err = load_document(&path).unwrap_err();
    assert!(matches!(err, LoadError::Yaml { .. }), "got {err}");
}

#[test]
fn schema_dir_overrides_bundled_schema() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(MANIFEST_SCHEMA),
        r#"{"type": "object", "required": ["owner"]}"#,
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let validator = SchemaValidator::from_dir(dir.path()).unwrap();
    assert_eq!(validator.schema_count(), 2);
    assert_eq!(validator.origin(), Some(dir.path()));

    let violations = validator
        .check(&serde_json::json!({}), DocumentKind::Manifest)
        .unwrap();
    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("owner"));
}

#[test]
fn unreadable_schema_dir_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SchemaValidator::from_dir(dir.path().join("nope")).unwrap_err();
    assert!(err.to_string().contains("cannot read schema directory"));
}

#[test]
fn discovery_pairs_sibling_descriptions() {
    let dir = tempfile::tempdir().unwrap();
    let paired = dir.path().join("support");
    let lone = dir.path().join("nested").join("router");
    fs::create_dir_all(&paired).unwrap();
    fs::create_dir_all(&lone).unwrap();
    fs::write(paired.join("agent.yml"), "kind: Agent\n").unwrap();
    fs::write(paired.join("openapi.yml"), "openapi: 3.0.3\n").unwrap();
    fs::write(lone.join("router.ossa.json"), "{}").unwrap();
    fs::write(lone.join("notes.yaml"), "x: 1\n").unwrap();

    let pairs = discover_manifests(dir.path());
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].manifest, lone.join("router.ossa.json"));
    assert!(pairs[0].api_description.is_none());
    assert_eq!(pairs[1].manifest, paired.join("agent.yml"));
    assert_eq!(pairs[1].api_description, Some(paired.join("openapi.yml")));
}

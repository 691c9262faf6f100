//! # Schema Validation
//!
//! Structural validation of manifests and API descriptions against JSON
//! Schema definitions (Draft 2020-12).
//!
//! ## Findings vs. Faults
//!
//! A document that violates its schema is not an error here: every
//! violation comes back as a [`Violation`] value and the caller turns them
//! into stage issues. Only a schema that cannot be loaded or compiled is a
//! [`SchemaValidationError`].
//!
//! ## Schema Resolution
//!
//! Bundled schemas use `$id` URIs of the form
//! `https://schemas.openstandardagents.org/ossa/<filename>`. Cross-schema
//! `$ref`s are resolved from the loaded set by [`LocalSchemaRetriever`].
//! Anything else is refused; validation never touches the network.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::{Retrieve, Uri, ValidationOptions, Validator};
use ossa_core::DocumentKind;
use serde_json::Value;
use thiserror::Error;

/// Filename of the bundled agent manifest schema.
pub const MANIFEST_SCHEMA: &str = "agent-manifest.schema.json";
/// Filename of the bundled OpenAPI 3.x structural schema.
pub const OPENAPI_SCHEMA: &str = "openapi.schema.json";

const SCHEMA_URI_PREFIX: &str = "https://schemas.openstandardagents.org/ossa/";

const BUNDLED: [(&str, &str); 2] = [
    (
        MANIFEST_SCHEMA,
        include_str!("../schemas/agent-manifest.schema.json"),
    ),
    (OPENAPI_SCHEMA, include_str!("../schemas/openapi.schema.json")),
];

/// Resolves `$ref` URIs against schemas held in memory.
struct LocalSchemaRetriever {
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self
            .schemas_by_uri
            .get(&format!("{SCHEMA_URI_PREFIX}{filename}"))
            .or_else(|| self.schemas_by_uri.get(filename))
        {
            return Ok(value.clone());
        }

        Err(format!("schema reference '{uri_str}' is not available locally").into())
    }
}

/// Error loading or compiling a schema.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The schema could not be found, read or parsed.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoadError { schema_name: String, reason: String },

    /// The schema parsed but did not compile into a validator.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError { schema_name: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value, empty for the document root.
    pub instance_path: String,
    /// JSON Pointer to the schema keyword that failed.
    pub schema_path: String,
    /// Constraint description, e.g. `[] has less than 1 item`.
    pub message: String,
}

impl Violation {
    /// The instance path in dotted form (`spec.capabilities.0`), or `root`.
    pub fn dotted_path(&self) -> String {
        if self.instance_path.is_empty() {
            return "root".to_string();
        }
        self.instance_path
            .trim_start_matches('/')
            .split('/')
            .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.dotted_path(), self.message)
    }
}

/// Validate `document` against a standalone `schema`.
///
/// External `$ref`s are refused. Returns every violation in the order the
/// validator reports them; an empty vector means the document conforms.
///
/// # Errors
///
/// Returns [`SchemaValidationError::ValidatorBuildError`] if `schema` does
/// not compile.
pub fn validate(document: &Value, schema: &Value) -> Result<Vec<Violation>, SchemaValidationError> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.with_retriever(LocalSchemaRetriever {
        schemas_by_uri: HashMap::new(),
    });
    let validator = opts
        .build(schema)
        .map_err(|e| SchemaValidationError::ValidatorBuildError {
            schema_name: schema_label(schema),
            reason: e.to_string(),
        })?;
    Ok(collect_violations(&validator, document))
}

fn schema_label(schema: &Value) -> String {
    schema
        .get("$id")
        .or_else(|| schema.get("title"))
        .and_then(Value::as_str)
        .unwrap_or("<inline>")
        .to_string()
}

fn collect_violations(validator: &Validator, document: &Value) -> Vec<Violation> {
    validator
        .iter_errors(document)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect()
}

/// A named set of schemas with local `$ref` resolution.
///
/// Built from the bundled schemas or from a directory of `*.schema.json`
/// files. Validators are compiled per call, so a broken schema surfaces as
/// an error on the call that needs it.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    origin: Option<PathBuf>,
    schemas: HashMap<String, Value>,
}

impl SchemaValidator {
    /// Load the schemas compiled into this crate.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::SchemaLoadError`] if a bundled
    /// schema is not valid JSON.
    pub fn bundled() -> Result<Self, SchemaValidationError> {
        let mut schemas = HashMap::new();
        for (name, text) in BUNDLED {
            let value: Value = serde_json::from_str(text).map_err(|e| {
                SchemaValidationError::SchemaLoadError {
                    schema_name: name.to_string(),
                    reason: format!("invalid JSON: {e}"),
                }
            })?;
            schemas.insert(name.to_string(), value);
        }
        Ok(Self {
            origin: None,
            schemas,
        })
    }

    /// Load every `*.schema.json` in `schema_dir`, on top of the bundled set.
    ///
    /// A file named like a bundled schema replaces it.
    pub fn from_dir(schema_dir: impl AsRef<Path>) -> Result<Self, SchemaValidationError> {
        let schema_dir = schema_dir.as_ref().to_path_buf();
        let mut validator = Self::bundled()?;

        let entries = std::fs::read_dir(&schema_dir).map_err(|e| {
            SchemaValidationError::SchemaLoadError {
                schema_name: schema_dir.display().to_string(),
                reason: format!("cannot read schema directory: {e}"),
            }
        })?;

        for entry in entries {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(".schema.json") {
                continue;
            }
            let content = std::fs::read_to_string(&path)?;
            let value: Value = serde_json::from_str(&content).map_err(|e| {
                SchemaValidationError::SchemaLoadError {
                    schema_name: name.to_string(),
                    reason: format!("invalid JSON: {e}"),
                }
            })?;
            tracing::debug!(schema = name, dir = %schema_dir.display(), "loaded schema");
            validator.schemas.insert(name.to_string(), value);
        }

        validator.origin = Some(schema_dir);
        Ok(validator)
    }

    /// Directory the schemas were loaded from, `None` for the bundled set.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Names of all loaded schemas, sorted.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    pub fn get_schema(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Schema filename used for a document kind.
    pub fn schema_for(kind: DocumentKind) -> &'static str {
        match kind {
            DocumentKind::Manifest => MANIFEST_SCHEMA,
            DocumentKind::ApiDescription => OPENAPI_SCHEMA,
        }
    }

    fn build_options(&self) -> ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);

        let mut schemas_by_uri: HashMap<String, Value> = HashMap::new();
        for (filename, value) in &self.schemas {
            schemas_by_uri.insert(format!("{SCHEMA_URI_PREFIX}{filename}"), value.clone());
            if let Some(id) = value.get("$id").and_then(Value::as_str) {
                schemas_by_uri.insert(id.to_string(), value.clone());
            }
            schemas_by_uri.insert(filename.clone(), value.clone());
        }
        opts.with_retriever(LocalSchemaRetriever { schemas_by_uri });
        opts
    }

    /// Compile the named schema.
    ///
    /// # Errors
    ///
    /// [`SchemaValidationError::SchemaLoadError`] if no schema has that name,
    /// [`SchemaValidationError::ValidatorBuildError`] if it does not compile.
    pub fn build_validator(&self, schema_name: &str) -> Result<Validator, SchemaValidationError> {
        let schema_value = self.schemas.get(schema_name).ok_or_else(|| {
            SchemaValidationError::SchemaLoadError {
                schema_name: schema_name.to_string(),
                reason: match &self.origin {
                    Some(dir) => format!("schema not found in {}", dir.display()),
                    None => "schema not found in bundled set".to_string(),
                },
            }
        })?;

        self.build_options()
            .build(schema_value)
            .map_err(|e| SchemaValidationError::ValidatorBuildError {
                schema_name: schema_name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Collect the violations of `instance` against the named schema.
    pub fn violations(
        &self,
        instance: &Value,
        schema_name: &str,
    ) -> Result<Vec<Violation>, SchemaValidationError> {
        let validator = self.build_validator(schema_name)?;
        Ok(collect_violations(&validator, instance))
    }

    /// Collect the violations of a document against its kind's schema.
    pub fn check(
        &self,
        instance: &Value,
        kind: DocumentKind,
    ) -> Result<Vec<Violation>, SchemaValidationError> {
        self.violations(instance, Self::schema_for(kind))
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
            "metadata": {"name": "support-agent", "version": "1.0.0"},
            "spec": {
                "role": "Answers support tickets",
                "capabilities": [{"name": "ticket_triage"}, "summarize"],
                "protocols": {"supported": ["openapi"]}
            }
        })
    }

    fn openapi() -> Value {
        json!({
            "openapi": "3.1.0",
            "info": {"title": "Support Agent API", "version": "1.0.0"},
            "paths": {"/tickets": {"get": {"responses": {}}}}
        })
    }

    #[test]
    fn test_bundled_schemas_load() {
        let validator = SchemaValidator::bundled().unwrap();
        assert_eq!(validator.schema_count(), 2);
        assert_eq!(validator.schema_names(), vec![MANIFEST_SCHEMA, OPENAPI_SCHEMA]);
        assert!(validator.origin().is_none());
    }

    #[test]
    fn test_all_bundled_schemas_compile() {
        let validator = SchemaValidator::bundled().unwrap();
        for name in validator.schema_names() {
            assert!(
                validator.build_validator(name).is_ok(),
                "bundled schema {name} failed to compile"
            );
        }
    }

    #[test]
    fn test_valid_manifest_has_no_violations() {
        let validator = SchemaValidator::bundled().unwrap();
        let violations = validator.check(&manifest(), DocumentKind::Manifest).unwrap();
        assert!(violations.is_empty(), "unexpected: {violations:?}");
    }

    #[test]
    fn test_valid_openapi_has_no_violations() {
        let validator = SchemaValidator::bundled().unwrap();
        let violations = validator
            .check(&openapi(), DocumentKind::ApiDescription)
            .unwrap();
        assert!(violations.is_empty(), "unexpected: {violations:?}");
    }

    #[test]
    fn test_empty_capabilities_reported_with_dotted_path() {
        let validator = SchemaValidator::bundled().unwrap();
        let mut doc = manifest();
        doc["spec"]["capabilities"] = json!([]);
        let violations = validator.check(&doc, DocumentKind::Manifest).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].dotted_path(), "spec.capabilities");
        assert_eq!(
            violations[0].to_string(),
            "spec.capabilities: [] has less than 1 item"
        );
    }

    #[test]
    fn test_missing_required_reported_at_root() {
        let validator = SchemaValidator::bundled().unwrap();
        let doc = json!({"apiVersion": "ossa/v1.0.0", "kind": "Agent", "metadata": {"name": "a"}});
        let violations = validator.check(&doc, DocumentKind::Manifest).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].dotted_path(), "root");
        assert!(violations[0].message.contains("spec"));
    }

    #[test]
    fn test_openapi_missing_paths() {
        let validator = SchemaValidator::bundled().unwrap();
        let doc = json!({"openapi": "3.0.3", "info": {"title": "x", "version": "1"}});
        let violations = validator
            .check(&doc, DocumentKind::ApiDescription)
            .unwrap();
        assert!(violations.iter().any(|v| v.message.contains("paths")));
    }

    #[test]
    fn test_schema_not_found() {
        let validator = SchemaValidator::bundled().unwrap();
        let err = validator
            .violations(&json!({}), "nonexistent.schema.json")
            .unwrap_err();
        assert!(
            matches!(err, SchemaValidationError::SchemaLoadError { .. }),
            "Expected SchemaLoadError, got: {err}"
        );
    }

    #[test]
    fn test_standalone_validate() {
        let schema = json!({"type": "object", "required": ["name"]});
        let violations = validate(&json!({}), &schema).unwrap();
        assert_eq!(violations.len(), 1);
        assert!(validate(&json!({"name": "x"}), &schema).unwrap().is_empty());
    }

    #[test]
    fn test_uncompilable_schema_is_an_error() {
        let schema = json!({"type": 12});
        let err = validate(&json!({}), &schema).unwrap_err();
        assert!(matches!(err, SchemaValidationError::ValidatorBuildError { .. }));
    }

    #[test]
    fn test_external_ref_is_refused() {
        let schema = json!({"$ref": "https://example.com/remote.schema.json"});
        assert!(validate(&json!({}), &schema).is_err());
    }

    #[test]
    fn test_violation_display_root() {
        let v = Violation {
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            message: r#""kind" is a required property"#.to_string(),
        };
        assert_eq!(v.to_string(), r#"root: "kind" is a required property"#);
    }

    #[test]
    fn test_dotted_path_unescapes_pointer() {
        let v = Violation {
            instance_path: "/paths/~1tickets/get".to_string(),
            schema_path: String::new(),
            message: "m".to_string(),
        };
        assert_eq!(v.dotted_path(), "paths./tickets.get");
    }
}

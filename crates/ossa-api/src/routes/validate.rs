//! # Validation Endpoints
//!
//! Thin adapters over [`ComplianceEngine`]: each handler resolves its
//! documents (inline JSON or a file under the workspace root), applies
//! the configured default frameworks, and returns the engine's report.
//!
//! Batch entries run concurrently on the blocking pool. A failing entry
//! is reported inside the [`BatchSummary`]; the request itself succeeds.

use std::path::Path;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use ossa_compliance::{BatchEntry, BatchItem, BatchSummary, ComplianceReport, ValidationOptions};
use ossa_schema::{load_document_with, sibling_api_description, Expansion};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, resolve_in_workspace, Validate};
use crate::state::AppState;

/// Validate a single agent manifest.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateAgentRequest {
    /// Inline manifest. Takes precedence over `file_path`.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub agent_data: Option<Value>,
    /// Manifest path relative to the workspace root.
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    /// Run the best-practices stage.
    #[serde(default)]
    pub strict: bool,
}

impl Validate for ValidateAgentRequest {
    fn validate(&self) -> Result<(), String> {
        require_source(self.agent_data.as_ref(), self.file_path.as_deref(), "agent_data")
    }
}

/// Validate an OpenAPI description, optionally against its manifest.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateOpenApiRequest {
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub openapi_data: Option<Value>,
    #[serde(default)]
    pub file_path: Option<String>,
    /// Manifest enabling cross-format checks.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub agent_data: Option<Value>,
}

impl Validate for ValidateOpenApiRequest {
    fn validate(&self) -> Result<(), String> {
        require_source(self.openapi_data.as_ref(), self.file_path.as_deref(), "openapi_data")
    }
}

/// Validate a manifest and its OpenAPI description together.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DualFormatRequest {
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub agent_config: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub openapi_spec: Option<Value>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub strict: bool,
}

impl Validate for DualFormatRequest {
    fn validate(&self) -> Result<(), String> {
        match (&self.agent_config, &self.openapi_spec) {
            (Some(_), Some(_)) => Ok(()),
            (None, _) => Err("agent_config is required".into()),
            (_, None) => Err("openapi_spec is required".into()),
        }
    }
}

/// Validate many manifests at once.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchRequest {
    /// Manifest paths relative to the workspace root. A sibling
    /// `openapi.yaml|yml|json` is validated alongside when present.
    #[serde(default)]
    pub files: Vec<String>,
    /// Inline manifests.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub agents: Vec<Value>,
    #[serde(default)]
    pub frameworks: Vec<String>,
}

impl Validate for BatchRequest {
    fn validate(&self) -> Result<(), String> {
        if self.files.is_empty() && self.agents.is_empty() {
            return Err("at least one of files or agents must be non-empty".into());
        }
        Ok(())
    }
}

fn require_source(inline: Option<&Value>, file_path: Option<&str>, field: &str) -> Result<(), String> {
    match (inline, file_path) {
        (None, None) => Err(format!("either {field} or file_path must be provided")),
        (None, Some(path)) if path.trim().is_empty() => Err("file_path must not be empty".into()),
        _ => Ok(()),
    }
}

/// Build the validation router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate/agent", post(validate_agent))
        .route("/validate/openapi", post(validate_openapi))
        .route("/validate/dual-format", post(validate_dual_format))
        .route("/validate/batch", post(validate_batch))
}

/// POST /validate/agent: Validate an agent manifest.
#[utoipa::path(
    post,
    path = "/validate/agent",
    request_body = ValidateAgentRequest,
    responses(
        (status = 200, description = "Compliance report"),
        (status = 403, description = "file_path outside the workspace", body = crate::error::ErrorBody),
        (status = 422, description = "Neither agent_data nor file_path given", body = crate::error::ErrorBody),
    ),
    tag = "validation"
)]
pub(crate) async fn validate_agent(
    State(state): State<AppState>,
    body: Result<Json<ValidateAgentRequest>, JsonRejection>,
) -> Result<Json<ComplianceReport>, AppError> {
    let req = extract_validated_json(body)?;
    let manifest = resolve_document(&state, req.agent_data, req.file_path.as_deref())?;
    let options = ValidationOptions {
        frameworks: state.config.frameworks_or_default(req.frameworks),
        strict: req.strict,
    };
    let report = state.engine.validate_agent(&manifest, &options)?;
    tracing::info!(valid = report.valid, score = report.overall_score, "validated agent manifest");
    Ok(Json(report))
}

/// POST /validate/openapi: Validate an OpenAPI description.
#[utoipa::path(
    post,
    path = "/validate/openapi",
    request_body = ValidateOpenApiRequest,
    responses(
        (status = 200, description = "Compliance report"),
        (status = 403, description = "file_path outside the workspace", body = crate::error::ErrorBody),
        (status = 422, description = "Neither openapi_data nor file_path given", body = crate::error::ErrorBody),
    ),
    tag = "validation"
)]
pub(crate) async fn validate_openapi(
    State(state): State<AppState>,
    body: Result<Json<ValidateOpenApiRequest>, JsonRejection>,
) -> Result<Json<ComplianceReport>, AppError> {
    let req = extract_validated_json(body)?;
    let api = resolve_document(&state, req.openapi_data, req.file_path.as_deref())?;
    let report = state.engine.validate_openapi(&api, req.agent_data.as_ref())?;
    tracing::info!(valid = report.valid, score = report.overall_score, "validated API description");
    Ok(Json(report))
}

/// POST /validate/dual-format: Validate a manifest with its OpenAPI description.
#[utoipa::path(
    post,
    path = "/validate/dual-format",
    request_body = DualFormatRequest,
    responses(
        (status = 200, description = "Compliance report"),
        (status = 422, description = "agent_config or openapi_spec missing", body = crate::error::ErrorBody),
        (status = 500, description = "Engine fault", body = crate::error::ErrorBody),
    ),
    tag = "validation"
)]
pub(crate) async fn validate_dual_format(
    State(state): State<AppState>,
    body: Result<Json<DualFormatRequest>, JsonRejection>,
) -> Result<Json<ComplianceReport>, AppError> {
    let req = extract_validated_json(body)?;
    let (Some(manifest), Some(api)) = (req.agent_config, req.openapi_spec) else {
        return Err(AppError::Validation("agent_config and openapi_spec are required".into()));
    };
    let options = ValidationOptions {
        frameworks: state.config.frameworks_or_default(req.frameworks),
        strict: req.strict,
    };
    let report = state.engine.validate_dual_format(&manifest, &api, &options)?;
    tracing::info!(
        valid = report.valid,
        score = report.overall_score,
        level = %report.certification_level,
        "validated dual-format pair"
    );
    Ok(Json(report))
}

/// POST /validate/batch: Validate files and inline manifests concurrently.
#[utoipa::path(
    post,
    path = "/validate/batch",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Batch summary with one entry per input"),
        (status = 422, description = "Empty batch", body = crate::error::ErrorBody),
    ),
    tag = "validation"
)]
pub(crate) async fn validate_batch(
    State(state): State<AppState>,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchSummary>, AppError> {
    let req = extract_validated_json(body)?;
    let options = ValidationOptions {
        frameworks: state.config.frameworks_or_default(req.frameworks),
        strict: false,
    };

    let mut handles = Vec::with_capacity(req.files.len() + req.agents.len());
    for file in req.files {
        let state = state.clone();
        let options = options.clone();
        let source = file.clone();
        let handle = tokio::task::spawn_blocking(move || {
            match load_batch_file(&state.config.workspace_root, &file) {
                Ok(item) => state.engine.validate_item(&item, &options),
                Err(err) => BatchEntry::faulted(file, err.to_string()),
            }
        });
        handles.push((source, handle));
    }
    for (index, manifest) in req.agents.into_iter().enumerate() {
        let state = state.clone();
        let options = options.clone();
        let source = format!("agents[{index}]");
        let item = BatchItem {
            source: source.clone(),
            manifest,
            api: None,
        };
        let handle = tokio::task::spawn_blocking(move || state.engine.validate_item(&item, &options));
        handles.push((source, handle));
    }

    let mut entries = Vec::with_capacity(handles.len());
    for (source, handle) in handles {
        let entry = handle.await.unwrap_or_else(|err| {
            tracing::error!(%source, error = %err, "batch worker did not complete");
            BatchEntry::faulted(source, "validation worker did not complete")
        });
        entries.push(entry);
    }

    let summary = BatchSummary::from_entries(entries);
    tracing::info!(
        total = summary.total,
        valid = summary.valid,
        faulted = summary.faulted,
        "batch validated"
    );
    Ok(Json(summary))
}

/// Inline data wins; otherwise load `file_path` from the workspace.
fn resolve_document(
    state: &AppState,
    inline: Option<Value>,
    file_path: Option<&str>,
) -> Result<Value, AppError> {
    if let Some(value) = inline {
        return Ok(value);
    }
    let requested = file_path
        .ok_or_else(|| AppError::Validation("file_path must be provided".into()))?;
    let path = resolve_in_workspace(&state.config.workspace_root, requested)?;
    load_verbatim(&path)
}

/// Workspace files are parsed as written; `${VAR}` stays unexpanded so the
/// server environment never appears in a report.
fn load_verbatim(path: &Path) -> Result<Value, AppError> {
    Ok(load_document_with(path, Expansion::None)?)
}

fn load_batch_file(root: &Path, requested: &str) -> Result<BatchItem, AppError> {
    let path = resolve_in_workspace(root, requested)?;
    let manifest = load_verbatim(&path)?;
    let api = sibling_api_description(&path)
        .map(|sibling| load_verbatim(&sibling))
        .transpose()?;
    Ok(BatchItem {
        source: requested.to_string(),
        manifest,
        api,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn agent_request_needs_a_source() {
        let req: ValidateAgentRequest = serde_json::from_value(json!({"strict": true})).unwrap();
        assert_eq!(
            req.validate().unwrap_err(),
            "either agent_data or file_path must be provided"
        );
        let req: ValidateAgentRequest =
            serde_json::from_value(json!({"file_path": "agents/a.ossa.yaml"})).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn blank_file_path_is_rejected() {
        let req: ValidateOpenApiRequest = serde_json::from_value(json!({"file_path": " "})).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn dual_format_names_the_missing_half() {
        let req: DualFormatRequest =
            serde_json::from_value(json!({"agent_config": {}})).unwrap();
        assert_eq!(req.validate().unwrap_err(), "openapi_spec is required");
    }

    #[test]
    fn empty_batch_is_rejected() {
        let req: BatchRequest = serde_json::from_value(json!({"frameworks": ["GDPR"]})).unwrap();
        assert!(req.validate().is_err());
    }
}

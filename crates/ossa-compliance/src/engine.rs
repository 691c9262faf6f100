//! # Validation Engine
//!
//! Entry points that run the stages for a call and hand their results to
//! [`report::generate`]. The engine holds only immutable configuration
//! (schemas and framework evaluators), so one instance can be shared across
//! threads behind an `Arc`.

use std::path::Path;

use ossa_core::{DocumentKind, StageId, StageResult};
use ossa_schema::{SchemaValidationError, SchemaValidator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::batch::{BatchEntry, BatchItem, BatchOutcome, BatchSummary};
use crate::document::{ApiView, ManifestView};
use crate::error::{json_type_name, EngineError};
use crate::frameworks::FrameworkRegistry;
use crate::report::{self, ComplianceReport};
use crate::{best_practices, cross_format, security, structural};

/// Per-call options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Framework identifiers to evaluate, as written by the caller.
    #[serde(default)]
    pub frameworks: Vec<String>,
    /// Run the best-practices stage.
    #[serde(default)]
    pub strict: bool,
}

impl ValidationOptions {
    pub fn with_frameworks<I, S>(frameworks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            frameworks: frameworks.into_iter().map(Into::into).collect(),
            strict: false,
        }
    }
}

#[derive(Debug)]
pub struct ComplianceEngine {
    schemas: SchemaValidator,
    frameworks: FrameworkRegistry,
}

impl ComplianceEngine {
    /// Engine over the bundled schemas and built-in framework rules.
    pub fn new() -> Result<Self, EngineError> {
        let schemas = SchemaValidator::bundled().map_err(|source| EngineError::Schema {
            stage: StageId::Structural,
            source,
        })?;
        Ok(Self::with_schemas(schemas))
    }

    /// Engine over schemas loaded from `dir` (bundled schemas fill gaps).
    pub fn from_schema_dir(dir: &Path) -> Result<Self, EngineError> {
        let schemas = SchemaValidator::from_dir(dir).map_err(|source| EngineError::Schema {
            stage: StageId::Structural,
            source,
        })?;
        Ok(Self::with_schemas(schemas))
    }

    pub fn with_schemas(schemas: SchemaValidator) -> Self {
        Self {
            schemas,
            frameworks: FrameworkRegistry::new(),
        }
    }

    /// Replace the framework registry.
    pub fn with_registry(mut self, frameworks: FrameworkRegistry) -> Self {
        self.frameworks = frameworks;
        self
    }

    pub fn schemas(&self) -> &SchemaValidator {
        &self.schemas
    }

    /// Validate a manifest and its API description together.
    ///
    /// Runs structural, cross-format and security stages, best practices
    /// when `strict`, and every requested framework.
    pub fn validate_dual_format(
        &self,
        manifest: &Value,
        api: &Value,
        options: &ValidationOptions,
    ) -> Result<ComplianceReport, EngineError> {
        require_object(manifest, DocumentKind::Manifest)?;
        require_object(api, DocumentKind::ApiDescription)?;
        let manifest_view = ManifestView::new(manifest);
        let api_view = ApiView::new(api);

        let mut stages = vec![
            self.structural(Some(manifest), Some(api))?,
            cross_format::check(&manifest_view, &api_view),
            security::check(Some(&manifest_view), &api_view),
        ];
        if options.strict {
            stages.push(best_practices::check(&manifest_view));
        }
        Ok(self.finish(stages, &manifest_view, options))
    }

    /// Validate a manifest on its own.
    pub fn validate_agent(
        &self,
        manifest: &Value,
        options: &ValidationOptions,
    ) -> Result<ComplianceReport, EngineError> {
        require_object(manifest, DocumentKind::Manifest)?;
        let manifest_view = ManifestView::new(manifest);

        let mut stages = vec![self.structural(Some(manifest), None)?];
        if options.strict {
            stages.push(best_practices::check(&manifest_view));
        }
        Ok(self.finish(stages, &manifest_view, options))
    }

    /// Validate an API description, with cross-format and manifest security
    /// rules when a manifest is supplied.
    pub fn validate_openapi(
        &self,
        api: &Value,
        manifest: Option<&Value>,
    ) -> Result<ComplianceReport, EngineError> {
        require_object(api, DocumentKind::ApiDescription)?;
        if let Some(manifest) = manifest {
            require_object(manifest, DocumentKind::Manifest)?;
        }
        let api_view = ApiView::new(api);
        let manifest_view = manifest.map(ManifestView::new);

        let mut stages = vec![self.structural(None, Some(api))?];
        if let Some(view) = &manifest_view {
            stages.push(cross_format::check(view, &api_view));
        }
        stages.push(security::check(manifest_view.as_ref(), &api_view));
        Ok(report::generate(stages, None))
    }

    /// Validate one batch item, folding any engine fault into the entry.
    pub fn validate_item(&self, item: &BatchItem, options: &ValidationOptions) -> BatchEntry {
        let outcome = match &item.api {
            Some(api) => self.validate_dual_format(&item.manifest, api, options),
            None => self.validate_agent(&item.manifest, options),
        };
        let outcome = match outcome {
            Ok(report) => BatchOutcome::Completed {
                report: Box::new(report),
            },
            Err(err) => {
                tracing::warn!(source = %item.source, error = %err, "batch entry faulted");
                BatchOutcome::Faulted {
                    error: err.to_string(),
                }
            }
        };
        BatchEntry {
            source: item.source.clone(),
            outcome,
        }
    }

    /// Validate every item in order. Callers wanting parallelism map
    /// [`ComplianceEngine::validate_item`] themselves.
    pub fn validate_batch(&self, items: &[BatchItem], options: &ValidationOptions) -> BatchSummary {
        BatchSummary::from_entries(items.iter().map(|item| self.validate_item(item, options)).collect())
    }

    fn structural(&self, manifest: Option<&Value>, api: Option<&Value>) -> Result<StageResult, EngineError> {
        structural::check(&self.schemas, manifest, api).map_err(|source| {
            log_schema_fault(&source, manifest);
            EngineError::Schema {
                stage: StageId::Structural,
                source,
            }
        })
    }

    fn finish(
        &self,
        stages: Vec<StageResult>,
        manifest: &ManifestView<'_>,
        options: &ValidationOptions,
    ) -> ComplianceReport {
        let frameworks = if options.frameworks.is_empty() {
            None
        } else {
            Some(self.frameworks.evaluate(manifest, &options.frameworks))
        };
        report::generate(stages, frameworks)
    }
}

fn require_object(value: &Value, document: DocumentKind) -> Result<(), EngineError> {
    if value.is_object() {
        return Ok(());
    }
    let found = json_type_name(value);
    tracing::error!(%document, found, "rejecting non-object input");
    Err(EngineError::NotAnObject { document, found })
}

fn log_schema_fault(source: &SchemaValidationError, manifest: Option<&Value>) {
    let name = manifest
        .and_then(|m| ManifestView::new(m).display_name())
        .unwrap_or("<none>");
    tracing::error!(stage = %StageId::Structural, manifest_name = name, error = %source, "schema fault");
}

/// Validate a dual-format pair with a fresh engine over the bundled schemas.
pub fn validate_dual_format(
    manifest: &Value,
    api: &Value,
    frameworks: &[String],
) -> Result<ComplianceReport, EngineError> {
    let options = ValidationOptions {
        frameworks: frameworks.to_vec(),
        strict: false,
    };
    ComplianceEngine::new()?.validate_dual_format(manifest, api, &options)
}

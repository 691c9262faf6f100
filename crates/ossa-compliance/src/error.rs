//! Engine faults. Validation findings are never reported through these.

use ossa_core::{DocumentKind, FrameworkId, StageId};
use ossa_schema::SchemaValidationError;
use thiserror::Error;

/// A condition that prevents a validation call from producing a report.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A top-level input was not a JSON object.
    #[error("{document} must be a JSON object, got {found}")]
    NotAnObject {
        document: DocumentKind,
        found: &'static str,
    },

    /// A schema needed by a stage could not be loaded or compiled.
    #[error("{stage} stage could not use its schema: {source}")]
    Schema {
        stage: StageId,
        #[source]
        source: SchemaValidationError,
    },
}

/// Failure inside a single framework evaluator.
///
/// Contained by the registry: it turns into an invalid framework result and
/// never aborts the other frameworks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{framework} evaluation failed: {reason}")]
pub struct FrameworkFault {
    pub framework: FrameworkId,
    pub reason: String,
}

impl FrameworkFault {
    pub fn new(framework: FrameworkId, reason: impl Into<String>) -> Self {
        Self {
            framework,
            reason: reason.into(),
        }
    }
}

pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

//! # ossa-schema: Structural Validation & Document Loading
//!
//! ## Runtime Validation (`validate`)
//!
//! [`SchemaValidator`] holds the bundled agent-manifest and OpenAPI 3.x
//! schemas (optionally overridden from a directory) and reports every
//! violation of a document as a [`Violation`]. The free function
//! [`validate`] checks a document against an arbitrary schema value.
//!
//! ## Loading (`load`)
//!
//! [`load_document`] reads YAML or JSON, expands `${VAR:-default}`
//! references and returns a `serde_json::Value`. [`load_document_with`]
//! with [`Expansion::None`] skips the expansion.
//!
//! ## Discovery (`discover`)
//!
//! [`discover_manifests`] walks a directory for manifest files and pairs
//! each with a sibling OpenAPI description.
//!
//! ## Crate Policy
//!
//! - Depends only on `ossa-core` internally.
//! - No network access: unresolved `$ref`s fail schema compilation.
//! - Schema violations are data; only unusable schemas are errors.

pub mod discover;
pub mod load;
pub mod validate;

pub use discover::{
    discover_manifests, is_manifest_file, sibling_api_description, ManifestPair,
};
pub use load::{
    expand_env_vars, expand_env_vars_with, load_document, load_document_with, parse_document,
    yaml_to_json_value, DocumentFormat, Expansion, LoadError,
};
pub use validate::{
    validate, SchemaValidationError, SchemaValidator, Violation, MANIFEST_SCHEMA, OPENAPI_SCHEMA,
};

//! # Error Types
//!
//! Errors shared across the workspace. Validation findings are never
//! errors; these types only describe conditions where a caller asked for
//! something the engine cannot represent.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A framework identifier that does not name any built-in framework.
///
/// The `Display` output is the exact message placed in the error issue of
/// the corresponding framework result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported framework: {0}")]
pub struct UnknownFramework(pub String);

/// Which of the two input documents a message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// The agent manifest.
    Manifest,
    /// The paired OpenAPI description.
    ApiDescription,
}

impl DocumentKind {
    /// Human-readable label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
            Self::ApiDescription => "API description",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

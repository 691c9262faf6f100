//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The service is stateless between requests: `AppState` carries the
//! configuration read at startup and one [`ComplianceEngine`] shared behind
//! an `Arc`. The engine holds only immutable schemas and framework rules,
//! so handlers and blocking batch workers use it without locking.

use std::path::PathBuf;
use std::sync::Arc;

use ossa_compliance::{ComplianceEngine, EngineError};

/// Runtime configuration, read once from the environment.
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Bearer secret guarding `/validate/*`. Auth is disabled when `None`.
    pub auth_token: Option<String>,
    /// Directory that `file_path` request fields are resolved under.
    pub workspace_root: PathBuf,
    /// Frameworks applied when a request names none.
    pub default_frameworks: Vec<String>,
    /// Directory overriding the bundled schemas.
    pub schema_dir: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("workspace_root", &self.workspace_root)
            .field("default_frameworks", &self.default_frameworks)
            .field("schema_dir", &self.schema_dir)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
            workspace_root: PathBuf::from("."),
            default_frameworks: Vec::new(),
            schema_dir: None,
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `AUTH_TOKEN`, `OSSA_WORKSPACE_ROOT`,
    /// `OSSA_DEFAULT_FRAMEWORKS` and `OSSA_SCHEMA_DIR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "PORT is not a valid port number, using 8080");
                defaults.port
            }),
            None => defaults.port,
        };

        Self {
            port,
            auth_token: get("AUTH_TOKEN"),
            workspace_root: get("OSSA_WORKSPACE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.workspace_root),
            default_frameworks: get("OSSA_DEFAULT_FRAMEWORKS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            schema_dir: get("OSSA_SCHEMA_DIR").map(PathBuf::from),
        }
    }

    /// The request's frameworks, or the configured defaults when it names none.
    pub fn frameworks_or_default(&self, requested: Vec<String>) -> Vec<String> {
        if requested.is_empty() {
            self.default_frameworks.clone()
        } else {
            requested
        }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub engine: Arc<ComplianceEngine>,
}

impl AppState {
    /// Build the engine described by `config`: bundled schemas, or the
    /// schemas under `schema_dir` when one is set.
    pub fn new(config: AppConfig) -> Result<Self, EngineError> {
        let engine = match &config.schema_dir {
            Some(dir) => ComplianceEngine::from_schema_dir(dir)?,
            None => ComplianceEngine::new()?,
        };
        Ok(Self::with_engine(config, engine))
    }

    pub fn with_engine(config: AppConfig, engine: ComplianceEngine) -> Self {
        Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
        }
    }
}

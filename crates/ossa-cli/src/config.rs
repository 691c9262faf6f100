//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`. Explicit flags win: a
//! non-empty `--framework` list replaces `frameworks`, `--strict` can only
//! switch strict mode on.
//!
//! ```yaml
//! frameworks: [EU_AI_ACT, GDPR]
//! strict: true
//! schema_dir: ./schemas
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub frameworks: Vec<String>,
    pub strict: bool,
    /// Relative paths resolve against the config file's directory.
    pub schema_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Read the file at `path`, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("invalid config {}", path.display()))?
        };
        if let (Some(dir), Some(base)) = (config.schema_dir.as_mut(), path.parent()) {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
        tracing::debug!(config = ?config, "loaded CLI configuration");
        Ok(config)
    }

    pub fn frameworks(&self, flags: &[String]) -> Vec<String> {
        if flags.is_empty() {
            self.frameworks.clone()
        } else {
            flags.to_vec()
        }
    }

    pub fn strict(&self, flag: bool) -> bool {
        flag || self.strict
    }
}

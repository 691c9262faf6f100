//! # Document Loading
//!
//! Reads manifests and API descriptions from disk. The format follows the
//! file extension (`.yaml`/`.yml` or `.json`); anything else is tried as
//! YAML, which is a superset of JSON.
//!
//! With [`Expansion::Environment`], `${VAR}` and `${VAR:-default}` references
//! are expanded from the process environment before parsing. Unset variables
//! without a default expand to the empty string. Only upper-case names are
//! recognised; other `${...}` text is left untouched. Loaders serving remote
//! callers use [`Expansion::None`] so the process environment never reaches
//! a returned document.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Error reading or parsing a document.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in '{path}': {reason}")]
    Yaml { path: String, reason: String },

    #[error("invalid JSON in '{path}': {reason}")]
    Json { path: String, reason: String },

    /// YAML that has no JSON equivalent (non-scalar keys, NaN, ...).
    #[error("YAML-to-JSON conversion failed for '{path}': {reason}")]
    Conversion { path: String, reason: String },
}

/// Serialization format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Whether `${VAR}` references are resolved when a document is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Expansion {
    /// Resolve from the process environment.
    #[default]
    Environment,
    /// Keep the document text verbatim.
    None,
}

/// Load, expand and parse the document at `path`.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    load_document_with(path, Expansion::Environment)
}

/// Load and parse the document at `path` with the given expansion mode.
pub fn load_document_with(path: &Path, expansion: Expansion) -> Result<Value, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let origin = path.display().to_string();
    let format = DocumentFormat::from_path(path);
    match expansion {
        Expansion::Environment => parse_document(&expand_env_vars(&content), format, &origin),
        Expansion::None => parse_document(&content, format, &origin),
    }
}

/// Parse document text. `origin` names the source in error messages.
pub fn parse_document(content: &str, format: DocumentFormat, origin: &str) -> Result<Value, LoadError> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| LoadError::Json {
            path: origin.to_string(),
            reason: e.to_string(),
        }),
        DocumentFormat::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| LoadError::Yaml {
                    path: origin.to_string(),
                    reason: e.to_string(),
                })?;
            yaml_to_json_value(&yaml).map_err(|reason| LoadError::Conversion {
                path: origin.to_string(),
                reason,
            })
        }
    }
}

/// Expand `${VAR}` / `${VAR:-default}` from the process environment.
pub fn expand_env_vars(content: &str) -> String {
    expand_env_vars_with(content, |name| std::env::var(name).ok())
}

/// Expand variable references using `lookup` to resolve names.
pub fn expand_env_vars_with<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match parse_reference(after) {
            Some((name, default, consumed)) => {
                let value = lookup(name).unwrap_or_else(|| default.unwrap_or("").to_string());
                out.push_str(&value);
                rest = &after[consumed..];
            }
            None => {
                out.push_str("${");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parse `NAME}` or `NAME:-default}` at the start of `s`.
///
/// Returns the name, the optional default and the number of bytes consumed
/// including the closing brace.
fn parse_reference(s: &str) -> Option<(&str, Option<&str>, usize)> {
    let name_len = s
        .char_indices()
        .find(|(i, c)| {
            let ok = c.is_ascii_uppercase() || *c == '_' || (*i > 0 && c.is_ascii_digit());
            !ok
        })
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    if name_len == 0 {
        return None;
    }
    let name = &s[..name_len];
    let tail = &s[name_len..];

    if tail.starts_with('}') {
        return Some((name, None, name_len + 1));
    }
    let default_body = tail.strip_prefix(":-")?;
    let close = default_body.find('}')?;
    Some((name, Some(&default_body[..close]), name_len + 2 + close + 1))
}

/// Convert a `serde_yaml::Value` into the equivalent `serde_json::Value`.
pub fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}

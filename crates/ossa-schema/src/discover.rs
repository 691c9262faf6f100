//! # Manifest Discovery
//!
//! Locates agent manifests under a directory tree and pairs each with the
//! OpenAPI description that sits next to it.
//!
//! A manifest file is `*.ossa.yaml`, `*.ossa.yml`, `*.ossa.json`,
//! `agent.yml` or `agent.yaml`. Its API description is a sibling named
//! `openapi.yaml`, `openapi.yml` or `openapi.json`, first match wins.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

const MANIFEST_SUFFIXES: &[&str] = &[".ossa.yaml", ".ossa.yml", ".ossa.json"];
const MANIFEST_NAMES: &[&str] = &["agent.yml", "agent.yaml"];
const API_DESCRIPTION_NAMES: &[&str] = &["openapi.yaml", "openapi.yml", "openapi.json"];

/// A discovered manifest and its optional API description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPair {
    pub manifest: PathBuf,
    pub api_description: Option<PathBuf>,
}

impl ManifestPair {
    pub fn for_manifest(manifest: PathBuf) -> Self {
        let api_description = sibling_api_description(&manifest);
        Self {
            manifest,
            api_description,
        }
    }
}

pub fn is_manifest_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    MANIFEST_NAMES.contains(&name) || MANIFEST_SUFFIXES.iter().any(|s| name.ends_with(s))
}

/// The OpenAPI description next to `manifest`, if one exists.
pub fn sibling_api_description(manifest: &Path) -> Option<PathBuf> {
    let dir = manifest.parent()?;
    API_DESCRIPTION_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Recursively find manifests under `dir`, sorted by path.
///
/// Unreadable directories are logged and skipped.
pub fn discover_manifests(dir: &Path) -> Vec<ManifestPair> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();
    walk(dir, &mut found, &mut seen);
    found.sort();
    found.into_iter().map(ManifestPair::for_manifest).collect()
}

fn walk(dir: &Path, acc: &mut Vec<PathBuf>, seen: &mut HashSet<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "failed to read directory during manifest discovery"
            );
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            walk(&path, acc, seen);
        } else if is_manifest_file(&path) && seen.insert(path.clone()) {
            acc.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_name_patterns() {
        assert!(is_manifest_file(Path::new("a/support.ossa.yaml")));
        assert!(is_manifest_file(Path::new("support.ossa.yml")));
        assert!(is_manifest_file(Path::new("support.ossa.json")));
        assert!(is_manifest_file(Path::new("x/agent.yml")));
        assert!(is_manifest_file(Path::new("agent.yaml")));
        assert!(!is_manifest_file(Path::new("openapi.yaml")));
        assert!(!is_manifest_file(Path::new("agent.json")));
        assert!(!is_manifest_file(Path::new("support.yaml")));
    }

    #[test]
    fn missing_dir_yields_nothing() {
        assert!(discover_manifests(Path::new("/definitely/not/here")).is_empty());
    }
}

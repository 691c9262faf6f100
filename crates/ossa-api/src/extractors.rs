//! # Custom Extractors & Validation
//!
//! The [`Validate`] trait for request DTOs, a helper to extract and
//! validate JSON bodies in handlers, and confinement of request file paths
//! to the configured workspace root.

use std::path::{Component, Path, PathBuf};

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Request types that check rules serde cannot express.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and run [`Validate`] on it. Rule failures are 422.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

/// Resolve `requested` under `root`, rejecting anything that lands outside.
///
/// The check runs twice: lexically first, so `..` escapes are refused even
/// for files that do not exist, then on the canonical path, so symlinks
/// cannot leave the root either. A path that stays inside but does not
/// exist is [`AppError::NotFound`].
pub fn resolve_in_workspace(root: &Path, requested: &str) -> Result<PathBuf, AppError> {
    let forbidden = || AppError::Forbidden(format!("path '{requested}' is outside the workspace"));

    let root = root.canonicalize().map_err(|e| {
        AppError::Internal(format!("workspace root '{}' unusable: {e}", root.display()))
    })?;

    let candidate = root.join(requested);
    let lexical = normalize(&candidate).ok_or_else(forbidden)?;
    if !lexical.starts_with(&root) {
        tracing::warn!(path = requested, "rejected path outside workspace");
        return Err(forbidden());
    }

    let canonical = lexical.canonicalize().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::NotFound(format!("file '{requested}' not found")),
        _ => AppError::Internal(format!("cannot resolve '{requested}': {e}")),
    })?;
    if !canonical.starts_with(&root) {
        tracing::warn!(path = requested, "rejected symlink escaping workspace");
        return Err(forbidden());
    }
    Ok(canonical)
}

/// Fold `.` and `..` without touching the filesystem. `None` when `..`
/// climbs above the filesystem root.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("agents")).unwrap();
        fs::write(dir.path().join("agents/support.ossa.yaml"), "kind: Agent\n").unwrap();
        dir
    }

    #[test]
    fn resolves_relative_path_inside_root() {
        let dir = workspace();
        let path = resolve_in_workspace(dir.path(), "agents/./support.ossa.yaml").unwrap();
        assert!(path.ends_with("agents/support.ossa.yaml"));
    }

    #[test]
    fn parent_escape_is_forbidden() {
        let dir = workspace();
        let err = resolve_in_workspace(dir.path(), "../../etc/passwd").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn absolute_path_outside_root_is_forbidden() {
        let dir = workspace();
        let err = resolve_in_workspace(dir.path(), "/etc/passwd").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn missing_file_inside_root_is_not_found() {
        let dir = workspace();
        let err = resolve_in_workspace(dir.path(), "agents/ghost.ossa.yaml").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escape_is_forbidden() {
        let dir = workspace();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.yaml"), "x: 1\n").unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.yaml"), dir.path().join("link.yaml"))
            .unwrap();
        let err = resolve_in_workspace(dir.path(), "link.yaml").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}

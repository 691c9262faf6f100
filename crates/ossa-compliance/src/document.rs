//! # Document Views
//!
//! Read-only accessors over the two parsed input documents. Every accessor
//! is total: absent or mistyped fields read as `None` or empty, never as an
//! error. Rules decide what an absence means.

use serde_json::Value;

/// HTTP methods that count as operations under an OpenAPI path item.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Borrowed view over an agent manifest.
#[derive(Debug, Clone, Copy)]
pub struct ManifestView<'a> {
    root: &'a Value,
}

impl<'a> ManifestView<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &'a Value {
        self.root
    }

    /// Raw `apiVersion`, whatever its type.
    pub fn api_version(&self) -> Option<&'a Value> {
        self.root.get("apiVersion")
    }

    /// Human-readable agent name: `spec.agent.name`, else `metadata.name`.
    pub fn display_name(&self) -> Option<&'a str> {
        text_at(self.root, "/spec/agent/name").or_else(|| text_at(self.root, "/metadata/name"))
    }

    pub fn version(&self) -> Option<&'a str> {
        text_at(self.root, "/metadata/version")
    }

    pub fn description(&self) -> Option<&'a str> {
        text_at(self.root, "/metadata/description")
    }

    pub fn has_labels(&self) -> bool {
        self.root
            .pointer("/metadata/labels")
            .and_then(Value::as_object)
            .is_some_and(|labels| !labels.is_empty())
    }

    pub fn role(&self) -> Option<&'a str> {
        text_at(self.root, "/spec/role")
    }

    pub fn temperature(&self) -> Option<f64> {
        self.root.pointer("/spec/llm/temperature").and_then(Value::as_f64)
    }

    /// Declared protocols, from a plain list or `spec.protocols.supported`.
    pub fn protocols(&self) -> Vec<&'a str> {
        match self.root.pointer("/spec/protocols") {
            Some(Value::Object(map)) => map.get("supported").map(names).unwrap_or_default(),
            Some(list) => names(list),
            None => Vec::new(),
        }
    }

    pub fn capabilities(&self) -> Vec<&'a str> {
        self.root
            .pointer("/spec/capabilities")
            .map(names)
            .unwrap_or_default()
    }

    /// Monitoring metric names, `None` when no metric list is declared.
    /// The monitoring block resolves like any other [`section`](Self::section).
    pub fn monitoring_metrics(&self) -> Option<Vec<&'a str>> {
        self.section("monitoring")
            .and_then(|m| m.get("metrics"))
            .filter(|v| v.is_array())
            .map(names)
    }

    pub fn audit_logging(&self) -> bool {
        self.section("monitoring")
            .and_then(|m| m.get("audit_logging"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// A compliance section by key.
    ///
    /// Looks in `spec.compliance.<key>`, then `spec.<key>`, then `<key>` at
    /// the document root. Explicit `null`s are treated as absent.
    pub fn section(&self, key: &str) -> Option<&'a Value> {
        let candidates = [
            self.root.get("spec").and_then(|s| s.get("compliance")).and_then(|c| c.get(key)),
            self.root.get("spec").and_then(|s| s.get(key)),
            self.root.get(key),
        ];
        candidates.into_iter().flatten().find(|v| !v.is_null())
    }
}

/// Borrowed view over an OpenAPI description.
#[derive(Debug, Clone, Copy)]
pub struct ApiView<'a> {
    root: &'a Value,
}

impl<'a> ApiView<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    pub fn title(&self) -> Option<&'a str> {
        text_at(self.root, "/info/title")
    }

    pub fn version(&self) -> Option<&'a str> {
        text_at(self.root, "/info/version")
    }

    /// Number of entries under `paths`.
    pub fn path_count(&self) -> usize {
        self.root
            .get("paths")
            .and_then(Value::as_object)
            .map_or(0, |paths| paths.len())
    }

    /// Number of HTTP operations across all paths.
    pub fn endpoint_count(&self) -> usize {
        let Some(paths) = self.root.get("paths").and_then(Value::as_object) else {
            return 0;
        };
        paths
            .values()
            .filter_map(Value::as_object)
            .map(|item| HTTP_METHODS.iter().filter(|m| item.contains_key(**m)).count())
            .sum()
    }

    /// Names of `components.securitySchemes`, in key order.
    pub fn security_schemes(&self) -> Vec<&'a str> {
        self.root
            .pointer("/components/securitySchemes")
            .and_then(Value::as_object)
            .map(|schemes| schemes.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether a non-empty top-level `security` requirement is applied.
    pub fn has_global_security(&self) -> bool {
        self.root
            .get("security")
            .and_then(Value::as_array)
            .is_some_and(|reqs| !reqs.is_empty())
    }
}

/// Non-empty string at a JSON pointer.
pub(crate) fn text_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Names from a list of strings or `{name: ...}` objects.
pub(crate) fn names(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.as_str()),
                    Value::Object(map) => map.get("name").and_then(Value::as_str),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Whether `value` is present and carries content.
///
/// `false`, `""`, `[]` and `{}` count as not configured.
pub(crate) fn is_configured(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Number(_)) => true,
    }
}

/// Lower-case, with `-` and `_` folded to spaces, for name comparison.
pub(crate) fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | '_' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

//! # Validation Issues and Stage Results
//!
//! Every check in the engine emits [`ValidationIssue`] values. A stage
//! collects its issues in a local [`Findings`] buffer and then seals them
//! into an immutable [`StageResult`] with [`Findings::finish`].
//!
//! Duplicate issues are kept. Counts drive scoring, so two identical
//! violations cost twice.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::scoring::{score, StagePolicy};

/// Severity of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Passed,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Passed => "passed",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one independent phase of a validation run.
///
/// The derived ordering follows declaration order, which is also the order
/// stages appear in a report. Framework stages sort after the built-in
/// stages and among themselves by identifier.
///
/// Serialized as a plain string: `structural`, `cross_format`, `security`,
/// `best_practices` or `framework:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageId {
    Structural,
    CrossFormat,
    Security,
    BestPractices,
    /// A compliance framework stage, keyed by the identifier as requested.
    Framework(String),
}

impl StageId {
    pub fn framework(id: impl Into<String>) -> Self {
        Self::Framework(id.into())
    }

    /// Short human-readable label for messages and CLI output.
    pub fn label(&self) -> String {
        match self {
            Self::Structural => "structural".to_string(),
            Self::CrossFormat => "cross-format".to_string(),
            Self::Security => "security".to_string(),
            Self::BestPractices => "best-practices".to_string(),
            Self::Framework(id) => format!("framework {id}"),
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => f.write_str("structural"),
            Self::CrossFormat => f.write_str("cross_format"),
            Self::Security => f.write_str("security"),
            Self::BestPractices => f.write_str("best_practices"),
            Self::Framework(id) => write!(f, "framework:{id}"),
        }
    }
}

impl FromStr for StageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "structural" => Ok(Self::Structural),
            "cross_format" => Ok(Self::CrossFormat),
            "security" => Ok(Self::Security),
            "best_practices" => Ok(Self::BestPractices),
            // Caller-supplied framework ids are kept verbatim, empty included,
            // so every serialized stage parses back.
            other => match other.strip_prefix("framework:") {
                Some(id) => Ok(Self::Framework(id.to_string())),
                None => Err(format!("unknown stage identifier: {other}")),
            },
        }
    }
}

impl Serialize for StageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A single finding produced by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub stage: StageId,
    pub severity: Severity,
    /// Stable machine-readable code, e.g. `SECURITY_NO_SCHEMES`.
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        stage: StageId,
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            severity,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn error(stage: StageId, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(stage, Severity::Error, code, message)
    }

    pub fn warning(stage: StageId, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(stage, Severity::Warning, code, message)
    }

    pub fn passed(stage: StageId, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(stage, Severity::Passed, code, message)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.code, self.message)
    }
}

/// Local issue buffer owned by one stage while it runs.
///
/// Never shared: each stage function creates its own, pushes findings and
/// consumes it with [`Findings::finish`].
#[derive(Debug)]
pub struct Findings {
    stage: StageId,
    issues: Vec<ValidationIssue>,
}

impl Findings {
    pub fn new(stage: StageId) -> Self {
        Self {
            stage,
            issues: Vec::new(),
        }
    }

    pub fn stage(&self) -> &StageId {
        &self.stage
    }

    pub fn error(&mut self, code: &str, message: impl Into<String>) {
        self.push(Severity::Error, code, message);
    }

    pub fn warning(&mut self, code: &str, message: impl Into<String>) {
        self.push(Severity::Warning, code, message);
    }

    pub fn passed(&mut self, code: &str, message: impl Into<String>) {
        self.push(Severity::Passed, code, message);
    }

    fn push(&mut self, severity: Severity, code: &str, message: impl Into<String>) {
        self.issues
            .push(ValidationIssue::new(self.stage.clone(), severity, code, message));
    }

    /// Append issues produced elsewhere, re-tagging them with this stage.
    pub fn extend(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        let stage = self.stage.clone();
        self.issues.extend(issues.into_iter().map(|mut issue| {
            issue.stage = stage.clone();
            issue
        }));
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }

    /// Seal the buffer into a scored, immutable [`StageResult`].
    pub fn finish(self, policy: StagePolicy) -> StageResult {
        StageResult::from_issues(self.stage, self.issues, policy)
    }
}

/// The outcome of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: StageId,
    pub valid: bool,
    pub score: u8,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub passed: Vec<ValidationIssue>,
}

impl StageResult {
    /// Partition `issues` by severity (order preserved) and score them.
    ///
    /// `valid` holds iff there are no errors and the score reaches the
    /// policy threshold.
    pub fn from_issues(stage: StageId, issues: Vec<ValidationIssue>, policy: StagePolicy) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut passed = Vec::new();
        for issue in issues {
            match issue.severity {
                Severity::Error => errors.push(issue),
                Severity::Warning => warnings.push(issue),
                Severity::Passed => passed.push(issue),
            }
        }
        let score = score(errors.len(), warnings.len(), policy.weights);
        Self {
            stage,
            valid: errors.is_empty() && score >= policy.threshold,
            score,
            errors,
            warnings,
            passed,
        }
    }

    /// A zero-score result carrying a single error.
    ///
    /// Used for stages that could not be evaluated at all, such as an
    /// unsupported framework identifier or an evaluator fault.
    pub fn failed(stage: StageId, code: &str, message: impl Into<String>) -> Self {
        let issue = ValidationIssue::error(stage.clone(), code, message);
        Self {
            stage,
            valid: false,
            score: 0,
            errors: vec![issue],
            warnings: Vec::new(),
            passed: Vec::new(),
        }
    }

    pub fn counts(&self) -> crate::certification::IssueCounts {
        crate::certification::IssueCounts {
            errors: self.errors.len(),
            warnings: self.warnings.len(),
            passed: self.passed.len(),
        }
    }
}

/// A [`StageResult`] tagged with the framework identifier as requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkResult {
    pub framework_id: String,
    #[serde(flatten)]
    pub result: StageResult,
}

//! # Batch Validation
//!
//! A batch is a map over independent items followed by a reduction. Counts
//! in [`BatchSummary`] are derived from the settled entries, never kept in
//! a shared counter.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::report::ComplianceReport;

/// One unit of batch work: a manifest and, optionally, its API description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    /// Where the item came from (a file path or `agents[i]`).
    pub source: String,
    pub manifest: Value,
    #[serde(default)]
    pub api: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BatchOutcome {
    Completed { report: Box<ComplianceReport> },
    Faulted { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub source: String,
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

impl BatchEntry {
    pub fn faulted(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            outcome: BatchOutcome::Faulted {
                error: error.into(),
            },
        }
    }

    pub fn report(&self) -> Option<&ComplianceReport> {
        match &self.outcome {
            BatchOutcome::Completed { report } => Some(report.as_ref()),
            BatchOutcome::Faulted { .. } => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.report().is_some_and(|r| r.valid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub faulted: usize,
    pub results: Vec<BatchEntry>,
}

impl BatchSummary {
    /// Reduce settled entries. Entry order is preserved.
    pub fn from_entries(results: Vec<BatchEntry>) -> Self {
        let (valid, invalid, faulted) =
            results
                .iter()
                .fold((0, 0, 0), |(valid, invalid, faulted), entry| match entry.report() {
                    Some(report) if report.valid => (valid + 1, invalid, faulted),
                    Some(_) => (valid, invalid + 1, faulted),
                    None => (valid, invalid, faulted + 1),
                });
        Self {
            total: results.len(),
            valid,
            invalid,
            faulted,
            results,
        }
    }

    /// `"N of M valid"`.
    pub fn headline(&self) -> String {
        format!("{} of {} valid", self.valid, self.total)
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.headline())
    }
}

//! # Compliance Framework Evaluation
//!
//! Each requested identifier is parsed into a [`FrameworkId`] and dispatched
//! to an evaluator. The registry starts with the built-in rule module for
//! every framework; [`FrameworkRegistry::register`] replaces one.
//!
//! ## Totality
//!
//! [`FrameworkRegistry::evaluate`] returns exactly one result per distinct
//! requested identifier, keyed by the identifier as written:
//!
//! - unparseable identifiers yield an invalid, zero-score result carrying
//!   `Unsupported framework: <id>`;
//! - an evaluator that returns [`FrameworkFault`] or panics yields an
//!   invalid, zero-score result with a generic engine-error issue. The
//!   remaining frameworks are still evaluated.

pub mod eu_ai_act;
pub mod gdpr;
pub mod iso42001;
pub mod nist_ai_rmf;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use ossa_core::{FrameworkId, FrameworkResult, Findings, StageId, StageResult, ValidationIssue};

use crate::document::ManifestView;
use crate::error::FrameworkFault;

pub const UNSUPPORTED_CODE: &str = "FRAMEWORK_UNSUPPORTED";
pub const ENGINE_ERROR_CODE: &str = "FRAMEWORK_ENGINE_ERROR";

/// Rule module for one compliance framework.
pub trait FrameworkEvaluator: Send + Sync + fmt::Debug {
    fn framework(&self) -> FrameworkId;

    /// Evaluate the manifest. Missing sections are findings, not faults.
    fn evaluate(&self, manifest: &ManifestView<'_>) -> Result<Vec<ValidationIssue>, FrameworkFault>;
}

/// The built-in rules for a framework.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinEvaluator(pub FrameworkId);

impl FrameworkEvaluator for BuiltinEvaluator {
    fn framework(&self) -> FrameworkId {
        self.0
    }

    fn evaluate(&self, manifest: &ManifestView<'_>) -> Result<Vec<ValidationIssue>, FrameworkFault> {
        Ok(match self.0 {
            FrameworkId::Iso42001 => iso42001::evaluate(manifest),
            FrameworkId::NistAiRmf => nist_ai_rmf::evaluate(manifest),
            FrameworkId::EuAiAct => eu_ai_act::evaluate(manifest),
            FrameworkId::Gdpr => gdpr::evaluate(manifest),
        })
    }
}

/// Evaluators by framework. Immutable once the engine is built.
#[derive(Debug, Default)]
pub struct FrameworkRegistry {
    overrides: HashMap<FrameworkId, Box<dyn FrameworkEvaluator>>,
}

impl FrameworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the evaluator for `evaluator.framework()`.
    pub fn register(&mut self, evaluator: Box<dyn FrameworkEvaluator>) {
        self.overrides.insert(evaluator.framework(), evaluator);
    }

    /// Evaluate every distinct identifier in `requested`.
    pub fn evaluate(
        &self,
        manifest: &ManifestView<'_>,
        requested: &[String],
    ) -> BTreeMap<String, FrameworkResult> {
        requested
            .iter()
            .map(|id| (id.clone(), self.evaluate_one(manifest, id)))
            .collect()
    }

    /// Evaluate a single identifier as written by the caller.
    pub fn evaluate_one(&self, manifest: &ManifestView<'_>, requested: &str) -> FrameworkResult {
        let stage = StageId::framework(requested);
        let result = match requested.parse::<FrameworkId>() {
            Ok(framework) => self.run(framework, manifest, stage),
            Err(unknown) => {
                tracing::debug!(framework = requested, "unsupported framework requested");
                StageResult::failed(stage, UNSUPPORTED_CODE, unknown.to_string())
            }
        };
        FrameworkResult {
            framework_id: requested.to_string(),
            result,
        }
    }

    fn run(&self, framework: FrameworkId, manifest: &ManifestView<'_>, stage: StageId) -> StageResult {
        let builtin = BuiltinEvaluator(framework);
        let evaluator: &dyn FrameworkEvaluator = match self.overrides.get(&framework) {
            Some(custom) => custom.as_ref(),
            None => &builtin,
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| evaluator.evaluate(manifest)));
        let fault = match outcome {
            Ok(Ok(issues)) => {
                let mut findings = Findings::new(stage);
                findings.extend(issues);
                return findings.finish(framework.policy());
            }
            Ok(Err(fault)) => fault.reason,
            Err(payload) => panic_message(payload.as_ref()),
        };

        tracing::error!(
            framework = framework.as_str(),
            stage = %stage,
            reason = %fault,
            manifest_name = manifest.display_name().unwrap_or("<unnamed>"),
            "framework evaluator failed; reporting engine error"
        );
        StageResult::failed(
            stage,
            ENGINE_ERROR_CODE,
            format!(
                "{} evaluation could not be completed due to an internal engine error",
                framework.title()
            ),
        )
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "evaluator panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Faulty;

    impl FrameworkEvaluator for Faulty {
        fn framework(&self) -> FrameworkId {
            FrameworkId::Gdpr
        }

        fn evaluate(&self, _: &ManifestView<'_>) -> Result<Vec<ValidationIssue>, FrameworkFault> {
            Err(FrameworkFault::new(FrameworkId::Gdpr, "lookup table missing"))
        }
    }

    #[derive(Debug)]
    struct Panicky;

    impl FrameworkEvaluator for Panicky {
        fn framework(&self) -> FrameworkId {
            FrameworkId::NistAiRmf
        }

        fn evaluate(&self, _: &ManifestView<'_>) -> Result<Vec<ValidationIssue>, FrameworkFault> {
            panic!("index out of bounds")
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unsupported_framework_is_reported_not_dropped() {
        let manifest = json!({});
        let registry = FrameworkRegistry::new();
        let results = registry.evaluate(
            &ManifestView::new(&manifest),
            &ids(&["ISO_42001_2023", "NOT_REAL"]),
        );

        assert_eq!(results.len(), 2);
        let unknown = &results["NOT_REAL"];
        assert!(!unknown.result.valid);
        assert_eq!(unknown.result.score, 0);
        assert_eq!(unknown.result.errors[0].message, "Unsupported framework: NOT_REAL");
        assert_eq!(unknown.result.errors[0].code, UNSUPPORTED_CODE);
    }

    #[test]
    fn result_key_is_requested_alias() {
        let manifest = json!({});
        let results = FrameworkRegistry::new()
            .evaluate(&ManifestView::new(&manifest), &ids(&["EU_AI_Act"]));
        let result = &results["EU_AI_Act"];
        assert_eq!(result.framework_id, "EU_AI_Act");
        assert_eq!(result.result.stage, StageId::framework("EU_AI_Act"));
        assert!(result.result.errors.iter().all(|e| e.stage == result.result.stage));
    }

    #[test]
    fn faults_are_contained() {
        let manifest = json!({"governance": {"owner": "x"}});
        let mut registry = FrameworkRegistry::new();
        registry.register(Box::new(Faulty));
        registry.register(Box::new(Panicky));

        let results = registry.evaluate(
            &ManifestView::new(&manifest),
            &ids(&["GDPR", "NIST_AI_RMF", "ISO_42001"]),
        );
        assert_eq!(results.len(), 3);
        for id in ["GDPR", "NIST_AI_RMF"] {
            let r = &results[id].result;
            assert!(!r.valid);
            assert_eq!(r.score, 0);
            assert_eq!(r.errors.len(), 1);
            assert_eq!(r.errors[0].code, ENGINE_ERROR_CODE);
        }
        assert!(results["ISO_42001"]
            .result
            .errors
            .iter()
            .all(|e| e.code != ENGINE_ERROR_CODE));
    }

    #[test]
    fn builtin_dispatch_covers_every_framework() {
        let manifest = json!({});
        for id in FrameworkId::all() {
            let issues = BuiltinEvaluator(*id).evaluate(&ManifestView::new(&manifest)).unwrap();
            assert!(!issues.is_empty(), "{id} produced no findings for an empty manifest");
        }
    }
}

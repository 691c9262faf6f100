//! # ossa-core: Foundational Types for the OSSA Compliance Engine
//!
//! Leaf crate of the workspace. Defines the vocabulary every validation
//! stage speaks: issues, stage results, framework identifiers, the scoring
//! function and the certification ladder.
//!
//! ## Key Design Principles
//!
//! 1. **Closed severity.** [`Severity`] is an enum, so a weight lookup can
//!    never silently miss on a misspelled string.
//!
//! 2. **Pure stage results.** A [`StageResult`] is built once from a list of
//!    issues by [`Findings::finish`] and never mutated afterwards.
//!
//! 3. **Typed framework dispatch.** [`FrameworkId`] is a sum type. Parsing an
//!    unknown identifier yields [`UnknownFramework`], whose `Display` is the
//!    exact `Unsupported framework: <id>` message reported to callers.
//!
//! 4. **Global certification.** [`certification::determine`] reads the
//!    counts accumulated across every stage of a run.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ossa-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod certification;
pub mod error;
pub mod framework;
pub mod issue;
pub mod scoring;

pub use certification::{CertificationLevel, IssueCounts, TierGate};
pub use error::{DocumentKind, UnknownFramework};
pub use framework::FrameworkId;
pub use issue::{FrameworkResult, Findings, Severity, StageId, StageResult, ValidationIssue};
pub use scoring::{overall_score, score, ScoreWeights, StagePolicy};
